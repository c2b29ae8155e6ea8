//! The employee collection, kept as one JSON array under the `employees` key.
//!
//! Every mutating call reads the whole array, changes it and writes the whole
//! array back while holding the store lock.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{info, warn};

use crate::db::SharedSlot;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};
use crate::utils::clock::Clock;

pub const EMPLOYEES_KEY: &str = "employees";

pub struct EmployeeStore {
    slot: SharedSlot,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl EmployeeStore {
    pub fn new(slot: SharedSlot, clock: Arc<dyn Clock>) -> Self {
        EmployeeStore {
            slot,
            clock,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.lock
            .lock()
            .map_err(|_| AppError::InternalServerError("Employee store lock poisoned".to_string()))
    }

    fn read(&self) -> Result<Vec<Employee>, AppError> {
        match self.slot.get(EMPLOYEES_KEY)? {
            Some(text) if !text.trim().is_empty() => serde_json::from_str(&text).map_err(|err| {
                // Only unparsable text counts as corruption; well-formed records
                // of an unexpected shape are left alone.
                if err.is_data() {
                    AppError::IncompatibleData(format!("Stored employees do not match the record shape: {}", err))
                } else {
                    AppError::DecodeError(format!("Stored employees are unreadable: {}", err))
                }
            }),
            _ => Ok(Vec::new()),
        }
    }

    fn write(&self, employees: &[Employee]) -> Result<(), AppError> {
        let text = serde_json::to_string(employees)
            .map_err(|err| AppError::InternalServerError(err.to_string()))?;
        self.slot.set(EMPLOYEES_KEY, &text)
    }

    pub fn list(&self) -> Result<Vec<Employee>, AppError> {
        let _guard = self.guard()?;
        self.read()
    }

    pub fn find_by_id(&self, id: i64) -> Result<Employee, AppError> {
        self.list()?
            .into_iter()
            .find(|employee| employee.id == id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
    }

    pub fn create(&self, fields: NewEmployee) -> Result<Employee, AppError> {
        let _guard = self.guard()?;
        let mut employees = self.read()?;

        let now = self.clock.now();
        let employee = Employee {
            id: next_id(&employees, now.timestamp_millis())?,
            name: fields.name,
            email: fields.email,
            mobile: fields.mobile,
            designation: fields.designation,
            gender: fields.gender,
            courses: fields.courses,
            image: fields.image,
            create_date: now.date_naive(),
        };

        employees.push(employee.clone());
        self.write(&employees)?;
        info!("Created employee {}", employee.id);
        Ok(employee)
    }

    pub fn update(&self, id: i64, update: EmployeeUpdate) -> Result<Employee, AppError> {
        let _guard = self.guard()?;
        let mut employees = self.read()?;

        let employee = employees
            .iter_mut()
            .find(|employee| employee.id == id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        employee.apply(update);
        let updated = employee.clone();

        self.write(&employees)?;
        info!("Updated employee {}", id);
        Ok(updated)
    }

    /// Replaces an unreadable collection with an empty one.
    pub fn reset(&self) -> Result<(), AppError> {
        let _guard = self.guard()?;
        warn!("Resetting the '{}' slot to an empty collection", EMPLOYEES_KEY);
        self.write(&[])
    }
}

/// Millisecond timestamp, bumped past every id already issued.
fn next_id(employees: &[Employee], now_millis: i64) -> Result<i64, AppError> {
    let exhausted = || AppError::InternalServerError("Employee id space exhausted".to_string());
    let mut candidate = now_millis;
    for employee in employees {
        if employee.id >= candidate {
            candidate = employee.id.checked_add(1).ok_or_else(exhausted)?;
        }
    }
    while employees.iter().any(|employee| employee.id == candidate) {
        candidate = candidate.checked_add(1).ok_or_else(exhausted)?;
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemorySlot, Slot};
    use crate::models::employee::{Course, Designation, Gender};
    use crate::utils::clock::FixedClock;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap()))
    }

    fn store_with(slot: Arc<MemorySlot>, clock: Arc<FixedClock>) -> EmployeeStore {
        EmployeeStore::new(slot, clock)
    }

    fn fields(name: &str) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            email: "a@b.co".to_string(),
            mobile: "1234567890".to_string(),
            designation: Designation::Hr,
            gender: Gender::Male,
            courses: vec![Course::Bca],
            image: None,
        }
    }

    #[test]
    fn empty_or_missing_slot_lists_nothing() {
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(slot.clone(), fixed_clock());
        assert!(store.list().unwrap().is_empty());

        slot.set(EMPLOYEES_KEY, "").unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_slot_is_a_decode_error_until_reset() {
        let slot = Arc::new(MemorySlot::new());
        slot.set(EMPLOYEES_KEY, "[{oops").unwrap();
        let store = store_with(slot.clone(), fixed_clock());

        assert!(store.list().unwrap_err().is_decode());
        assert!(store.create(fields("Ann")).unwrap_err().is_decode());

        store.reset().unwrap();
        assert_eq!(slot.get(EMPLOYEES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn create_appends_one_record_with_assigned_id_and_date() {
        let clock = fixed_clock();
        let store = store_with(Arc::new(MemorySlot::new()), clock.clone());

        let created = store.create(fields("Ann")).unwrap();
        assert_eq!(created.id, clock.now().timestamp_millis());
        assert_eq!(created.create_date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(created.name, "Ann");
        assert_eq!(created.courses, vec![Course::Bca]);

        let listed = store.list().unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(store.find_by_id(created.id).unwrap(), created);
    }

    #[test]
    fn creates_within_one_clock_tick_get_distinct_ids() {
        let store = store_with(Arc::new(MemorySlot::new()), fixed_clock());

        let first = store.create(fields("Ann")).unwrap();
        let second = store.create(fields("Bo")).unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn ids_keep_increasing_when_the_clock_steps_back() {
        let clock = fixed_clock();
        let store = store_with(Arc::new(MemorySlot::new()), clock.clone());

        let first = store.create(fields("Ann")).unwrap();
        clock.advance(Duration::seconds(-30));
        let second = store.create(fields("Bo")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn update_overwrites_fields_and_keeps_identity() {
        let clock = fixed_clock();
        let store = store_with(Arc::new(MemorySlot::new()), clock.clone());
        let created = store.create(fields("Ann")).unwrap();
        store.create(fields("Bo")).unwrap();

        clock.advance(Duration::days(3));
        let updated = store
            .update(
                created.id,
                EmployeeUpdate {
                    name: Some("Annie".to_string()),
                    designation: Some(Designation::Manager),
                    ..EmployeeUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.create_date, created.create_date);
        assert_eq!(updated.name, "Annie");
        assert_eq!(updated.designation, Designation::Manager);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.courses, created.courses);

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], updated);
    }

    #[test]
    fn update_of_unknown_id_leaves_slot_untouched() {
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(slot.clone(), fixed_clock());
        store.create(fields("Ann")).unwrap();
        let before = slot.get(EMPLOYEES_KEY).unwrap();

        let err = store
            .update(42, EmployeeUpdate::from(fields("Nobody")))
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(slot.get(EMPLOYEES_KEY).unwrap(), before);
    }

    #[test]
    fn find_by_id_reports_not_found() {
        let store = store_with(Arc::new(MemorySlot::new()), fixed_clock());
        assert!(matches!(store.find_by_id(7), Err(AppError::NotFound(_))));
    }

    #[test]
    fn next_id_skips_taken_and_older_ids() {
        let mut existing = Employee {
            id: 100,
            name: "Ann".to_string(),
            email: "a@b.co".to_string(),
            mobile: "1234567890".to_string(),
            designation: Designation::Sales,
            gender: Gender::Female,
            courses: Vec::new(),
            image: None,
            create_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(next_id(&[], 50).unwrap(), 50);
        assert_eq!(next_id(std::slice::from_ref(&existing), 50).unwrap(), 101);
        assert_eq!(next_id(std::slice::from_ref(&existing), 500).unwrap(), 500);

        existing.id = 500;
        assert_eq!(next_id(std::slice::from_ref(&existing), 500).unwrap(), 501);

        existing.id = i64::MAX;
        assert!(matches!(
            next_id(std::slice::from_ref(&existing), 500),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn create_after_max_id_fails_without_writing() {
        let slot = Arc::new(MemorySlot::new());
        let stored = format!(
            r#"[{{"id":{},"name":"Ann","email":"a@b.co","mobile":"1234567890","designation":"HR","gender":"Male","courses":[],"createDate":"2024-01-01"}}]"#,
            i64::MAX
        );
        slot.set(EMPLOYEES_KEY, &stored).unwrap();
        let store = store_with(slot.clone(), fixed_clock());

        assert!(matches!(store.create(fields("Bo")), Err(AppError::InternalServerError(_))));
        assert_eq!(slot.get(EMPLOYEES_KEY).unwrap().as_deref(), Some(stored.as_str()));
    }

    #[test]
    fn off_shape_records_are_not_treated_as_corruption() {
        let slot = Arc::new(MemorySlot::new());
        let stored = r#"[{"id":1,"name":"Ann","email":"a@b.co","mobile":"1234567890","designation":"Director","gender":"Male","courses":[],"createDate":"2024-01-01"}]"#;
        slot.set(EMPLOYEES_KEY, stored).unwrap();
        let store = store_with(slot.clone(), fixed_clock());

        let err = store.list().unwrap_err();
        assert!(matches!(err, AppError::IncompatibleData(_)));
        assert!(!err.is_decode());
        assert_eq!(slot.get(EMPLOYEES_KEY).unwrap().as_deref(), Some(stored));
    }
}
