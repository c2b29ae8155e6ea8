//! Draft state behind the create and edit employee forms.

use log::debug;

use crate::errors::AppError;
use crate::models::employee::{Course, Employee, EmployeeDraft, EmployeeUpdate};
use crate::models::file::ImageUpload;
use crate::store::employee::EmployeeStore;
use crate::utils::image::encode_image;
use crate::utils::nav::LIST_ROUTE;
use crate::utils::validation::{validate, ValidationFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub record: Employee,
    pub redirect: &'static str,
    pub notice: &'static str,
}

#[derive(Debug, Clone)]
pub struct FormController {
    mode: FormMode,
    draft: EmployeeDraft,
}

impl FormController {
    pub fn create() -> Self {
        FormController {
            mode: FormMode::Create,
            draft: EmployeeDraft::default(),
        }
    }

    pub fn edit(store: &EmployeeStore, id: i64) -> Result<Self, AppError> {
        let employee = store.find_by_id(id)?;
        Ok(FormController {
            mode: FormMode::Edit(id),
            draft: EmployeeDraft::from(&employee),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &EmployeeDraft {
        &self.draft
    }

    /// Sets one of the text fields by its form name.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        let target = match name {
            "name" => &mut self.draft.name,
            "email" => &mut self.draft.email,
            "mobile" => &mut self.draft.mobile,
            "designation" => &mut self.draft.designation,
            "gender" => &mut self.draft.gender,
            other => return Err(AppError::BadRequest(format!("Unknown form field '{}'", other))),
        };
        *target = value.to_string();
        Ok(())
    }

    pub fn toggle_course(&mut self, course: Course, checked: bool) {
        let value = course.as_str();
        if checked {
            if !self.draft.courses.iter().any(|c| c == value) {
                self.draft.courses.push(value.to_string());
            }
        } else {
            self.draft.courses.retain(|c| c != value);
        }
    }

    /// Replaces the whole course selection, in the given order.
    pub fn set_courses(&mut self, courses: Vec<String>) {
        self.draft.courses = courses;
    }

    /// On rejection the previously selected image stays.
    pub fn select_image(&mut self, upload: &ImageUpload, max_bytes: usize) -> Result<(), ValidationFailure> {
        let encoded = encode_image(upload, max_bytes)?;
        debug!(
            "Selected image {} ({} bytes)",
            upload.file_name.as_deref().unwrap_or("<unnamed>"),
            upload.bytes.len()
        );
        self.draft.image = Some(encoded);
        Ok(())
    }

    /// Validates the draft and writes it through the store.
    pub fn submit(&self, store: &EmployeeStore) -> Result<Submitted, AppError> {
        let fields = validate(&self.draft)?;
        let (record, notice) = match self.mode {
            FormMode::Create => (store.create(fields)?, "Employee created successfully"),
            FormMode::Edit(id) => (
                store.update(id, EmployeeUpdate::from(fields))?,
                "Employee updated successfully",
            ),
        };
        Ok(Submitted {
            record,
            redirect: LIST_ROUTE,
            notice,
        })
    }
}
