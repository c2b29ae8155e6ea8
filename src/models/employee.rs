use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Designation {
    #[serde(rename = "HR")]
    Hr,
    Manager,
    Sales,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "MCA")]
    Mca,
    #[serde(rename = "BCA")]
    Bca,
    #[serde(rename = "BSC")]
    Bsc,
}

impl Designation {
    pub const ALL: [Designation; 3] = [Designation::Hr, Designation::Manager, Designation::Sales];

    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Hr => "HR",
            Designation::Manager => "Manager",
            Designation::Sales => "Sales",
        }
    }
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl Course {
    pub const ALL: [Course; 3] = [Course::Mca, Course::Bca, Course::Bsc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::Mca => "MCA",
            Course::Bca => "BCA",
            Course::Bsc => "BSC",
        }
    }
}

/// Returned when a string is not one of an enumeration's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice '{}'", self.0)
    }
}

macro_rules! choice_from_str {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|choice| choice.as_str() == s)
                    .ok_or_else(|| UnknownChoice(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_from_str!(Designation);
choice_from_str!(Gender);
choice_from_str!(Course);

/// A stored employee. Field names match the persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub designation: Designation,
    pub gender: Gender,
    #[serde(default)]
    pub courses: Vec<Course>,
    /// `data:` URI of the uploaded picture. Anything other than a string
    /// reads as no picture.
    #[serde(
        default,
        deserialize_with = "lenient_image",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    pub create_date: NaiveDate,
}

fn lenient_image<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(uri) => Some(uri),
        _ => None,
    })
}

/// Validated field values for a new employee.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub designation: Designation,
    pub gender: Gender,
    pub courses: Vec<Course>,
    pub image: Option<String>,
}

/// Fields to overwrite on an existing employee; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub designation: Option<Designation>,
    pub gender: Option<Gender>,
    pub courses: Option<Vec<Course>>,
    pub image: Option<String>,
}

impl From<NewEmployee> for EmployeeUpdate {
    fn from(fields: NewEmployee) -> Self {
        EmployeeUpdate {
            name: Some(fields.name),
            email: Some(fields.email),
            mobile: Some(fields.mobile),
            designation: Some(fields.designation),
            gender: Some(fields.gender),
            courses: Some(fields.courses),
            image: fields.image,
        }
    }
}

impl Employee {
    pub fn apply(&mut self, update: EmployeeUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(mobile) = update.mobile {
            self.mobile = mobile;
        }
        if let Some(designation) = update.designation {
            self.designation = designation;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(courses) = update.courses {
            self.courses = courses;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
    }
}

/// Unvalidated form state, as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EmployeeDraft {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1), regex = "crate::utils::validation::EMAIL_RE")]
    pub email: String,
    #[validate(length(min = 1), regex = "crate::utils::validation::MOBILE_RE")]
    pub mobile: String,
    #[validate(length(min = 1), custom = "crate::utils::validation::validate_designation")]
    pub designation: String,
    #[validate(length(min = 1), custom = "crate::utils::validation::validate_gender")]
    pub gender: String,
    #[validate(custom = "crate::utils::validation::validate_courses")]
    pub courses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Employee> for EmployeeDraft {
    fn from(employee: &Employee) -> Self {
        EmployeeDraft {
            name: employee.name.clone(),
            email: employee.email.clone(),
            mobile: employee.mobile.clone(),
            designation: employee.designation.to_string(),
            gender: employee.gender.to_string(),
            courses: employee.courses.iter().map(|c| c.to_string()).collect(),
            image: employee.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Employee {
        Employee {
            id: 1_700_000_000_000,
            name: "Ann".to_string(),
            email: "a@b.co".to_string(),
            mobile: "1234567890".to_string(),
            designation: Designation::Hr,
            gender: Gender::Female,
            courses: vec![Course::Bsc, Course::Mca],
            image: None,
            create_date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        }
    }

    #[test]
    fn persisted_shape_uses_original_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1_700_000_000_000i64,
                "name": "Ann",
                "email": "a@b.co",
                "mobile": "1234567890",
                "designation": "HR",
                "gender": "Female",
                "courses": ["BSC", "MCA"],
                "createDate": "2024-03-09"
            })
        );
    }

    #[test]
    fn records_without_courses_decode() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 5,
            "name": "Bo",
            "email": "bo@x.io",
            "mobile": "0987654321",
            "designation": "Sales",
            "gender": "Male",
            "createDate": "2023-12-31"
        }))
        .unwrap();
        assert!(employee.courses.is_empty());
        assert_eq!(employee.designation, Designation::Sales);
    }

    #[test]
    fn non_string_image_reads_as_none() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 6,
            "name": "Cy",
            "email": "cy@x.io",
            "mobile": "1112223334",
            "designation": "Manager",
            "gender": "Male",
            "courses": [],
            "image": {},
            "createDate": "2023-12-31"
        }))
        .unwrap();
        assert_eq!(employee.image, None);
    }

    #[test]
    fn choices_parse_by_display_name() {
        assert_eq!("Manager".parse::<Designation>().unwrap(), Designation::Manager);
        assert_eq!("BCA".parse::<Course>().unwrap(), Course::Bca);
        assert!("hr".parse::<Designation>().is_err());
        assert!("Other".parse::<Gender>().is_err());
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut employee = sample();
        employee.apply(EmployeeUpdate {
            mobile: Some("5555555555".to_string()),
            ..EmployeeUpdate::default()
        });
        assert_eq!(employee.mobile, "5555555555");
        assert_eq!(employee.name, "Ann");
        assert_eq!(employee.courses, vec![Course::Bsc, Course::Mca]);
    }

    #[test]
    fn draft_from_employee_round_trips_choices() {
        let draft = EmployeeDraft::from(&sample());
        assert_eq!(draft.designation, "HR");
        assert_eq!(draft.courses, vec!["BSC".to_string(), "MCA".to_string()]);
    }
}
