use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;
use crate::models::employee::{Course, Designation, EmployeeDraft, Gender, NewEmployee};
use crate::models::file::ImageUpload;

pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
pub static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid mobile regex"));

/// Checked in this order; the first empty one is reported.
const REQUIRED_FIELDS: [&str; 5] = ["name", "email", "mobile", "designation", "gender"];
const CHOICE_FIELDS: [&str; 3] = ["designation", "gender", "courses"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingRequiredField(String),
    MalformedEmail,
    MalformedMobile,
    InvalidChoice(String),
    InvalidImageType,
    ImageTooLarge(usize),
}

impl ValidationFailure {
    pub fn code(&self) -> String {
        match self {
            ValidationFailure::MissingRequiredField(field) => format!("MissingRequiredField({})", field),
            ValidationFailure::MalformedEmail => "MalformedEmail".to_string(),
            ValidationFailure::MalformedMobile => "MalformedMobile".to_string(),
            ValidationFailure::InvalidChoice(field) => format!("InvalidChoice({})", field),
            ValidationFailure::InvalidImageType => "InvalidImageType".to_string(),
            ValidationFailure::ImageTooLarge(_) => "ImageTooLarge".to_string(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ValidationFailure::MissingRequiredField(_) => "Please fill in all required fields",
            ValidationFailure::MalformedEmail => "Please enter a valid email address",
            ValidationFailure::MalformedMobile => "Please enter a valid 10-digit mobile number",
            ValidationFailure::InvalidChoice(_) => "Please pick one of the listed options",
            ValidationFailure::InvalidImageType => "Please upload only image files (jpg/png)",
            ValidationFailure::ImageTooLarge(_) => "Image exceeds the upload size limit",
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::MissingRequiredField(field) => {
                write!(f, "{} (missing '{}')", self.message(), field)
            }
            ValidationFailure::InvalidChoice(field) => {
                write!(f, "{} (field '{}')", self.message(), field)
            }
            ValidationFailure::ImageTooLarge(limit) => {
                write!(f, "{} ({} bytes)", self.message(), limit)
            }
            _ => f.write_str(self.message()),
        }
    }
}

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

pub fn validate_designation(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Designation>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("designation"))
}

pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Gender>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("gender"))
}

pub fn validate_courses(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|value| value.parse::<Course>().is_ok()) {
        Ok(())
    } else {
        Err(ValidationError::new("courses"))
    }
}

fn first_failure(errors: &ValidationErrors) -> ValidationFailure {
    let fields = errors.field_errors();
    let failed = |field: &str, code: &str| {
        fields
            .get(field)
            .map_or(false, |errs| errs.iter().any(|e| e.code == code))
    };

    if let Some(field) = REQUIRED_FIELDS.iter().find(|field| failed(field, "length")) {
        return ValidationFailure::MissingRequiredField(field.to_string());
    }
    if failed("email", "regex") {
        return ValidationFailure::MalformedEmail;
    }
    if failed("mobile", "regex") {
        return ValidationFailure::MalformedMobile;
    }
    let field = CHOICE_FIELDS
        .iter()
        .find(|field| fields.contains_key(*field))
        .copied()
        .unwrap_or("form");
    ValidationFailure::InvalidChoice(field.to_string())
}

fn parse_choice<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, ValidationFailure> {
    value
        .parse()
        .map_err(|_| ValidationFailure::InvalidChoice(field.to_string()))
}

/// Runs the submit-time rules against a draft and returns the typed fields.
pub fn validate(draft: &EmployeeDraft) -> Result<NewEmployee, ValidationFailure> {
    draft.validate().map_err(|errors| first_failure(&errors))?;

    let mut courses: Vec<Course> = Vec::with_capacity(draft.courses.len());
    for value in &draft.courses {
        let course = parse_choice(value, "courses")?;
        if !courses.contains(&course) {
            courses.push(course);
        }
    }

    Ok(NewEmployee {
        name: draft.name.clone(),
        email: draft.email.clone(),
        mobile: draft.mobile.clone(),
        designation: parse_choice(&draft.designation, "designation")?,
        gender: parse_choice(&draft.gender, "gender")?,
        courses,
        image: draft.image.clone(),
    })
}

/// Checks a picked file and returns the image MIME type it will be stored with.
pub fn validate_image(upload: &ImageUpload, max_bytes: usize) -> Result<String, ValidationFailure> {
    let mime = match upload.content_type.as_deref().filter(|t| !t.is_empty()) {
        Some(declared) => declared.to_string(),
        None => infer::get(&upload.bytes)
            .map(|kind| kind.mime_type().to_string())
            .ok_or(ValidationFailure::InvalidImageType)?,
    };
    if !mime.starts_with("image/") {
        return Err(ValidationFailure::InvalidImageType);
    }
    if upload.bytes.len() > max_bytes {
        return Err(ValidationFailure::ImageTooLarge(max_bytes));
    }
    Ok(mime)
}
