use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::utils::validation::ValidationFailure;

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationFailure),
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    DecodeError(String),
    IncompatibleData(String),
    ConfigError(String),
    StorageError(String),
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl AppError {
    pub fn is_decode(&self) -> bool {
        matches!(self, AppError::DecodeError(_))
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::Validation(failure) => ErrorResponse {
                error: failure.message().to_string(),
                reason: Some(failure.code()),
            },
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::DecodeError(msg)
            | AppError::IncompatibleData(msg)
            | AppError::ConfigError(msg)
            | AppError::StorageError(msg)
            | AppError::InternalServerError(msg) => ErrorResponse {
                error: msg.clone(),
                reason: None,
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(failure) => write!(f, "Validation Error: {}", failure),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::DecodeError(msg) => write!(f, "Decode Error: {}", msg),
            AppError::IncompatibleData(msg) => write!(f, "Incompatible Data: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration Error: {}", msg),
            AppError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl From<ValidationFailure> for AppError {
    fn from(failure: ValidationFailure) -> Self {
        AppError::Validation(failure)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::FOUND,
            AppError::DecodeError(_)
            | AppError::IncompatibleData(_)
            | AppError::ConfigError(_)
            | AppError::StorageError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Gated views send the operator back to the login view.
            AppError::Unauthorized(_) => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            _ => HttpResponse::build(self.status_code()).json(self.body()),
        }
    }
}
