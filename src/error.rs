use crate::db::models::api::{ApiResponse, ErrorDetail};
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ErrorDetail>,
    },

    #[error("Duplicate: {message}")]
    Duplicate { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Cannot approve request due to policy violation on date(s) {}", format_dates(.dates))]
    PolicyViolation { dates: Vec<NaiveDate> },

    #[error("Out of range: {message}")]
    OutOfRange { message: String },

    #[error("No schedules were created for request {request_id}")]
    EmptySchedule { request_id: i64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format("%d-%m-%Y").to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::PolicyViolation { .. }
            | AppError::OutOfRange { .. }
            | AppError::EmptySchedule { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Database(e) if is_serialization_failure(e) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn is_serialization_failure(e: &diesel::result::Error) -> bool {
    matches!(
        e,
        diesel::result::Error::DatabaseError(DatabaseErrorKind::SerializationFailure, _)
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let response = match self {
            AppError::Database(ref e) if is_serialization_failure(e) => {
                tracing::warn!("Serialization failure: {}", e);
                ApiResponse::<()>::conflict(
                    "The data changed concurrently, please retry",
                    None,
                    "CONCURRENT_UPDATE",
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                ApiResponse::<()>::internal_error("Database error")
            }
            AppError::Pool(ref e) => {
                tracing::error!("Connection pool error: {}", e);
                ApiResponse::<()>::internal_error("Connection error")
            }
            AppError::Validation { ref message, ref details } => {
                if details.is_empty() {
                    ApiResponse::<()>::bad_request(message, "VALIDATION_ERROR")
                } else {
                    ApiResponse::<()>::validation_error(details.clone())
                }
            }
            AppError::Duplicate { ref message } => {
                ApiResponse::<()>::conflict(message, Some("start_date".into()), "DUPLICATE_REQUEST")
            }
            AppError::NotFound { ref resource } => {
                ApiResponse::<()>::not_found(&format!("{} not found", resource))
            }
            AppError::PolicyViolation { ref dates } => {
                let details = dates
                    .iter()
                    .map(|d| ErrorDetail {
                        field: Some("date".into()),
                        code: "TEAM_CAPACITY_EXCEEDED".into(),
                        message: d.to_string(),
                    })
                    .collect();
                ApiResponse::<()>::error(400, &self.to_string(), details)
            }
            AppError::OutOfRange { ref message } => {
                ApiResponse::<()>::bad_request(message, "OUT_OF_RANGE")
            }
            AppError::EmptySchedule { .. } => {
                ApiResponse::<()>::bad_request(&self.to_string(), "EMPTY_SCHEDULE")
            }
            AppError::Config(ref e) => {
                tracing::error!("Configuration error: {}", e);
                ApiResponse::<()>::internal_error("Configuration error")
            }
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                ApiResponse::<()>::internal_error("Internal server error")
            }
        };

        (status, Json(response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Payload rule failures, one detail per offending field.
    pub fn invalid_fields(details: Vec<ErrorDetail>) -> Self {
        let message = details
            .iter()
            .map(|d| d.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation { message, details }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
