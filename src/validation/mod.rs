pub mod request;

use axum::{
    Json, async_trait,
    extract::FromRequest,
    http::Request,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{db::models::api::ErrorDetail, error::AppError};

/// JSON extractor that runs `validator` rules before the handler sees the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<axum::body::Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(format!("Invalid JSON: {}", rejection)))?;

        value
            .validate()
            .map_err(|errors| AppError::invalid_fields(field_error_details(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn field_error_details(errors: &validator::ValidationErrors) -> Vec<ErrorDetail> {
    let mut details: Vec<ErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| ErrorDetail {
                field: Some(field.to_string()),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| format!("{}: {}", field, m))
                    .unwrap_or_else(|| format!("{}: invalid value", field)),
            })
        })
        .collect();
    details.sort_by(|a, b| a.message.cmp(&b.message));
    details
}

/// Field rules and serde helpers shared by the request payloads.
pub mod rules {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};
    use validator::ValidationError;

    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("blank"));
        }
        Ok(())
    }

    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp and keeps the date part.
    pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, String> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.date_naive())
            .map_err(|_| format!("Invalid date: {}", raw))
    }

    pub fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }

    pub fn optional_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse_calendar_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
