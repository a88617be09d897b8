use serde::Serialize;

/// JSON envelope shared by every endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.to_string(),
            data: Some(data),
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn created(data: T, message: &str) -> Self {
        Self {
            code: 201,
            ..Self::success(data, message)
        }
    }

    pub fn error(code: u16, message: &str, errors: Vec<ErrorDetail>) -> Self {
        Self {
            success: false,
            code,
            message: message.to_string(),
            data: None,
            errors: Some(errors),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn validation_error(errors: Vec<ErrorDetail>) -> Self {
        Self::error(400, "Validation failed", errors)
    }

    pub fn bad_request(message: &str, error_code: &str) -> Self {
        Self::single(400, message, error_code, None)
    }

    pub fn not_found(message: &str) -> Self {
        Self::single(404, message, "NOT_FOUND", None)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::single(409, message, error_code, field)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::single(500, message, "INTERNAL_ERROR", None)
    }

    fn single(code: u16, message: &str, error_code: &str, field: Option<String>) -> Self {
        Self::error(
            code,
            message,
            vec![ErrorDetail {
                field,
                code: error_code.to_string(),
                message: message.to_string(),
            }],
        )
    }
}
