use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness rule rejected the write.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Rate limited")]
    RateLimited { retry_after_secs: u64 },

    /// An SMS or push provider rejected the request.
    #[error("Delivery failed: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Validation {
            details: vec![ValidationDetail {
                field: field.to_string(),
                message: message.clone(),
            }],
            message,
        }
    }

    /// Validation failure without field attribution.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        ApiError::field(field, format!("{} is required", field))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, error_code, message, errors) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, vec![]),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, vec![]),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, vec![]),
            ApiError::Duplicate(msg) => (StatusCode::BAD_REQUEST, "duplicate", msg, vec![]),
            ApiError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, "validation_error", message, details)
            }
            ApiError::RateLimited { retry_after_secs } => {
                retry_after = Some(retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    "Too many requests. Please try again later.".into(),
                    vec![],
                )
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "delivery_failed", msg, vec![]),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    vec![],
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                vec![],
            ),
        };

        let body = ErrorBody {
            status: "fail",
            error: error_code,
            message,
            errors,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Duplicate("Resource already exists".into()),
                Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                Some("23514") => ApiError::bad_request("Value violates a data constraint"),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// `max_seats` -> `maxSeats`, matching the JSON field names clients send.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn collect_details(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationDetail>) {
    for (field, kind) in errors.errors() {
        let path = format!("{}{}", prefix, camel_case(field));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| ValidationDetail {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path)),
                }));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_details(&format!("{}.", path), inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{}[{}].", path, index), inner, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details("", &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<domain::services::ScheduleError> for ApiError {
    fn from(err: domain::services::ScheduleError) -> Self {
        ApiError::field(err.field(), err.to_string())
    }
}
