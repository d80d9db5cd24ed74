//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::extract::rejection::{FormRejection as UrlEncodedRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::DbError;
use crate::models::FormErrors;

/// A form that failed validation, sent back for correction
#[derive(Debug)]
pub struct FormRejection {
    /// Notification shown above the form
    pub message: String,
    pub errors: FormErrors,
    /// The submission as received
    pub form: Value,
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Form rejected, nothing written (422)
    Rejected(FormRejection),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Body that couldn't be read at all: wrong content type (415) or
    /// unparseable (400)
    Malformed { status: StatusCode, message: String },

    /// A command's transaction failed and was rolled back (400)
    WriteFailed(DbError),

    /// A read query failed (500/503/504, logged)
    Database(DbError),
}

impl ApiError {
    pub fn rejected(message: String, errors: FormErrors, form: &impl Serialize) -> Self {
        Self::Rejected(FormRejection {
            message,
            errors,
            form: serde_json::to_value(form).unwrap_or(Value::Null),
        })
    }

    /// Map a failure inside a write command: missing rows stay 404,
    /// everything else is a failed write.
    pub fn write(err: DbError) -> Self {
        match err {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::WriteFailed(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Rejected(rejection) => {
                let fields: Vec<Value> = rejection
                    .errors
                    .iter()
                    .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "error": "validation_error",
                        "message": rejection.message,
                        "fields": fields,
                        "form": rejection.form
                    }),
                )
            }
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Malformed { status, message } => {
                let error = if *status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
                    "unsupported_media_type"
                } else {
                    "invalid_body"
                };
                (*status, json!({ "error": error, "message": message }))
            }
            Self::WriteFailed(e) => {
                tracing::warn!(error = %e, "write rolled back");
                let mut body = json!({
                    "error": "write_failed",
                    "kind": e.kind_label(),
                    "message": write_failure_message(e)
                });
                if let DbError::Constraint {
                    constraint: Some(name),
                    ..
                } = e
                {
                    body["constraint"] = Value::String(name.clone());
                }
                (StatusCode::BAD_REQUEST, body)
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                let (status, error) = match e {
                    DbError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
                    DbError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
                };
                (
                    status,
                    json!({
                        "error": error,
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn write_failure_message(err: &DbError) -> String {
    match err {
        DbError::Constraint { kind, .. } => {
            format!("the change conflicts with existing data ({} constraint)", kind)
        }
        DbError::Unavailable(_) => "the database is unavailable, nothing was saved".into(),
        DbError::Timeout => "the database is busy, nothing was saved".into(),
        _ => "the change could not be saved".into(),
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            status: malformed_status(rejection.status()),
            message: rejection.body_text(),
        }
    }
}

impl From<UrlEncodedRejection> for ApiError {
    fn from(rejection: UrlEncodedRejection) -> Self {
        Self::Malformed {
            status: malformed_status(rejection.status()),
            message: rejection.body_text(),
        }
    }
}

/// Content-type problems keep 415; anything else about the body is a 400.
fn malformed_status(status: StatusCode) -> StatusCode {
    if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        status
    } else {
        StatusCode::BAD_REQUEST
    }
}
