use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        detail: Option<serde_json::Value>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Store failures are opaque to the caller.
        let error_message = match self {
            AppError::DatabaseError(_) | AppError::Store(_) => {
                log::error!("Request failed with status {}: {}", status_code, self);
                "Server error".to_string()
            }
            _ => {
                log::warn!("Request failed with status {}: {}", status_code, self);
                self.to_string()
            }
        };

        match self {
            AppError::Conflict {
                detail: Some(detail),
                ..
            } => HttpResponse::build(status_code)
                .json(ApiResponse::error_with_data(detail.clone(), &error_message)),
            _ => HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message)),
        }
    }
}

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_EXCLUSION_VIOLATION: &str = "23P01";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

// Logged once, when the error is rendered.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let constraint = db_error.constraint().unwrap_or("unknown").to_string();
            match db_error.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) | Some(PG_EXCLUSION_VIOLATION) => {
                    return AppError::conflict(format!(
                        "Record collides with existing data ({})",
                        constraint
                    ));
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return AppError::conflict(format!(
                        "Record is still referenced ({})",
                        constraint
                    ));
                }
                _ => {}
            }
        }

        AppError::DatabaseError(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::from(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
            detail: None,
        }
    }

    pub fn conflict_with(message: impl Into<String>, detail: serde_json::Value) -> Self {
        AppError::Conflict {
            message: message.into(),
            detail: Some(detail),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}
