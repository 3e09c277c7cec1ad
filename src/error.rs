use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::SqlErr;
use thiserror::Error;

use crate::response::ApiResponse;

pub const SERVER_ERROR_MESSAGE: &str = "Maaf, terjadi kegagalan pada server kami.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    /// Invariant or validation failure.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Storage error")]
    Io(#[from] std::io::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    /// Status code and client-facing message. `None` means the fault is
    /// internal and only a generic message may leave the server.
    pub fn classify(&self) -> (StatusCode, Option<String>) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg.clone())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Some(msg.clone())),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Some(msg.clone())),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, Some(msg.clone())),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, Some(msg.clone())),
            AppError::DbError(err) => match constraint_message_sqlx(err) {
                Some(msg) => (StatusCode::BAD_REQUEST, Some(msg)),
                None => (StatusCode::INTERNAL_SERVER_ERROR, None),
            },
            AppError::OrmError(err) => match constraint_message_orm(err) {
                Some(msg) => (StatusCode::BAD_REQUEST, Some(msg)),
                None => (StatusCode::INTERNAL_SERVER_ERROR, None),
            },
            AppError::Io(_) | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        }
    }
}

fn constraint_message_sqlx(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    if db_err.is_unique_violation() {
        Some("Data sudah ada".to_string())
    } else if db_err.is_check_violation() {
        Some("Data tidak memenuhi batasan yang berlaku".to_string())
    } else if db_err.is_foreign_key_violation() {
        Some("Data referensi tidak ditemukan".to_string())
    } else {
        None
    }
}

fn constraint_message_orm(err: &sea_orm::DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Some("Data sudah ada".to_string()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            Some("Data referensi tidak ditemukan".to_string())
        }
        _ => match err {
            // SeaORM does not classify check violations; look at the SQLSTATE.
            sea_orm::DbErr::Exec(sea_orm::RuntimeErr::SqlxError(e))
            | sea_orm::DbErr::Query(sea_orm::RuntimeErr::SqlxError(e)) => {
                constraint_message_sqlx(e)
            }
            _ => None,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        let body = match message {
            Some(message) => ApiResponse::fail(message),
            None => {
                tracing::error!(error = ?self, "unhandled server error");
                ApiResponse::error(SERVER_ERROR_MESSAGE)
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
