use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("More than one {0} row matched")]
    NonUniqueMatch(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("A transaction is already in progress")]
    TransactionInProgress,

    #[error("ORM error")]
    OrmError(#[from] DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Turns unique and foreign-key violations into `Conflict`, leaving every other error as
    /// it is.
    pub fn constraint_as_conflict(self) -> Self {
        let sql_err = match &self {
            AppError::OrmError(err) => err.sql_err(),
            _ => None,
        };
        match sql_err {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                AppError::Conflict(format!("duplicate value: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                AppError::Conflict(format!("referenced row missing or in use: {detail}"))
            }
            _ if self.is_foreign_key_failure() => {
                AppError::Conflict("referenced row missing or in use".to_string())
            }
            _ => self,
        }
    }

    // SQLite reports RESTRICT violations (extended code 1811) without a classifiable code.
    fn is_foreign_key_failure(&self) -> bool {
        match self {
            AppError::OrmError(err) => err.to_string().contains("FOREIGN KEY constraint failed"),
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::TransactionInProgress => (StatusCode::CONFLICT, self.to_string()),
            AppError::NonUniqueMatch(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = ApiResponse {
            message,
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn sqlite_restrict_failures_become_conflicts() {
        let err = AppError::OrmError(DbErr::Exec(RuntimeErr::Internal(
            "error returned from database: (code: 1811) FOREIGN KEY constraint failed".to_string(),
        )));
        assert!(matches!(err.constraint_as_conflict(), AppError::Conflict(_)));
    }

    #[test]
    fn other_database_errors_are_left_alone() {
        let err = AppError::OrmError(DbErr::RecordNotUpdated);
        assert!(matches!(err.constraint_as_conflict(), AppError::OrmError(_)));
        assert!(matches!(
            AppError::NotFound.constraint_as_conflict(),
            AppError::NotFound
        ));
    }
}
