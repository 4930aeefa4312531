use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::Display;

/// Where a title lookup was performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupScope {
    /// The full, unfiltered catalog
    Catalog,
    /// Only the rows of one category
    Category(String),
}

impl Display for LookupScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupScope::Catalog => write!(f, "catalog"),
            LookupScope::Category(name) => write!(f, "category '{}'", name),
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Course not found in {scope}: {title}")]
    CourseNotFound { title: String, scope: LookupScope },

    #[error("Association rules not loaded")]
    RulesNotLoaded,

    #[error("Catalog source unavailable: {0}")]
    EmptySource(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn course_not_found(title: &str, scope: LookupScope) -> Self {
        AppError::CourseNotFound {
            title: title.to_string(),
            scope,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::CourseNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::RulesNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::EmptySource(_)
            | AppError::Csv(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
