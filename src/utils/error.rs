use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notion::NotionError;
use serde_json::json;
use std::fmt;

use crate::utils::logging::log_notion_api_error;

#[derive(Debug)]
pub enum AppError {
    NotionApi(String),
    RateLimited(String),
    NotFound(String),
    Unauthorized(String),
    ConfigError(String),
    JsonError(serde_json::Error),
    ValidationError(String),
    Timeout(String),
    InternalError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotionApi(_) => StatusCode::BAD_GATEWAY,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::JsonError(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Erro de "database não configurado", sempre nomeando a variável de ambiente
    pub fn not_configured(env_var: &str) -> Self {
        AppError::ConfigError(format!("{} not configured", env_var))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotionApi(msg) => write!(f, "Notion API error: {}", msg),
            AppError::RateLimited(msg) => write!(f, "Rate limit exceeded: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<NotionError> for AppError {
    fn from(err: NotionError) -> Self {
        log_notion_api_error(err.code().unwrap_or("request"), err.status(), &err.to_string());

        if err.is_rate_limited() {
            return AppError::RateLimited("Too many requests. Please try again later.".to_string());
        }
        if err.is_not_found() {
            return AppError::NotFound(err.to_string());
        }
        if err.is_unauthorized() {
            return AppError::Unauthorized(
                "Notion authentication failed: check NOTION_TOKEN and database permissions".to_string(),
            );
        }

        match err {
            NotionError::ConfigError(msg) => AppError::ConfigError(msg),
            NotionError::ValidationError(msg) => AppError::ValidationError(msg),
            other => AppError::NotionApi(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::RateLimited(_) => "Rate limit exceeded".to_string(),
            AppError::JsonError(err) => err.to_string(),
            AppError::NotionApi(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::ConfigError(msg)
            | AppError::ValidationError(msg)
            | AppError::Timeout(msg)
            | AppError::InternalError(msg) => msg,
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
