//! Tipos de erro para o crate notion

use thiserror::Error;

/// Erros do cliente Notion
#[derive(Debug, Error)]
pub enum NotionError {
    /// Erro de requisição HTTP
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro da API do Notion (status code não-2xx)
    #[error("Notion API error (status {status}, code {code}): {message}")]
    ApiError {
        status: u16,
        code: String,
        message: String,
    },

    /// Rate limit persistente mesmo após os retries
    #[error("Rate limit exceeded after {attempts} attempt(s)")]
    RateLimited { attempts: u32 },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Recurso não encontrado (page, database)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Erro de validação
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl NotionError {
    /// Status HTTP associado ao erro, quando existir
    pub fn status(&self) -> Option<u16> {
        match self {
            NotionError::ApiError { status, .. } => Some(*status),
            NotionError::RateLimited { .. } => Some(429),
            NotionError::NotFound(_) => Some(404),
            NotionError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Código de erro do Notion (`object_not_found`, `unauthorized`, ...)
    pub fn code(&self) -> Option<&str> {
        match self {
            NotionError::ApiError { code, .. } => Some(code.as_str()),
            NotionError::RateLimited { .. } => Some("rate_limited"),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NotionError::NotFound(_))
            || self.status() == Some(404)
            || self.code() == Some("object_not_found")
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401) || self.code() == Some("unauthorized")
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, NotionError::RateLimited { .. }) || self.status() == Some(429)
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, NotionError>;
