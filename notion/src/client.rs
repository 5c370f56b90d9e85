//! Cliente HTTP para a API do Notion

use crate::error::{NotionError, Result};
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Política de retry para respostas 429
///
/// O atraso antes da tentativa `n + 1` é `base_delay * 2^n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Atraso antes de repetir após a tentativa `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Cliente para interagir com a API do Notion
///
/// # Timeouts
///
/// - Total: 30s
/// - Connect: 5s
#[derive(Clone, Debug)]
pub struct NotionClient {
    http_client: HttpClient,
    token: String,
    base_url: String,
    notion_version: String,
    retry: RetryPolicy,
}

impl NotionClient {
    /// Cria um novo cliente apontando para `https://api.notion.com/v1`
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Cria um cliente com URL base customizada (proxies, testes)
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| NotionError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let token = token.into();
        if token.trim().is_empty() {
            return Err(NotionError::ConfigError("Notion token is empty".to_string()));
        }

        Ok(Self {
            http_client,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    /// Obtém a URL base da API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Executa uma requisição com retry em caso de 429
    async fn execute(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt: u32 = 0;

        loop {
            tracing::debug!("{} {} (tentativa {})", method, url, attempt + 1);

            let mut request = self
                .http_client
                .request(method.clone(), &url)
                .header("Authorization", format!("Bearer {}", &self.token))
                .header("Notion-Version", &self.notion_version);

            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            if response.status().as_u16() == 429 {
                if attempt + 1 < self.retry.max_attempts {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "⚠️ Notion rate limit (429) em {} {}. Retry {}/{} em {}ms...",
                        method,
                        endpoint,
                        attempt + 1,
                        self.retry.max_attempts - 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                tracing::error!(
                    "❌ Notion rate limit persistente após {} tentativa(s): {} {}",
                    attempt + 1,
                    method,
                    endpoint
                );
                return Err(NotionError::RateLimited {
                    attempts: attempt + 1,
                });
            }

            return self.handle_response(response).await;
        }
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("Notion API error ({}): {}", status_code, error_body);

        // Corpo de erro do Notion: { object: "error", status, code, message }
        let (code, message) = match serde_json::from_str::<Value>(&error_body) {
            Ok(json) => (
                json.get("code")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                json.get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or(&error_body)
                    .to_string(),
            ),
            Err(_) => ("unknown".to_string(), error_body),
        };

        Err(NotionError::ApiError {
            status: status_code,
            code,
            message,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.execute(Method::GET, endpoint, None).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<T> {
        let response = self.execute(Method::POST, endpoint, Some(body)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn patch_json<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<T> {
        let response = self.execute(Method::PATCH, endpoint, Some(body)).await?;
        Ok(response.json().await?)
    }
}
