/// Middleware de autenticação para as rotas administrativas
///
/// Valida o header `X-Admin-Passcode` contra `ADMIN_PASSCODE`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::guards::validate_admin_passcode;
use crate::AppState;

pub const ADMIN_PASSCODE_HEADER: &str = "X-Admin-Passcode";

/// Middleware que exige passcode para `/api/admin/*`, `/api/kpis/admin` e `/api/__selftest`
///
/// # Uso na requisição
///
/// ```bash
/// curl -H "X-Admin-Passcode: $ADMIN_PASSCODE" http://localhost:3001/api/admin/health
/// ```
///
/// # Respostas
///
/// - **401 Unauthorized**: passcode ausente ou inválido
/// - **503 Service Unavailable**: produção sem `ADMIN_PASSCODE` configurado
///
/// Em desenvolvimento, sem `ADMIN_PASSCODE`, aceita `admin123` (warning no log).
pub async fn require_admin_passcode(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided = headers
        .get(ADMIN_PASSCODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let configured = state.settings.admin_passcode();

    if configured.is_none() {
        if state.settings.is_production() {
            tracing::error!("🚨 ADMIN_PASSCODE not configured in production! Blocking admin access.");
            return Err(service_unavailable_response());
        }
        tracing::warn!(
            "⚠️  ADMIN_PASSCODE not configured - accepting development passcode. \
             Configure ADMIN_PASSCODE in production!"
        );
    }

    if validate_admin_passcode(provided, configured) {
        tracing::debug!("✅ Admin access granted");
        Ok(next.run(request).await)
    } else {
        tracing::warn!("❌ Admin access denied - invalid or missing {}", ADMIN_PASSCODE_HEADER);
        Err(unauthorized_response())
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized: Invalid passcode" })),
    )
        .into_response()
}

fn service_unavailable_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "Service Unavailable",
            "message": "ADMIN_PASSCODE not configured on server"
        })),
    )
        .into_response()
}
