use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::utils::logging::*;

/// Fallback do SPA: qualquer rota que não é arquivo estático recebe `index.html`
///
/// Caminhos `/api/*` desconhecidos e arquivos inexistentes (com extensão)
/// respondem 404 em JSON.
pub async fn spa_index(State(dist_dir): State<Arc<PathBuf>>, uri: Uri) -> Response {
    if is_api_path(uri.path()) || has_extension(uri.path()) {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    }

    let index = dist_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log_warning(&format!("⚠️ {} indisponível: {}", index.display(), e));
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Application not built (index.html missing)" })),
            )
                .into_response()
        }
    }
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn has_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}
