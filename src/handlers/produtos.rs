use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use super::crm::StatusQuery;
use crate::models::Produto;
use crate::utils::{logging::*, AppResult};
use crate::AppState;

/// GET /api/produtos?status
pub async fn list_produtos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<Produto>>> {
    log_request_received("/api/produtos", "GET");
    let data = state.data()?;

    let produtos = match query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(status) => data.get_produtos_by_status(status).await?,
        None => data.get_produtos().await?,
    };
    Ok(Json(produtos))
}
