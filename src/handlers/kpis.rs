use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::models::Kpi;
use crate::services::guards::assert_no_financial_kpis;
use crate::utils::{logging::*, AppResult};
use crate::AppState;

/// GET /api/kpis/public
pub async fn list_public_kpis(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Kpi>>> {
    log_request_received("/api/kpis/public", "GET");

    let kpis = state.data()?.get_kpis_public().await?;

    // O filtro já vem da query, o guard confere de novo antes de responder
    if let Err(e) = assert_no_financial_kpis(&kpis) {
        log_error(&format!("🚨 {}", e));
        return Err(e);
    }

    log_info(&format!("📊 Retornando {} KPIs públicos", kpis.len()));
    Ok(Json(kpis))
}

/// GET /api/kpis/admin
pub async fn list_admin_kpis(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Kpi>>> {
    log_request_received("/api/kpis/admin", "GET");
    let kpis = state.data()?.get_kpis_admin().await?;
    Ok(Json(kpis))
}
