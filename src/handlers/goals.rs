use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use super::range_filter;
use crate::models::{DateRange, Goal};
use crate::services::crm_metrics::enrich_goals_with_pipeline;
use crate::utils::{logging::*, AppResult};
use crate::AppState;

/// GET /api/goals?start&end
///
/// Metas ligadas a KPIs do CRM recebem `Actual` calculado a partir do pipeline.
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<Goal>>> {
    log_request_received("/api/goals", "GET");
    let data = state.data()?;

    let (goals, kpis) = tokio::try_join!(
        data.get_goals(range_filter(&range)),
        data.get_all_kpis()
    )?;

    let goals = enrich_goals_with_pipeline(data, goals, &kpis).await?;
    Ok(Json(goals))
}
