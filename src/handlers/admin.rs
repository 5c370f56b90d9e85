// ============================================================================
// Admin - gestão de databases e manutenção
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::services::data_layer::DatabaseInfo;
use crate::services::maintenance::{apply_kpi_dedup, plan_kpi_dedup, DedupOutcome, DEFAULT_DEDUP_PAUSE};
use crate::utils::{logging::*, AppError, AppResult};
use crate::AppState;

/// Corpo de `POST /api/admin/databases`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    #[serde(default)]
    pub parent_page_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DedupeQuery {
    #[serde(default)]
    pub apply: bool,
}

/// GET /api/admin/databases/:id
pub async fn get_database(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DatabaseInfo>> {
    log_request_received("/api/admin/databases/:id", "GET");
    let info = state.data()?.database_info(&id).await?;
    Ok(Json(info))
}

/// PATCH /api/admin/databases/:id/properties
pub async fn update_database_properties(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/admin/databases/:id/properties", "PATCH");

    let properties = body.get("properties").cloned().unwrap_or(Value::Null);
    let database = state.data()?.update_database_properties(&id, &properties).await?;
    Ok(Json(json!({ "success": true, "database": database })))
}

/// POST /api/admin/databases
pub async fn create_database(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDatabaseRequest>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/admin/databases", "POST");

    let parent = body.parent_page_id.as_deref().filter(|p| !p.trim().is_empty());
    let title = body.title.as_deref().filter(|t| !t.trim().is_empty());
    let (Some(parent), Some(title), Some(properties)) = (parent, title, body.properties.as_ref()) else {
        return Err(AppError::ValidationError(
            "parentPageId, title, and properties are required".to_string(),
        ));
    };

    let database = state.data()?.create_database(parent, title, properties).await?;
    log_info(&format!("🗄️ Database criado: {} ({})", database.title, database.id));
    Ok(Json(json!({ "success": true, "database": database })))
}

/// POST /api/admin/maintenance/dedupe-kpis?apply=true
///
/// Sem `apply` apenas devolve o plano.
pub async fn dedupe_kpis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DedupeQuery>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/admin/maintenance/dedupe-kpis", "POST");
    let data = state.data()?;

    let kpis = data.get_all_kpis().await?;
    let plan = plan_kpi_dedup(&kpis);
    let duplicates: usize = plan.iter().map(|g| g.remove.len()).sum();
    log_info(&format!(
        "🔍 {} KPIs analisados, {} grupo(s) duplicado(s), {} a arquivar",
        kpis.len(),
        plan.len(),
        duplicates
    ));

    let outcome = if query.apply {
        apply_kpi_dedup(data, &plan, DEFAULT_DEDUP_PAUSE).await
    } else {
        DedupOutcome::default()
    };

    Ok(Json(json!({
        "applied": query.apply,
        "total": kpis.len(),
        "groups": plan,
        "archived": outcome.archived,
        "failed": outcome.failed
    })))
}
