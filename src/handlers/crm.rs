// ============================================================================
// CRM - pipeline de vendas e sincronização com as metas
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{pipeline_status, CrmContact, CrmContactInput, PipelineKpis};
use crate::services::crm_metrics::{pipeline_kpis, sync_all_crm_goals};
use crate::utils::{logging::*, AppResult};
use crate::AppState;

/// Limite da sincronização manual (`POST /api/crm/sync-goals`)
pub const SYNC_GOALS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn crm_health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "CRM" }))
}

/// GET /api/crm/pipeline?status
pub async fn list_pipeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<CrmContact>>> {
    log_request_received("/api/crm/pipeline", "GET");
    let data = state.data()?;

    let contacts = match query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(status) => data.get_crm_pipeline_by_status(status).await?,
        None => data.get_crm_pipeline().await?,
    };
    Ok(Json(contacts))
}

/// POST /api/crm/pipeline
pub async fn create_pipeline_contact(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CrmContactInput>,
) -> AppResult<(StatusCode, Json<CrmContact>)> {
    log_request_received("/api/crm/pipeline", "POST");
    let contact = state.data()?.create_crm_contact(&input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /api/crm/pipeline/:id
///
/// Mudança de status dispara a sincronização das metas em background; a
/// resposta não espera nem falha por causa dela.
pub async fn update_pipeline_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<CrmContactInput>,
) -> AppResult<Json<CrmContact>> {
    log_request_received("/api/crm/pipeline/:id", "PUT");
    let data = state.data()?;

    let updated = data.update_crm_contact(&id, &input).await?;
    log_info(&format!("✅ Contato {} atualizado. Status: {}", id, updated.status));

    if input.status().is_some_and(pipeline_status::triggers_goal_sync) {
        let data = Arc::clone(data);
        tokio::spawn(async move {
            if let Err(e) = sync_all_crm_goals(&data).await {
                log_error(&format!("⚠️ Erro ao sincronizar metas (não bloqueante): {}", e));
            }
        });
    }

    Ok(Json(updated))
}

/// GET /api/crm/kpis
pub async fn pipeline_metrics(State(state): State<Arc<AppState>>) -> AppResult<Json<PipelineKpis>> {
    log_request_received("/api/crm/kpis", "GET");
    let contacts = state.data()?.get_crm_pipeline().await?;
    let kpis = pipeline_kpis(&contacts);
    log_info(&format!(
        "📈 KPIs do CRM: {} leads, {}% contato -> café",
        kpis.total_leads, kpis.conversion_activated_to_coffee
    ));
    Ok(Json(kpis))
}

/// POST /api/crm/sync-goals
pub async fn sync_goals(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    log_request_received("/api/crm/sync-goals", "POST");
    let start_time = Instant::now();
    let data = state.data()?;

    match tokio::time::timeout(SYNC_GOALS_TIMEOUT, sync_all_crm_goals(data)).await {
        Ok(result) => {
            result?;
            log_request_processed("/api/crm/sync-goals", 200, start_time.elapsed().as_millis() as u64);
            Ok(Json(json!({
                "success": true,
                "message": "Goals sincronizadas com sucesso"
            }))
            .into_response())
        }
        Err(_) => {
            log_warning("⏱️ Sincronização de metas excedeu o tempo limite");
            Ok((
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({
                    "error": "Timeout",
                    "message": "Sincronização demorou muito. Tente novamente mais tarde."
                })),
            )
                .into_response())
        }
    }
}
