use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::NotionDatabase;
use crate::models::{LeadLayout, LeadSubmission};
use crate::utils::{logging::*, AppError, AppResult};
use crate::AppState;

/// POST /api/lead-gate
pub async fn lead_gate(
    State(state): State<Arc<AppState>>,
    Json(lead): Json<LeadSubmission>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/lead-gate", "POST");

    if lead.name().is_none() || lead.phone().is_none() {
        log_validation_error("lead", "name and phone are required");
        return Err(AppError::ValidationError(
            "Name and Phone are required".to_string(),
        ));
    }

    let id = state
        .data()?
        .save_lead(NotionDatabase::LeadGate, &lead, LeadLayout::LeadGate)
        .await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

/// POST /api/save-lead (landing Axis; campos vazios recebem padrão)
pub async fn save_axis_lead(
    State(state): State<Arc<AppState>>,
    Json(lead): Json<LeadSubmission>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/save-lead", "POST");

    let id = state
        .data()?
        .save_lead(NotionDatabase::AxisLeads, &lead, LeadLayout::AxisLeads)
        .await?;
    Ok(Json(json!({ "success": true, "id": id })))
}
