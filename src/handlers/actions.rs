use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::range_filter;
use crate::models::{Action, DateRange, ToggleDoneRequest};
use crate::utils::{logging::*, AppError, AppResult};
use crate::AppState;

/// GET /api/actions?start&end
pub async fn list_actions(
    State(state): State<Arc<AppState>>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<Action>>> {
    log_request_received("/api/actions", "GET");
    let actions = state.data()?.get_actions(range_filter(&range)).await?;
    Ok(Json(actions))
}

/// PATCH /api/actions/:id/done
///
/// Ação sem meta nunca pode ser concluída (400 com o motivo).
pub async fn toggle_action_done(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ToggleDoneRequest>,
) -> AppResult<Response> {
    log_request_received("/api/actions/:id/done", "PATCH");

    let Some(done) = body.done.as_bool() else {
        log_validation_error("done", "expected boolean");
        return Err(AppError::ValidationError(
            "Body must contain { done: boolean }".to_string(),
        ));
    };

    let data = state.data()?;
    let check = data.ensure_action_has_goal(&id).await?;
    if !check.allowed {
        log_warning(&format!("🚫 Ação {} sem meta: conclusão negada", id));
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Cannot mark action as done",
                "reason": check.reason
            })),
        )
            .into_response());
    }

    let done = data.toggle_action_done(&id, done).await?;
    Ok(Json(json!({ "success": true, "done": done })).into_response())
}
