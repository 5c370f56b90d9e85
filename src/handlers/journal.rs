use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use crate::models::{Journal, JournalCheck, JournalPayload};
use crate::utils::dates::{format_iso, parse_iso_date, yesterday_utc};
use crate::utils::{logging::*, AppError, AppResult};
use crate::AppState;

/// GET /api/journal/:date
pub async fn get_journal(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> AppResult<Json<Journal>> {
    log_request_received("/api/journal/:date", "GET");
    parse_iso_date(&date)?;

    state
        .data()?
        .get_journal_by_date(&date)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Journal not found".to_string()))
}

/// GET /api/journal/yesterday/check
///
/// `locked` quando o diário de ontem não existe ou não foi preenchido.
pub async fn check_yesterday(State(state): State<Arc<AppState>>) -> AppResult<Json<JournalCheck>> {
    log_request_received("/api/journal/yesterday/check", "GET");
    let yesterday = format_iso(yesterday_utc());

    let journal = state.data()?.get_journal_by_date(&yesterday).await?;
    let check = JournalCheck::from_journal(journal.as_ref());
    if check.locked {
        log_info(&format!("🔒 Diário de {} pendente: LOCKED", yesterday));
    }
    Ok(Json(check))
}

/// POST /api/journal/:date
pub async fn upsert_journal(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Json(payload): Json<JournalPayload>,
) -> AppResult<Json<Journal>> {
    log_request_received("/api/journal/:date", "POST");
    parse_iso_date(&date)?;

    let journal = state.data()?.upsert_journal_by_date(&date, &payload).await?;
    Ok(Json(journal))
}
