use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::{Contact, ContactInput};
use crate::utils::{logging::*, AppResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/contacts
pub async fn list_contacts(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Contact>>> {
    log_request_received("/api/contacts", "GET");
    let contacts = state.data()?.get_contacts().await?;
    Ok(Json(contacts))
}

/// GET /api/coffee/contacts?q
///
/// Sem `q` devolve todos; com `q`, busca por nome ordenada por similaridade.
pub async fn search_contacts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Contact>>> {
    log_request_received("/api/coffee/contacts", "GET");
    let data = state.data()?;

    let contacts = match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => data.search_contacts(q).await?,
        None => data.get_contacts().await?,
    };
    Ok(Json(contacts))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    log_request_received("/api/contacts/:id", "GET");
    let contact = state.data()?.get_contact(&id).await?;
    Ok(Json(contact))
}

/// POST /api/contacts
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ContactInput>,
) -> AppResult<(StatusCode, Json<Contact>)> {
    log_request_received("/api/contacts", "POST");
    let contact = state.data()?.create_contact(&input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /api/contacts/:id
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<ContactInput>,
) -> AppResult<Json<Contact>> {
    log_request_received("/api/contacts/:id", "PUT");
    let contact = state.data()?.update_contact(&id, &input).await?;
    Ok(Json(contact))
}

/// DELETE /api/contacts/:id (arquiva no Notion)
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/contacts/:id", "DELETE");
    state.data()?.delete_contact(&id).await?;
    Ok(Json(json!({ "success": true })))
}
