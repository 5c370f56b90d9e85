// ============================================================================
// Café e expansão (vitórias de cliente, oportunidades, clientes)
// ============================================================================

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::models::{
    Client, CoffeeRequest, CoffeeSummary, CustomerWin, CustomerWinInput, ExpansionOpportunity,
    ExpansionOpportunityInput,
};
use crate::services::data_layer::CustomerWinFilter;
use crate::services::expansion::{register_coffee, register_customer_win, RED_HEALTH_ERROR};
use crate::utils::{logging::*, AppResult};
use crate::AppState;

/// POST /api/coffee
pub async fn create_coffee(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CoffeeRequest>,
) -> AppResult<Json<CoffeeSummary>> {
    log_request_received("/api/coffee", "POST");
    let start_time = Instant::now();

    let summary = register_coffee(state.data()?, &request).await?;

    log_request_processed("/api/coffee", 200, start_time.elapsed().as_millis() as u64);
    Ok(Json(summary))
}

/// `?isGOL=true|false&lastDays=N`; valores inválidos são ignorados
#[derive(Debug, Default, Deserialize)]
pub struct CustomerWinsQuery {
    #[serde(default, rename = "isGOL")]
    pub is_gol: Option<String>,
    #[serde(default, rename = "lastDays")]
    pub last_days: Option<String>,
}

impl CustomerWinsQuery {
    fn to_filter(&self) -> CustomerWinFilter {
        CustomerWinFilter {
            is_gol: match self.is_gol.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
            last_days: self.last_days.as_deref().and_then(|d| d.trim().parse().ok()),
        }
    }
}

/// GET /api/expansion/customer-wins
pub async fn list_customer_wins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerWinsQuery>,
) -> AppResult<Json<Vec<CustomerWin>>> {
    log_request_received("/api/expansion/customer-wins", "GET");
    let wins = state.data()?.get_customer_wins(query.to_filter()).await?;
    Ok(Json(wins))
}

#[derive(Debug, Default, Deserialize)]
pub struct StageQuery {
    #[serde(default)]
    pub stage: Option<String>,
}

/// GET /api/expansion/opportunities
pub async fn list_expansion_opportunities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StageQuery>,
) -> AppResult<Json<Vec<ExpansionOpportunity>>> {
    log_request_received("/api/expansion/opportunities", "GET");
    let opportunities = state
        .data()?
        .get_expansion_opportunities(query.stage.as_deref())
        .await?;
    Ok(Json(opportunities))
}

/// GET /api/expansion/clients
pub async fn list_clients(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Client>>> {
    log_request_received("/api/expansion/clients", "GET");
    Ok(Json(state.data()?.get_clients().await?))
}

/// POST /api/expansion/customer-win
///
/// Score >= 8 dispara o fluxo GOL; cliente com Health Red responde 400 com o `winId`.
pub async fn create_customer_win(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CustomerWinInput>,
) -> AppResult<Response> {
    log_request_received("/api/expansion/customer-win", "POST");
    let start_time = Instant::now();

    let outcome = register_customer_win(state.data()?, &input).await?;
    if outcome.expansion_blocked {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": RED_HEALTH_ERROR, "winId": outcome.id })),
        )
            .into_response());
    }

    log_request_processed(
        "/api/expansion/customer-win",
        200,
        start_time.elapsed().as_millis() as u64,
    );
    Ok(Json(json!({ "id": outcome.id, "isGOL": outcome.is_gol })).into_response())
}

/// POST /api/expansion/opportunity
pub async fn create_expansion_opportunity(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ExpansionOpportunityInput>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/expansion/opportunity", "POST");
    let id = state.data()?.create_expansion_opportunity(&input).await?;
    Ok(Json(json!({ "id": id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_wins_query_filter() {
        let query = CustomerWinsQuery {
            is_gol: Some("true".into()),
            last_days: Some("30".into()),
        };
        assert_eq!(
            query.to_filter(),
            CustomerWinFilter {
                is_gol: Some(true),
                last_days: Some(30),
            }
        );

        let query = CustomerWinsQuery {
            is_gol: Some("yes".into()),
            last_days: Some("abc".into()),
        };
        assert_eq!(query.to_filter(), CustomerWinFilter::default());
    }
}
