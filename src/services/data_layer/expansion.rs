use chrono::Duration;
use notion::query::{DatabaseQuery, Filter, Sort};

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{
    Client, CoffeeDiagnosticInput, CustomerWin, CustomerWinInput, ExpansionOpportunity,
    ExpansionOpportunityInput, Goal,
};
use crate::utils::dates::{format_iso, today_utc};
use crate::utils::logging::log_notion_page_created;
use crate::utils::{AppError, AppResult};

/// Status e etapa de uma oportunidade recém-criada
pub const OPPORTUNITY_INITIAL_STAGE: &str = "Identificado";

fn require_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    Ok(())
}

/// Data informada ou hoje (UTC)
fn date_or_today(date: &Option<String>) -> String {
    date.as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format_iso(today_utc()))
}

/// Filtros de `GET /api/expansion/customer-wins`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerWinFilter {
    pub is_gol: Option<bool>,
    /// Só vitórias com `Date` nos últimos N dias
    pub last_days: Option<i64>,
}

impl NotionDataLayer {
    /// Retorna o id da página criada
    pub async fn create_coffee_diagnostic(&self, input: &CoffeeDiagnosticInput) -> AppResult<String> {
        let db_id = self.db_id(NotionDatabase::CoffeeDiagnostics)?;
        require_name(&input.name)?;

        let props = input.to_properties(&date_or_today(&input.date));
        let page = self.client.create_page(db_id, props).await?;
        log_notion_page_created("CoffeeDiagnostics", &page.id);
        Ok(page.id)
    }

    /// Metas com `pattern` no nome (contains do Notion)
    pub async fn find_goals_by_name(&self, pattern: &str) -> AppResult<Vec<Goal>> {
        let db_id = self.db_id(NotionDatabase::Goals)?;
        let query = DatabaseQuery::new().filter(Filter::title_contains("Name", pattern));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Goal::from_page).collect())
    }

    /// Primeira meta com `name` no nome
    pub async fn find_goal_by_name(&self, name: &str) -> AppResult<Option<Goal>> {
        Ok(self.find_goals_by_name(name).await?.into_iter().next())
    }

    /// `Name` e `Date` são obrigatórios
    pub async fn create_customer_win(&self, input: &CustomerWinInput, is_gol: bool) -> AppResult<String> {
        let db_id = self.db_id(NotionDatabase::CustomerWins)?;
        let date = input.date.as_deref().map(str::trim).unwrap_or_default();
        if input.name.trim().is_empty() || date.is_empty() {
            return Err(AppError::ValidationError(
                "Name and Date are required".to_string(),
            ));
        }

        let page = self
            .client
            .create_page(db_id, input.to_properties(date, is_gol))
            .await?;
        log_notion_page_created("CustomerWins", &page.id);
        Ok(page.id)
    }

    /// Vitórias mais recentes primeiro
    pub async fn get_customer_wins(&self, filter: CustomerWinFilter) -> AppResult<Vec<CustomerWin>> {
        let db_id = self.db_id(NotionDatabase::CustomerWins)?;

        let mut filters = Vec::new();
        if let Some(is_gol) = filter.is_gol {
            filters.push(Filter::checkbox("IsGOL", is_gol));
        }
        if let Some(days) = filter.last_days {
            let since = today_utc() - Duration::days(days.max(0));
            filters.push(Filter::date_on_or_after("Date", format_iso(since)));
        }

        let query = DatabaseQuery::new()
            .maybe_filter(Filter::all(filters))
            .sort(Sort::descending("Date"));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(CustomerWin::from_page).collect())
    }

    /// Status e etapa vazios viram `Identificado`
    pub async fn create_expansion_opportunity(&self, input: &ExpansionOpportunityInput) -> AppResult<String> {
        let db_id = self.db_id(NotionDatabase::ExpansionOpportunities)?;
        require_name(&input.name)?;

        let mut input = input.clone();
        for field in [&mut input.status, &mut input.stage] {
            if field.as_deref().map_or(true, |v| v.trim().is_empty()) {
                *field = Some(OPPORTUNITY_INITIAL_STAGE.to_string());
            }
        }

        let page = self.client.create_page(db_id, input.to_properties()).await?;
        log_notion_page_created("ExpansionOpportunities", &page.id);
        Ok(page.id)
    }

    pub async fn get_expansion_opportunities(&self, stage: Option<&str>) -> AppResult<Vec<ExpansionOpportunity>> {
        let db_id = self.db_id(NotionDatabase::ExpansionOpportunities)?;
        let filter = stage
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Filter::select("Stage", s));

        let query = DatabaseQuery::new().maybe_filter(filter);
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(ExpansionOpportunity::from_page).collect())
    }

    pub async fn get_clients(&self) -> AppResult<Vec<Client>> {
        let db_id = self.db_id(NotionDatabase::Clients)?;
        let query = DatabaseQuery::new().sort(Sort::ascending("Name"));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Client::from_page).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_layer::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_date_or_today() {
        assert_eq!(date_or_today(&Some("2026-04-02".into())), "2026-04-02");
        assert_eq!(date_or_today(&Some(" ".into())), format_iso(today_utc()));
        assert_eq!(date_or_today(&None), format_iso(today_utc()));
    }

    #[tokio::test]
    async fn test_create_customer_win_returns_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{
                        "parent": { "database_id": "wins-db" },
                        "properties": {
                            "Date": { "date": { "start": "2026-04-02" } },
                            "IsGOL": { "checkbox": false }
                        }
                    }"#,
                );
                then.status(200).json_body(json!({ "id": "win-1", "properties": {} }));
            })
            .await;

        let input = CustomerWinInput {
            name: "Cliente renovou".into(),
            date: Some("2026-04-02".into()),
            ..Default::default()
        };
        let id = layer(&server).create_customer_win(&input, false).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, "win-1");
    }

    #[tokio::test]
    async fn test_customer_win_requires_date() {
        let server = MockServer::start_async().await;
        let input = CustomerWinInput {
            name: "Cliente renovou".into(),
            ..Default::default()
        };

        let err = layer(&server).create_customer_win(&input, false).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "Name and Date are required"));
    }

    #[tokio::test]
    async fn test_customer_wins_filters() {
        let server = MockServer::start_async().await;
        let since = format_iso(today_utc() - Duration::days(30));
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("/databases/{}/query", WINS_DB))
                    .json_body_partial(
                        json!({
                            "filter": { "and": [
                                { "property": "IsGOL", "checkbox": { "equals": true } },
                                { "property": "Date", "date": { "on_or_after": since } }
                            ] },
                            "sorts": [{ "property": "Date", "direction": "descending" }]
                        })
                        .to_string(),
                    );
                then.status(200).json_body(json!({
                    "results": [{
                        "id": "w1",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Renovação" }] },
                            "Score": { "type": "number", "number": 9 },
                            "IsGOL": { "type": "checkbox", "checkbox": true }
                        }
                    }],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;

        let filter = CustomerWinFilter {
            is_gol: Some(true),
            last_days: Some(30),
        };
        let wins = layer(&server).get_customer_wins(filter).await.unwrap();

        mock.assert_async().await;
        assert_eq!(wins.len(), 1);
        assert!(wins[0].is_gol);
        assert_eq!(wins[0].score, 9.0);
    }

    #[tokio::test]
    async fn test_opportunity_defaults_stage() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{ "properties": {
                        "Status": { "select": { "name": "Identificado" } },
                        "Stage": { "select": { "name": "Identificado" } }
                    } }"#,
                );
                then.status(200).json_body(json!({ "id": "opp-1", "properties": {} }));
            })
            .await;

        let input = ExpansionOpportunityInput {
            name: "Cross-sell".into(),
            ..Default::default()
        };
        let id = layer(&server).create_expansion_opportunity(&input).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, "opp-1");
    }

    #[tokio::test]
    async fn test_opportunities_stage_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("/databases/{}/query", EXPANSION_DB))
                    .json_body_partial(
                        r#"{ "filter": { "property": "Stage", "select": { "equals": "Em Negociação" } } }"#,
                    );
                then.status(200)
                    .json_body(json!({ "results": [], "has_more": false, "next_cursor": null }));
            })
            .await;

        let opportunities = layer(&server)
            .get_expansion_opportunities(Some("Em Negociação"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(opportunities.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_database() {
        let server = MockServer::start_async().await;
        let layer = layer_with_ids(&server, Default::default());

        let err = layer
            .create_expansion_opportunity(&ExpansionOpportunityInput {
                name: "x".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg == "NOTION_DB_EXPANSIONOPPORTUNITIES not configured"));
    }
}
