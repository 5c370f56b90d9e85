use notion::properties;
use notion::query::{DatabaseQuery, Filter};
use serde_json::{Map, Value};

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{Journal, JournalPayload};
use crate::utils::logging::{log_notion_page_created, log_notion_page_updated};
use crate::utils::AppResult;

impl NotionDataLayer {
    /// Journal de uma data (`YYYY-MM-DD`), se existir
    pub async fn get_journal_by_date(&self, date: &str) -> AppResult<Option<Journal>> {
        let db_id = self.db_id(NotionDatabase::Journal)?;
        let query = DatabaseQuery::new()
            .filter(Filter::date_equals("Date", date))
            .page_size(1);

        let response = self.client.query_database(db_id, &query).await?;
        Ok(response.results.first().map(Journal::from_page))
    }

    /// Cria ou atualiza o journal da data
    ///
    /// Na atualização só os campos presentes no payload são gravados e a
    /// resposta é o registro existente com o payload aplicado por cima.
    pub async fn upsert_journal_by_date(&self, date: &str, payload: &JournalPayload) -> AppResult<Journal> {
        let db_id = self.db_id(NotionDatabase::Journal)?;

        if let Some(existing) = self.get_journal_by_date(date).await? {
            let props = update_properties(payload);
            self.client.update_page(&existing.id, props).await?;
            log_notion_page_updated(&existing.id, &format!("journal {}", date));
            return Ok(existing.merge(payload));
        }

        let page = self.client.create_page(db_id, create_properties(date, payload)).await?;
        log_notion_page_created("Journal", &page.id);
        Ok(Journal::from_page(&page))
    }
}

fn update_properties(payload: &JournalPayload) -> Map<String, Value> {
    let mut props = Map::new();

    if let Some(filled) = payload.filled {
        props.insert("Filled".into(), properties::checkbox(filled));
    }
    for (key, value) in payload.text_fields() {
        if let Some(text) = value {
            props.insert(key.into(), properties::rich_text(text));
        }
    }
    if let Some(tags) = &payload.tags {
        props.insert("Tags".into(), properties::multi_select(tags));
    }

    props
}

fn create_properties(date: &str, payload: &JournalPayload) -> Map<String, Value> {
    let mut props = Map::new();

    let name = payload
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Journal {}", date));
    props.insert("Name".into(), properties::title(&name));
    props.insert("Date".into(), properties::date(date));
    props.insert("Filled".into(), properties::checkbox(payload.filled.unwrap_or(false)));

    for (key, value) in payload.text_fields() {
        if let Some(text) = value.filter(|t| !t.is_empty()) {
            props.insert(key.into(), properties::rich_text(text));
        }
    }
    if let Some(tags) = &payload.tags {
        props.insert("Tags".into(), properties::multi_select(tags));
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_layer::test_support::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;

    fn payload() -> JournalPayload {
        serde_json::from_value(json!({ "Filled": true, "Summary": "dia bom", "Insights": "" })).unwrap()
    }

    #[test]
    fn test_create_properties_defaults() {
        let props = create_properties("2026-02-10", &JournalPayload::default());
        assert_eq!(props["Name"]["title"][0]["text"]["content"], "Journal 2026-02-10");
        assert_eq!(props["Filled"]["checkbox"], false);
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_update_keeps_empty_strings_create_drops_them() {
        let update = update_properties(&payload());
        assert!(update.contains_key("Insights"));
        assert!(!update.contains_key("Name"));

        let create = create_properties("2026-02-10", &payload());
        assert!(!create.contains_key("Insights"));
        assert_eq!(create["Summary"]["rich_text"][0]["text"]["content"], "dia bom");
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_and_merges() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("/databases/{}/query", JOURNAL_DB))
                    .json_body_partial(
                        r#"{ "filter": { "property": "Date", "date": { "equals": "2026-02-10" } }, "page_size": 1 }"#,
                    );
                then.status(200).json_body(json!({
                    "results": [{
                        "id": "j1",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Journal 2026-02-10" }] },
                            "Date": { "type": "date", "date": { "start": "2026-02-10" } },
                            "WhatWorked": { "type": "rich_text", "rich_text": [{ "plain_text": "café" }] }
                        }
                    }],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PATCH).path("/pages/j1");
                then.status(200).json_body(json!({ "id": "j1", "properties": {} }));
            })
            .await;

        let journal = layer(&server)
            .upsert_journal_by_date("2026-02-10", &payload())
            .await
            .unwrap();

        update.assert_async().await;
        assert_eq!(journal.id, "j1");
        assert!(journal.filled);
        assert_eq!(journal.summary, "dia bom");
        assert_eq!(journal.what_worked, "café");
    }

    #[tokio::test]
    async fn test_upsert_creates_when_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", JOURNAL_DB));
                then.status(200)
                    .json_body(json!({ "results": [], "has_more": false, "next_cursor": null }));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pages")
                    .json_body_partial(r#"{ "parent": { "database_id": "journal-db" } }"#);
                then.status(200).json_body(json!({
                    "id": "new-j",
                    "properties": {
                        "Date": { "type": "date", "date": { "start": "2026-02-11" } },
                        "Filled": { "type": "checkbox", "checkbox": true }
                    }
                }));
            })
            .await;

        let journal = layer(&server)
            .upsert_journal_by_date("2026-02-11", &payload())
            .await
            .unwrap();

        create.assert_async().await;
        assert_eq!(journal.id, "new-j");
        assert_eq!(journal.date, "2026-02-11");
    }
}
