use chrono::{SecondsFormat, Utc};
use tracing::info;

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{LeadLayout, LeadSubmission};
use crate::utils::AppResult;

impl NotionDataLayer {
    /// Grava um lead capturado pelas landing pages e retorna o id da página
    pub async fn save_lead(&self, database: NotionDatabase, lead: &LeadSubmission, layout: LeadLayout) -> AppResult<String> {
        let db_id = self.db_id(database)?;
        let captured_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let page = self
            .client
            .create_page(db_id, layout.properties(lead, &captured_at))
            .await?;

        info!("✅ Lead salvo no Notion ({}): {}", database.name(), page.id);
        Ok(page.id)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::NotionDatabase;
    use crate::models::{LeadLayout, LeadSubmission};
    use crate::services::data_layer::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_axis_lead() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{
                        "parent": { "database_id": "axis-db" },
                        "properties": {
                            "Name": { "title": [{ "text": { "content": "Carla" } }] },
                            "Status": { "select": { "name": "Novo Lead" } }
                        }
                    }"#,
                );
                then.status(200).json_body(json!({ "id": "lead-9", "properties": {} }));
            })
            .await;

        let lead = LeadSubmission {
            name: Some("Carla".into()),
            ..Default::default()
        };
        let id = layer(&server)
            .save_lead(NotionDatabase::AxisLeads, &lead, LeadLayout::AxisLeads)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(id, "lead-9");
    }
}
