use notion::Database;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::NotionDataLayer;
use crate::utils::{AppError, AppResult};

/// Resumo de um database para o admin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseInfo {
    pub id: String,
    pub title: String,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<Database> for DatabaseInfo {
    fn from(database: Database) -> Self {
        Self {
            title: database.title_text(),
            id: database.id,
            properties: database.properties,
            url: database.url,
        }
    }
}

fn require_object(properties: &Value) -> AppResult<()> {
    if !properties.is_object() {
        return Err(AppError::ValidationError(
            "Properties object is required".to_string(),
        ));
    }
    Ok(())
}

impl NotionDataLayer {
    pub async fn database_info(&self, database_id: &str) -> AppResult<DatabaseInfo> {
        let database = self.client.retrieve_database(database_id).await?;
        Ok(database.into())
    }

    /// Renomeia/altera propriedades: `{ "Antigo": { "name": "Novo" } }`
    pub async fn update_database_properties(&self, database_id: &str, properties: &Value) -> AppResult<DatabaseInfo> {
        require_object(properties)?;
        let database = self.client.update_database(database_id, properties).await?;
        info!("✅ Propriedades do database {} atualizadas", database_id);
        Ok(database.into())
    }

    pub async fn create_database(&self, parent_page_id: &str, title: &str, properties: &Value) -> AppResult<DatabaseInfo> {
        require_object(properties)?;
        let database = self
            .client
            .create_database(parent_page_id, title, properties)
            .await?;
        Ok(database.into())
    }
}
