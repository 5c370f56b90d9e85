// ============================================================================
// Pages - CRUD de registros
// ============================================================================
//
// No Notion cada registro de um database é uma página. "Deletar" significa
// arquivar (`archived: true`); a página continua recuperável pela UI.

use crate::client::NotionClient;
use crate::error::{NotionError, Result};
use crate::types::Page;
use serde_json::{json, Map, Value};

impl NotionClient {
    /// `GET /pages/{id}`
    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        if page_id.trim().is_empty() {
            return Err(NotionError::ValidationError("page_id vazio".to_string()));
        }
        self.get_json(&format!("/pages/{}", page_id)).await
    }

    /// `POST /pages` com um database como parent
    pub async fn create_page(&self, database_id: &str, properties: Map<String, Value>) -> Result<Page> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties
        });

        let page: Page = self.post_json("/pages", &body).await?;
        tracing::debug!("Página criada no database {}: {}", database_id, page.id);
        Ok(page)
    }

    /// `PATCH /pages/{id}` atualizando apenas as propriedades informadas
    pub async fn update_page(&self, page_id: &str, properties: Map<String, Value>) -> Result<Page> {
        let endpoint = format!("/pages/{}", page_id);
        self.patch_json(&endpoint, &json!({ "properties": properties })).await
    }

    /// Arquiva a página (equivalente a deletar)
    pub async fn archive_page(&self, page_id: &str) -> Result<Page> {
        let endpoint = format!("/pages/{}", page_id);
        let page: Page = self.patch_json(&endpoint, &json!({ "archived": true })).await?;
        tracing::info!("🗑️ Página arquivada: {}", page_id);
        Ok(page)
    }
}
