// ============================================================================
// Databases - operações de database do Notion
// ============================================================================
//
// - retrieve_database: schema e título
// - query_database: uma página de resultados
// - query_all: segue `next_cursor` até `has_more == false`
// - create_database / update_database: administração de schema

use crate::client::NotionClient;
use crate::error::{NotionError, Result};
use crate::query::DatabaseQuery;
use crate::types::{Database, Page, QueryResponse};
use serde_json::{json, Value};

/// Limite de segurança para paginação (100 páginas de 100 registros)
const MAX_QUERY_PAGES: usize = 100;

impl NotionClient {
    /// `GET /databases/{id}`
    pub async fn retrieve_database(&self, database_id: &str) -> Result<Database> {
        self.get_json(&format!("/databases/{}", database_id)).await
    }

    /// `POST /databases/{id}/query` (apenas a primeira página de resultados)
    pub async fn query_database(&self, database_id: &str, query: &DatabaseQuery) -> Result<QueryResponse> {
        let endpoint = format!("/databases/{}/query", database_id);
        self.post_json(&endpoint, &query.to_body()).await
    }

    /// Executa a query e segue a paginação
    pub async fn query_all(&self, database_id: &str, query: &DatabaseQuery) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        let mut current = query.clone();

        for _ in 0..MAX_QUERY_PAGES {
            let response = self.query_database(database_id, &current).await?;
            pages.extend(response.results);

            match (response.has_more, response.next_cursor) {
                (true, Some(cursor)) => current = current.start_cursor(cursor),
                _ => return Ok(pages),
            }
        }

        tracing::warn!(
            "⚠️ query_all({}) interrompida após {} páginas ({} registros)",
            database_id,
            MAX_QUERY_PAGES,
            pages.len()
        );
        Ok(pages)
    }

    /// `POST /databases` com uma página como parent
    pub async fn create_database(&self, parent_page_id: &str, title: &str, properties: &Value) -> Result<Database> {
        if !properties.is_object() {
            return Err(NotionError::ValidationError(
                "properties deve ser um objeto".to_string(),
            ));
        }

        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id },
            "title": [{ "type": "text", "text": { "content": title } }],
            "properties": properties
        });

        let database: Database = self.post_json("/databases", &body).await?;
        tracing::info!("✅ Database criado: {} ({})", title, database.id);
        Ok(database)
    }

    /// `PATCH /databases/{id}` (renomear, adicionar ou remover propriedades)
    pub async fn update_database(&self, database_id: &str, properties: &Value) -> Result<Database> {
        if !properties.is_object() {
            return Err(NotionError::ValidationError(
                "properties deve ser um objeto".to_string(),
            ));
        }

        let endpoint = format!("/databases/{}", database_id);
        self.patch_json(&endpoint, &json!({ "properties": properties })).await
    }
}
