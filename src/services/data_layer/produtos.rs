use notion::query::{DatabaseQuery, Filter, Sort};

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::Produto;
use crate::utils::AppResult;

impl NotionDataLayer {
    /// Produtos ordenados por prioridade estratégica (maior primeiro)
    pub async fn get_produtos(&self) -> AppResult<Vec<Produto>> {
        self.query_produtos(None).await
    }

    pub async fn get_produtos_by_status(&self, status: &str) -> AppResult<Vec<Produto>> {
        self.query_produtos(Some(Filter::select("Status", status))).await
    }

    async fn query_produtos(&self, filter: Option<Filter>) -> AppResult<Vec<Produto>> {
        let db_id = self.db_id(NotionDatabase::Produtos)?;
        let query = DatabaseQuery::new()
            .maybe_filter(filter)
            .sort(Sort::descending("PrioridadeEstrategica"));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Produto::from_page).collect())
    }
}
