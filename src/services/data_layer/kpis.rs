use notion::query::{DatabaseQuery, Filter, Sort};
use tracing::info;

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::Kpi;
use crate::utils::AppResult;

impl NotionDataLayer {
    /// KPIs do dashboard público: ativos, visíveis e NUNCA financeiros
    pub async fn get_kpis_public(&self) -> AppResult<Vec<Kpi>> {
        let db_id = self.db_id(NotionDatabase::Kpis)?;
        let query = DatabaseQuery::new()
            .maybe_filter(Filter::all(vec![
                Filter::checkbox("Active", true),
                Filter::checkbox("VisiblePublic", true),
                Filter::checkbox("IsFinancial", false),
            ]))
            .sort(Sort::ascending("SortOrder"));

        let pages = self.client.query_all(db_id, &query).await?;
        info!("📊 {} KPIs públicos carregados", pages.len());
        Ok(pages.iter().map(Kpi::from_page).collect())
    }

    /// Todos os KPIs ativos (inclui financeiros)
    pub async fn get_kpis_admin(&self) -> AppResult<Vec<Kpi>> {
        let db_id = self.db_id(NotionDatabase::Kpis)?;
        let query = DatabaseQuery::new()
            .filter(Filter::checkbox("Active", true))
            .sort(Sort::ascending("SortOrder"));

        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Kpi::from_page).collect())
    }

    /// Todos os KPIs, inclusive inativos (manutenção)
    pub async fn get_all_kpis(&self) -> AppResult<Vec<Kpi>> {
        let db_id = self.db_id(NotionDatabase::Kpis)?;
        let pages = self.client.query_all(db_id, &DatabaseQuery::new()).await?;
        Ok(pages.iter().map(Kpi::from_page).collect())
    }
}
