use notion::properties;
use notion::query::{DatabaseQuery, Filter};
use serde_json::Map;

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{DateRange, Goal};
use crate::utils::logging::log_notion_page_updated;
use crate::utils::AppResult;

impl NotionDataLayer {
    /// Metas, opcionalmente restritas a `PeriodStart >= start` e `PeriodEnd <= end`
    pub async fn get_goals(&self, range: Option<&DateRange>) -> AppResult<Vec<Goal>> {
        let db_id = self.db_id(NotionDatabase::Goals)?;

        let mut filters = Vec::new();
        if let Some(range) = range {
            if let Some(start) = range.start() {
                filters.push(Filter::date_on_or_after("PeriodStart", start));
            }
            if let Some(end) = range.end() {
                filters.push(Filter::date_on_or_before("PeriodEnd", end));
            }
        }

        let query = DatabaseQuery::new().maybe_filter(Filter::all(filters));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Goal::from_page).collect())
    }

    pub async fn update_goal_actual(&self, goal_id: &str, actual: f64) -> AppResult<()> {
        let mut props = Map::new();
        props.insert("Actual".into(), properties::number(actual));

        self.client.update_page(goal_id, props).await?;
        log_notion_page_updated(goal_id, &format!("Actual = {}", actual));
        Ok(())
    }
}
