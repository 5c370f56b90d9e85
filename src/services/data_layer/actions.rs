use notion::properties;
use notion::query::{DatabaseQuery, Filter};
use serde_json::Map;

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{Action, ActionInput, DateRange, GoalCheck};
use crate::services::guards;
use crate::utils::logging::{log_notion_page_created, log_notion_page_updated};
use crate::utils::AppResult;

impl NotionDataLayer {
    /// Ações, opcionalmente restritas a `start <= Date <= end`
    pub async fn get_actions(&self, range: Option<&DateRange>) -> AppResult<Vec<Action>> {
        let db_id = self.db_id(NotionDatabase::Actions)?;

        let mut filters = Vec::new();
        if let Some(range) = range {
            if let Some(start) = range.start() {
                filters.push(Filter::date_on_or_after("Date", start));
            }
            if let Some(end) = range.end() {
                filters.push(Filter::date_on_or_before("Date", end));
            }
        }

        let query = DatabaseQuery::new().maybe_filter(Filter::all(filters));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Action::from_page).collect())
    }

    pub async fn get_action(&self, action_id: &str) -> AppResult<Action> {
        let page = self.client.retrieve_page(action_id).await?;
        Ok(Action::from_page(&page))
    }

    pub async fn toggle_action_done(&self, action_id: &str, done: bool) -> AppResult<bool> {
        let mut props = Map::new();
        props.insert("Done".into(), properties::checkbox(done));

        self.client.update_page(action_id, props).await?;
        log_notion_page_updated(action_id, &format!("Done = {}", done));
        Ok(done)
    }

    /// Retorna o id da ação criada
    pub async fn create_action(&self, input: &ActionInput) -> AppResult<String> {
        let db_id = self.db_id(NotionDatabase::Actions)?;
        let page = self.client.create_page(db_id, input.to_properties()).await?;
        log_notion_page_created("Actions", &page.id);
        Ok(page.id)
    }

    /// Uma ação só pode ser concluída se estiver ligada a uma meta
    pub async fn ensure_action_has_goal(&self, action_id: &str) -> AppResult<GoalCheck> {
        let action = self.get_action(action_id).await?;
        Ok(guards::can_mark_action_done(&action))
    }
}
