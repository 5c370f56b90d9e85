// ============================================================================
// NotionDataLayer - acesso tipado aos databases do FR Tech OS
// ============================================================================
//
// Cada arquivo deste módulo adiciona um bloco `impl NotionDataLayer` para um
// domínio (kpis, goals, actions, journal, contacts, crm, produtos, expansion,
// leads, admin). Todas as chamadas passam pelo `NotionClient`, que já faz
// retry com backoff em 429.

mod actions;
mod admin;
mod contacts;
mod crm;
mod expansion;
mod goals;
mod journal;
mod kpis;
mod leads;
mod produtos;

use std::time::Duration;

use notion::{NotionClient, RetryPolicy};
use tokio::sync::OnceCell;

use crate::config::{DatabaseIds, NotionDatabase, Settings};
use crate::utils::{AppError, AppResult};

pub use admin::DatabaseInfo;
pub use crm::PIPELINE_DATE_PROPERTY;
pub use expansion::CustomerWinFilter;

pub struct NotionDataLayer {
    client: NotionClient,
    ids: DatabaseIds,
    /// Propriedade de data usada para contar o pipeline (verificada uma vez)
    pipeline_date_property: OnceCell<String>,
}

impl NotionDataLayer {
    pub fn new(client: NotionClient, ids: DatabaseIds) -> Self {
        Self {
            client,
            ids,
            pipeline_date_property: OnceCell::new(),
        }
    }

    /// Monta o cliente a partir das configurações; `None` quando não há token
    pub fn from_settings(settings: &Settings) -> AppResult<Option<Self>> {
        let Some(token) = settings.notion_token() else {
            return Ok(None);
        };

        let retry = RetryPolicy::new(
            settings.notion.retry_max_attempts.max(1),
            Duration::from_millis(settings.notion.retry_base_delay_ms),
        );
        let client = NotionClient::with_base_url(token, &settings.notion.base_url)?
            .with_retry_policy(retry);

        Ok(Some(Self::new(client, settings.notion.databases.clone())))
    }

    pub fn client(&self) -> &NotionClient {
        &self.client
    }

    pub fn database_ids(&self) -> &DatabaseIds {
        &self.ids
    }

    /// ID do database ou `"<ENV_VAR> not configured"`
    pub fn db_id(&self, database: NotionDatabase) -> AppResult<&str> {
        self.ids
            .get(database)
            .ok_or_else(|| AppError::not_configured(database.env_var()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_id_names_env_var_when_missing() {
        let client = NotionClient::new("secret_test").unwrap();
        let layer = NotionDataLayer::new(client, DatabaseIds::default());

        let err = layer.db_id(NotionDatabase::Journal).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: NOTION_DB_JOURNAL not configured");
    }

    #[test]
    fn test_from_settings_without_token() {
        let settings = Settings::default();
        assert!(NotionDataLayer::from_settings(&settings).unwrap().is_none());
    }
}
