use notion::properties;
use notion::query::{DatabaseQuery, Filter, Sort};
use serde_json::json;
use tracing::{info, warn};

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{pipeline_status, CrmContact, CrmContactInput, DateRange};
use crate::utils::dates::{format_iso, today_utc};
use crate::utils::logging::{log_notion_page_created, log_notion_page_updated};
use crate::utils::{AppError, AppResult};

/// Propriedade de data que posiciona cada registro do pipeline no tempo
pub const PIPELINE_DATE_PROPERTY: &str = "LastUpdate";

impl NotionDataLayer {
    pub async fn get_crm_pipeline(&self) -> AppResult<Vec<CrmContact>> {
        let db_id = self.db_id(NotionDatabase::CrmPipeline)?;
        let query = DatabaseQuery::new().sort(Sort::descending(PIPELINE_DATE_PROPERTY));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(CrmContact::from_page).collect())
    }

    pub async fn get_crm_pipeline_by_status(&self, status: &str) -> AppResult<Vec<CrmContact>> {
        let db_id = self.db_id(NotionDatabase::CrmPipeline)?;
        let query = DatabaseQuery::new()
            .filter(Filter::select("Status", status))
            .sort(Sort::descending(PIPELINE_DATE_PROPERTY));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(CrmContact::from_page).collect())
    }

    /// Cria um registro; Status padrão `Contato Ativado` e `LastUpdate` = hoje
    pub async fn create_crm_contact(&self, input: &CrmContactInput) -> AppResult<CrmContact> {
        let db_id = self.db_id(NotionDatabase::CrmPipeline)?;
        if input.trimmed_name().is_none() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }

        let mut props = input.to_properties();
        if input.status().is_none() {
            props.insert(
                "Status".into(),
                properties::select(pipeline_status::CONTATO_ATIVADO),
            );
        }
        props.insert(
            PIPELINE_DATE_PROPERTY.into(),
            properties::date(&format_iso(today_utc())),
        );

        let page = self.client.create_page(db_id, props).await?;
        log_notion_page_created("CRMPipeline", &page.id);
        Ok(CrmContact::from_page(&page))
    }

    /// Atualiza os campos informados e carimba `LastUpdate` = hoje
    pub async fn update_crm_contact(&self, contact_id: &str, input: &CrmContactInput) -> AppResult<CrmContact> {
        let mut props = input.to_properties();
        props.insert(
            PIPELINE_DATE_PROPERTY.into(),
            properties::date(&format_iso(today_utc())),
        );

        let page = self.client.update_page(contact_id, props).await?;
        log_notion_page_updated(
            contact_id,
            &format!("pipeline status = {}", input.status().unwrap_or("-")),
        );
        Ok(CrmContact::from_page(&page))
    }

    /// Garante a propriedade de data do pipeline no database, criando-a se faltar
    ///
    /// O resultado fica em cache: o schema só é consultado uma vez por processo.
    pub async fn ensure_pipeline_date_property(&self) -> AppResult<&str> {
        let db_id = self.db_id(NotionDatabase::CrmPipeline)?;

        let name = self
            .pipeline_date_property
            .get_or_try_init(|| async {
                let database = self.client.retrieve_database(db_id).await?;

                match database.property_type(PIPELINE_DATE_PROPERTY) {
                    Some("date") => {}
                    Some(other) => {
                        return Err(AppError::ConfigError(format!(
                            "CRMPipeline.{} deveria ser date, mas é {}",
                            PIPELINE_DATE_PROPERTY, other
                        )));
                    }
                    None => {
                        warn!(
                            "⚠️ CRMPipeline sem propriedade {}; criando no database",
                            PIPELINE_DATE_PROPERTY
                        );
                        self.client
                            .update_database(db_id, &json!({ PIPELINE_DATE_PROPERTY: { "date": {} } }))
                            .await?;
                        info!("✅ Propriedade {} criada em CRMPipeline", PIPELINE_DATE_PROPERTY);
                    }
                }

                Ok::<_, AppError>(PIPELINE_DATE_PROPERTY.to_string())
            })
            .await?;

        Ok(name.as_str())
    }

    /// Quantos registros com Status em `statuses` têm a data do pipeline dentro de `range`
    pub async fn count_pipeline_by_status_and_date(&self, statuses: &[&str], range: &DateRange) -> AppResult<usize> {
        let db_id = self.db_id(NotionDatabase::CrmPipeline)?;
        let date_property = self.ensure_pipeline_date_property().await?;

        let mut filters = Vec::new();
        filters.extend(Filter::any(
            statuses.iter().map(|s| Filter::select("Status", *s)).collect(),
        ));
        if let Some(start) = range.start() {
            filters.push(Filter::date_on_or_after(date_property, start));
        }
        if let Some(end) = range.end() {
            filters.push(Filter::date_on_or_before(date_property, end));
        }

        let query = DatabaseQuery::new().maybe_filter(Filter::all(filters));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.len())
    }
}
