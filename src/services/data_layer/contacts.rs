use notion::query::{DatabaseQuery, Filter, Sort};
use notion::NotionError;
use std::cmp::Ordering;

use super::NotionDataLayer;
use crate::config::NotionDatabase;
use crate::models::{Contact, ContactInput};
use crate::utils::logging::{log_notion_page_created, log_notion_page_updated};
use crate::utils::normalization::similarity;
use crate::utils::{AppError, AppResult};

const CONTACT_NOT_FOUND: &str = "Contact not found";

fn contact_not_found(err: NotionError) -> AppError {
    if err.is_not_found() {
        AppError::NotFound(CONTACT_NOT_FOUND.to_string())
    } else {
        err.into()
    }
}

impl NotionDataLayer {
    pub async fn get_contacts(&self) -> AppResult<Vec<Contact>> {
        let db_id = self.db_id(NotionDatabase::Contacts)?;
        let query = DatabaseQuery::new().sort(Sort::ascending("Name"));
        let pages = self.client.query_all(db_id, &query).await?;
        Ok(pages.iter().map(Contact::from_page).collect())
    }

    /// Busca por nome (contains no Notion) ordenada pela similaridade com `q`
    pub async fn search_contacts(&self, q: &str) -> AppResult<Vec<Contact>> {
        let db_id = self.db_id(NotionDatabase::Contacts)?;
        let query = DatabaseQuery::new().filter(Filter::title_contains("Name", q.trim()));
        let pages = self.client.query_all(db_id, &query).await?;

        let mut scored: Vec<(f64, Contact)> = pages
            .iter()
            .map(Contact::from_page)
            .map(|c| (similarity(q, &c.name), c))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(scored.into_iter().map(|(_, c)| c).collect())
    }

    pub async fn get_contact(&self, contact_id: &str) -> AppResult<Contact> {
        let page = self
            .client
            .retrieve_page(contact_id)
            .await
            .map_err(contact_not_found)?;

        if page.archived {
            return Err(AppError::NotFound(CONTACT_NOT_FOUND.to_string()));
        }
        Ok(Contact::from_page(&page))
    }

    pub async fn create_contact(&self, input: &ContactInput) -> AppResult<Contact> {
        let db_id = self.db_id(NotionDatabase::Contacts)?;
        if input.trimmed_name().is_none() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }

        let page = self.client.create_page(db_id, input.to_properties()).await?;
        log_notion_page_created("Contacts", &page.id);
        Ok(Contact::from_page(&page))
    }

    /// Atualiza apenas os campos presentes em `input`
    pub async fn update_contact(&self, contact_id: &str, input: &ContactInput) -> AppResult<Contact> {
        let page = self
            .client
            .update_page(contact_id, input.to_properties())
            .await
            .map_err(contact_not_found)?;

        log_notion_page_updated(contact_id, "contato");
        Ok(Contact::from_page(&page))
    }

    /// "Deleta" arquivando a página
    pub async fn delete_contact(&self, contact_id: &str) -> AppResult<()> {
        self.client
            .archive_page(contact_id)
            .await
            .map_err(contact_not_found)?;
        Ok(())
    }
}
