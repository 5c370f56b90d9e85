// Biblioteca do FR Tech OS
// Expõe módulos para uso em testes e binários

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod utils;

use std::sync::Arc;

use services::NotionDataLayer;
use utils::{AppError, AppResult};

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    /// `None` quando NOTION_TOKEN não está configurado
    pub data: Option<Arc<NotionDataLayer>>,
}

impl AppState {
    pub fn new(settings: config::Settings) -> AppResult<Self> {
        let data = NotionDataLayer::from_settings(&settings)?.map(Arc::new);
        Ok(Self { settings, data })
    }

    pub fn data(&self) -> AppResult<&Arc<NotionDataLayer>> {
        self.data
            .as_ref()
            .ok_or_else(|| AppError::not_configured("NOTION_TOKEN"))
    }
}
