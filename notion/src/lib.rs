//! Cliente da API do Notion
//!
//! Este crate fornece uma interface tipada para os endpoints do Notion usados
//! pelo FR Tech OS:
//!
//! - **Databases**: `GET /databases/{id}`, `POST /databases/{id}/query`,
//!   `POST /databases`, `PATCH /databases/{id}`
//! - **Pages**: `GET /pages/{id}`, `POST /pages`, `PATCH /pages/{id}`
//!
//! Todas as requisições passam por retry com backoff exponencial quando a API
//! responde 429 (rate limit).
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use notion::{NotionClient, query::{DatabaseQuery, Filter, Sort}};
//!
//! #[tokio::main]
//! async fn main() -> notion::Result<()> {
//!     let token = std::env::var("NOTION_TOKEN")
//!         .expect("NOTION_TOKEN não configurado");
//!     let client = NotionClient::new(token)?;
//!
//!     let query = DatabaseQuery::new()
//!         .filter(Filter::checkbox("Active", true))
//!         .sort(Sort::ascending("SortOrder"));
//!
//!     let pages = client.query_all("kpis-db-id", &query).await?;
//!     println!("{} páginas", pages.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod databases;
pub mod error;
pub mod pages;
pub mod properties;
pub mod query;
pub mod types;

pub use client::{NotionClient, RetryPolicy};
pub use error::{NotionError, Result};
pub use types::{Database, Page, QueryResponse};
