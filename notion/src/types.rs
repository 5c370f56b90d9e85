//! Estruturas retornadas pela API do Notion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Página do Notion (um registro de database)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,

    /// Propriedades no formato bruto da API (`{ "Name": { "type": "title", ... } }`)
    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(default)]
    pub archived: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<String>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// `last_edited_time` parseado (RFC 3339)
    pub fn last_edited(&self) -> Option<DateTime<Utc>> {
        self.last_edited_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Database do Notion (schema + metadados)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,

    #[serde(default)]
    pub title: Vec<Value>,

    /// Schema: nome da propriedade -> `{ id, name, type, ... }`
    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Database {
    /// Título em texto puro (concatena `plain_text` dos itens)
    pub fn title_text(&self) -> String {
        self.title
            .iter()
            .filter_map(|item| item.get("plain_text").and_then(|v| v.as_str()))
            .collect()
    }

    /// Tipo de uma propriedade do schema (`title`, `checkbox`, ...)
    pub fn property_type(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}

/// Resposta de `POST /databases/{id}/query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_database_helpers() {
        let db: Database = serde_json::from_value(json!({
            "object": "database",
            "id": "db1",
            "title": [{ "plain_text": "KPIs " }, { "plain_text": "2026" }],
            "properties": {
                "Name": { "id": "title", "name": "Name", "type": "title" },
                "Active": { "id": "a1", "name": "Active", "type": "checkbox" }
            }
        }))
        .unwrap();

        assert_eq!(db.title_text(), "KPIs 2026");
        assert_eq!(db.property_type("Active"), Some("checkbox"));
        assert!(db.has_property("Name"));
        assert!(!db.has_property("SortOrder"));
    }

    #[test]
    fn test_page_last_edited() {
        let page: Page = serde_json::from_value(json!({
            "id": "p1",
            "last_edited_time": "2026-01-10T12:30:00.000Z",
            "properties": {}
        }))
        .unwrap();
        let edited = page.last_edited().unwrap();
        assert_eq!(edited.to_rfc3339(), "2026-01-10T12:30:00+00:00");
        assert!(!page.archived);
    }
}
