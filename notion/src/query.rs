//! Filtros, ordenação e corpo de `POST /databases/{id}/query`

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Condição aplicada a uma propriedade
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    CheckboxEquals(bool),
    SelectEquals(String),
    DateEquals(String),
    DateOnOrAfter(String),
    DateOnOrBefore(String),
    RichTextContains(String),
    TitleContains(String),
    NumberEquals(f64),
}

impl Condition {
    fn to_json(&self) -> (&'static str, Value) {
        match self {
            Condition::CheckboxEquals(b) => ("checkbox", json!({ "equals": b })),
            Condition::SelectEquals(s) => ("select", json!({ "equals": s })),
            Condition::DateEquals(d) => ("date", json!({ "equals": d })),
            Condition::DateOnOrAfter(d) => ("date", json!({ "on_or_after": d })),
            Condition::DateOnOrBefore(d) => ("date", json!({ "on_or_before": d })),
            Condition::RichTextContains(s) => ("rich_text", json!({ "contains": s })),
            Condition::TitleContains(s) => ("title", json!({ "contains": s })),
            Condition::NumberEquals(n) => ("number", json!({ "equals": n })),
        }
    }
}

/// Filtro de query (propriedade simples ou composto `and`/`or`)
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Property { property: String, condition: Condition },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn property(property: impl Into<String>, condition: Condition) -> Self {
        Filter::Property {
            property: property.into(),
            condition,
        }
    }

    pub fn checkbox(property: impl Into<String>, equals: bool) -> Self {
        Self::property(property, Condition::CheckboxEquals(equals))
    }

    pub fn select(property: impl Into<String>, equals: impl Into<String>) -> Self {
        Self::property(property, Condition::SelectEquals(equals.into()))
    }

    pub fn date_equals(property: impl Into<String>, date: impl Into<String>) -> Self {
        Self::property(property, Condition::DateEquals(date.into()))
    }

    pub fn date_on_or_after(property: impl Into<String>, date: impl Into<String>) -> Self {
        Self::property(property, Condition::DateOnOrAfter(date.into()))
    }

    pub fn date_on_or_before(property: impl Into<String>, date: impl Into<String>) -> Self {
        Self::property(property, Condition::DateOnOrBefore(date.into()))
    }

    pub fn title_contains(property: impl Into<String>, text: impl Into<String>) -> Self {
        Self::property(property, Condition::TitleContains(text.into()))
    }

    /// `and` de vários filtros; `None` se a lista estiver vazia e o próprio filtro se houver só um
    pub fn all(mut filters: Vec<Filter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Filter::And(filters)),
        }
    }

    /// `or` de vários filtros, com a mesma regra de `all`
    pub fn any(mut filters: Vec<Filter>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Filter::Or(filters)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Filter::Property { property, condition } => {
                let (kind, body) = condition.to_json();
                let mut obj = Map::new();
                obj.insert("property".to_string(), Value::String(property.clone()));
                obj.insert(kind.to_string(), body);
                Value::Object(obj)
            }
            Filter::And(filters) => {
                json!({ "and": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
            Filter::Or(filters) => {
                json!({ "or": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub property: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Corpo de uma query de database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseQuery {
    pub filter: Option<Filter>,
    pub sorts: Vec<Sort>,
    pub page_size: Option<u32>,
    pub start_cursor: Option<String>,
}

impl DatabaseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn maybe_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Máximo aceito pela API é 100
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size.clamp(1, 100));
        self
    }

    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(filter) = &self.filter {
            body.insert("filter".to_string(), filter.to_json());
        }
        if !self.sorts.is_empty() {
            body.insert("sorts".to_string(), json!(self.sorts));
        }
        if let Some(size) = self.page_size {
            body.insert("page_size".to_string(), json!(size));
        }
        if let Some(cursor) = &self.start_cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }
        Value::Object(body)
    }
}
