//! (De)serialização de propriedades do Notion
//!
//! Extração: nunca falha. Propriedade ausente ou de tipo inesperado retorna o
//! valor padrão (`""`, `0`, `false`, lista vazia).
//!
//! Construção: produz o JSON que `POST /pages` e `PATCH /pages/{id}` esperam.
//!
//! ⚠️ Datas são strings ISO (`YYYY-MM-DD` ou RFC 3339), como a API devolve.

use serde_json::{json, Value};

fn typed<'a>(property: Option<&'a Value>, kind: &str) -> Option<&'a Value> {
    property.and_then(|p| p.get(kind)).filter(|v| !v.is_null())
}

fn property_type(property: &Value) -> Option<&str> {
    property.get("type").and_then(|t| t.as_str())
}

fn join_plain_text(items: &Value) -> String {
    items
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.get("plain_text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Texto de `title`/`rich_text`; outros tipos são convertidos para string
pub fn extract_text(property: Option<&Value>) -> String {
    let Some(property) = property else {
        return String::new();
    };

    match property_type(property) {
        Some(kind @ ("title" | "rich_text")) => join_plain_text(&property[kind]),
        Some(kind) => match &property[kind] {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        },
        None => String::new(),
    }
}

pub fn extract_number(property: Option<&Value>) -> f64 {
    typed(property, "number").and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Número opcional: `None` quando a célula está vazia
pub fn extract_optional_number(property: Option<&Value>) -> Option<f64> {
    typed(property, "number").and_then(|v| v.as_f64())
}

pub fn extract_checkbox(property: Option<&Value>) -> bool {
    typed(property, "checkbox").and_then(|v| v.as_bool()).unwrap_or(false)
}

/// `date.start` ou `""`
pub fn extract_date(property: Option<&Value>) -> String {
    typed(property, "date")
        .and_then(|d| d.get("start"))
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string()
}

pub fn extract_select(property: Option<&Value>) -> String {
    typed(property, "select")
        .and_then(|s| s.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or_default()
        .to_string()
}

pub fn extract_multi_select(property: Option<&Value>) -> Vec<String> {
    typed(property, "multi_select")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| item.get("name").and_then(|n| n.as_str()).unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

pub fn extract_relation(property: Option<&Value>) -> Vec<String> {
    typed(property, "relation")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| item.get("id").and_then(|n| n.as_str()).unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Primeiro id de uma relation, ou `""`
pub fn extract_first_relation(property: Option<&Value>) -> String {
    extract_relation(property).into_iter().next().unwrap_or_default()
}

pub fn extract_phone(property: Option<&Value>) -> String {
    typed(property, "phone_number").and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

pub fn extract_email(property: Option<&Value>) -> String {
    typed(property, "email").and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

pub fn extract_url(property: Option<&Value>) -> String {
    typed(property, "url").and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

// ==================== BUILDERS ====================

pub fn title(content: &str) -> Value {
    json!({ "title": [{ "text": { "content": content } }] })
}

pub fn rich_text(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

pub fn number(value: f64) -> Value {
    json!({ "number": value })
}

pub fn checkbox(value: bool) -> Value {
    json!({ "checkbox": value })
}

pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

pub fn multi_select<S: AsRef<str>>(names: &[S]) -> Value {
    let options: Vec<Value> = names.iter().map(|n| json!({ "name": n.as_ref() })).collect();
    json!({ "multi_select": options })
}

pub fn date(start: &str) -> Value {
    json!({ "date": { "start": start } })
}

pub fn relation<S: AsRef<str>>(ids: &[S]) -> Value {
    let items: Vec<Value> = ids.iter().map(|id| json!({ "id": id.as_ref() })).collect();
    json!({ "relation": items })
}

pub fn phone_number(value: &str) -> Value {
    json!({ "phone_number": value })
}

pub fn email(value: &str) -> Value {
    json!({ "email": value })
}

pub fn url(value: &str) -> Value {
    json!({ "url": value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_rich_text_segments() {
        let prop = json!({
            "type": "rich_text",
            "rich_text": [
                { "plain_text": "Café com " },
                { "plain_text": "cliente" }
            ]
        });
        assert_eq!(extract_text(Some(&prop)), "Café com cliente");
        assert_eq!(extract_text(None), "");
    }

    #[test]
    fn test_extract_text_stringifies_other_types() {
        let prop = json!({ "type": "number", "number": 42 });
        assert_eq!(extract_text(Some(&prop)), "42");

        let prop = json!({ "type": "select", "select": null });
        assert_eq!(extract_text(Some(&prop)), "");
    }

    #[test]
    fn test_extract_defaults_on_empty_cells() {
        let number = json!({ "type": "number", "number": null });
        assert_eq!(extract_number(Some(&number)), 0.0);
        assert_eq!(extract_optional_number(Some(&number)), None);

        let date = json!({ "type": "date", "date": null });
        assert_eq!(extract_date(Some(&date)), "");

        let select = json!({ "type": "select", "select": null });
        assert_eq!(extract_select(Some(&select)), "");

        assert!(!extract_checkbox(None));
        assert!(extract_relation(None).is_empty());
    }

    #[test]
    fn test_extract_structured_values() {
        let relation = json!({ "type": "relation", "relation": [{ "id": "g1" }, { "id": "g2" }] });
        assert_eq!(extract_relation(Some(&relation)), vec!["g1", "g2"]);
        assert_eq!(extract_first_relation(Some(&relation)), "g1");

        let tags = json!({ "type": "multi_select", "multi_select": [{ "name": "vendas" }, { "name": "café" }] });
        assert_eq!(extract_multi_select(Some(&tags)), vec!["vendas", "café"]);

        let date = json!({ "type": "date", "date": { "start": "2026-02-01", "end": null } });
        assert_eq!(extract_date(Some(&date)), "2026-02-01");

        let phone = json!({ "type": "phone_number", "phone_number": "+5511999990000" });
        assert_eq!(extract_phone(Some(&phone)), "+5511999990000");
    }

    #[test]
    fn test_builders_match_api_shape() {
        assert_eq!(title("Meta"), json!({ "title": [{ "text": { "content": "Meta" } }] }));
        assert_eq!(select("Mensal"), json!({ "select": { "name": "Mensal" } }));
        assert_eq!(
            multi_select(&["a", "b"]),
            json!({ "multi_select": [{ "name": "a" }, { "name": "b" }] })
        );
        assert_eq!(relation(&["x"]), json!({ "relation": [{ "id": "x" }] }));
        assert_eq!(date("2026-03-01"), json!({ "date": { "start": "2026-03-01" } }));
    }
}
