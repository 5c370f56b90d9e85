use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

/// Diário de um dia (um registro por data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Journal {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub date: String,
    pub filled: bool,
    pub summary: String,
    pub what_worked: String,
    pub what_failed: String,
    pub insights: String,
    pub objections: String,
    pub process_ideas: String,
    pub tags: Vec<String>,
    pub related_contact: String,
    pub related_client: String,
    pub attachments: Vec<String>,
}

impl Journal {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            date: extract_date(page.property("Date")),
            filled: extract_checkbox(page.property("Filled")),
            summary: extract_text(page.property("Summary")),
            what_worked: extract_text(page.property("WhatWorked")),
            what_failed: extract_text(page.property("WhatFailed")),
            insights: extract_text(page.property("Insights")),
            objections: extract_text(page.property("Objections")),
            process_ideas: extract_text(page.property("ProcessIdeas")),
            tags: extract_multi_select(page.property("Tags")),
            related_contact: extract_first_relation(page.property("RelatedContact")),
            related_client: extract_first_relation(page.property("RelatedClient")),
            attachments: extract_relation(page.property("Attachments")),
        }
    }

    /// Aplica os campos presentes no payload (usado depois de um update parcial)
    pub fn merge(mut self, payload: &JournalPayload) -> Self {
        if let Some(name) = &payload.name {
            self.name = name.clone();
        }
        if let Some(filled) = payload.filled {
            self.filled = filled;
        }
        for (slot, value) in [
            (&mut self.summary, &payload.summary),
            (&mut self.what_worked, &payload.what_worked),
            (&mut self.what_failed, &payload.what_failed),
            (&mut self.insights, &payload.insights),
            (&mut self.objections, &payload.objections),
            (&mut self.process_ideas, &payload.process_ideas),
        ] {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        if let Some(tags) = &payload.tags {
            self.tags = tags.clone();
        }
        self
    }
}

/// Corpo de `POST /api/journal/:date`; todos os campos são opcionais
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JournalPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filled: Option<bool>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub what_worked: Option<String>,
    #[serde(default)]
    pub what_failed: Option<String>,
    #[serde(default)]
    pub insights: Option<String>,
    #[serde(default)]
    pub objections: Option<String>,
    #[serde(default)]
    pub process_ideas: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl JournalPayload {
    /// Campos de texto na ordem das propriedades do Notion
    pub fn text_fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Summary", self.summary.as_deref()),
            ("WhatWorked", self.what_worked.as_deref()),
            ("WhatFailed", self.what_failed.as_deref()),
            ("Insights", self.insights.as_deref()),
            ("Objections", self.objections.as_deref()),
            ("ProcessIdeas", self.process_ideas.as_deref()),
        ]
    }
}

/// Resposta de `GET /api/journal/yesterday/check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JournalCheck {
    pub exists: bool,
    pub filled: bool,
    pub locked: bool,
}

impl JournalCheck {
    pub fn from_journal(journal: Option<&Journal>) -> Self {
        let exists = journal.is_some();
        let filled = journal.map(|j| j.filled).unwrap_or(false);
        Self {
            exists,
            filled,
            locked: !exists || !filled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_journal() -> Journal {
        let page: Page = serde_json::from_value(json!({
            "id": "j-1",
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": "Journal 2026-01-10" }] },
                "Date": { "type": "date", "date": { "start": "2026-01-10" } },
                "Summary": { "type": "rich_text", "rich_text": [{ "plain_text": "antes" }] },
                "Tags": { "type": "multi_select", "multi_select": [{ "name": "vendas" }] }
            }
        }))
        .unwrap();
        Journal::from_page(&page)
    }

    #[test]
    fn test_merge_only_touches_provided_fields() {
        let payload: JournalPayload = serde_json::from_value(json!({
            "Filled": true,
            "Insights": "novo insight"
        }))
        .unwrap();

        let merged = empty_journal().merge(&payload);
        assert!(merged.filled);
        assert_eq!(merged.insights, "novo insight");
        assert_eq!(merged.summary, "antes");
        assert_eq!(merged.tags, vec!["vendas"]);
    }

    #[test]
    fn test_check_locks_missing_or_unfilled() {
        assert_eq!(
            JournalCheck::from_journal(None),
            JournalCheck { exists: false, filled: false, locked: true }
        );

        let mut journal = empty_journal();
        assert!(JournalCheck::from_journal(Some(&journal)).locked);

        journal.filled = true;
        let check = JournalCheck::from_journal(Some(&journal));
        assert!(check.exists && check.filled && !check.locked);
    }
}
