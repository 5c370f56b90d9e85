use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub action_type: String,
    pub date: String,
    pub done: bool,
    pub contribution: f64,
    pub earned: f64,
    pub goal: String,
    pub contact: String,
    pub client: String,
    pub proposal: String,
    pub diagnostic: String,
    pub week_key: String,
    pub month: f64,
    pub public_visible: bool,
    pub notes: String,
}

impl Action {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            action_type: extract_select(page.property("Type")),
            date: extract_date(page.property("Date")),
            done: extract_checkbox(page.property("Done")),
            contribution: extract_number(page.property("Contribution")),
            earned: extract_number(page.property("Earned")),
            goal: extract_first_relation(page.property("Goal")),
            contact: extract_first_relation(page.property("Contact")),
            client: extract_first_relation(page.property("Client")),
            proposal: extract_first_relation(page.property("Proposal")),
            diagnostic: extract_first_relation(page.property("Diagnostic")),
            week_key: extract_text(page.property("WeekKey")),
            month: extract_number(page.property("Month")),
            public_visible: extract_checkbox(page.property("PublicVisible")),
            notes: extract_text(page.property("Notes")),
        }
    }
}

/// Nova ação criada pelos fluxos de café e expansão
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionInput {
    pub name: String,
    pub action_type: String,
    pub date: String,
    pub done: bool,
    pub contribution: Option<f64>,
    pub earned: Option<f64>,
    pub goal: Option<String>,
    pub contact: Option<String>,
    pub client: Option<String>,
    pub diagnostic: Option<String>,
    pub week_key: Option<String>,
    pub month: Option<u32>,
    pub public_visible: bool,
    pub notes: Option<String>,
}

impl ActionInput {
    pub fn to_properties(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut props = serde_json::Map::new();
        props.insert("Name".into(), title(&self.name));
        props.insert("Type".into(), select(&self.action_type));
        props.insert("Date".into(), date(&self.date));
        props.insert("Done".into(), checkbox(self.done));
        props.insert("PublicVisible".into(), checkbox(self.public_visible));

        if let Some(contribution) = self.contribution {
            props.insert("Contribution".into(), number(contribution));
        }
        if let Some(earned) = self.earned {
            props.insert("Earned".into(), number(earned));
        }
        if let Some(month) = self.month {
            props.insert("Month".into(), number(f64::from(month)));
        }
        for (key, id) in [
            ("Goal", &self.goal),
            ("Contact", &self.contact),
            ("Client", &self.client),
            ("Diagnostic", &self.diagnostic),
        ] {
            if let Some(id) = id.as_deref().filter(|id| !id.is_empty()) {
                props.insert(key.into(), relation(&[id]));
            }
        }
        if let Some(week_key) = self.week_key.as_deref().filter(|w| !w.is_empty()) {
            props.insert("WeekKey".into(), rich_text(week_key));
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            props.insert("Notes".into(), rich_text(notes));
        }
        props
    }
}

/// Resultado da checagem "pode concluir?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalCheck {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GoalCheck {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Corpo de `PATCH /api/actions/:id/done`
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleDoneRequest {
    #[serde(default)]
    pub done: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_input_skips_empty_relations() {
        let input = ActionInput {
            name: "Café com Ana".into(),
            action_type: "Café".into(),
            date: "2026-03-02".into(),
            done: true,
            contribution: Some(1.0),
            goal: Some(String::new()),
            contact: Some("contact-1".into()),
            week_key: Some("2026-W10".into()),
            month: Some(3),
            ..Default::default()
        };

        let props = input.to_properties();
        assert_eq!(props["Type"]["select"]["name"], "Café");
        assert_eq!(props["Done"]["checkbox"], true);
        assert_eq!(props["Month"]["number"], 3.0);
        assert_eq!(props["Contact"]["relation"][0]["id"], "contact-1");
        assert_eq!(props["WeekKey"]["rich_text"][0]["text"]["content"], "2026-W10");
        assert!(!props.contains_key("Goal"));
        assert!(!props.contains_key("Earned"));
    }
}
