use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

/// Meta (Goal) ligada a um KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Goal {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    /// Primeiro id da relation `KPI`, ou `""`
    #[serde(rename = "KPI")]
    pub kpi: String,
    pub year: f64,
    pub month: f64,
    pub week_key: String,
    pub period_start: String,
    pub period_end: String,
    pub target: f64,
    pub actions: Vec<String>,
    pub actual: f64,
    pub progress_pct: f64,
    pub visible_public: bool,
    pub visible_admin: bool,
    pub notes: String,
}

impl Goal {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            kpi: extract_first_relation(page.property("KPI")),
            year: extract_number(page.property("Year")),
            month: extract_number(page.property("Month")),
            week_key: extract_text(page.property("WeekKey")),
            period_start: extract_date(page.property("PeriodStart")),
            period_end: extract_date(page.property("PeriodEnd")),
            target: extract_number(page.property("Target")),
            actions: extract_relation(page.property("Actions")),
            actual: extract_number(page.property("Actual")),
            progress_pct: formula_number(page.property("ProgressPct")),
            visible_public: extract_checkbox(page.property("VisiblePublic")),
            visible_admin: extract_checkbox(page.property("VisibleAdmin")),
            notes: extract_text(page.property("Notes")),
        }
    }

    pub fn is_monthly(&self) -> bool {
        self.month > 0.0
    }
}

/// `ProgressPct` é formula: `{ "formula": { "type": "number", "number": 42 } }`
fn formula_number(property: Option<&serde_json::Value>) -> f64 {
    property
        .and_then(|p| p.get("formula"))
        .and_then(|f| f.get("number"))
        .and_then(|n| n.as_f64())
        .unwrap_or_else(|| extract_number(property))
}
