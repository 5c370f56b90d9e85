/// KPI do dashboard
/// Serializado com os nomes de propriedade do Notion (o frontend lê `Name`, `SortOrder`, ...)
use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Kpi {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub periodicity: String,
    pub chart_type: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    pub visible_public: bool,
    pub visible_admin: bool,
    pub is_financial: bool,
    pub sort_order: f64,
    pub active: bool,
    pub description: String,
}

impl Kpi {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            category: extract_select(page.property("Category")),
            periodicity: extract_select(page.property("Periodicity")),
            chart_type: extract_select(page.property("ChartType")),
            unit: extract_text(page.property("Unit")),
            target_value: extract_optional_number(page.property("TargetValue")),
            visible_public: extract_checkbox(page.property("VisiblePublic")),
            visible_admin: extract_checkbox(page.property("VisibleAdmin")),
            is_financial: extract_checkbox(page.property("IsFinancial")),
            sort_order: extract_number(page.property("SortOrder")),
            active: extract_checkbox(page.property("Active")),
            description: extract_text(page.property("Description")),
        }
    }
}
