use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

/// Status do pipeline comercial
pub mod pipeline_status {
    pub const CONTATO_ATIVADO: &str = "Contato Ativado";
    pub const CAFE_AGENDADO: &str = "Café Agendado";
    pub const CAFE_EXECUTADO: &str = "Café Executado";
    pub const PROPOSTA_ENVIADA: &str = "Proposta Enviada";
    pub const FOLLOW_UP_ATIVO: &str = "Follow-up Ativo";
    pub const VENDA_FECHADA: &str = "Venda Fechada";
    pub const VENDA_FINALIZADA: &str = "Venda Finalizada";
    pub const PERDIDO: &str = "Perdido";

    /// Mudanças para estes status não têm KPI correspondente
    pub fn triggers_goal_sync(status: &str) -> bool {
        !status.is_empty() && status != PERDIDO && status != FOLLOW_UP_ATIVO
    }
}

/// Registro do database CRMPipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CrmContact {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub company: String,
    pub status: String,
    pub coffee_date: String,
    pub proposal_date: String,
    pub last_update: String,
    pub notes: String,
}

impl CrmContact {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            company: extract_text(page.property("Company")),
            status: extract_select(page.property("Status")),
            coffee_date: extract_date(page.property("CoffeeDate")),
            proposal_date: extract_date(page.property("ProposalDate")),
            last_update: extract_date(page.property("LastUpdate")),
            notes: extract_text(page.property("Notes")),
        }
    }

    pub fn has_status(&self, statuses: &[&str]) -> bool {
        statuses.iter().any(|s| *s == self.status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CrmContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub coffee_date: Option<String>,
    #[serde(default)]
    pub proposal_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CrmContactInput {
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// Propriedades para os campos informados; `LastUpdate` é carimbado pelo data layer
    pub fn to_properties(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut props = serde_json::Map::new();

        if let Some(name) = self.trimmed_name() {
            props.insert("Name".into(), title(name));
        }
        if let Some(company) = &self.company {
            props.insert("Company".into(), rich_text(company));
        }
        if let Some(status) = self.status() {
            props.insert("Status".into(), select(status));
        }
        if let Some(date) = self.coffee_date.as_deref().filter(|d| !d.is_empty()) {
            props.insert("CoffeeDate".into(), notion::properties::date(date));
        }
        if let Some(date) = self.proposal_date.as_deref().filter(|d| !d.is_empty()) {
            props.insert("ProposalDate".into(), notion::properties::date(date));
        }
        if let Some(notes) = &self.notes {
            props.insert("Notes".into(), rich_text(notes));
        }

        props
    }
}

/// KPIs derivados do pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineKpis {
    pub total_leads: usize,
    pub conversion_activated_to_coffee: i64,
    pub conversion_coffee_to_proposal: i64,
    pub conversion_proposal_to_sale: i64,
    pub average_sales_cycle: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_goal_sync_trigger() {
        assert!(pipeline_status::triggers_goal_sync("Café Agendado"));
        assert!(!pipeline_status::triggers_goal_sync("Perdido"));
        assert!(!pipeline_status::triggers_goal_sync("Follow-up Ativo"));
        assert!(!pipeline_status::triggers_goal_sync(""));
    }

    #[test]
    fn test_input_properties() {
        let input: CrmContactInput = serde_json::from_value(json!({
            "Name": "Loja Azul",
            "Status": "Café Agendado",
            "CoffeeDate": "2026-02-03"
        }))
        .unwrap();

        let props = input.to_properties();
        assert_eq!(props["Status"]["select"]["name"], "Café Agendado");
        assert_eq!(props["CoffeeDate"]["date"]["start"], "2026-02-03");
        assert!(!props.contains_key("Notes"));
    }
}
