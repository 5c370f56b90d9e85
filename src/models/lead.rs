use notion::properties::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envio do formulário de captura (landing pages)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Chega como número ou string vinda de input mascarado
    #[serde(default)]
    pub estimated_loss: Option<Value>,
}

impl LeadSubmission {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.is_empty())
    }

    /// Valor numérico da perda estimada; qualquer coisa não numérica vira 0
    pub fn estimated_loss_value(&self) -> f64 {
        let value = match &self.estimated_loss {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) if s.trim().is_empty() => 0.0,
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            Some(Value::Bool(true)) => 1.0,
            _ => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// Layout de propriedades do database que recebe o lead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadLayout {
    /// `POST /api/lead-gate` (NOTION_DATABASE_ID)
    LeadGate,
    /// `POST /api/save-lead` (NOTION_DB_AXIS_LEADS)
    AxisLeads,
}

impl LeadLayout {
    pub const AXIS_DEFAULT_NAME: &'static str = "Sem nome";
    pub const AXIS_INITIAL_STATUS: &'static str = "Novo Lead";

    /// `captured_at` é um timestamp ISO completo (não só a data)
    pub fn properties(&self, lead: &LeadSubmission, captured_at: &str) -> Map<String, Value> {
        let mut props = Map::new();
        let loss = lead.estimated_loss_value();

        match self {
            LeadLayout::LeadGate => {
                props.insert("Name".into(), title(lead.name().unwrap_or_default()));
                props.insert("WhatsApp".into(), phone_number(lead.phone().unwrap_or_default()));
                props.insert("Estimated Loss".into(), number(loss));
            }
            LeadLayout::AxisLeads => {
                props.insert(
                    "Name".into(),
                    title(lead.name().unwrap_or(Self::AXIS_DEFAULT_NAME)),
                );
                props.insert("Phone".into(), phone_number(lead.phone().unwrap_or_default()));
                props.insert("Perda Estimada".into(), number(loss));
                props.insert("Status".into(), select(Self::AXIS_INITIAL_STATUS));
            }
        }
        props.insert("Date".into(), date(captured_at));

        props
    }
}
