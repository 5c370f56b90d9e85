//! Café (diagnóstico), vitórias de cliente, oportunidades de expansão e clientes

use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Corpo de `POST /api/coffee` (formulário do café, em camelCase)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeRequest {
    #[serde(default)]
    pub contact_id: Option<String>,
    /// Usado para criar o contato quando `contactId` não vem
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    /// Número ou texto numérico; `""` conta como ausente
    #[serde(default)]
    pub team_size: Option<Value>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default, rename = "whatsAppPrimary")]
    pub whatsapp_primary: bool,
    #[serde(default)]
    pub response_speed: Option<String>,
    #[serde(default)]
    pub main_pain: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub funnel_leak: Option<String>,
    #[serde(default)]
    pub goal30: Option<String>,
    #[serde(default)]
    pub goal60: Option<String>,
    #[serde(default)]
    pub goal90: Option<String>,
    #[serde(default)]
    pub scope_lock_accepted: bool,
    #[serde(default)]
    pub additives_policy_accepted: bool,
    #[serde(default)]
    pub next_step_agreed: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CoffeeRequest {
    pub fn contact_id(&self) -> Option<&str> {
        non_empty(&self.contact_id)
    }

    pub fn contact_name(&self) -> Option<&str> {
        non_empty(&self.contact_name).map(str::trim)
    }

    pub fn team_size(&self) -> Option<f64> {
        match self.team_size.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Página de CoffeeDiagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoffeeDiagnosticInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub team_size: Option<f64>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default, rename = "WhatsAppPrimary")]
    pub whatsapp_primary: bool,
    #[serde(default)]
    pub response_speed: Option<String>,
    #[serde(default)]
    pub main_pain: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub funnel_leak: Option<String>,
    #[serde(default, rename = "Goal30")]
    pub goal_30: Option<String>,
    #[serde(default, rename = "Goal60")]
    pub goal_60: Option<String>,
    #[serde(default, rename = "Goal90")]
    pub goal_90: Option<String>,
    #[serde(default)]
    pub scope_lock_accepted: bool,
    #[serde(default)]
    pub additives_policy_accepted: bool,
    #[serde(default)]
    pub next_step_agreed: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_steps: Option<String>,
}

impl CoffeeDiagnosticInput {
    pub fn from_request(request: &CoffeeRequest, name: String, date: String, contact: String) -> Self {
        Self {
            name,
            date: Some(date),
            contact: Some(contact),
            segment: request.segment.clone(),
            team_size: request.team_size(),
            channels: request.channels.clone(),
            whatsapp_primary: request.whatsapp_primary,
            response_speed: request.response_speed.clone(),
            main_pain: request.main_pain.clone(),
            symptoms: request.symptoms.clone(),
            funnel_leak: request.funnel_leak.clone(),
            goal_30: request.goal30.clone(),
            goal_60: request.goal60.clone(),
            goal_90: request.goal90.clone(),
            scope_lock_accepted: request.scope_lock_accepted,
            additives_policy_accepted: request.additives_policy_accepted,
            next_step_agreed: request.next_step_agreed.clone(),
            notes: request.notes.clone(),
            next_steps: None,
        }
    }

    pub fn to_properties(&self, date: &str) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("Name".into(), title(&self.name));
        props.insert("Date".into(), notion::properties::date(date));
        insert_relation(&mut props, "Contact", &self.contact);
        insert_select(&mut props, "Segment", &self.segment);
        insert_select(&mut props, "ResponseSpeed", &self.response_speed);
        if let Some(size) = self.team_size {
            props.insert("TeamSize".into(), number(size));
        }
        if !self.channels.is_empty() {
            props.insert("Channels".into(), multi_select(&self.channels[..]));
        }
        props.insert("WhatsAppPrimary".into(), checkbox(self.whatsapp_primary));
        props.insert("ScopeLockAccepted".into(), checkbox(self.scope_lock_accepted));
        props.insert(
            "AdditivesPolicyAccepted".into(),
            checkbox(self.additives_policy_accepted),
        );
        for (key, value) in [
            ("MainPain", &self.main_pain),
            ("Symptoms", &self.symptoms),
            ("FunnelLeak", &self.funnel_leak),
            ("Goal30", &self.goal_30),
            ("Goal60", &self.goal_60),
            ("Goal90", &self.goal_90),
            ("NextStepAgreed", &self.next_step_agreed),
            ("Notes", &self.notes),
            ("NextSteps", &self.next_steps),
        ] {
            insert_text(&mut props, key, value);
        }
        props
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoffeeGoalsSummary {
    pub goal30: String,
    pub goal60: String,
    pub goal90: String,
}

/// Resposta de `POST /api/coffee`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeSummary {
    pub diagnostic_id: String,
    pub action_id: String,
    pub main_pain: String,
    pub funnel_leak: String,
    pub response_speed: String,
    pub goals: CoffeeGoalsSummary,
    pub recommended_modules: Vec<String>,
    pub scope_risk: bool,
    pub goal_linked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_warning: Option<String>,
}

/// Corpo de `POST /api/expansion/customer-win`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerWinInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub win_type: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub upsell_recommended: bool,
    /// Health do cliente (Green, Yellow, Red); só vale para o fluxo GOL
    #[serde(default)]
    pub health: Option<String>,
}

impl CustomerWinInput {
    pub fn score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    pub fn client(&self) -> Option<&str> {
        non_empty(&self.client)
    }

    pub fn to_properties(&self, date: &str, is_gol: bool) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("Name".into(), title(self.name.trim()));
        props.insert("Date".into(), notion::properties::date(date));
        insert_text(&mut props, "Description", &self.description);
        insert_text(&mut props, "Evidence", &self.evidence);
        insert_select(&mut props, "WinType", &self.win_type);
        insert_relation(&mut props, "Client", &self.client);
        props.insert("Score".into(), number(self.score()));
        props.insert("UpsellRecommended".into(), checkbox(self.upsell_recommended));
        props.insert("IsGOL".into(), checkbox(is_gol));
        props
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerWin {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub client: String,
    pub date: String,
    pub description: String,
    pub win_type: String,
    pub evidence: String,
    pub score: f64,
    pub upsell_recommended: bool,
    #[serde(rename = "IsGOL")]
    pub is_gol: bool,
}

impl CustomerWin {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            client: extract_first_relation(page.property("Client")),
            date: extract_date(page.property("Date")),
            description: extract_text(page.property("Description")),
            win_type: extract_select(page.property("WinType")),
            evidence: extract_text(page.property("Evidence")),
            score: extract_number(page.property("Score")),
            upsell_recommended: extract_checkbox(page.property("UpsellRecommended")),
            is_gol: extract_checkbox(page.property("IsGOL")),
        }
    }
}

/// Corpo de `POST /api/expansion/opportunity`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpansionOpportunityInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default, rename = "Type")]
    pub opportunity_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub planned_date: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExpansionOpportunityInput {
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("Name".into(), title(self.name.trim()));
        insert_text(&mut props, "Notes", &self.notes);
        insert_select(&mut props, "Type", &self.opportunity_type);
        insert_select(&mut props, "Status", &self.status);
        insert_select(&mut props, "Stage", &self.stage);
        insert_select(&mut props, "Trigger", &self.trigger);
        insert_select(&mut props, "Health", &self.health);
        if let Some(planned) = non_empty(&self.planned_date) {
            props.insert("PlannedDate".into(), notion::properties::date(planned));
        }
        insert_relation(&mut props, "Client", &self.client);
        props
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpansionOpportunity {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub client: String,
    #[serde(rename = "Type")]
    pub opportunity_type: String,
    pub status: String,
    pub stage: String,
    pub trigger: String,
    pub planned_date: String,
    pub health: String,
    pub notes: String,
}

impl ExpansionOpportunity {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            client: extract_first_relation(page.property("Client")),
            opportunity_type: extract_select(page.property("Type")),
            status: extract_select(page.property("Status")),
            stage: extract_select(page.property("Stage")),
            trigger: extract_select(page.property("Trigger")),
            planned_date: extract_date(page.property("PlannedDate")),
            health: extract_select(page.property("Health")),
            notes: extract_text(page.property("Notes")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Client {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub health: String,
}

impl Client {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            health: extract_select(page.property("Health")),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn insert_text(props: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(text) = non_empty(value) {
        props.insert(key.into(), rich_text(text));
    }
}

fn insert_select(props: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(name) = non_empty(value) {
        props.insert(key.into(), select(name));
    }
}

fn insert_relation(props: &mut Map<String, Value>, key: &str, id: &Option<String>) {
    if let Some(id) = non_empty(id) {
        props.insert(key.into(), relation(&[id]));
    }
}
