pub mod action;
pub mod contact;
pub mod crm;
pub mod expansion;
pub mod goal;
pub mod health;
pub mod journal;
pub mod kpi;
pub mod lead;
pub mod produto;

pub use action::{Action, ActionInput, GoalCheck, ToggleDoneRequest};
pub use contact::{Contact, ContactInput};
pub use crm::{pipeline_status, CrmContact, CrmContactInput, PipelineKpis};
pub use expansion::{
    Client, CoffeeDiagnosticInput, CoffeeRequest, CoffeeSummary, CustomerWin, CustomerWinInput,
    ExpansionOpportunity, ExpansionOpportunityInput,
};
pub use goal::Goal;
pub use health::{CheckStatus, HealthCheck, HealthReport, SelfTest, SelfTestReport};
pub use journal::{Journal, JournalCheck, JournalPayload};
pub use kpi::Kpi;
pub use lead::{LeadLayout, LeadSubmission};
pub use produto::Produto;

use serde::Deserialize;

/// Intervalo de datas (`?start=YYYY-MM-DD&end=YYYY-MM-DD`), ambos opcionais
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref().filter(|s| !s.is_empty())
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref().filter(|s| !s.is_empty())
    }
}
