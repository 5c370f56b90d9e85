// ============================================================================
// Fluxos de café e expansão
// ============================================================================
//
// Café: diagnóstico + ação concluída ligada à meta de cafés do mês (ou do ano).
// Vitória de cliente com Score >= 8 é um "momento GOL": gera ação, oportunidade
// de upsell e a reunião de expansão, exceto para cliente com Health Red.

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use tracing::{error, info, warn};

use crate::models::expansion::CoffeeGoalsSummary;
use crate::models::{
    ActionInput, CoffeeDiagnosticInput, CoffeeRequest, CoffeeSummary, ContactInput,
    CustomerWinInput, ExpansionOpportunityInput, Goal,
};
use crate::services::data_layer::NotionDataLayer;
use crate::utils::dates::{format_iso, today_utc, week_key};
use crate::utils::{AppError, AppResult};

/// Padrão no nome das metas de café
pub const COFFEE_GOAL_PATTERN: &str = "Network_Coffees";
pub const GOL_GOAL_NAME: &str = "GOL_Moments_Detected";
pub const EXPANSION_GOAL_NAME: &str = "Expansion_Meetings";

/// Score mínimo de um momento GOL
pub const GOL_MIN_SCORE: f64 = 8.0;

pub const COFFEE_GOAL_WARNING: &str = "Crie uma meta Goals para cafés (Network_Coffees) no Notion";
pub const RED_HEALTH_ERROR: &str = "Cliente com Health Red. Expansão bloqueada. Sugerir CS primeiro.";

fn is_coffee_goal(goal: &Goal, year: i32) -> bool {
    goal.year as i32 == year
        && goal
            .name
            .to_lowercase()
            .contains(&COFFEE_GOAL_PATTERN.to_lowercase())
}

/// Meta de cafés do mês corrente; sem ela, a meta anual
pub fn select_coffee_goal(goals: &[Goal], year: i32, month: u32) -> Option<&Goal> {
    goals
        .iter()
        .find(|g| is_coffee_goal(g, year) && g.month as u32 == month)
        .or_else(|| goals.iter().find(|g| is_coffee_goal(g, year) && !g.is_monthly()))
}

/// Data da reunião de expansão: Green em 7 a 13 dias, demais em 14
pub fn planned_date(health: &str, today: NaiveDate) -> NaiveDate {
    let days = if health == "Green" {
        7 + rand::thread_rng().gen_range(0..7)
    } else {
        14
    };
    today + Duration::days(days)
}

/// Registra o café: contato (existente ou novo), diagnóstico e ação concluída
pub async fn register_coffee(layer: &NotionDataLayer, request: &CoffeeRequest) -> AppResult<CoffeeSummary> {
    if !request.scope_lock_accepted || !request.additives_policy_accepted {
        return Err(AppError::ValidationError(
            "ScopeLockAccepted and AdditivesPolicyAccepted are required".to_string(),
        ));
    }

    let contact_name = request.contact_name();
    let contact_id = match (request.contact_id(), contact_name) {
        (Some(id), _) => id.to_string(),
        (None, Some(name)) => {
            let input = ContactInput {
                name: Some(name.to_string()),
                ..Default::default()
            };
            let contact = layer.create_contact(&input).await?;
            info!("👤 Contato criado para o café: {} ({})", name, contact.id);
            contact.id
        }
        (None, None) => {
            return Err(AppError::ValidationError(
                "Either contactId or contactName is required".to_string(),
            ))
        }
    };

    let today = today_utc();
    let today_iso = format_iso(today);
    let diagnostic_name = match contact_name {
        Some(name) => format!("Café - {}", name),
        None => format!("Café - {}", today_iso),
    };

    let diagnostic = CoffeeDiagnosticInput::from_request(
        request,
        diagnostic_name,
        today_iso.clone(),
        contact_id.clone(),
    );
    let diagnostic_id = layer.create_coffee_diagnostic(&diagnostic).await?;

    let goals = layer.find_goals_by_name(COFFEE_GOAL_PATTERN).await?;
    let goal = select_coffee_goal(&goals, today.year(), today.month());
    let goal_warning = if goal.is_none() {
        warn!("⚠️ Nenhuma meta de cafés para {}", today_iso);
        Some(COFFEE_GOAL_WARNING.to_string())
    } else {
        None
    };

    let main_pain = request.main_pain.clone().unwrap_or_default();
    let action = ActionInput {
        name: match contact_name {
            Some(name) => format!("Café com {}", name),
            None => format!("Café - {}", today_iso),
        },
        action_type: "Café".to_string(),
        date: today_iso,
        done: true,
        contribution: Some(1.0),
        earned: Some(0.0),
        goal: goal.map(|g| g.id.clone()),
        contact: Some(contact_id),
        diagnostic: Some(diagnostic_id.clone()),
        week_key: Some(week_key(today)),
        month: Some(today.month()),
        public_visible: true,
        notes: Some(if main_pain.is_empty() {
            request.notes.clone().unwrap_or_default()
        } else {
            main_pain.clone()
        }),
        ..Default::default()
    };
    let action_id = layer.create_action(&action).await?;

    Ok(CoffeeSummary {
        diagnostic_id,
        action_id,
        main_pain,
        funnel_leak: request.funnel_leak.clone().unwrap_or_default(),
        response_speed: request.response_speed.clone().unwrap_or_default(),
        goals: CoffeeGoalsSummary {
            goal30: request.goal30.clone().unwrap_or_default(),
            goal60: request.goal60.clone().unwrap_or_default(),
            goal90: request.goal90.clone().unwrap_or_default(),
        },
        recommended_modules: Vec::new(),
        scope_risk: false,
        goal_linked: goal.is_some(),
        goal_warning,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerWinOutcome {
    pub id: String,
    pub is_gol: bool,
    /// Momento GOL de cliente com Health Red: sem oportunidade de expansão
    pub expansion_blocked: bool,
}

/// Meta pelo nome; falha vira `None` (o fluxo GOL não aborta por causa dela)
async fn goal_id_or_none(layer: &NotionDataLayer, name: &str) -> Option<String> {
    match layer.find_goal_by_name(name).await {
        Ok(goal) => goal.map(|g| g.id),
        Err(e) => {
            error!("❌ Erro ao buscar meta {}: {}", name, e);
            None
        }
    }
}

/// Cria a vitória e, se for momento GOL, dispara o fluxo de expansão
///
/// Falhas dentro do fluxo GOL são registradas; a vitória já está criada.
pub async fn register_customer_win(layer: &NotionDataLayer, input: &CustomerWinInput) -> AppResult<CustomerWinOutcome> {
    let score = input.score();
    let is_gol = score >= GOL_MIN_SCORE;
    let id = layer.create_customer_win(input, is_gol).await?;

    let mut outcome = CustomerWinOutcome {
        id,
        is_gol,
        expansion_blocked: false,
    };
    if !is_gol {
        return Ok(outcome);
    }

    let name = input.name.trim();
    let win_date = input.date.clone().unwrap_or_default();
    let client = input.client().map(str::to_string);
    info!("🎯 Momento GOL: \"{}\" (Score {})", name, score);

    let gol_action = ActionInput {
        name: format!("GOL Detectado - {}", name),
        action_type: "GOL_Detected".to_string(),
        date: win_date,
        done: true,
        contribution: Some(1.0),
        goal: goal_id_or_none(layer, GOL_GOAL_NAME).await,
        client: client.clone(),
        notes: Some(format!(
            "Momento GOL detectado. Score: {}. {}",
            score,
            input.description.as_deref().unwrap_or_default()
        )),
        ..Default::default()
    };
    if let Err(e) = layer.create_action(&gol_action).await {
        error!("❌ Erro ao criar ação GOL para {}: {}", outcome.id, e);
    }

    let health = input
        .health
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or("Green");
    if health == "Red" {
        warn!("🚫 Expansão bloqueada para {}: cliente com Health Red", outcome.id);
        outcome.expansion_blocked = true;
        return Ok(outcome);
    }

    let planned = format_iso(planned_date(health, today_utc()));
    let opportunity = ExpansionOpportunityInput {
        name: format!("Expansão - {}", name),
        client: client.clone(),
        opportunity_type: Some("Upsell".to_string()),
        status: Some("Identificado".to_string()),
        stage: Some("Identificado".to_string()),
        trigger: Some("GOLMoment".to_string()),
        planned_date: Some(planned.clone()),
        health: Some(health.to_string()),
        notes: Some(format!(
            "Oportunidade criada automaticamente após momento GOL. Score: {}",
            score
        )),
    };
    if let Err(e) = layer.create_expansion_opportunity(&opportunity).await {
        error!("❌ Erro ao criar oportunidade de expansão para {}: {}", outcome.id, e);
        return Ok(outcome);
    }

    let meeting = ActionInput {
        name: format!("Reunião de Expansão Agendada - {}", name),
        action_type: "Upsell_Meeting_Scheduled".to_string(),
        date: planned.clone(),
        done: false,
        goal: goal_id_or_none(layer, EXPANSION_GOAL_NAME).await,
        client,
        notes: Some(format!(
            "Reunião de expansão agendada para {} após momento GOL",
            planned
        )),
        ..Default::default()
    };
    if let Err(e) = layer.create_action(&meeting).await {
        error!("❌ Erro ao agendar reunião de expansão para {}: {}", outcome.id, e);
    }

    Ok(outcome)
}
