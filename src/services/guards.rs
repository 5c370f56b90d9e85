//! Guards de segurança do lado do servidor
//!
//! KPIs financeiros nunca podem sair em rotas públicas, mesmo que alguém
//! marque `VisiblePublic` no Notion.

use crate::models::{Action, GoalCheck, Kpi};
use crate::utils::{AppError, AppResult};

/// Senha aceita em desenvolvimento quando `ADMIN_PASSCODE` não está configurado
pub const DEV_DEFAULT_PASSCODE: &str = "admin123";

pub const ACTION_WITHOUT_GOAL_REASON: &str = "Não é possível concluir uma ação sem meta associada";

/// Falha listando os nomes se houver qualquer KPI financeiro
pub fn assert_no_financial_kpis(kpis: &[Kpi]) -> AppResult<()> {
    let financial: Vec<&str> = kpis
        .iter()
        .filter(|k| k.is_financial)
        .map(|k| k.name.as_str())
        .collect();

    if financial.is_empty() {
        return Ok(());
    }

    Err(AppError::InternalError(format!(
        "Found {} financial KPI(s) in public route: {}",
        financial.len(),
        financial.join(", ")
    )))
}

/// `None` em `configured` significa "sem senha configurada": só vale a senha de desenvolvimento
pub fn validate_admin_passcode(provided: &str, configured: Option<&str>) -> bool {
    if provided.is_empty() {
        return false;
    }
    provided == configured.unwrap_or(DEV_DEFAULT_PASSCODE)
}

pub fn can_mark_action_done(action: &Action) -> GoalCheck {
    if action.goal.trim().is_empty() {
        GoalCheck::denied(ACTION_WITHOUT_GOAL_REASON)
    } else {
        GoalCheck::allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notion::Page;
    use serde_json::json;

    fn kpi(name: &str, financial: bool) -> Kpi {
        let page: Page = serde_json::from_value(json!({
            "id": name,
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": name }] },
                "IsFinancial": { "type": "checkbox", "checkbox": financial }
            }
        }))
        .unwrap();
        Kpi::from_page(&page)
    }

    #[test]
    fn test_financial_kpis_are_rejected_with_names() {
        assert!(assert_no_financial_kpis(&[kpi("Cafés", false)]).is_ok());

        let err = assert_no_financial_kpis(&[kpi("Cafés", false), kpi("Receita", true), kpi("Lucro", true)])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal error: Found 2 financial KPI(s) in public route: Receita, Lucro"
        );
    }

    #[test]
    fn test_validate_admin_passcode() {
        assert!(validate_admin_passcode("s3cret", Some("s3cret")));
        assert!(!validate_admin_passcode("admin123", Some("s3cret")));
        assert!(validate_admin_passcode("admin123", None));
        assert!(!validate_admin_passcode("", None));
    }

    #[test]
    fn test_can_mark_action_done() {
        let page: Page = serde_json::from_value(json!({ "id": "a", "properties": {} })).unwrap();
        let mut action = Action::from_page(&page);
        assert_eq!(
            can_mark_action_done(&action),
            GoalCheck::denied(ACTION_WITHOUT_GOAL_REASON)
        );

        action.goal = "goal-1".into();
        assert!(can_mark_action_done(&action).allowed);
    }
}
