//! Validação das variáveis de ambiente no startup
//!
//! Nunca é fatal: o servidor sobe mesmo sem token (self-test roda em dry-run)
//! e cada rota reclama do database que precisar.

use serde::Serialize;

use crate::config::schema::NotionDatabase;
use crate::config::settings::Settings;
use crate::utils::logging::{log_info, log_warning};

/// Tamanho de um ID de database do Notion sem hífens
const NOTION_ID_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvValidation {
    pub valid: bool,
    pub missing: Vec<String>,
    pub warnings: Vec<String>,
}

fn is_placeholder(token: &str) -> bool {
    token.trim().starts_with("<<<")
}

fn check_id_format(env_var: &str, id: &str) -> Option<String> {
    let len = id.replace('-', "").len();
    (len != NOTION_ID_LEN).then(|| {
        format!(
            "{} has invalid format (expected {} chars, got {})",
            env_var, NOTION_ID_LEN, len
        )
    })
}

pub fn validate_env(settings: &Settings) -> EnvValidation {
    let mut missing = Vec::new();
    let mut warnings = Vec::new();

    match settings.notion_token() {
        Some(token) if !is_placeholder(token) => {}
        _ => missing.push("NOTION_TOKEN".to_string()),
    }

    for database in NotionDatabase::ALL {
        let schema = database.schema();
        match settings.notion.databases.get(database) {
            None if schema.required => missing.push(schema.env_var.to_string()),
            None => {}
            Some(id) => warnings.extend(check_id_format(schema.env_var, id)),
        }
    }

    EnvValidation {
        valid: missing.is_empty(),
        missing,
        warnings,
    }
}

/// Valida e registra o resultado no log
pub fn log_env_validation(settings: &Settings) -> EnvValidation {
    let result = validate_env(settings);

    if result.valid {
        log_info("✅ Variáveis de ambiente obrigatórias presentes");
    } else {
        log_warning(&format!(
            "⚠️ Variáveis de ambiente faltando: {}. Rotas que dependem delas vão falhar.",
            result.missing.join(", ")
        ));
    }

    for warning in &result.warnings {
        log_warning(&format!("⚠️ {}", warning));
    }

    result
}
