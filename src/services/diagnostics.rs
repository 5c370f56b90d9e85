// ============================================================================
// Diagnostics - health check e self-test do admin
// ============================================================================
//
// Health check: token, acesso a cada database obrigatório, schema das
// propriedades obrigatórias e uma query mínima.
//
// Self-test: cenários T1..T5 que validam as regras de negócio contra os dados
// reais. Sem token roda em dry-run (todos passam, com aviso).

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use notion::query::DatabaseQuery;
use notion::NotionError;

use crate::config::{NotionDatabase, PropertyKind, Settings};
use crate::models::{HealthCheck, HealthReport, JournalCheck, SelfTest, SelfTestReport};
use crate::services::data_layer::NotionDataLayer;
use crate::services::guards;
use crate::utils::dates::{format_iso, yesterday_utc};
use crate::utils::logging::log_health_check;

const T1: &str = "T1: Env vars faltando";
const T2: &str = "T2: DB inacessível";
const T3: &str = "T3: KPI financeiro marcado VisiblePublic=true não deve ser exposto";
const T3_GUARD: &str = "T3: Guard de segurança (assert_no_financial_kpis)";
const T4: &str = "T4: Action sem Goal -> toggle Done deve ser NEGADO";
const T5: &str = "T5: Journal de ontem não preenchido -> retornar LOCKED=true";

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn required_databases() -> impl Iterator<Item = NotionDatabase> {
    NotionDatabase::ALL.into_iter().filter(|db| db.schema().required)
}

fn access_error_message(err: &NotionError) -> String {
    if err.is_not_found() {
        "Database não encontrado. Verifique se a integração tem acesso.".to_string()
    } else if err.is_unauthorized() {
        "Não autorizado. Verifique o token e permissões.".to_string()
    } else {
        err.to_string()
    }
}

/// Propriedades obrigatórias ausentes ou com tipo diferente (formula não é checada)
fn schema_problems(database: NotionDatabase, db: &notion::Database) -> Vec<String> {
    database
        .schema()
        .required_properties()
        .filter_map(|prop| match db.property_type(prop.name) {
            None => Some(prop.name.to_string()),
            Some(_) if prop.kind == PropertyKind::Formula => None,
            Some(actual) if actual != prop.kind.as_notion_type() => Some(format!(
                "{} (tipo esperado: {}, atual: {})",
                prop.name,
                prop.kind.as_notion_type(),
                actual
            )),
            Some(_) => None,
        })
        .collect()
}

pub async fn run_health_check(settings: &Settings, data: Option<&NotionDataLayer>) -> HealthReport {
    log_health_check();
    let mut checks = Vec::new();

    match data {
        Some(_) => checks.push(HealthCheck::ok("ENV: NOTION_TOKEN", "Token configurado")),
        None => checks.push(HealthCheck::error(
            "ENV: NOTION_TOKEN",
            "NOTION_TOKEN not configured",
        )),
    }

    for database in required_databases() {
        let name = database.name();
        let env_var = database.env_var();

        let Some(db_id) = settings.notion.databases.get(database) else {
            checks.push(HealthCheck::warning(
                format!("ENV: {}", env_var),
                "Variável não configurada",
            ));
            continue;
        };

        let prefix: String = db_id.chars().take(8).collect();
        checks.push(HealthCheck::ok(
            format!("ENV: {}", env_var),
            format!("Configurado ({}...)", prefix),
        ));

        let Some(layer) = data else {
            checks.push(HealthCheck::error(
                format!("DB: {}", name),
                "NOTION_TOKEN not configured",
            ));
            continue;
        };

        let db = match layer.client().retrieve_database(db_id).await {
            Ok(db) => db,
            Err(e) => {
                checks.push(HealthCheck::error(format!("DB: {}", name), access_error_message(&e)));
                continue;
            }
        };

        let title = db.title_text();
        let title = if title.is_empty() { "Sem título".to_string() } else { title };
        checks.push(HealthCheck::ok(
            format!("DB: {}", name),
            format!("Acessível: \"{}\"", title),
        ));

        let problems = schema_problems(database, &db);
        if problems.is_empty() {
            checks.push(HealthCheck::ok(
                format!("Schema: {}", name),
                "Todas as propriedades obrigatórias presentes",
            ));
        } else {
            checks.push(HealthCheck::warning(
                format!("Schema: {}", name),
                format!("Propriedades faltando ou incorretas: {}", problems.join(", ")),
            ));
        }

        let query = DatabaseQuery::new().page_size(1);
        match layer.client().query_database(db_id, &query).await {
            Ok(result) => checks.push(HealthCheck::ok(
                format!("Query: {}", name),
                format!("Query testada com sucesso ({} resultado(s))", result.results.len()),
            )),
            Err(e) => checks.push(HealthCheck::warning(
                format!("Query: {}", name),
                format!("Erro ao testar query: {}", e),
            )),
        }
    }

    HealthReport::new(now_iso(), checks)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn test_result(name: &str, passed: bool, start: Instant, error: Option<String>) -> SelfTest {
    SelfTest {
        name: name.to_string(),
        passed,
        duration: elapsed_ms(start),
        error,
    }
}

fn dry_run_result(name: &str, message: &str) -> SelfTest {
    SelfTest {
        name: name.to_string(),
        passed: true,
        duration: 0,
        error: Some(message.to_string()),
    }
}

fn failed(name: &str, error: impl ToString) -> SelfTest {
    SelfTest {
        name: name.to_string(),
        passed: false,
        duration: 0,
        error: Some(error.to_string()),
    }
}

/// T1: variáveis obrigatórias
fn check_env_vars(settings: &Settings, dry_run: bool) -> SelfTest {
    let start = Instant::now();

    let mut missing = Vec::new();
    if settings.notion_token().is_none() {
        missing.push("NOTION_TOKEN");
    }
    missing.extend(
        required_databases()
            .filter(|db| settings.notion.databases.get(*db).is_none())
            .map(|db| db.env_var()),
    );

    let error = (!missing.is_empty() && !dry_run).then(|| format!("Faltando: {}", missing.join(", ")));
    test_result(T1, missing.is_empty() || dry_run, start, error)
}

/// T2: database de KPIs acessível
async fn check_kpis_database(layer: &NotionDataLayer) -> SelfTest {
    let start = Instant::now();
    let Some(db_id) = layer.database_ids().get(NotionDatabase::Kpis) else {
        return test_result(T2, false, start, Some("NOTION_DB_KPIS não configurado".to_string()));
    };

    match layer.client().retrieve_database(db_id).await {
        Ok(_) => test_result(T2, true, start, None),
        Err(e) => failed(T2, format!("Database KPIs: {}", e)),
    }
}

/// T3: nenhum KPI financeiro na lista pública
async fn check_financial_kpis(layer: &NotionDataLayer, tests: &mut Vec<SelfTest>) {
    let start = Instant::now();

    let (public, admin) = match (layer.get_kpis_public().await, layer.get_kpis_admin().await) {
        (Ok(public), Ok(admin)) => (public, admin),
        (Err(e), _) | (_, Err(e)) => {
            tests.push(failed("T3: KPI financeiro", e));
            return;
        }
    };

    let flagged = admin.iter().filter(|k| k.is_financial && k.visible_public).count();

    if public.iter().any(|k| k.is_financial) {
        tests.push(test_result(
            T3,
            false,
            start,
            Some("KPIs financeiros encontrados na lista pública!".to_string()),
        ));
    } else if flagged > 0 {
        tests.push(test_result(
            T3,
            true,
            start,
            Some(format!(
                "Atenção: {} KPI(s) financeiro(s) marcado(s) como VisiblePublic, mas corretamente filtrado(s)",
                flagged
            )),
        ));
    } else {
        tests.push(test_result(T3, true, start, None));
    }

    if let Err(e) = guards::assert_no_financial_kpis(&public) {
        tests.push(failed(T3_GUARD, e));
    }
}

/// T4: ação sem meta não pode ser concluída
async fn check_action_without_goal(layer: &NotionDataLayer) -> SelfTest {
    let start = Instant::now();

    let actions = match layer.get_actions(None).await {
        Ok(actions) => actions,
        Err(e) => return failed("T4: Action sem Goal", e),
    };

    let Some(action) = actions.iter().find(|a| a.goal.trim().is_empty()) else {
        return test_result(
            T4,
            true,
            start,
            Some("Nenhuma ação sem Goal encontrada para testar".to_string()),
        );
    };

    match layer.ensure_action_has_goal(&action.id).await {
        Ok(check) if check.allowed => test_result(
            T4,
            false,
            start,
            Some(format!("Ação \"{}\" sem Goal pode ser concluída!", action.name)),
        ),
        Ok(check) => test_result(
            T4,
            true,
            start,
            Some(format!(
                "Ação sem Goal corretamente bloqueada: {}",
                check.reason.unwrap_or_default()
            )),
        ),
        Err(e) => failed("T4: Action sem Goal", e),
    }
}

/// T5: estado de lock do journal de ontem
async fn check_yesterday_journal(layer: &NotionDataLayer) -> SelfTest {
    let start = Instant::now();
    let yesterday = format_iso(yesterday_utc());

    let journal = match layer.get_journal_by_date(&yesterday).await {
        Ok(journal) => journal,
        Err(e) => return failed("T5: Journal de ontem", e),
    };

    let check = JournalCheck::from_journal(journal.as_ref());
    let message = if !check.exists {
        format!("Journal de {} não existe (LOCKED=true esperado)", yesterday)
    } else if !check.filled {
        format!(
            "Journal de {} existe mas não está preenchido (LOCKED=true esperado)",
            yesterday
        )
    } else {
        format!("Journal de {} está preenchido (LOCKED=false)", yesterday)
    };

    test_result(T5, true, start, Some(message))
}

pub async fn run_self_test(settings: &Settings, data: Option<&NotionDataLayer>) -> SelfTestReport {
    let dry_run = data.is_none();
    let mut tests = vec![check_env_vars(settings, dry_run)];

    match data {
        None => {
            tests.push(dry_run_result(T2, "Dry-run mode (sem NOTION_TOKEN)"));
            tests.push(dry_run_result(T3, "Dry-run mode"));
            tests.push(dry_run_result(T4, "Dry-run mode"));
            tests.push(dry_run_result(T5, "Dry-run mode"));
        }
        Some(layer) => {
            tests.push(check_kpis_database(layer).await);
            check_financial_kpis(layer, &mut tests).await;
            tests.push(check_action_without_goal(layer).await);
            tests.push(check_yesterday_journal(layer).await);
        }
    }

    SelfTestReport::new(now_iso(), tests, dry_run)
}
