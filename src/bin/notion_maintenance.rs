use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use frtech_os::config::{validate_env, NotionDatabase, Settings};
use frtech_os::services::maintenance::{
    apply_kpi_dedup, bulk_create_pages, parse_bulk_records, plan_kpi_dedup, rename_property,
    DEFAULT_BULK_PAUSE, DEFAULT_DEDUP_PAUSE,
};
use frtech_os::services::NotionDataLayer;

/// Manutenção dos databases do Notion do FR Tech OS
#[derive(Parser)]
#[command(name = "notion-maintenance")]
#[command(version)]
#[command(about = "Manutenção dos databases do Notion (validação, deduplicação, renomear propriedades, carga em lote)", long_about = None)]
struct Cli {
    /// Modo verbose para debug
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Valida as variáveis de ambiente (token e IDs dos databases)
    ValidateEnv,

    /// Lista KPIs duplicados por nome; com --apply arquiva os excedentes
    DedupeKpis {
        /// Arquiva de fato (sem isso só mostra o plano)
        #[arg(long)]
        apply: bool,

        /// Pausa entre arquivamentos, em milissegundos
        #[arg(long, default_value_t = DEFAULT_DEDUP_PAUSE.as_millis() as u64)]
        pause_ms: u64,
    },

    /// Renomeia uma propriedade de um database
    RenameProperty {
        /// Nome do schema (KPIs, Goals, CRMPipeline, ...) ou ID do database
        database: String,
        /// Nome atual da propriedade
        old: String,
        /// Novo nome
        new: String,
    },

    /// Cria registros em lote a partir de um arquivo JSON (array de mapas de propriedades)
    BulkCreate {
        /// Nome do schema (KPIs, Goals, Actions, ...) ou ID do database
        database: String,
        /// Arquivo JSON com os registros
        file: PathBuf,

        /// Pausa entre criações, em milissegundos
        #[arg(long, default_value_t = DEFAULT_BULK_PAUSE.as_millis() as u64)]
        pause_ms: u64,
    },
}

fn layer(settings: &Settings) -> anyhow::Result<NotionDataLayer> {
    NotionDataLayer::from_settings(settings)?
        .context("NOTION_TOKEN não configurado")
}

/// Aceita o nome do schema (via variável configurada) ou um ID cru
fn resolve_database_id(settings: &Settings, database: &str) -> anyhow::Result<String> {
    match NotionDatabase::from_name(database) {
        Some(db) => settings
            .notion
            .databases
            .get(db)
            .map(str::to_string)
            .with_context(|| format!("{} not configured", db.env_var())),
        None => Ok(database.trim().to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    match cli.command {
        Commands::ValidateEnv => {
            let result = validate_env(&settings);
            for var in &result.missing {
                println!("❌ {}", var);
            }
            for warning in &result.warnings {
                println!("⚠️  {}", warning);
            }
            if !result.valid {
                bail!("{} variável(is) obrigatória(s) faltando", result.missing.len());
            }
            println!("✅ Configuração válida");
        }

        Commands::DedupeKpis { apply, pause_ms } => {
            let layer = layer(&settings)?;
            let kpis = layer.get_all_kpis().await?;
            let plan = plan_kpi_dedup(&kpis);

            println!("📊 {} KPIs, {} grupo(s) duplicado(s)", kpis.len(), plan.len());
            for group in &plan {
                println!(
                    "  \"{}\": mantém {} (SortOrder {}), remove {}",
                    group.key,
                    group.keep.id,
                    group.keep.sort_order,
                    group
                        .remove
                        .iter()
                        .map(|k| k.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }

            if plan.is_empty() {
                println!("✅ Nenhum duplicado encontrado");
            } else if apply {
                let outcome = apply_kpi_dedup(&layer, &plan, Duration::from_millis(pause_ms)).await;
                println!("🗑️  {} arquivado(s), {} com erro", outcome.archived, outcome.failed);
                if outcome.failed > 0 {
                    bail!("{} KPI(s) não puderam ser arquivados", outcome.failed);
                }
            } else {
                println!("ℹ️  Rode com --apply para arquivar");
            }
        }

        Commands::RenameProperty { database, old, new } => {
            let layer = layer(&settings)?;
            let database_id = resolve_database_id(&settings, &database)?;
            let info = rename_property(&layer, &database_id, &old, &new).await?;
            println!("✅ \"{}\": {} -> {}", info.title, old, new);
        }

        Commands::BulkCreate { database, file, pause_ms } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Não foi possível ler {}", file.display()))?;
            let records = parse_bulk_records(&raw)?;

            let layer = layer(&settings)?;
            let database_id = resolve_database_id(&settings, &database)?;
            println!("📦 {} registro(s) para {}", records.len(), database_id);

            let outcome =
                bulk_create_pages(&layer, &database_id, &records, Duration::from_millis(pause_ms)).await;
            println!("✅ {} criado(s), {} com erro", outcome.created.len(), outcome.failed);
            if outcome.failed > 0 {
                bail!("{} registro(s) não puderam ser criados", outcome.failed);
            }
        }
    }

    Ok(())
}
