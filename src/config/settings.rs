use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

use crate::config::schema::NotionDatabase;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub notion: NotionSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub static_files: StaticSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    /// `development` | `production` (RUST_ENV)
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotionSettings {
    pub token: Option<String>,
    pub base_url: String,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    #[serde(default)]
    pub databases: DatabaseIds,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            token: None,
            base_url: notion::client::DEFAULT_BASE_URL.to_string(),
            retry_max_attempts: 3,
            retry_base_delay_ms: 1000,
            databases: DatabaseIds::default(),
        }
    }
}

/// IDs dos databases do Notion (cada um opcional até ser usado)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseIds {
    pub kpis: Option<String>,
    pub goals: Option<String>,
    pub actions: Option<String>,
    pub journal: Option<String>,
    pub contacts: Option<String>,
    pub clients: Option<String>,
    pub crm_pipeline: Option<String>,
    pub produtos: Option<String>,
    pub coffee_diagnostics: Option<String>,
    pub customer_wins: Option<String>,
    pub expansion_opportunities: Option<String>,
    pub lead_gate: Option<String>,
    pub axis_leads: Option<String>,
}

impl DatabaseIds {
    /// ID configurado (ignora valores em branco)
    pub fn get(&self, database: NotionDatabase) -> Option<&str> {
        let value = match database {
            NotionDatabase::Kpis => &self.kpis,
            NotionDatabase::Goals => &self.goals,
            NotionDatabase::Actions => &self.actions,
            NotionDatabase::Journal => &self.journal,
            NotionDatabase::Contacts => &self.contacts,
            NotionDatabase::Clients => &self.clients,
            NotionDatabase::CrmPipeline => &self.crm_pipeline,
            NotionDatabase::Produtos => &self.produtos,
            NotionDatabase::CoffeeDiagnostics => &self.coffee_diagnostics,
            NotionDatabase::CustomerWins => &self.customer_wins,
            NotionDatabase::ExpansionOpportunities => &self.expansion_opportunities,
            NotionDatabase::LeadGate => &self.lead_gate,
            NotionDatabase::AxisLeads => &self.axis_leads,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, database: NotionDatabase, id: impl Into<String>) {
        let slot = match database {
            NotionDatabase::Kpis => &mut self.kpis,
            NotionDatabase::Goals => &mut self.goals,
            NotionDatabase::Actions => &mut self.actions,
            NotionDatabase::Journal => &mut self.journal,
            NotionDatabase::Contacts => &mut self.contacts,
            NotionDatabase::Clients => &mut self.clients,
            NotionDatabase::CrmPipeline => &mut self.crm_pipeline,
            NotionDatabase::Produtos => &mut self.produtos,
            NotionDatabase::CoffeeDiagnostics => &mut self.coffee_diagnostics,
            NotionDatabase::CustomerWins => &mut self.customer_wins,
            NotionDatabase::ExpansionOpportunities => &mut self.expansion_opportunities,
            NotionDatabase::LeadGate => &mut self.lead_gate,
            NotionDatabase::AxisLeads => &mut self.axis_leads,
        };
        *slot = Some(id.into());
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AdminSettings {
    pub passcode: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StaticSettings {
    pub dist_dir: String,
    pub public_dir: String,
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self {
            dist_dir: "dist".to_string(),
            public_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CorsSettings {
    /// Origem aceita em desenvolvimento (default: Vite em localhost:8080)
    pub origin: Option<String>,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            notion: NotionSettings::default(),
            admin: AdminSettings::default(),
            static_files: StaticSettings::default(),
            cors: CorsSettings::default(),
            environment: default_environment(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("notion.base_url", notion::client::DEFAULT_BASE_URL)?
            .set_default("notion.retry_max_attempts", 3)?
            .set_default("notion.retry_base_delay_ms", 1000)?
            .set_default("static_files.dist_dir", "dist")?
            .set_default("static_files.public_dir", "public")?
            .set_default("environment", "development")?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente específicas
        let token = env_non_empty("NOTION_TOKEN").or_else(|| env_non_empty("NOTION_API_KEY"));
        builder = builder.set_override_option("notion.token", token)?;

        for database in NotionDatabase::ALL {
            let key = format!("notion.databases.{}", database.settings_key());
            builder = builder.set_override_option(key, env_non_empty(database.env_var()))?;
        }

        builder = builder
            .set_override_option("admin.passcode", env_non_empty("ADMIN_PASSCODE"))?
            .set_override_option("environment", env_non_empty("RUST_ENV"))?
            .set_override_option("server.host", env_non_empty("HOST"))?
            .set_override_option("static_files.dist_dir", env_non_empty("STATIC_DIST_DIR"))?
            .set_override_option("static_files.public_dir", env_non_empty("STATIC_PUBLIC_DIR"))?
            .set_override_option("cors.origin", env_non_empty("CORS_ORIGIN"))?;

        if let Some(port) = env_non_empty("PORT").and_then(|p| p.parse::<u16>().ok()) {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        // FRTECH__NOTION__BASE_URL etc.
        builder = builder.add_source(Environment::with_prefix("FRTECH").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn notion_token(&self) -> Option<&str> {
        self.notion
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn admin_passcode(&self) -> Option<&str> {
        self.admin
            .passcode
            .as_deref()
            .filter(|p| !p.is_empty())
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
