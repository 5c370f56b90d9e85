/// FR Tech OS - servidor HTTP
///
/// - Rotas /api/* sobre os databases do Notion (KPIs, metas, ações, diário, CRM)
/// - Rotas admin protegidas por X-Admin-Passcode
/// - SPA pré-compilado servido de `dist/` (fallback para index.html)

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use frtech_os::config::{log_env_validation, Settings};
use frtech_os::router::build_router;
use frtech_os::utils::{logging::*, AppError};
use frtech_os::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        // Em produção não existe .env - variáveis vêm do ambiente
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;
    log_config_loaded(&settings.environment);

    // Variáveis faltando não impedem o boot; só geram avisos
    let validation = log_env_validation(&settings);
    if !validation.valid {
        log_warning("⚠️ Servidor iniciando com configuração incompleta. Veja /api/admin/health");
    }

    let state = Arc::new(AppState::new(settings.clone())?);
    if state.data.is_none() {
        log_warning("⚠️ NOTION_TOKEN não configurado: rotas de dados responderão erro de configuração");
    }

    let app = build_router(state);

    let port = settings.server.port;
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;
    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("failed to install signal handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
