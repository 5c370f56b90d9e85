use tracing::{debug, error, info, warn};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_notion_api_error(operation: &str, status: Option<u16>, error: &str) {
    error!("Notion API error: {} - Status: {:?} - Error: {}", operation, status, error);
}

pub fn log_notion_page_created(database: &str, page_id: &str) {
    info!("✅ Página criada no Notion: {} - Database: {}", page_id, database);
}

pub fn log_notion_page_updated(page_id: &str, what: &str) {
    info!("✏️ Página atualizada no Notion: {} - {}", page_id, what);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 FR Tech OS server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
    info!("💡 Health check: http://localhost:{}/api/health", port);
    info!("💡 Admin health: http://localhost:{}/api/admin/health", port);
    info!("💡 Self test: http://localhost:{}/api/__selftest", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
