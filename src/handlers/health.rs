use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::{HealthReport, SelfTestReport};
use crate::services::diagnostics::{run_health_check, run_self_test};
use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /api/admin/health
pub async fn admin_health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    log_request_received("/api/admin/health", "GET");
    let report = run_health_check(&state.settings, state.data.as_deref()).await;
    log_info(&format!(
        "🩺 Health check: {:?} ({} verificações)",
        report.status,
        report.checks.len()
    ));
    Json(report)
}

/// GET /api/__selftest
pub async fn self_test(State(state): State<Arc<AppState>>) -> Json<SelfTestReport> {
    log_request_received("/api/__selftest", "GET");
    let report = run_self_test(&state.settings, state.data.as_deref()).await;
    if report.passed {
        log_info(&format!("✅ Self-test: {} testes passaram", report.tests.len()));
    } else {
        let failed = report.tests.iter().filter(|t| !t.passed).count();
        log_warning(&format!("⚠️ Self-test: {} teste(s) falharam", failed));
    }
    Json(report)
}
