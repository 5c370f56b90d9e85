//! Tipos do health check (`/api/admin/health`) e do self-test (`/api/__selftest`)

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

impl HealthCheck {
    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Ok, message)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warning, message)
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Error, message)
    }

    fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: CheckStatus,
    pub timestamp: String,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    /// Status agregado: error > warning > ok
    pub fn new(timestamp: String, checks: Vec<HealthCheck>) -> Self {
        let status = checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(CheckStatus::Ok);
        Self {
            status,
            timestamp,
            checks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfTest {
    pub name: String,
    pub passed: bool,
    /// Milissegundos
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfTestReport {
    pub passed: bool,
    pub timestamp: String,
    pub tests: Vec<SelfTest>,
    pub dry_run: bool,
}

impl SelfTestReport {
    pub fn new(timestamp: String, tests: Vec<SelfTest>, dry_run: bool) -> Self {
        Self {
            passed: tests.iter().all(|t| t.passed),
            timestamp,
            tests,
            dry_run,
        }
    }
}
