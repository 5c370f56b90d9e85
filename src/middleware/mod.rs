/// Middleware layer para o Axum router
///
/// - Autenticação das rotas administrativas (`X-Admin-Passcode`)

pub mod admin_auth;

pub use admin_auth::{require_admin_passcode, ADMIN_PASSCODE_HEADER};
