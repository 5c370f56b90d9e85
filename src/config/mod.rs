pub mod env_validator;
pub mod schema;
pub mod settings;

pub use env_validator::{log_env_validation, validate_env, EnvValidation};
pub use schema::{NotionDatabase, PropertyKind};
pub use settings::{DatabaseIds, Settings};
