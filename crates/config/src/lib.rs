//! Bridge configuration: loading, `${ENV_VAR}` substitution, and validation.
//!
//! The config file is `config.yaml` by default. JSON and TOML are accepted
//! when the file extension says so. Keys follow the camelCase layout of the
//! puppet bridge's own config file.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{load_config, parse_config},
    schema::{BridgeConfig, BridgeSection, LoggingConfig, PresenceConfig, ProvisioningConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
