//! Shared types and static configuration for the cjenik price search.
//!
//! Holds the per-chain schema catalog, the canonical field keys every
//! source is normalized to, the output record model, and the
//! environment-driven application configuration.

pub mod app_config;
pub mod chains;
pub mod config;
pub mod error;
pub mod fields;
pub mod records;

pub use app_config::AppConfig;
pub use chains::{builtin_chains, load_chains, ChainsFile, FieldTargets, SourceSchema};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use fields::CanonicalField;
pub use records::{
    Diagnostic, DiagnosticKind, MatchRecord, MatchedTerm, SearchOutcome, SourceStage,
};
