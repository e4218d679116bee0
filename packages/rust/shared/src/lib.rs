//! Shared types, error model, and configuration for CaseScout.
//!
//! This crate is the foundation depended on by all other CaseScout crates.
//! It provides:
//! - [`CaseScoutError`] — the unified error type
//! - Domain types ([`CompanyInfo`], [`IndustryInfo`], [`DatasetIndex`], [`RunId`])
//! - Configuration ([`AppConfig`], [`ResearchOptions`], config loading)
//! - The operator-facing [`RunReporter`] seam

pub mod config;
pub mod error;
pub mod report;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, GeminiConfig, ResearchConfig, ResearchOptions, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{CaseScoutError, Result};
pub use report::{RunReporter, SilentReporter};
pub use types::{CompanyInfo, DatasetEntry, DatasetIndex, IndustryInfo, NO_DATASET, RunId};
