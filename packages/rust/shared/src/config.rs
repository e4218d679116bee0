//! Application configuration for CaseScout.
//!
//! User config lives at `~/.casescout/casescout.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CaseScoutError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "casescout.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".casescout";

// ---------------------------------------------------------------------------
// Config structs (matching casescout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Gemini settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Web research settings.
    #[serde(default)]
    pub research: ResearchConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default directory for proposal/resource artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Results requested per company/industry search.
    #[serde(default = "default_search_results")]
    pub search_results: u32,

    /// Search region/language code.
    #[serde(default = "default_search_region")]
    pub search_region: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            search_results: default_search_results(),
            search_region: default_search_region(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_search_results() -> u32 {
    2
}
fn default_search_region() -> String {
    "en".into()
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for research fallback and use-case refinement.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, overridable for self-hosted proxies and tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_model() -> String {
    "gemini-1.5-pro".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_gemini_timeout() -> u64 {
    30
}

/// `[research]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Timeout in seconds for plain HTTP fetches.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout in seconds for the browser-rendering fetch.
    #[serde(default = "default_render_timeout")]
    pub render_timeout_secs: u64,

    /// Headless browser binary for rendered fetches. When unset, company
    /// pages are fetched with a plain HTTP GET instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_cmd: Option<String>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            render_timeout_secs: default_render_timeout(),
            browser_cmd: None,
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_render_timeout() -> u64 {
    60
}

// ---------------------------------------------------------------------------
// Research options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime research configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ResearchOptions {
    /// Results requested per company/industry search.
    pub search_results: usize,
    /// Search region/language code.
    pub search_region: String,
    /// Timeout in seconds for plain HTTP fetches.
    pub http_timeout_secs: u64,
    /// Timeout in seconds for the browser-rendering fetch.
    pub render_timeout_secs: u64,
    /// Headless browser binary, if rendered fetches are wanted.
    pub browser_cmd: Option<String>,
}

impl From<&AppConfig> for ResearchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            search_results: config.defaults.search_results as usize,
            search_region: config.defaults.search_region.clone(),
            http_timeout_secs: config.research.http_timeout_secs,
            render_timeout_secs: config.research.render_timeout_secs,
            browser_cmd: config.research.browser_cmd.clone(),
        }
    }
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.casescout/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CaseScoutError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.casescout/casescout.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CaseScoutError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CaseScoutError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CaseScoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CaseScoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CaseScoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the Gemini API key env var is set and non-empty.
///
/// Advisory: the pipeline runs in degraded mode without a key, so callers
/// report this as a notice rather than aborting.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.gemini.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(CaseScoutError::config(format!(
            "Gemini API key not found. Set the {var_name} environment variable.\n\
             Get a key at https://aistudio.google.com/app/apikey"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("gemini-1.5-pro"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.search_results, 2);
        assert_eq!(parsed.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(parsed.research.render_timeout_secs, 60);
    }

    #[test]
    fn config_with_overrides() {
        let toml_str = r#"
[defaults]
output_dir = "/tmp/proposals"

[gemini]
model = "gemini-1.5-flash"

[research]
browser_cmd = "/usr/bin/chromium"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.output_dir, "/tmp/proposals");
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.research.browser_cmd.as_deref(), Some("/usr/bin/chromium"));
        // Untouched sections keep their defaults.
        assert_eq!(config.defaults.search_region, "en");
    }

    #[test]
    fn research_options_from_app_config() {
        let app = AppConfig::default();
        let opts = ResearchOptions::from(&app);
        assert_eq!(opts.search_results, 2);
        assert_eq!(opts.http_timeout_secs, 30);
        assert_eq!(opts.render_timeout_secs, 60);
        assert!(opts.browser_cmd.is_none());
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.gemini.api_key_env = "CS_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
