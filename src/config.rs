//! Configuration loading and validation.
//!
//! Loads `config.toml` from `--config`, `$LEADHUNTER_CONFIG`, or
//! `~/.leadhunter/config.toml`. Every section has defaults, so a missing or
//! empty file is valid.
//!
//! Precedence: env vars > config file > defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::model::default_pain_points;

/// Role name used for discovery calls.
pub const ROLE_DISCOVERY: &str = "discovery";

/// Role name used for outreach drafting calls.
pub const ROLE_OUTREACH: &str = "outreach";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model routing configuration.
    pub models: ModelsConfig,

    /// Sender identity used in outreach drafts.
    pub persona: PersonaConfig,

    /// Search form defaults.
    pub search: SearchConfig,

    /// Shared-passphrase access gate.
    pub access: AccessConfig,

    /// Spreadsheet export settings.
    pub export: ExportConfig,
}

/// Model routing: default model and per-role overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Default model identifier (e.g. "gemini/gemini-2.5-flash").
    pub default: String,

    /// Per-role model overrides (`discovery`, `outreach`).
    pub roles: HashMap<String, String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Base URL for `ollama/...` models.
    pub ollama_url: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            roles: HashMap::from([(
                ROLE_OUTREACH.to_owned(),
                "gemini/gemini-3-flash-preview".to_owned(),
            )]),
            request_timeout_secs: 60,
            ollama_url: crate::providers::ollama::DEFAULT_OLLAMA_URL.to_owned(),
        }
    }
}

/// Sender persona for outreach drafts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Sender's full name.
    pub sender_name: String,

    /// Sender's title.
    pub sender_title: String,

    /// Agency name.
    pub agency: String,

    /// Office locations listed in the signature.
    pub offices: Vec<String>,

    /// What the agency sells.
    pub offer: String,

    /// Language drafts are written in.
    pub language: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            sender_name: "Jairo Segura".to_owned(),
            sender_title: "CEO".to_owned(),
            agency: "JGroupTech Agency".to_owned(),
            offices: vec![
                "Dubai".to_owned(),
                "Miami".to_owned(),
                "Bogotá".to_owned(),
                "La Paz".to_owned(),
            ],
            offer: "AI agents that answer customers 24/7".to_owned(),
            language: "Spanish".to_owned(),
        }
    }
}

/// Search defaults and discovery tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Initially selected country.
    pub country: String,

    /// Initially selected city.
    pub city: String,

    /// Initially selected industry category.
    pub category: String,

    /// Pain-point vocabulary sent with each search.
    pub pain_points: Vec<String>,

    /// How many businesses discovery asks for.
    pub prospect_count: u8,

    /// Minimum number of reviews a business must have.
    pub min_review_count: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country: crate::catalog::DEFAULT_COUNTRY.to_owned(),
            city: crate::catalog::DEFAULT_CITY.to_owned(),
            category: crate::catalog::DEFAULT_CATEGORY.to_owned(),
            pain_points: default_pain_points(),
            prospect_count: 10,
            min_review_count: 10,
        }
    }
}

/// Access gate configuration.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Shared passphrase. `None` leaves the gate open.
    pub passphrase: Option<String>,
}

impl std::fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessConfig")
            .field(
                "passphrase",
                &self.passphrase.as_ref().map(|_| "__REDACTED__"),
            )
            .finish()
    }
}

/// Export configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported files land in. Defaults to the working directory.
    pub directory: Option<PathBuf>,
}

fn default_model() -> String {
    "gemini/gemini-2.5-flash".to_owned()
}

impl Config {
    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests never touch the process env.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("LEADHUNTER_DEFAULT_MODEL") {
            self.models.default = v;
        }
        if let Some(v) = env("LEADHUNTER_OLLAMA_URL") {
            self.models.ollama_url = v;
        }
        if let Some(v) = env("LEADHUNTER_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.models.request_timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "LEADHUNTER_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("LEADHUNTER_PASSPHRASE") {
            self.access.passphrase = Some(v);
        }
    }
}

/// Every model spec referenced by the config (default first, deduplicated).
pub fn all_model_specs(models: &ModelsConfig) -> Vec<String> {
    let mut specs = vec![models.default.clone()];
    let mut roles: Vec<&String> = models.roles.values().collect();
    roles.sort();
    for spec in roles {
        if !specs.contains(spec) {
            specs.push(spec.clone());
        }
    }
    specs
}

/// Load the config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load the config if present, falling back to defaults when the file is
/// missing, then apply process env overrides.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::info!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            Config::default()
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            ))
        }
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Resolve the default config directory (`~/.leadhunter/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".leadhunter"))
}

/// Resolve the config file path using a custom env resolver.
///
/// `$LEADHUNTER_CONFIG` wins, then `<config_dir>/config.toml`.
///
/// # Errors
///
/// Returns an error if no env override is set and the home directory cannot
/// be determined.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    if let Some(p) = env("LEADHUNTER_CONFIG") {
        return Ok(PathBuf::from(p));
    }
    Ok(config_dir()?.join("config.toml"))
}
