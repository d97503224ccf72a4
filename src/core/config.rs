//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.readnext/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Backend;
use crate::core::state::Tab;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReadnextConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub backend: Option<String>,
    pub data_file: Option<String>,
    pub default_tab: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DATA_FILE: &str = "books.json";
pub const DEFAULT_TABLE: &str = "books";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: Backend,
    pub data_file: PathBuf,
    pub default_tab: Tab,
    pub remote_url: Option<String>,
    pub remote_api_key: Option<String>,
    pub remote_table: String,
}

/// Flags from the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub backend: Option<Backend>,
    pub data_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.readnext/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".readnext"))
}

/// Returns the path to `~/.readnext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.readnext/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ReadnextConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ReadnextConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ReadnextConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ReadnextConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<ReadnextConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ReadnextConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# readnext configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# backend = "local"                  # "local" (JSON file) or "remote" (REST table)
# data_file = "books.json"           # Relative paths resolve against ~/.readnext/
# default_tab = "high-priority"      # "high-priority" or "all"

# [remote]
# url = "https://xyzcompany.supabase.co"   # Or set SUPABASE_URL
# api_key = "eyJ..."                       # Or set SUPABASE_ANON_KEY
# table = "books"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
}

/// Relative data file paths live under `~/.readnext/`.
fn resolve_data_file(raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    config_dir().map(|d| d.join(&path)).unwrap_or(path)
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ReadnextConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Backend: CLI → env → config → default
    let backend = cli
        .backend
        .or_else(|| env_any(&["READNEXT_BACKEND"]).and_then(|s| Backend::from_name(&s)))
        .or_else(|| {
            config
                .general
                .backend
                .as_deref()
                .and_then(Backend::from_name)
        })
        .unwrap_or_default();

    // Data file: CLI → env → config → default
    let data_file = cli.data_file.clone().unwrap_or_else(|| {
        let raw = env_any(&["READNEXT_DATA_FILE"])
            .or_else(|| config.general.data_file.clone())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        resolve_data_file(&raw)
    });

    let default_tab = match config.general.default_tab.as_deref() {
        Some(name) => Tab::from_name(name).unwrap_or_else(|| {
            warn!("Unknown default_tab '{}', using high-priority", name);
            Tab::default()
        }),
        None => Tab::default(),
    };

    // Remote URL and key: env → config
    let remote_url = env_any(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"])
        .or_else(|| config.remote.url.clone());
    let remote_api_key = env_any(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"])
        .or_else(|| config.remote.api_key.clone());

    // Table: env → config → default
    let remote_table = env_any(&["READNEXT_TABLE"])
        .or_else(|| config.remote.table.clone())
        .unwrap_or_else(|| DEFAULT_TABLE.to_string());

    ResolvedConfig {
        backend,
        data_file,
        default_tab,
        remote_url,
        remote_api_key,
        remote_table,
    }
}
