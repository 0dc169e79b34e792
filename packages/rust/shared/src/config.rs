//! Application configuration for CatalogBridge.
//!
//! User config lives at `~/.catalogbridge/catalogbridge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "catalogbridge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".catalogbridge";

// ---------------------------------------------------------------------------
// Config structs (matching catalogbridge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content reader settings.
    #[serde(default)]
    pub reader: ReaderConfig,

    /// Record parser settings.
    #[serde(default)]
    pub parser: ParserConfig,
}

/// `[reader]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of HTTP redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Largest response body accepted, in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}
fn default_max_response_bytes() -> u64 {
    10 * 1024 * 1024
}

/// `[parser]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Content format of fetched documents. Only `"json"` is built in.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "json".into()
}

// ---------------------------------------------------------------------------
// Reader options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime reader configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub max_response_bytes: u64,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ReaderOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.reader.timeout_secs,
            max_redirects: config.reader.max_redirects,
            max_response_bytes: config.reader.max_response_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.catalogbridge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BridgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.catalogbridge/catalogbridge.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| BridgeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        BridgeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BridgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BridgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BridgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject settings the reader and parser cannot honour.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.reader.timeout_secs == 0 {
        return Err(BridgeError::config("reader.timeout_secs must be greater than 0"));
    }
    if config.parser.format != "json" {
        return Err(BridgeError::config(format!(
            "unsupported parser.format {:?} (supported: \"json\")",
            config.parser.format
        )));
    }
    Ok(())
}
