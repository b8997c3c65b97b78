//! Configuration management for Buongiorno.
//!
//! Configuration is loaded from a TOML file (optional) and then overridden by
//! the process environment. All config structs implement `Default` with the
//! values the service ships with.

mod env;
mod types;
mod validate;

pub use env::split_chat_ids;
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure. Read-only for the duration of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini / Imagen settings
    pub gemini: GeminiConfig,

    /// Prompt template
    pub prompt: PromptConfig,

    /// Telegram delivery settings
    pub telegram: TelegramConfig,

    /// Retry and timeout behaviour
    pub pipeline: PipelineConfig,

    /// HTTP trigger settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location, then apply environment
    /// overrides.
    ///
    /// Falls back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file(None)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply environment
    /// overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(Some(path))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load only the file layer: `path` if given, otherwise the default
    /// location (or defaults when no file exists there). No environment
    /// overrides are applied.
    pub fn load_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::parse_file(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::parse_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let content = std::fs::read_to_string(expanded)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string (no environment overrides).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.buongiorno.buongiorno/config.toml
    /// - Linux: ~/.config/buongiorno/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\buongiorno\config\config.toml
    ///
    /// Falls back to ~/.buongiorno/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "buongiorno", "buongiorno")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".buongiorno").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// A copy safe to print: literal secrets are masked, `${VAR}` references
    /// are kept as written.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.gemini.api_key = redact(&config.gemini.api_key);
        config.telegram.bot_token = redact(&config.telegram.bot_token);
        config
    }
}

fn redact(secret: &str) -> String {
    if secret.is_empty() || (secret.starts_with("${") && secret.ends_with('}')) {
        secret.to_string()
    } else {
        REDACTED.to_string()
    }
}

const REDACTED: &str = "********";

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
