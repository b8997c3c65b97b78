//! Environment variable overrides.
//!
//! The deployed service is configured entirely through the environment, so
//! every setting that matters at runtime has a variable that wins over the
//! config file. Empty variables are ignored and leave the file/default value.

use crate::error::ConfigError;

use super::{Config, RunMode};

pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_IDS: &str = "TELEGRAM_CHAT_IDS";
pub const TELEGRAM_ADMIN_CHAT_ID: &str = "TELEGRAM_ADMIN_CHAT_ID";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const INITIAL_PROMPT: &str = "INITIAL_PROMPT";
pub const TEXT_MODEL_ID: &str = "TEXT_MODEL_ID";
pub const IMAGE_MODEL_ID: &str = "IMAGE_MODEL_ID";
pub const MESSAGE_CAPTION: &str = "MESSAGE_CAPTION";
pub const RUN_MODE: &str = "RUN_MODE";
pub const PORT: &str = "PORT";

/// Split a comma-separated chat id list, trimming each entry.
///
/// Empty entries are kept: they fail to parse at delivery time and are
/// reported as a skipped destination rather than silently dropped.
pub fn split_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',').map(|id| id.trim().to_string()).collect()
}

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// An invalid `PORT` is reported only after every other override has
    /// been applied, so a caller that tolerates the error keeps the rest.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = get(TELEGRAM_BOT_TOKEN) {
            self.telegram.bot_token = token;
        }
        if let Some(ids) = get(TELEGRAM_CHAT_IDS) {
            self.telegram.chat_ids = split_chat_ids(&ids);
        }
        if let Some(admin) = get(TELEGRAM_ADMIN_CHAT_ID) {
            self.telegram.admin_chat_id = admin.trim().to_string();
        }
        if let Some(key) = get(GEMINI_API_KEY) {
            self.gemini.api_key = key;
        }
        if let Some(template) = get(INITIAL_PROMPT) {
            self.prompt.template = template;
        }
        if let Some(model) = get(TEXT_MODEL_ID) {
            self.gemini.text_model = model;
        }
        if let Some(model) = get(IMAGE_MODEL_ID) {
            self.gemini.image_model = model;
        }
        if let Some(caption) = get(MESSAGE_CAPTION) {
            self.telegram.caption = caption;
        }
        if let Some(mode) = get(RUN_MODE) {
            // Anything other than "direct" serves HTTP.
            self.server.run_mode = match RunMode::parse(&mode) {
                Some(RunMode::Direct) => RunMode::Direct,
                _ => RunMode::Http,
            };
        }
        // Last, see above.
        if let Some(port) = get(PORT) {
            self.server.port = port.trim().parse().map_err(|e| {
                ConfigError::ValidationError(format!("{PORT} must be a valid port number: {e}"))
            })?;
        }

        Ok(())
    }
}
