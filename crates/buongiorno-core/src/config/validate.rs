//! Startup validation. A config that fails here never reaches the pipeline.

use crate::caption::{caption_len, ELLIPSIS};
use crate::error::ConfigError;
use super::{resolve_env_var, Config};

impl Config {
    /// Validate that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.chat_ids.is_empty() && self.telegram.admin_chat_id().is_none() {
            return Err(ConfigError::ValidationError(
                "at least one of telegram.chat_ids (TELEGRAM_CHAT_IDS) or \
                 telegram.admin_chat_id (TELEGRAM_ADMIN_CHAT_ID) is required"
                    .into(),
            ));
        }
        if resolve_env_var(&self.telegram.bot_token).is_none() {
            return Err(ConfigError::ValidationError(
                "telegram.bot_token is required (set TELEGRAM_BOT_TOKEN)".into(),
            ));
        }
        if resolve_env_var(&self.gemini.api_key).is_none() {
            return Err(ConfigError::ValidationError(
                "gemini.api_key is required (set GEMINI_API_KEY)".into(),
            ));
        }
        if self.gemini.text_model.trim().is_empty() {
            return Err(ConfigError::ValidationError("gemini.text_model must not be empty".into()));
        }
        if self.gemini.image_model.trim().is_empty() {
            return Err(ConfigError::ValidationError("gemini.image_model must not be empty".into()));
        }
        let marker_len = caption_len(ELLIPSIS);
        if self.telegram.max_caption_length <= marker_len {
            return Err(ConfigError::ValidationError(format!(
                "telegram.max_caption_length must be > {marker_len}"
            )));
        }
        if self.pipeline.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("server.port must be > 0".into()));
        }
        Ok(())
    }
}
