//! Builds the production service adapters from configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::ServiceError;
use crate::genai::{GeminiTextClient, ImageModel, ImagenClient, TextModel};
use crate::messaging::{Messenger, TelegramMessenger};

/// Creates the Gemini, Imagen and Telegram adapters.
///
/// Secrets are resolved here; a missing secret or an HTTP client that fails
/// to build is a [`ServiceError::ClientInit`].
pub struct ServiceFactory {
    timeout: Duration,
}

impl ServiceFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: Duration::from_millis(config.pipeline.request_timeout_ms),
        }
    }

    pub fn text_model(&self, config: &Config) -> Result<Arc<dyn TextModel>, ServiceError> {
        Ok(Arc::new(GeminiTextClient::from_config(
            &config.gemini,
            self.timeout,
        )?))
    }

    pub fn image_model(&self, config: &Config) -> Result<Arc<dyn ImageModel>, ServiceError> {
        Ok(Arc::new(ImagenClient::from_config(
            &config.gemini,
            self.timeout,
        )?))
    }

    pub fn messenger(&self, config: &Config) -> Result<Arc<dyn Messenger>, ServiceError> {
        Ok(Arc::new(TelegramMessenger::from_config(
            &config.telegram,
            self.timeout,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secrets() -> Config {
        let mut config = Config::default();
        config.gemini.api_key = "key".to_string();
        config.telegram.bot_token = "123:abc".to_string();
        config
    }

    #[test]
    fn test_builds_all_adapters() {
        let config = config_with_secrets();
        let factory = ServiceFactory::new(&config);
        assert_eq!(factory.text_model(&config).unwrap().name(), "gemini");
        assert_eq!(factory.image_model(&config).unwrap().name(), "imagen");
        assert_eq!(factory.messenger(&config).unwrap().name(), "telegram");
    }

    #[test]
    fn test_missing_secret_is_client_init() {
        let mut config = config_with_secrets();
        config.gemini.api_key = "${DEFINITELY_NOT_SET_XYZ_123}".to_string();
        let factory = ServiceFactory::new(&config);
        assert!(matches!(
            factory.image_model(&config),
            Err(ServiceError::ClientInit { service: "imagen", .. })
        ));
    }
}
