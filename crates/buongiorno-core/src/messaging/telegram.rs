//! Telegram Bot API adapter.
//!
//! `connect` calls `getMe` to validate the token; `send_photo` uploads the
//! image as multipart form data via `sendPhoto`.

use super::messenger::{Messenger, PhotoMessage};
use crate::config::{resolve_env_var, TelegramConfig};
use crate::error::ServiceError;
use crate::http;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "telegram";

/// Telegram bot client.
pub struct TelegramMessenger {
    api_base: String,
    token: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl TelegramMessenger {
    pub fn new(token: &str, api_base: &str, timeout: Duration) -> Result<Self, ServiceError> {
        if token.is_empty() {
            return Err(ServiceError::ClientInit {
                service: SERVICE,
                message: "bot token is empty".to_string(),
            });
        }
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: http::build_client(SERVICE, timeout)?,
            timeout,
        })
    }

    /// Build from config, resolving the `${TELEGRAM_BOT_TOKEN}` reference.
    pub fn from_config(config: &TelegramConfig, timeout: Duration) -> Result<Self, ServiceError> {
        let token = resolve_env_var(&config.bot_token).ok_or_else(|| ServiceError::ClientInit {
            service: SERVICE,
            message: "Telegram bot token not set. Set TELEGRAM_BOT_TOKEN env var.".to_string(),
        })?;
        Self::new(&token, &config.api_base, timeout)
    }

    /// The token is part of the URL, so transport errors are stripped of it
    /// before they reach the logs.
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Read a Bot API envelope, mapping `ok: false` to a request error.
    async fn read_envelope(&self, resp: reqwest::Response) -> Result<(), ServiceError> {
        let status = resp.status();
        let envelope: ApiEnvelope = resp.json().await.map_err(|e| ServiceError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;
        envelope.into_result(status.as_u16())
    }
}

/// Bot API response envelope. `result` is ignored; only the outcome matters.
#[derive(Deserialize)]
struct ApiEnvelope {
    ok: bool,
    description: Option<String>,
    error_code: Option<u16>,
}

impl ApiEnvelope {
    fn into_result(self, http_status: u16) -> Result<(), ServiceError> {
        if self.ok {
            return Ok(());
        }
        let code = self.error_code.unwrap_or(http_status);
        Err(ServiceError::Request {
            service: SERVICE,
            message: format!(
                "Bot API error {code}: {}",
                self.description.as_deref().unwrap_or("unknown error")
            ),
            status_code: Some(code),
        })
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn connect(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| ServiceError::ClientInit {
                service: SERVICE,
                message: http::transport_error(SERVICE, self.timeout, e.without_url()).to_string(),
            })?;

        self.read_envelope(resp)
            .await
            .map_err(|e| ServiceError::ClientInit {
                service: SERVICE,
                message: e.to_string(),
            })
    }

    async fn send_photo(&self, message: PhotoMessage) -> Result<(), ServiceError> {
        let part = Part::bytes(message.photo)
            .file_name(message.file_name)
            .mime_str(&message.mime_type)
            .map_err(|e| ServiceError::Request {
                service: SERVICE,
                message: format!("invalid MIME type: {e}"),
                status_code: None,
            })?;

        let form = Form::new()
            .text("chat_id", message.chat_id.to_string())
            .text("caption", message.caption)
            .part("photo", part);

        let resp = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| http::transport_error(SERVICE, self.timeout, e.without_url()))?;

        self.read_envelope(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> ApiEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ok_envelope() {
        let env = envelope(r#"{"ok":true,"result":{"message_id":7}}"#);
        assert!(env.into_result(200).is_ok());
    }

    #[test]
    fn test_error_envelope_uses_error_code() {
        let env = envelope(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#);
        let err = env.into_result(400).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Request {
                service: "telegram",
                message: "Bot API error 400: Bad Request: chat not found".to_string(),
                status_code: Some(400),
            }
        );
    }

    #[test]
    fn test_error_envelope_falls_back_to_http_status() {
        let env = envelope(r#"{"ok":false}"#);
        let err = env.into_result(502).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Request {
                status_code: Some(502),
                ..
            }
        ));
    }

    #[test]
    fn test_method_url() {
        let messenger =
            TelegramMessenger::new("123:abc", "https://api.telegram.org/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            messenger.method_url("sendPhoto"),
            "https://api.telegram.org/bot123:abc/sendPhoto"
        );
    }

    #[test]
    fn test_missing_token_is_client_init_error() {
        let mut config = TelegramConfig::default();
        config.bot_token = "${DEFINITELY_NOT_SET_TELEGRAM_TOKEN}".to_string();
        let err = TelegramMessenger::from_config(&config, Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ServiceError::ClientInit { .. }));
    }
}
