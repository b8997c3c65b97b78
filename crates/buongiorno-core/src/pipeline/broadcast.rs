//! Stage 3: deliver the image to every configured destination.
//!
//! Failures are isolated per destination: a malformed identifier or a failed
//! send is logged, recorded as that destination's outcome, and the loop moves
//! on. Only messaging client initialization can fail the broadcast as a whole.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::context;
use crate::caption;
use crate::config::TelegramConfig;
use crate::error::{DeliveryError, ServiceError};
use crate::messaging::{Messenger, PhotoMessage};
use crate::types::{BroadcastReport, DeliveryOutcome, DestinationRole, ImageData};

/// Prefix of the admin caption, followed by the full generated prompt.
pub const ADMIN_CAPTION_PREFIX: &str = "Generated with prompt: ";

/// Sends one image to N regular destinations and an optional admin destination.
pub struct Broadcaster {
    messenger: Arc<dyn Messenger>,
    config: TelegramConfig,
}

impl Broadcaster {
    pub fn new(messenger: Arc<dyn Messenger>, config: &TelegramConfig) -> Self {
        Self {
            messenger,
            config: config.clone(),
        }
    }

    /// Number of destinations this broadcaster will report on.
    pub fn destination_count(&self) -> usize {
        self.config.destination_count()
    }

    /// Caption for regular destinations.
    pub fn regular_caption(&self) -> String {
        caption::truncate(&self.config.caption, self.config.max_caption_length)
    }

    /// Caption for the admin destination.
    pub fn admin_caption(&self, prompt: &str) -> String {
        let full = format!("{ADMIN_CAPTION_PREFIX}{prompt}");
        caption::truncate(&full, self.config.max_caption_length)
    }

    /// Deliver `image` everywhere, strictly one destination at a time.
    ///
    /// Returns one outcome per configured destination. Once the token is
    /// cancelled no further sends are issued; destinations not yet attempted
    /// are reported as [`DeliveryError::Cancelled`] and the broadcast still
    /// returns `Ok`.
    pub async fn broadcast(
        &self,
        image: &ImageData,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<BroadcastReport, ServiceError> {
        let service = self.messenger.name();
        context::cancellable(cancel, service, self.messenger.connect()).await?;

        let mut report = BroadcastReport {
            outcomes: Vec::with_capacity(self.destination_count()),
        };

        let regular_caption = self.regular_caption();
        for raw in &self.config.chat_ids {
            let outcome = self
                .deliver(raw, DestinationRole::Regular, image, &regular_caption, cancel)
                .await;
            report.outcomes.push(outcome);
        }

        if let Some(raw) = self.config.admin_chat_id() {
            let admin_caption = self.admin_caption(prompt);
            let outcome = self
                .deliver(raw, DestinationRole::Admin, image, &admin_caption, cancel)
                .await;
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    async fn deliver(
        &self,
        raw: &str,
        role: DestinationRole,
        image: &ImageData,
        caption: &str,
        cancel: &CancellationToken,
    ) -> DeliveryOutcome {
        if cancel.is_cancelled() {
            let error = DeliveryError::Cancelled {
                destination: raw.to_string(),
            };
            tracing::warn!(role = ?role, "{error}");
            return DeliveryOutcome::failed(raw, role, error);
        }

        let chat_id = match raw.trim().parse::<i64>() {
            Ok(id) => id,
            Err(source) => {
                let error = DeliveryError::InvalidChatId {
                    raw: raw.to_string(),
                    source,
                };
                tracing::warn!(role = ?role, "{error}");
                return DeliveryOutcome::failed(raw, role, error);
            }
        };

        tracing::info!(role = ?role, "Sending image to chat: {chat_id}");

        let message = PhotoMessage {
            chat_id,
            photo: image.to_upload(),
            file_name: self.config.photo_file_name.clone(),
            mime_type: image.mime_type().to_string(),
            caption: caption.to_string(),
        };

        let send = self.messenger.send_photo(message);
        match context::cancellable(cancel, self.messenger.name(), send).await {
            Ok(()) => {
                tracing::info!(role = ?role, "Successfully sent image to chat: {chat_id}");
                DeliveryOutcome::delivered(raw, role, chat_id)
            }
            Err(source) => {
                let error = DeliveryError::Send { chat_id, source };
                tracing::warn!(role = ?role, "{error}");
                DeliveryOutcome::failed(raw, role, error)
            }
        }
    }
}
