//! Artifacts and outcomes of a single pipeline run.
//!
//! Nothing here outlives the run that produced it.

use crate::error::DeliveryError;
use serde::{Serialize, Serializer};

/// Raw image bytes produced by the image stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A fresh, independently owned copy of the payload for one upload.
    pub fn to_upload(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Which kind of destination an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationRole {
    /// Receives the configured caption
    Regular,
    /// Receives the full generated prompt as caption
    Admin,
}

/// Result of delivering to one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered {
        chat_id: i64,
    },
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: DeliveryError,
    },
}

/// One destination's outcome. Exactly one per configured destination per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    /// The identifier as configured (before parsing)
    pub destination: String,
    pub role: DestinationRole,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn delivered(destination: &str, role: DestinationRole, chat_id: i64) -> Self {
        Self {
            destination: destination.to_string(),
            role,
            status: DeliveryStatus::Delivered { chat_id },
        }
    }

    pub fn failed(destination: &str, role: DestinationRole, error: DeliveryError) -> Self {
        Self {
            destination: destination.to_string(),
            role,
            status: DeliveryStatus::Failed { error },
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered { .. })
    }

    pub fn error(&self) -> Option<&DeliveryError> {
        match &self.status {
            DeliveryStatus::Delivered { .. } => None,
            DeliveryStatus::Failed { error } => Some(error),
        }
    }
}

/// Per-destination outcomes of a broadcast, in delivery order (regular
/// destinations in configured order, then the admin destination).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl BroadcastReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.delivered()
    }

    /// True when there was at least one destination and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.total() > 0 && self.delivered() == 0
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// The generated image prompt
    pub prompt: String,
    /// Size of the generated image in bytes
    pub image_bytes: usize,
    /// Per-destination delivery outcomes
    pub broadcast: BroadcastReport,
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    fn send_failure(chat_id: i64) -> DeliveryError {
        DeliveryError::Send {
            chat_id,
            source: ServiceError::Request {
                service: "telegram",
                message: "Bot API error 403: Forbidden".to_string(),
                status_code: Some(403),
            },
        }
    }

    #[test]
    fn test_upload_is_independent_copy() {
        let image = ImageData::new(vec![1, 2, 3], "image/png");
        let mut upload = image.to_upload();
        upload.push(4);
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.len(), 3);
    }

    #[test]
    fn test_report_counts() {
        let report = BroadcastReport {
            outcomes: vec![
                DeliveryOutcome::delivered("100", DestinationRole::Regular, 100),
                DeliveryOutcome::failed("200", DestinationRole::Regular, send_failure(200)),
                DeliveryOutcome::delivered("999", DestinationRole::Admin, 999),
            ],
        };
        assert_eq!(report.total(), 3);
        assert_eq!(report.delivered(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_failed());
    }

    #[test]
    fn test_all_failed_requires_destinations() {
        assert!(!BroadcastReport::default().all_failed());
        let report = BroadcastReport {
            outcomes: vec![DeliveryOutcome::failed(
                "1",
                DestinationRole::Regular,
                send_failure(1),
            )],
        };
        assert!(report.all_failed());
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = DeliveryOutcome::failed("200", DestinationRole::Regular, send_failure(200));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["destination"], "200");
        assert_eq!(json["role"], "regular");
        assert_eq!(json["status"], "failed");
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Failed to send image to chat 200"));

        let outcome = DeliveryOutcome::delivered("100", DestinationRole::Admin, 100);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "delivered");
        assert_eq!(json["chat_id"], 100);
    }
}
