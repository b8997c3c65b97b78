//! Error types for the Buongiorno pipeline.
//!
//! Errors are organized by stage so that a failed run names the stage that
//! broke (prompt generation, image generation, broadcast) along with the
//! service and the specific issue.

use std::num::ParseIntError;
use thiserror::Error;

/// Top-level error type for Buongiorno operations.
#[derive(Error, Debug)]
pub enum BuongiornoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline run errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// A call to an external service (text model, image model, messenger) failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The client could not be constructed (missing secret, TLS setup, ...)
    #[error("failed to create {service} client: {message}")]
    ClientInit {
        service: &'static str,
        message: String,
    },

    /// The request failed in transport or returned a non-success status
    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
        status_code: Option<u16>,
    },

    /// The response body could not be decoded
    #[error("failed to decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    /// The call exceeded its deadline
    #[error("{service} call timed out after {timeout_ms}ms")]
    Timeout {
        service: &'static str,
        timeout_ms: u64,
    },

    /// The execution context was cancelled while the call was in flight
    #[error("{service} call cancelled")]
    Cancelled { service: &'static str },
}

impl ServiceError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// A generation stage produced no usable output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The underlying service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Zero candidates, or a first candidate with zero parts
    #[error("no content generated")]
    NoContent,

    /// The first part carried no usable text
    #[error("unexpected response format")]
    UnexpectedFormat,

    /// Zero generated images
    #[error("no image generated")]
    NoImage,

    /// The first generated image has an empty or missing payload
    #[error("no image data found in response")]
    NoImageData,
}

/// Delivery to a single destination failed. Always recovered locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The destination identifier is not a signed 64-bit integer
    #[error("Invalid chat ID {raw}: {source}")]
    InvalidChatId {
        raw: String,
        #[source]
        source: ParseIntError,
    },

    /// The send call failed
    #[error("Failed to send image to chat {chat_id}: {source}")]
    Send {
        chat_id: i64,
        #[source]
        source: ServiceError,
    },

    /// The run was cancelled before this destination was attempted
    #[error("Delivery to {destination} not attempted: run cancelled")]
    Cancelled { destination: String },
}

/// A run failed at a specific stage. Only stages 1 and 2, plus messaging
/// client initialization, can fail a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("failed to generate image prompt: {0}")]
    PromptGeneration(GenerationError),

    #[error("failed to generate image: {0}")]
    ImageGeneration(GenerationError),

    #[error("failed to send images: {0}")]
    Broadcast(ServiceError),
}

impl PipelineError {
    /// Name of the stage that failed, for logs and HTTP responses.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::PromptGeneration(_) => "prompt_generation",
            Self::ImageGeneration(_) => "image_generation",
            Self::Broadcast(_) => "broadcast",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::PromptGeneration(GenerationError::Service(e))
            | Self::ImageGeneration(GenerationError::Service(e))
            | Self::Broadcast(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

/// Convenience type alias for Buongiorno results.
pub type Result<T> = std::result::Result<T, BuongiornoError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
