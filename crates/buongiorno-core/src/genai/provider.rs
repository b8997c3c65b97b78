//! Generative model ports and request/response types.
//!
//! The pipeline talks to text and image models only through these traits;
//! the Gemini/Imagen adapters implement them for production and tests swap
//! in scripted fakes.

use crate::error::ServiceError;
use async_trait::async_trait;

/// A single-turn text generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    /// Model identifier (e.g., "gemini-2.5-flash-lite")
    pub model: String,
    /// User-role prompt text
    pub prompt: String,
}

/// Text generation response: candidates, each a list of content parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub parts: Vec<ContentPart>,
}

/// One content part. Non-text parts (inline data, function calls) carry no text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub text: Option<String>,
}

impl TextResponse {
    /// Convenience constructor for a response with a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![ContentPart {
                    text: Some(text.into()),
                }],
            }],
        }
    }
}

/// An image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Model identifier (e.g., "imagen-4.0-generate-001")
    pub model: String,
    /// Prompt describing the image
    pub prompt: String,
    /// Number of images to generate
    pub number_of_images: u32,
}

/// Image generation response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResponse {
    pub generated_images: Vec<GeneratedImage>,
}

/// One generated image. The payload may be missing (e.g., filtered by safety).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedImage {
    pub image_bytes: Option<Vec<u8>>,
    pub mime_type: Option<String>,
}

impl ImageResponse {
    /// Convenience constructor for a response with a single image.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            generated_images: vec![GeneratedImage {
                image_bytes: Some(bytes),
                mime_type: Some("image/png".to_string()),
            }],
        }
    }
}

/// Text generation port.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the orchestrator holds `Arc<dyn TextModel>`).
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Service name for logging and errors (e.g., "gemini").
    fn name(&self) -> &'static str;

    /// Issue exactly one generation call.
    async fn generate_content(&self, request: &TextRequest) -> Result<TextResponse, ServiceError>;
}

/// Image generation port.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Service name for logging and errors (e.g., "imagen").
    fn name(&self) -> &'static str;

    /// Issue exactly one generation call.
    async fn generate_images(&self, request: &ImageRequest)
        -> Result<ImageResponse, ServiceError>;
}
