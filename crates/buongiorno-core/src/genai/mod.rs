//! Generative AI integration for prompt and image generation.
//!
//! Provides the text/image model ports plus the Gemini (`generateContent`)
//! and Imagen (`predict`) adapters that implement them over HTTP.

pub(crate) mod gemini;
pub(crate) mod imagen;
pub(crate) mod provider;

pub use gemini::GeminiTextClient;
pub use imagen::ImagenClient;
pub use provider::{
    Candidate, ContentPart, GeneratedImage, ImageModel, ImageRequest, ImageResponse, TextModel,
    TextRequest, TextResponse,
};
