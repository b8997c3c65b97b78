//! Stage 2: render the generated prompt into image bytes.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::context;
use crate::error::GenerationError;
use crate::genai::{ImageModel, ImageRequest, ImageResponse};
use crate::retry::RetryPolicy;
use crate::types::ImageData;

/// Appended to the prompt before rendering. It is a text-output instruction
/// that an image model does not act on.
pub const IMAGE_INSTRUCTION_SUFFIX: &str = " Ritorna solo il prompt senza altro testo.";

/// MIME type assumed when the service doesn't report one.
const DEFAULT_MIME_TYPE: &str = "image/png";

/// Generates exactly one image per call with an image model.
pub struct ImageGenerator {
    model: Arc<dyn ImageModel>,
    model_id: String,
    retry: RetryPolicy,
}

impl ImageGenerator {
    pub fn new(model: Arc<dyn ImageModel>, model_id: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            retry,
        }
    }

    /// The request sent to the image model for `prompt`.
    pub fn request(&self, prompt: &str) -> ImageRequest {
        ImageRequest {
            model: self.model_id.clone(),
            prompt: format!("{prompt}{IMAGE_INSTRUCTION_SUFFIX}"),
            number_of_images: 1,
        }
    }

    /// Generate the image. Consumes nothing; the prompt stays with the caller
    /// for the admin caption.
    pub async fn generate(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageData, GenerationError> {
        let request = self.request(prompt);
        tracing::debug!(model = %request.model, "Requesting image");

        let response = context::with_retry(cancel, self.model.name(), self.retry, || {
            self.model.generate_images(&request)
        })
        .await?;

        extract_image(response)
    }
}

/// Take the first generated image's bytes.
pub fn extract_image(response: ImageResponse) -> Result<ImageData, GenerationError> {
    let first = response
        .generated_images
        .into_iter()
        .next()
        .ok_or(GenerationError::NoImage)?;

    match first.image_bytes {
        Some(bytes) if !bytes.is_empty() => Ok(ImageData::new(
            bytes,
            first
                .mime_type
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        )),
        _ => Err(GenerationError::NoImageData),
    }
}
