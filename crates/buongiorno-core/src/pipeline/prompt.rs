//! Stage 1: turn the configured template into a finished image prompt.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::context;
use crate::error::GenerationError;
use crate::genai::{TextModel, TextRequest, TextResponse};
use crate::retry::RetryPolicy;

/// Appended to the template: keep rendered text out of the image and return
/// the bare prompt.
pub const PROMPT_INSTRUCTION_SUFFIX: &str =
    ". Non includere generazione di testo nel prompt. Ritorna solo il prompt senza altro testo.";

/// Generates an image prompt with a text model.
pub struct PromptGenerator {
    model: Arc<dyn TextModel>,
    model_id: String,
    template: String,
    retry: RetryPolicy,
}

impl PromptGenerator {
    pub fn new(
        model: Arc<dyn TextModel>,
        model_id: impl Into<String>,
        template: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            template: template.into(),
            retry,
        }
    }

    /// The request sent to the text model.
    pub fn request(&self) -> TextRequest {
        TextRequest {
            model: self.model_id.clone(),
            prompt: format!("{}{}", self.template, PROMPT_INSTRUCTION_SUFFIX),
        }
    }

    /// Generate the prompt. One call (plus configured retries), no fallback.
    pub async fn generate(&self, cancel: &CancellationToken) -> Result<String, GenerationError> {
        let request = self.request();
        tracing::debug!(model = %request.model, "Requesting image prompt");

        let response = context::with_retry(cancel, self.model.name(), self.retry, || {
            self.model.generate_content(&request)
        })
        .await?;

        extract_prompt(response)
    }
}

/// Take the first candidate's first part text, verbatim.
pub fn extract_prompt(response: TextResponse) -> Result<String, GenerationError> {
    let first_part = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.parts.into_iter().next())
        .ok_or(GenerationError::NoContent)?;

    match first_part.text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(GenerationError::UnexpectedFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::genai::{Candidate, ContentPart};
    use crate::testing::{transport_error, FakeTextModel};

    fn generator(model: Arc<FakeTextModel>) -> PromptGenerator {
        PromptGenerator::new(model, "gemini-test", "A cat with coffee", RetryPolicy::none())
    }

    #[tokio::test]
    async fn test_returns_first_part_verbatim() {
        let model = Arc::new(FakeTextModel::replying("  A surreal moka pot at dawn\n"));
        let prompt = generator(model.clone())
            .generate(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(prompt, "  A surreal moka pot at dawn\n");
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_appends_instruction_suffix() {
        let model = Arc::new(FakeTextModel::replying("ok"));
        generator(model.clone())
            .generate(&CancellationToken::new())
            .await
            .unwrap();
        let requests = model.requests.lock().unwrap();
        assert_eq!(requests[0].model, "gemini-test");
        assert_eq!(
            requests[0].prompt,
            format!("A cat with coffee{PROMPT_INSTRUCTION_SUFFIX}")
        );
    }

    #[tokio::test]
    async fn test_zero_candidates_is_no_content() {
        let model = Arc::new(FakeTextModel::with_response(Ok(TextResponse::default())));
        let err = generator(model)
            .generate(&CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::NoContent);
    }

    #[test]
    fn test_zero_parts_is_no_content() {
        let response = TextResponse {
            candidates: vec![Candidate { parts: vec![] }],
        };
        assert_eq!(extract_prompt(response), Err(GenerationError::NoContent));
    }

    #[test]
    fn test_part_without_text_is_unexpected_format() {
        let response = TextResponse {
            candidates: vec![Candidate {
                parts: vec![ContentPart { text: None }],
            }],
        };
        assert_eq!(
            extract_prompt(response),
            Err(GenerationError::UnexpectedFormat)
        );

        let response = TextResponse::from_text("");
        assert_eq!(
            extract_prompt(response),
            Err(GenerationError::UnexpectedFormat)
        );
    }

    #[tokio::test]
    async fn test_service_failure_is_propagated() {
        let model = Arc::new(FakeTextModel::failing(transport_error("gemini")));
        let err = generator(model)
            .generate(&CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::Service(transport_error("gemini")));
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let model = Arc::new(FakeTextModel::replying("never"));
        let token = CancellationToken::new();
        token.cancel();
        let err = generator(model.clone()).generate(&token).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Service(ServiceError::Cancelled { .. })
        ));
        assert_eq!(model.calls(), 0);
    }
}
