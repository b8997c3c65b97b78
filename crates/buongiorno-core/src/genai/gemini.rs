//! Gemini text model adapter using the `generateContent` API.
//!
//! Sends a single user-role text part and maps the candidates/parts
//! structure back onto the port's response type.

use super::provider::{Candidate, ContentPart, TextModel, TextRequest, TextResponse};
use crate::config::{resolve_env_var, GeminiConfig};
use crate::error::ServiceError;
use crate::http;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const SERVICE: &str = "gemini";

/// Gemini text generation client.
pub struct GeminiTextClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl GeminiTextClient {
    pub fn new(api_key: &str, endpoint: &str, timeout: Duration) -> Result<Self, ServiceError> {
        if api_key.is_empty() {
            return Err(ServiceError::ClientInit {
                service: SERVICE,
                message: "API key is empty".to_string(),
            });
        }
        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: http::build_client(SERVICE, timeout)?,
            timeout,
        })
    }

    /// Build from config, resolving the `${GEMINI_API_KEY}` reference.
    pub fn from_config(config: &GeminiConfig, timeout: Duration) -> Result<Self, ServiceError> {
        let api_key = resolve_env_var(&config.api_key).ok_or_else(|| ServiceError::ClientInit {
            service: SERVICE,
            message: "Gemini API key not set. Set GEMINI_API_KEY env var.".to_string(),
        })?;
        Self::new(&api_key, &config.endpoint, timeout)
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl From<GenerateContentResponse> for TextResponse {
    fn from(resp: GenerateContentResponse) -> Self {
        Self {
            candidates: resp
                .candidates
                .into_iter()
                .map(|c| Candidate {
                    parts: c
                        .content
                        .map(|content| {
                            content
                                .parts
                                .into_iter()
                                .map(|p| ContentPart { text: p.text })
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TextModel for GeminiTextClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn generate_content(&self, request: &TextRequest) -> Result<TextResponse, ServiceError> {
        let start = Instant::now();

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: request.prompt.clone(),
                }],
            }],
        };

        let resp = self
            .client
            .post(self.url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| http::transport_error(SERVICE, self.timeout, e))?;

        if !resp.status().is_success() {
            return Err(http::status_error(SERVICE, resp).await);
        }

        let parsed: GenerateContentResponse =
            resp.json().await.map_err(|e| ServiceError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;

        tracing::debug!(
            model = %request.model,
            candidates = parsed.candidates.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Gemini generateContent returned"
        );

        Ok(parsed.into())
    }
}
