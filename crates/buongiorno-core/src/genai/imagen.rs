//! Imagen adapter using the `predict` API.
//!
//! Images come back base64-encoded in `predictions[].bytesBase64Encoded`.

use super::provider::{GeneratedImage, ImageModel, ImageRequest, ImageResponse};
use crate::config::{resolve_env_var, GeminiConfig};
use crate::error::ServiceError;
use crate::http;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const SERVICE: &str = "imagen";

/// Imagen image generation client.
pub struct ImagenClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ImagenClient {
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
        format!("{}/models/{}:predict", self.endpoint, model)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
}

// --- Response types ---

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

fn into_image_response(resp: PredictResponse) -> Result<ImageResponse, ServiceError> {
    let engine = base64::engine::general_purpose::STANDARD;
    let generated_images = resp
        .predictions
        .into_iter()
        .map(|p| {
            let image_bytes = p
                .bytes_base64_encoded
                .map(|encoded| engine.decode(encoded.as_bytes()))
                .transpose()
                .map_err(|e| ServiceError::Decode {
                    service: SERVICE,
                    message: format!("invalid base64 image payload: {e}"),
                })?;
            Ok(GeneratedImage {
                image_bytes,
                mime_type: p.mime_type,
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;
    Ok(ImageResponse { generated_images })
}

#[async_trait]
impl ImageModel for ImagenClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn generate_images(
        &self,
        request: &ImageRequest,
    ) -> Result<ImageResponse, ServiceError> {
        let start = Instant::now();

        let body = PredictRequest {
            instances: vec![Instance {
                prompt: request.prompt.clone(),
            }],
            parameters: Parameters {
                sample_count: request.number_of_images,
            },
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

        let parsed: PredictResponse = resp.json().await.map_err(|e| ServiceError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;

        tracing::debug!(
            model = %request.model,
            predictions = parsed.predictions.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Imagen predict returned"
        );

        into_image_response(parsed)
    }
}
