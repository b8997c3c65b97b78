//! Pipeline orchestration - runs the three stages in order.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{GenerationError, PipelineError, PipelineResult};
use crate::factory::ServiceFactory;
use crate::genai::{ImageModel, TextModel};
use crate::messaging::Messenger;
use crate::retry::RetryPolicy;
use crate::types::RunSummary;

use super::broadcast::Broadcaster;
use super::image::ImageGenerator;
use super::prompt::PromptGenerator;

/// Runs prompt generation, image generation and broadcast as one unit.
///
/// Holds no state between runs; one instance can serve any number of
/// sequential or concurrent runs.
pub struct Orchestrator {
    prompt: PromptGenerator,
    image: ImageGenerator,
    broadcaster: Broadcaster,
}

impl Orchestrator {
    /// Wire the stages to the given ports.
    pub fn new(
        config: &Config,
        text_model: Arc<dyn TextModel>,
        image_model: Arc<dyn ImageModel>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let retry = RetryPolicy::from(&config.pipeline);
        Self {
            prompt: PromptGenerator::new(
                text_model,
                config.gemini.text_model.clone(),
                config.prompt.template.clone(),
                retry,
            ),
            image: ImageGenerator::new(image_model, config.gemini.image_model.clone(), retry),
            broadcaster: Broadcaster::new(messenger, &config.telegram),
        }
    }

    /// Build the production clients from configuration.
    ///
    /// A client that cannot be created fails with the stage that needs it.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let factory = ServiceFactory::new(config);

        let text = factory
            .text_model(config)
            .map_err(|e| PipelineError::PromptGeneration(GenerationError::Service(e)))?;
        let image = factory
            .image_model(config)
            .map_err(|e| PipelineError::ImageGeneration(GenerationError::Service(e)))?;
        let messenger = factory
            .messenger(config)
            .map_err(PipelineError::Broadcast)?;

        Ok(Self::new(config, text, image, messenger))
    }

    /// Execute one full run.
    ///
    /// Fails only when a generation stage fails or the messaging client
    /// cannot be initialized. Per-destination delivery failures are reported
    /// in the summary and never fail the run.
    pub async fn run(&self, cancel: &CancellationToken) -> PipelineResult<RunSummary> {
        let start = Instant::now();
        tracing::info!(
            destinations = self.broadcaster.destination_count(),
            "Starting Buongiornissimo run"
        );

        let result = self.run_stages(cancel).await;
        match &result {
            Ok(summary) => {
                let report = &summary.broadcast;
                if report.failed() > 0 {
                    tracing::warn!("{}/{} deliveries failed", report.failed(), report.total());
                }
                tracing::info!(
                    "Run finished in {:?}: {}/{} delivered",
                    start.elapsed(),
                    report.delivered(),
                    report.total()
                );
            }
            Err(e) => tracing::error!(stage = e.stage(), "Run failed: {e}"),
        }
        result
    }

    async fn run_stages(&self, cancel: &CancellationToken) -> PipelineResult<RunSummary> {
        let prompt = self
            .prompt
            .generate(cancel)
            .await
            .map_err(PipelineError::PromptGeneration)?;
        tracing::info!("Generated image prompt: {prompt}");

        let image = self
            .image
            .generate(&prompt, cancel)
            .await
            .map_err(PipelineError::ImageGeneration)?;
        tracing::info!("Generated image ({} bytes)", image.len());

        let broadcast = self
            .broadcaster
            .broadcast(&image, &prompt, cancel)
            .await
            .map_err(PipelineError::Broadcast)?;

        Ok(RunSummary {
            prompt,
            image_bytes: image.len(),
            broadcast,
        })
    }
}
