//! The three-stage Buongiornissimo pipeline.
//!
//! - **prompt**: Generate an image prompt from the configured template
//! - **image**: Render the prompt into a single image
//! - **broadcast**: Deliver the image to every destination
//! - **orchestrator**: Runs the stages in order under one cancellation token

pub(crate) mod context;

pub mod broadcast;
pub mod image;
pub mod orchestrator;
pub mod prompt;

// Re-exports for convenient access
pub use broadcast::{Broadcaster, ADMIN_CAPTION_PREFIX};
pub use image::{extract_image, ImageGenerator, IMAGE_INSTRUCTION_SUFFIX};
pub use orchestrator::Orchestrator;
pub use prompt::{extract_prompt, PromptGenerator, PROMPT_INSTRUCTION_SUFFIX};
