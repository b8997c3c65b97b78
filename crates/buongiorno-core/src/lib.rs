//! Buongiorno Core - the daily Buongiornissimo pipeline as a library.
//!
//! One run asks a text model for an image prompt, renders that prompt with an
//! image model, and sends the resulting picture to a list of Telegram chats.
//!
//! # Architecture
//!
//! ```text
//! Template → Gemini (prompt) → Imagen (image) → Telegram (N chats + admin)
//! ```
//!
//! Each external service sits behind a port trait ([`TextModel`],
//! [`ImageModel`], [`Messenger`]), so the pipeline can run against fakes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use buongiorno_core::{Config, Orchestrator};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> buongiorno_core::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!     let orchestrator = Orchestrator::from_config(&config)?;
//!
//!     let summary = orchestrator.run(&CancellationToken::new()).await?;
//!     println!("{}/{} delivered", summary.broadcast.delivered(), summary.broadcast.total());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod caption;
pub mod config;
pub mod error;
pub mod factory;
pub mod genai;
pub(crate) mod http;
pub mod messaging;
pub mod pipeline;
pub mod retry;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::{Config, RunMode};
pub use error::{
    BuongiornoError, ConfigError, DeliveryError, GenerationError, PipelineError, PipelineResult,
    Result, ServiceError,
};
pub use factory::ServiceFactory;
pub use genai::{GeminiTextClient, ImageModel, ImagenClient, TextModel};
pub use messaging::{Messenger, PhotoMessage, TelegramMessenger};
pub use pipeline::Orchestrator;
pub use types::{BroadcastReport, DeliveryOutcome, DestinationRole, ImageData, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
