//! Sub-configuration structs with the deployed defaults.

use serde::{Deserialize, Serialize};

/// Gemini (text) and Imagen (image) service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Generative Language API base URL
    pub endpoint: String,

    /// Model used to write the image prompt
    pub text_model: String,

    /// Model used to render the image
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: "${GEMINI_API_KEY}".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-flash-lite".to_string(),
            image_model: "imagen-4.0-generate-001".to_string(),
        }
    }
}

/// Prompt template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Instruction sent to the text model to obtain an image prompt
    pub template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: "Genera un prompt per un immagine surreale stile buongiornissimo kaffee. \
                       Aggiungi il testo \"Buongiorno\". Ritorna solo il prompt senza altro testo."
                .to_string(),
        }
    }
}

/// Telegram delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token (supports ${ENV_VAR} syntax)
    pub bot_token: String,

    /// Bot API base URL
    pub api_base: String,

    /// Regular destinations, in delivery order. Kept as raw strings so a
    /// malformed entry only skips that destination.
    pub chat_ids: Vec<String>,

    /// Optional admin destination that receives the full generated prompt.
    /// An empty string means none.
    pub admin_chat_id: String,

    /// Caption attached for regular destinations
    pub caption: String,

    /// File name reported for the uploaded photo
    pub photo_file_name: String,

    /// Maximum caption length enforced by the Bot API (in characters)
    pub max_caption_length: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: "${TELEGRAM_BOT_TOKEN}".to_string(),
            api_base: "https://api.telegram.org".to_string(),
            chat_ids: Vec::new(),
            admin_chat_id: String::new(),
            caption: "Buongiornissimo ☕".to_string(),
            photo_file_name: "buongiornissimo.jpg".to_string(),
            max_caption_length: crate::caption::MAX_CAPTION_LENGTH,
        }
    }
}

impl TelegramConfig {
    /// The admin destination, if one is configured.
    pub fn admin_chat_id(&self) -> Option<&str> {
        let trimmed = self.admin_chat_id.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Total number of configured destinations (regular + admin).
    pub fn destination_count(&self) -> usize {
        self.chat_ids.len() + usize::from(self.admin_chat_id().is_some())
    }
}

/// Per-call behaviour of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Extra attempts for a failed generation call. 0 means a single attempt.
    pub retry_attempts: u32,

    /// Base backoff delay between attempts in milliseconds
    pub retry_delay_ms: u64,

    /// HTTP request timeout for every service call in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            retry_delay_ms: 1000,
            request_timeout_ms: 120_000,
        }
    }
}

/// How the binary is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run the pipeline once and exit
    Direct,
    /// Serve an HTTP trigger endpoint
    Http,
}

impl RunMode {
    /// Parse a run mode (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Some(Self::Direct),
            "http" | "server" => Some(Self::Http),
            _ => None,
        }
    }
}

/// HTTP trigger server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Default mode when the binary is started without a subcommand
    pub run_mode: RunMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            run_mode: RunMode::Http,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
