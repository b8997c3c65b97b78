//! Buongiorno CLI - generates the daily Buongiornissimo image and sends it to
//! Telegram.
//!
//! A run asks Gemini for an image prompt, renders it with Imagen, and
//! broadcasts the picture to every configured chat.
//!
//! # Usage
//!
//! ```bash
//! # Run once and exit
//! buongiorno run
//!
//! # Serve the HTTP trigger (POST / runs the pipeline)
//! buongiorno serve --port 8080
//!
//! # View configuration
//! buongiorno config show
//! ```

use std::path::PathBuf;

use buongiorno_core::{Config, ConfigError, RunMode};
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Buongiorno - daily AI-generated good-morning images for Telegram chats.
#[derive(Parser, Debug)]
#[command(name = "buongiorno")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "BUONGIORNO_CONFIG")]
    config: Option<PathBuf>,

    /// Without a command, `server.run_mode` picks between `run` and `serve`
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline once and exit
    Run,

    /// Serve the HTTP trigger
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    // An explicit --config that fails to load is fatal, and so is a bad
    // environment override, except for `config` itself (so `config init` can
    // create the file and `config show` can display what was applied).
    let inspecting = matches!(cli.command, Some(Commands::Config(_)));
    let config = layer_config(
        Config::load_file(cli.config.as_deref()),
        cli.config.is_none() || inspecting,
        inspecting,
        |key| std::env::var(key).ok(),
    )?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Buongiorno v{}", buongiorno_core::VERSION);

    let command = cli.command.unwrap_or(match config.server.run_mode {
        RunMode::Direct => Commands::Run,
        RunMode::Http => Commands::Serve(cli::serve::ServeArgs::default()),
    });

    match command {
        Commands::Run => cli::run::execute(config).await,
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}

/// Apply environment overrides on top of the file layer.
///
/// A file that fails to load falls back to defaults when `lenient_file` is
/// set. The environment is applied either way; an invalid variable is only
/// tolerated when `lenient_env` is set, keeping every other override.
fn layer_config<F>(
    file: Result<Config, ConfigError>,
    lenient_file: bool,
    lenient_env: bool,
    lookup: F,
) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match file {
        Ok(config) => config,
        Err(e) if lenient_file => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `buongiorno config path`."
            );
            Config::default()
        }
        Err(e) => return Err(e),
    };

    match config.apply_overrides_from(lookup) {
        Ok(()) => Ok(config),
        Err(e) if lenient_env => {
            eprintln!("Warning: Ignoring invalid environment override: {e}");
            Ok(config)
        }
        Err(e) => Err(e),
    }
}
