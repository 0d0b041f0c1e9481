//! Main entry point for the English ↔ Roman Urdu translator

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roman_urdu_translator::cli::commands::{self, Commands};
use roman_urdu_translator::{TranslationError, TranslatorConfig};

/// English ↔ Roman Urdu translator backed by an OpenAI-compatible model
#[derive(Parser, Debug)]
#[command(name = "roman-urdu-translator", version, about, long_about = None)]
struct Args {
    /// API key for the provider (optional, defaults to GEMINI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(args.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = TranslatorConfig::load(args.config.as_deref())?;
    if let Some(api_key) = args.api_key {
        config = config.with_api_key(api_key);
    }

    if let Err(e) = commands::run(args.command, config).await {
        if let Some(TranslationError::Config { .. }) = e.downcast_ref::<TranslationError>() {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
        return Err(e);
    }

    Ok(())
}

/// Crate logs at info, or crate and request traces at debug
fn default_log_filter(verbose: bool) -> String {
    if verbose {
        format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME"))
    } else {
        format!("{}=info", env!("CARGO_CRATE_NAME"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_enables_request_traces() {
        assert_eq!(default_log_filter(false), "roman_urdu_translator=info");
        assert_eq!(
            default_log_filter(true),
            "roman_urdu_translator=debug,tower_http=debug"
        );
    }
}
