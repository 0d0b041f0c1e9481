//! CLI command definitions and handlers

use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::core::client::AsyncTranslator;
use crate::core::config::TranslatorConfig;
use crate::core::errors::TranslationError;
use crate::core::session::SessionState;

/// Commands for the translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web translator
    Serve {
        /// Bind address (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Listen port (default: 8501)
        #[arg(short, long, default_value_t = 8501)]
        port: u16,
    },

    /// Translate one piece of text and print the result
    Translate {
        /// English or Roman Urdu text
        text: String,
    },

    /// Translate line by line from stdin, one session for the whole run
    Interactive,
}

/// Spinner shown while waiting on the provider
fn spinner() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Translating...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Check the configuration, then run the selected command
///
/// Without a credential nothing is served, translated or read from stdin.
pub async fn run(command: Option<Commands>, config: TranslatorConfig) -> anyhow::Result<()> {
    config.validate()?;

    match command {
        Some(Commands::Serve { host, port }) => handle_serve(config, host, port).await,
        Some(Commands::Translate { text }) => handle_translate(config, text).await,
        Some(Commands::Interactive) => handle_interactive(config).await,
        None => handle_serve(config, "127.0.0.1".to_string(), 8501).await,
    }
}

/// Handle server command
pub async fn handle_serve(config: TranslatorConfig, host: String, port: u16) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Translator running on http://{}:{}", host, port);
    println!("📊 API Documentation: http://{}:{}/swagger", host, port);

    run_server(config, host, port).await?;

    Ok(())
}

/// Handle one-shot translate command
pub async fn handle_translate(config: TranslatorConfig, text: String) -> anyhow::Result<()> {
    let translator = AsyncTranslator::from_config(&config)?;
    let mut session = SessionState::new();

    let pb = spinner()?;
    let result = translator.translate(&mut session, &text).await;
    pb.finish_and_clear();

    let translation = result?;
    println!("{}", translation.text);

    Ok(())
}

/// Handle interactive command
pub async fn handle_interactive(config: TranslatorConfig) -> anyhow::Result<()> {
    let translator = AsyncTranslator::from_config(&config)?;

    println!("🧠 Smart Language Translator");
    println!("   Your Bridge Between English and Roman Urdu");
    println!("   Enter text to translate (Ctrl-D to quit)\n");

    let stdin = BufReader::new(tokio::io::stdin());
    let translated = run_session(&translator, stdin, &mut std::io::stdout()).await?;

    info!("Interactive session ended after {} translations", translated);
    Ok(())
}

/// Drive one terminal session: every non-blank line is a Translate click
///
/// Returns how many lines produced a translation (cached or fresh).
pub async fn run_session<R, W>(
    translator: &AsyncTranslator,
    reader: R,
    out: &mut W,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = SessionState::new();
    let mut lines = reader.lines();
    let mut translated = 0;

    write!(out, "> ")?;
    out.flush()?;

    while let Some(line) = lines.next_line().await? {
        if session.should_translate(&line, true) {
            let pb = spinner()?;
            let result = translator.translate(&mut session, &line).await;
            pb.finish_and_clear();

            match result {
                Ok(translation) => {
                    translated += 1;
                    writeln!(out, "Translation: {}", translation.text)?;
                }
                Err(TranslationError::EmptyInput) => {}
                Err(e) => writeln!(out, "❌ {}", e)?,
            }
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(translated)
}
