//! Timed Chat - terminal chat client with a response stopwatch
//!
//! Streams replies from a Hugging Face chat model (or a scripted stand-in
//! when no token is configured) and times each response.

mod config;
mod conversation;
mod llm;
mod markdown;
mod stopwatch;
mod tui;

use config::ChatConfig;
use conversation::ConversationController;
use std::fs::OpenOptions;
use std::sync::Mutex;
use stopwatch::StopwatchTimer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env();

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| "timed_chat=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::info!(
        mode = config.mode().label(),
        log = %config.log_path.display(),
        "Starting timed chat"
    );

    let controller = ConversationController::from_config(&config, StopwatchTimer::new())?;
    tui::run(tui::App::new(controller)).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
