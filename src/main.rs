use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use clinivoice::{
    Config, DemoCycle, HttpTranscriptionClient, MicrophoneBackend, RecordingController,
    SessionEvents,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// Console harness for the voice capture pipeline.
#[derive(Parser)]
#[command(name = "clinivoice")]
struct Args {
    /// Config file (without extension), as read by the `config` crate
    #[arg(long, default_value = "config/clinivoice")]
    config: String,

    /// Run the scripted demo animation on startup
    #[arg(long)]
    demo: bool,
}

struct ConsoleEvents;

impl SessionEvents for ConsoleEvents {
    fn on_start(&self) {
        info!("recording started");
    }

    fn on_stop(&self, duration_secs: u64, transcript: Option<String>) {
        match transcript {
            Some(text) => info!("recorded {}s: {}", duration_secs, text),
            None => info!("stopped after {}s (no transcript)", duration_secs),
        }
    }

    fn on_error(&self, message: &str) {
        error!("{}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    info!("{} starting", cfg.service.name);

    let controller = RecordingController::new(
        Arc::new(MicrophoneBackend),
        Arc::new(HttpTranscriptionClient::new(&cfg.transcription.base_url)),
        Arc::new(ConsoleEvents),
        DemoCycle::from(&cfg.demo),
        args.demo || cfg.demo.enabled,
    );
    controller.mount().await;

    info!("press Enter to toggle recording, q+Enter to quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" {
            break;
        }
        controller.toggle().await;
        info!(
            "state: {}, elapsed: {}s",
            controller.state().await.label(),
            controller.elapsed_seconds()
        );
    }

    controller.shutdown().await;
    Ok(())
}
