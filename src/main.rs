use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use voxbridge_core::AppConfig;
use voxbridge_engine::EngineRegistry;
use voxbridge_session::{shutdown_channel, Session};
use voxbridge_sink::SinkRegistry;

#[derive(Parser)]
#[command(name = "voxbridge", about = "Microphone to transcript bridge")]
struct Cli {
    /// Path to the configuration file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Capture device name (overrides the config)
    #[arg(long)]
    device: Option<String>,

    /// Model directory (overrides the config)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Speech engine to use (overrides the config)
    #[arg(long)]
    engine: Option<String>,

    /// List capture devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {path:?}"))?,
        None => {
            let default_path = PathBuf::from("config.toml");
            if default_path.exists() {
                AppConfig::load_from_file(&default_path)
                    .context("failed to load config from config.toml")?
            } else {
                AppConfig::default()
            }
        }
    };

    if let Some(device) = &cli.device {
        config.audio.device_name = device.clone();
    }
    if let Some(engine) = &cli.engine {
        config.engine.name = engine.clone();
    }
    if let Some(model) = &cli.model {
        let vosk = config.engine.vosk.get_or_insert_with(Default::default);
        vosk.model_path = Some(model.to_string_lossy().into_owned());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // stdout carries the transcript protocol; all diagnostics go to stderr.
    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if cli.list_devices {
        let manager = voxbridge_audio::DeviceManager::new();
        let devices = manager
            .list_input_devices()
            .context("failed to enumerate capture devices")?;
        for (name, _) in devices {
            println!("{name}");
        }
        return Ok(());
    }

    tracing::info!("voxbridge starting");

    let engines = EngineRegistry::new();
    let sinks = SinkRegistry::new();

    let (shutdown, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            shutdown.request();
        }
    });

    let mut session = Session::start(&config, &engines, &sinks, shutdown_rx)
        .await
        .context("failed to start session")?;

    // Release runs on every exit path; only then is the outcome surfaced.
    let outcome = session.run().await;
    session.stop().await;
    outcome.context("session terminated abnormally")?;

    Ok(())
}
