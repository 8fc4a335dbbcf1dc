use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pixoo_snake::config::AppConfig;
use pixoo_snake::device::{DisplayDevice, DryRunDevice, FrameMetadata, HttpDevice};
use pixoo_snake::game::GameConfig;
use pixoo_snake::modes::{HeadlessMode, HumanMode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixoo_snake")]
#[command(version, about = "Snake on a 64x64 Pixoo LED matrix")]
struct Cli {
    /// How to run the game
    #[arg(long, value_enum, default_value = "play")]
    mode: Mode,

    /// JSON config file with `game` and `device` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Device endpoint, overrides the config file
    #[arg(long)]
    device_url: Option<String>,

    /// Write logs to this file (the terminal UI otherwise discards them)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Don't talk to a device, just run the game
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Steer with the keyboard and watch a preview in the terminal
    Play,
    /// Only drive the device; logs go to stderr
    Headless,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.mode, cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(url) = cli.device_url {
        config.device.url = url;
    }

    let metadata = FrameMetadata::from_config(&config.device);

    if cli.dry_run {
        run(cli.mode, config.game, DryRunDevice, metadata).await
    } else {
        let device = HttpDevice::new(&config.device).context("Failed to create HTTP client")?;
        run(cli.mode, config.game, device, metadata).await
    }
}

async fn run<D>(mode: Mode, config: GameConfig, device: D, metadata: FrameMetadata) -> Result<()>
where
    D: DisplayDevice + Clone + 'static,
{
    info!(device = %device.describe(), "starting");

    match mode {
        Mode::Play => {
            let mut human_mode = HumanMode::new(config, device, metadata);
            human_mode.run().await
        }
        Mode::Headless => HeadlessMode::new(config, device, metadata).run().await,
    }
}

fn init_tracing(mode: Mode, log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "pixoo_snake=info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (log_file, mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Mode::Headless) => builder.with_writer(std::io::stderr).init(),
        // Anything written to the terminal would tear the UI
        (None, Mode::Play) => builder.with_writer(std::io::sink).init(),
    }

    Ok(())
}
