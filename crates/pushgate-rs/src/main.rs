//! Command-line front end: validate a config or send a dry-run notification.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use pushgate_rs::channel::DryRunChannel;
use pushgate_rs::config::{PathSanitizer, PushConfig};
use pushgate_rs::protocol::NotificationOptions;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line options for the pushgate binary.
#[derive(Parser)]
#[command(name = "pushgate", version = pushgate_rs::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a config file and print the resolved key path
    Check {
        /// Path to the JSON config file
        #[arg(long)]
        config: PathBuf,
    },
    /// Send a notification through the dry-run channel
    Send(SendArgs),
}

#[derive(Args)]
struct SendArgs {
    /// Path to the JSON config file
    #[arg(long)]
    config: PathBuf,
    /// Optional `.json` file with the custom payload
    #[arg(long)]
    payload: Option<PathBuf>,
    /// Alert text
    #[arg(long)]
    alert: Option<String>,
    /// Badge count
    #[arg(long)]
    badge: Option<u32>,
    /// Sound file name
    #[arg(long)]
    sound: Option<String>,
    /// Seconds until the notification expires
    #[arg(long)]
    expiry: Option<u64>,
}

impl SendArgs {
    fn options(&self) -> NotificationOptions {
        NotificationOptions {
            alert: self.alert.clone().map(Into::into),
            badge: self.badge,
            sound: self.sound.clone(),
            expiry: self.expiry,
            ..NotificationOptions::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pushgate_rs::init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { config } => check(&config),
        Command::Send(args) => send(args).await,
    }
}

fn check(path: &Path) -> anyhow::Result<()> {
    info!("checking config (path={})", path.display());
    let config = PushConfig::load_from_path(path).context("failed to load config")?;
    println!("config ok: key file {}", config.key_path().display());
    Ok(())
}

async fn send(args: SendArgs) -> anyhow::Result<()> {
    let payload = match args.payload.as_deref() {
        Some(path) => read_payload(path)?,
        None => Value::Object(Default::default()),
    };
    let options = args.options();
    debug!(
        "send options (alert_set={}, badge={:?}, expiry={:?})",
        options.alert.is_some(),
        options.badge,
        options.expiry
    );

    let client = pushgate_rs::create_from_config(&args.config, Arc::new(DryRunChannel::new()))
        .context("failed to load config")?;
    let result = client
        .send(payload, &options)
        .await
        .context("failed to send notification")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("failed to encode result")?
    );
    if !result.success {
        bail!("no device accepted the notification");
    }
    Ok(())
}

/// Read a payload file. The path is sanitized like any config path.
fn read_payload(path: &Path) -> anyhow::Result<Value> {
    let path = PathSanitizer::config_files()
        .sanitize(path)
        .with_context(|| format!("invalid payload path {}", path.display()))?;
    let contents = std::fs::read(&path)
        .with_context(|| format!("failed to read payload {}", path.display()))?;
    serde_json::from_slice(&contents)
        .with_context(|| format!("failed to parse payload {}", path.display()))
}
