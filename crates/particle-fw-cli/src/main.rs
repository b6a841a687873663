//! particle-fw-upload - upload product firmware to the Particle cloud
//!
//! Runs as a CI step (inputs from `INPUT_*` environment variables, as set by a
//! GitHub Actions runner) or from a terminal with the same inputs as flags.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use particle_fw_client::{
    action, inputs, FirmwareUploader, InputSource, Reporter, UploaderConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::output::{OutputContext, OutputStyle};

#[derive(Parser)]
#[command(name = "particle-fw-upload")]
#[command(author, version, about = "Upload product firmware to the Particle cloud")]
struct Cli {
    /// Particle access token (40 characters)
    #[arg(long, env = "INPUT_PARTICLE-ACCESS-TOKEN", hide_env_values = true)]
    particle_access_token: Option<String>,

    /// Path to the firmware binary
    #[arg(long, env = "INPUT_FIRMWARE-PATH")]
    firmware_path: Option<String>,

    /// Firmware version (integer)
    #[arg(long, env = "INPUT_FIRMWARE-VERSION")]
    firmware_version: Option<String>,

    /// Product ID or slug
    #[arg(long, env = "INPUT_PRODUCT-ID")]
    product_id: Option<String>,

    /// Firmware title
    #[arg(long, env = "INPUT_TITLE")]
    title: Option<String>,

    /// Firmware description
    #[arg(long, env = "INPUT_DESCRIPTION")]
    description: Option<String>,

    /// Particle API base URL
    #[arg(long, env = "PARTICLE_API_URL")]
    api_url: Option<String>,

    /// Uploader configuration file (YAML)
    #[arg(short, long, env = "PARTICLE_UPLOAD_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Only print the failure message
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl InputSource for Cli {
    fn input(&self, name: &str) -> Option<String> {
        let value = match name {
            inputs::ACCESS_TOKEN => &self.particle_access_token,
            inputs::FIRMWARE_PATH => &self.firmware_path,
            inputs::FIRMWARE_VERSION => &self.firmware_version,
            inputs::PRODUCT_ID => &self.product_id,
            inputs::TITLE => &self.title,
            inputs::DESCRIPTION => &self.description,
            _ => return None,
        };
        value.clone()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the status lines
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut ctx = OutputContext::new(OutputStyle::detect(), cli.no_color, cli.quiet);

    let uploader = match create_uploader(&cli) {
        Ok(uploader) => uploader,
        Err(e) => {
            ctx.set_failed(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    if action::run(&cli, &uploader, &mut ctx).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Load config file, apply CLI overrides, and build the uploader
fn create_uploader(cli: &Cli) -> Result<FirmwareUploader> {
    let mut config = match &cli.config {
        Some(path) => UploaderConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => UploaderConfig::default(),
    };

    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }

    debug!("Using Particle API at {}", config.base_url);

    FirmwareUploader::with_config(config).context("Failed to create firmware uploader")
}
