use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use parley_models::ParleyConfig;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "parley",
    about = "Negotiation party - reads protocol events as JSON lines, writes actions as JSON lines"
)]
struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "config/parley.toml")]
    config: String,

    /// Read events from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Directory relative profile references resolve against
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Seed the bid sampler for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn load_config(path: &str) -> Result<ParleyConfig> {
    if !Path::new(path).exists() {
        tracing::info!(path, "Config file not found, using defaults");
        return Ok(ParleyConfig::default());
    }
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| "Failed to parse config")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only actions.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if cli.seed.is_some() {
        config.strategy.seed = cli.seed;
    }

    let mut party = parley::build_party(&config, cli.profile_dir);
    let mut stdout = std::io::stdout().lock();

    if let Some(input_path) = &cli.input {
        let file = tokio::fs::File::open(input_path)
            .await
            .with_context(|| format!("Failed to open input: {input_path}"))?;
        parley::drive(&mut party, BufReader::new(file), &mut stdout).await?;
    } else {
        parley::drive(&mut party, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    }

    Ok(())
}
