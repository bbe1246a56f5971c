//! CLI entry point for ptingest.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use ptingest_core::{load_config, validate_config, IngestMode, Profile};

mod cli;
mod commands;

use cli::{Args, Command};
use commands::{add, client_from_config, setcategory};

#[tokio::main]
async fn main() {
    // Parse before tracing so --help works without logs
    let args = Args::parse();

    // RUST_LOG wins over -v
    let default_level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    debug!(?args, "CLI arguments parsed");

    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    match args.command {
        Command::Add(add_args) => {
            let options = add_args.flags.to_options();
            add::run(&config, &add_args.client, IngestMode::Remote, &add_args.ids, options).await?;
        }
        Command::Add2(add_args) => {
            let options = add_args.flags.to_options().with_profile(Profile::Add2);
            add::run(&config, &add_args.client, IngestMode::Remote, &add_args.ids, options).await?;
        }
        Command::AddLocal(local) => {
            if local.files.is_empty() {
                anyhow::bail!("no torrent files given");
            }
            let inputs = add::expand_inputs(&local.files)?;
            add::run(&config, &local.client, IngestMode::Local, &inputs, local.to_options()).await?;
        }
        Command::AddLocal2(local) => {
            let profile = Profile::AddLocal2;
            let inputs = add::expand_inputs(&local.inputs(Some(profile)))?;
            let options = local.to_options().with_profile(profile);
            add::run(&config, &local.client, profile.mode(), &inputs, options).await?;
        }
        Command::SetCategory(set) => {
            let client = client_from_config(&config, &set.client)?;
            setcategory::run(client.as_ref(), &set.category, &set.targets).await?;
        }
    }
    Ok(())
}
