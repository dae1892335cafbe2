//! ESS polling service binary

use anyhow::Context;
use clap::Parser;
use tracing::info;

use common::logging::{self, LogConfig};
use essrv::cli::{self, Args, Command};
use essrv::simulator::SimProfile;
use essrv::{EssConfig, EssService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let command = args.command.clone().unwrap_or(Command::Run);

    if let Command::Sample {
        profile,
        fingerprint,
    } = command
    {
        init_logging(&LogConfig::default(), &args)?;
        let profile: SimProfile = profile.parse()?;
        let output = cli::sample(profile, fingerprint).await?;
        print_document("settings", output.settings.as_deref())?;
        print_document("sample", output.sample.as_deref())?;
        return Ok(());
    }

    let config = EssConfig::load(Some(&args.config))
        .with_context(|| format!("loading {}", args.config.display()))?;
    init_logging(&config.logging, &args)?;

    match command {
        Command::Validate => {
            config.validate()?;
            info!("Configuration is valid: {}", cli::summary(&config));
        },
        _ => {
            info!("Starting {} v{}", config.service.name, env!("CARGO_PKG_VERSION"));
            EssService::new(config)?.run().await?;
        },
    }
    Ok(())
}

fn init_logging(config: &LogConfig, args: &Args) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(level) = &args.log_level {
        config.level = level.clone();
    }
    if args.no_color {
        config.ansi = false;
    }
    logging::init_with_config(&config)?;
    Ok(())
}

fn print_document(label: &str, json: Option<&str>) -> anyhow::Result<()> {
    match json {
        Some(json) => {
            let value: serde_json::Value = serde_json::from_str(json)?;
            println!("{}:\n{}", label, serde_json::to_string_pretty(&value)?);
        },
        None => println!("{}: (none)", label),
    }
    Ok(())
}
