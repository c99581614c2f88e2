//! Kindling CLI - cluster bootstrap asset generator
//!
//! Usage: kindling <COMMAND>
//!
//! Commands:
//!   create  Resolve an asset and write its files

mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use kindling::application::{Session, SessionOptions};
use kindling::assets::{AssetKind, ClusterAsset, ClusterCatalog};
use kindling::config::{Config, ConfigWarning};
use kindling::domain::value_objects::CancellationToken;
use kindling::infrastructure::{DirectoryFetcher, DirectoryMaterializer};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Create {
            target,
            dir,
            subtree,
            parallel,
        } => cmd_create(
            target,
            dir,
            cli.config.as_deref(),
            subtree,
            parallel,
            cli.json,
        ),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let (config, warnings) = match explicit {
        Some(path) => Config::load_with_warnings(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::load_or_default(Some(Path::new(".")))?,
    };
    for warning in &warnings {
        report_warning(warning);
    }

    let config = config.with_env_overrides();
    if let Some(image) = &config.release.image {
        warn!(image = %image, "release image override applied");
    }
    Ok(config)
}

fn report_warning(warning: &ConfigWarning) {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    match &warning.suggestion {
        Some(suggestion) => warn!(
            key = %warning.key,
            %location,
            "unknown config key (did you mean '{}'?)",
            suggestion
        ),
        None => warn!(key = %warning.key, %location, "unknown config key"),
    }
}

fn cmd_create(
    target: AssetKind,
    dir: Option<PathBuf>,
    config_path: Option<&Path>,
    subtree: bool,
    parallel: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let dir = dir.unwrap_or_else(|| config.output.directory.clone());

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install the interrupt handler")?;

    let context = config.to_context().with_cancellation(token);
    let options = SessionOptions::from(&config.output)
        .with_subtree(subtree || config.output.include_subtree)
        .with_parallel(parallel || config.output.parallel);

    let fetcher = DirectoryFetcher::new(&dir);
    let materializer = DirectoryMaterializer::new(&dir);
    let session = Session::new(ClusterCatalog, &context, &fetcher).with_options(options);

    let (output, report) = session
        .create::<ClusterAsset>(target, &materializer)
        .with_context(|| format!("failed to create {target}"))?;

    if json {
        let loaded: Vec<String> = output.loaded().map(|kind| kind.to_string()).collect();
        let summary = serde_json::json!({
            "target": target.to_string(),
            "directory": dir.display().to_string(),
            "written": report.written,
            "loaded": loaded,
        });
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        for path in &report.written {
            println!("wrote {}", dir.join(path).display());
        }
        for kind in output.loaded() {
            println!("reused {}", kind.display_name());
        }
    }

    Ok(())
}
