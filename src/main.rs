//! Offline tooling for the proxy runtime.
//!
//! Resolves and installs engine configuration into a home directory the same
//! way `LifecycleController::setup` does, without an engine attached.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use proxy_runtime::config::{load_config, ConfigResolver, ConfigStore, RuntimeConfig};
use proxy_runtime::engine::HomeLayout;
use proxy_runtime::lifecycle::home::{ensure_dataset_dirs, prepare_home};
use proxy_runtime::observability::init_logging;

#[derive(Parser)]
#[command(name = "proxy-runtime")]
#[command(about = "Config tooling for the embedded proxy runtime", long_about = None)]
struct Cli {
    /// Runtime config (TOML); defaults apply when omitted
    #[arg(short = 'c', long)]
    runtime_config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a config source would be interpreted
    Resolve {
        /// Home directory relative paths are resolved against
        #[arg(long)]
        home: String,
        /// File path, base64 payload or raw config text; `-` reads stdin
        source: String,
    },
    /// Resolve a config source and write it into a home directory
    Install {
        /// Home directory, created if missing
        #[arg(long)]
        home: String,
        /// File path, base64 payload or raw config text; `-` reads stdin
        source: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.runtime_config {
        Some(path) => load_config(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    init_logging(&config.observability)?;

    let report = match cli.command {
        Commands::Resolve { home, source } => {
            let home = std::path::absolute(&home)?;
            let layout = HomeLayout::new(&home, &config.layout);
            let resolved = ConfigResolver::new(&layout).resolve(&read_source(source)?)?;
            json!({
                "source": resolved.source,
                "path": resolved.path,
                "size": resolved.bytes.len(),
            })
        }
        Commands::Install { home, source } => {
            let home = prepare_home(&home)?;
            let layout = HomeLayout::new(&home, &config.layout);
            let resolved = ConfigResolver::new(&layout).resolve(&read_source(source)?)?;
            let written = ConfigStore::new(&layout.config_file)
                .persist(&resolved.bytes, Some(resolved.path.as_path()))?;
            ensure_dataset_dirs(&layout);
            tracing::info!(path = %written.display(), "Config installed");
            json!({
                "source": resolved.source,
                "path": written,
                "size": resolved.bytes.len(),
                "dataset_dirs": layout.dataset_dirs(),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_source(source: String) -> std::io::Result<String> {
    if source != "-" {
        return Ok(source);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
