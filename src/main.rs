mod api;
mod i18n;
mod skill;

use besso_core::config;
use besso_core::envelope::RequestEnvelope;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "besso", version, about = "Besso — front-desk voice skill")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, env = "BESSO_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the skill endpoint.
    Serve,
    /// Show configuration and document store availability.
    Status,
    /// Answer one request envelope and print the response.
    Invoke {
        /// JSON file holding the request envelope, or `-` for stdin.
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.besso.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !Path::new(&cli.config).exists() {
        info!("config file not found at {}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Serve => {
            let store = besso_store::connect(&cfg.store);
            let skill = Arc::new(skill::Skill::new(store));
            info!("{} starting", cfg.besso.name);
            api::serve(&cfg.server, skill).await?;
        }
        Commands::Status => {
            println!("{} — Status Check\n", cfg.besso.name);
            println!("Config: {}", cli.config);
            println!("Endpoint: http://{}:{}/skill", cfg.server.host, cfg.server.port);
            println!("Store backend: {}", cfg.store.backend.display_name());
            println!();

            match besso_store::connect(&cfg.store) {
                besso_store::StoreHandle::Ready(store) => {
                    println!("  store: ready ({})", store.name());
                }
                besso_store::StoreHandle::Unavailable(reason) => {
                    println!("  store: unavailable — {reason}");
                }
            }
        }
        Commands::Invoke { path } => {
            let raw = read_input(&path)?;
            let envelope: RequestEnvelope = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid request envelope in {path}: {e}"))?;

            let skill = skill::Skill::new(besso_store::connect(&cfg.store));
            let response = skill.dispatch(&envelope).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Read a whole file, or stdin for `-`.
fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("failed to read {path}: {e}"))
}
