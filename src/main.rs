//! optiserve server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  OPTISERVE                    │
//!                         │                                               │
//!     Client Request      │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!     ────────────────────┼─▶│   net    │──▶│   http   │──▶│  router   │  │
//!     (:http / :https)    │  │listeners │   │ request  │   │  mounts   │  │
//!                         │  └──────────┘   │   id     │   └─────┬─────┘  │
//!                         │                 └──────────┘         │        │
//!                         │            ┌─────────────────────────┼──────┐ │
//!                         │            ▼                         ▼      │ │
//!                         │   ┌──────────────┐         ┌──────────────┐ │ │
//!                         │   │ static_files │         │    proxy     │ │ │
//!                         │   │ conditional  │         │ least-loaded │─┼─┼──▶ Upstreams
//!                         │   │     GET      │         │   upstream   │ │ │
//!                         │   └──────────────┘         └──────────────┘ │ │
//!                         │            application routes → encoding ───┘ │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use optiserve::config::{load_config, validate_config, ConfigError, ServerConfig};
use optiserve::observability::{logging, metrics};
use optiserve::Application;

#[derive(Parser)]
#[command(name = "optiserve")]
#[command(about = "Static files, reverse proxy and TLS in one small server", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the cleartext port.
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the debug flag.
    #[arg(long)]
    debug: Option<bool>,
}

impl Args {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.http_port {
            config.http_port = port;
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    args.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(config.debug, config.observability.log_format)?;
    tracing::info!("optiserve v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?)?;
    }

    let app = Application::from_config(config)?;
    app.run().await?;

    Ok(())
}
