//! Solax bridge configuration page: entry point.
//!
//! Loads `BaseConfig.json` from the data directory (falling back to defaults
//! when it is missing or unusable) and serves the configuration form over
//! HTTP until Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! solax-webui [OPTIONS]
//!
//! Options:
//!   --bind     <ADDR>  IP address to listen on [default: 0.0.0.0]
//!   --port     <PORT>  HTTP port [default: 8080]
//!   --data-dir <DIR>   Directory holding BaseConfig.json [default: ./data]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable         | Default   | Description                     |
//! |------------------|-----------|---------------------------------|
//! | `SOLAX_BIND`     | `0.0.0.0` | Listen address                  |
//! | `SOLAX_PORT`     | `8080`    | HTTP port                       |
//! | `SOLAX_DATA_DIR` | `./data`  | Directory for `BaseConfig.json` |
//!
//! Log output is filtered by `RUST_LOG` (default `info`).  The store's own
//! diagnostics are additionally gated by the `debuglevel` in the document.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use solax_core::{ConfigStore, DirFs};
use solax_webui::domain::ServerConfig;
use solax_webui::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Web configuration page for the Solax inverter bridge.
#[derive(Debug, Parser)]
#[command(
    name = "solax-webui",
    about = "Web configuration page for the Solax inverter bridge",
    version
)]
struct Cli {
    /// IP address to bind the HTTP server to.
    ///
    /// Use `127.0.0.1` to accept only local connections.
    #[arg(long, default_value = "0.0.0.0", env = "SOLAX_BIND")]
    bind: String,

    /// TCP port for the HTTP server.
    #[arg(long, default_value_t = 8080, env = "SOLAX_PORT")]
    port: u16,

    /// Directory standing in for the device filesystem.
    ///
    /// Created on startup if it does not exist.
    #[arg(long, default_value = "./data", env = "SOLAX_DATA_DIR")]
    data_dir: PathBuf,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        Ok(ServerConfig {
            bind_addr,
            data_dir: self.data_dir,
            ..ServerConfig::default()
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_server_config()?;

    let fs = DirFs::open(config.data_dir.clone()).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    let store = ConfigStore::open(fs);
    info!(
        "configuration {:?} from {} (mqtt {}:{}, debug level {})",
        store.state(),
        config.data_dir.display(),
        store.config().mqtt_server,
        store.config().mqtt_port,
        store.debug_level()
    );
    let store = Arc::new(Mutex::new(store));

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    run_server(config, store, running).await?;

    info!("solax-webui stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
