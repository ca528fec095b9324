//! Serve command - run the HTTP API.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Args;
use deepfake_server::config::defaults;
use deepfake_server::{load_model, router, serve, AppConfig, AppState};
use tracing::{info, warn};

use super::ModelArgs;

/// Parse a port number, rejecting 0.
fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid port"))?;
    if port == 0 {
        return Err("port must be 1-65535".to_string());
    }
    Ok(port)
}

/// Parse a body limit in bytes, rejecting 0.
fn parse_body_limit(s: &str) -> Result<usize, String> {
    let limit: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid byte count"))?;
    if limit == 0 {
        return Err("body limit must be greater than 0".to_string());
    }
    Ok(limit)
}

/// Arguments for the serve command.
#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind [default: 127.0.0.1]
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to bind [default: 8000]
    #[arg(short, long, value_parser = parse_port)]
    pub port: Option<u16>,

    /// Maximum request body in bytes [default: 20 MiB]
    #[arg(long, value_name = "BYTES", value_parser = parse_body_limit)]
    pub body_limit: Option<usize>,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ServeArgs {
    /// Resolve the bind address: CLI > config > default.
    ///
    /// An unparsable host in config is reported and replaced by the default.
    #[must_use]
    pub fn addr(&self, config: &AppConfig) -> SocketAddr {
        let host = self.host.unwrap_or_else(|| {
            config
                .server
                .host
                .as_deref()
                .and_then(|h| match h.parse() {
                    Ok(ip) => Some(ip),
                    Err(_) => {
                        warn!("Ignoring invalid config value: server.host '{h}'");
                        None
                    }
                })
                .unwrap_or(defaults::HOST)
        });
        let port = self
            .port
            .or(config.server.port)
            .unwrap_or(defaults::PORT);
        SocketAddr::new(host, port)
    }

    /// Resolve the request body limit: CLI > config > default.
    #[must_use]
    pub fn body_limit(&self, config: &AppConfig) -> usize {
        self.body_limit
            .or(config.server.body_limit)
            .unwrap_or(defaults::BODY_LIMIT)
    }
}

/// Run the serve command.
///
/// Loads the model once, then serves until Ctrl-C. A model that fails to
/// load does not stop the server.
pub fn run(args: &ServeArgs, config: &AppConfig) -> Result<()> {
    let addr = args.addr(config);
    let body_limit = args.body_limit(config);
    let settings = args.model.with_config(config);

    let classifier = load_model(&settings);
    let state = AppState::new(classifier);
    if !state.is_ready() {
        warn!("Starting without a model; predictions will fail");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    info!(%addr, body_limit, "Starting server");
    runtime.block_on(serve(addr, router(state, body_limit)))
}
