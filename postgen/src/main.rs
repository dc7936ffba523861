/*
postgen - HTTP server binary.
Loads layered TOML configuration plus environment credentials, then serves the post endpoints.
*/

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use common::Config;
use postgen::server::launch_rocket;

#[derive(Parser, Debug)]
#[command(name = "postgen", about = "Telegram post generator HTTP service")]
struct Args {
    /// Path to config.toml (merged over config.default.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override listen port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Override listen address
    #[arg(long, env = "BIND")]
    bind: Option<String>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.validate()?;
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    launch_rocket(&config).await?;

    info!("Shutdown complete");
    Ok(())
}
