use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use weather_api::{AppState, build_app};
use weather_core::{Config, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-api", version, about = "Current weather and forecasts over HTTP")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to bind, overrides `server.host`.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store the provider credentials interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = Config::resolve_path(self.config.as_deref())?;

        match self.command {
            Command::Serve { host, port } => {
                let mut config = Config::load_from(&path)?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                serve(config).await
            }
            Command::Configure => configure(&path),
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let provider = provider_from_config(&config)?;
    info!(provider = ?provider, "Weather provider ready");

    let app = build_app(AppState::new(provider), &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Weather API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Weather API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

fn configure(path: &Path) -> anyhow::Result<()> {
    let mut cfg = Config::from_file(path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;

    let base_url = Text::new("API base URL:")
        .with_default(&cfg.provider.base_url)
        .prompt()?;

    let lang = Text::new("Description language:")
        .with_default(&cfg.provider.lang)
        .prompt()?;

    if !api_key.trim().is_empty() {
        cfg.set_provider_api_key(api_key.trim().to_string());
    }
    cfg.provider.base_url = base_url;
    cfg.provider.lang = lang;

    if !cfg.is_provider_configured() {
        warn!("No API key stored yet; `serve` will need WEATHER_API_KEY");
    }

    cfg.save_to(path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
