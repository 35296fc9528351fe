use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coachgate::admission::AdmissionCounter;
use coachgate::config::GatewayConfig;
use coachgate::http::{AppState, ChatSettings, HttpServer};
use coachgate::upstream::{OpenAiChat, SheetsWebhook};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "coachgate")]
#[command(about = "Rate-limited gateway for the practice chat and lead capture")]
#[command(version)]
struct Args {
    /// Configuration file (YAML); environment overrides use the COACHGATE_ prefix
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    info!("Starting Coachgate");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = GatewayConfig::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    info!(listen_addr = %config.server.listen_addr, "Configuration loaded");

    let policy = config.admission_policy()?;
    let admission = Arc::new(AdmissionCounter::new(policy));
    info!(
        limit = policy.limit(),
        window_secs = policy.window().as_secs(),
        "Admission counter initialized"
    );

    if config.chat.api_key.is_none() {
        warn!("No chat API key configured; practice chat will answer with fallback replies");
    }

    let client = reqwest::Client::new();
    let chat = Arc::new(OpenAiChat::new(client.clone(), &config.chat));
    let mut state = AppState::new(admission, chat, ChatSettings::from(&config.chat));

    match SheetsWebhook::from_config(client, &config.leads) {
        Some(webhook) => state = state.with_leads(Arc::new(webhook)),
        None => warn!("No lead webhook configured; contact form submissions will be refused"),
    }

    let server = HttpServer::new(config.server.listen_addr, state);
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Coachgate stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
