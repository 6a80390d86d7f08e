//! ExploreMore chat relay server binary.
//!
//! Serves `POST /api/chat` for the website chat widget. The upstream API key
//! is read from the environment on every request, so the server starts even
//! when it is not set yet.

use clap::Parser;
use explore_api::config::ApiConfig;
use tracing::{info, warn};
use url::Url;

/// CLI arguments for the relay server.
///
/// Every flag overrides the matching environment variable read by
/// [`ApiConfig::from_env`].
#[derive(Parser, Debug)]
#[command(name = "explore_api_server", about = "ExploreMore chat relay server")]
struct Args {
    /// Address to listen on (default `127.0.0.1:3000`).
    #[arg(long)]
    bind_addr: Option<String>,

    /// Upstream chat completions endpoint.
    #[arg(long)]
    upstream_url: Option<Url>,

    /// Model identifier requested upstream.
    #[arg(long)]
    upstream_model: Option<String>,

    /// Environment variable holding the upstream API key.
    #[arg(long)]
    api_key_var: Option<String>,
}

impl Args {
    fn apply(self, base: ApiConfig) -> ApiConfig {
        ApiConfig {
            bind_addr: self.bind_addr.unwrap_or(base.bind_addr),
            upstream_url: self.upstream_url.unwrap_or(base.upstream_url),
            upstream_model: self.upstream_model.unwrap_or(base.upstream_model),
            api_key_var: self.api_key_var.unwrap_or(base.api_key_var),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,explore_api=debug,explore_core=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.apply(ApiConfig::from_env()?);

    info!(
        upstream = %config.upstream_url,
        model = %config.upstream_model,
        "starting explore_api_server"
    );
    if std::env::var(&config.api_key_var).is_err() {
        warn!(
            var = %config.api_key_var,
            "upstream API key not set; chat requests will fail until it is"
        );
    }

    let state = explore_api::AppState::from_config(config.clone());
    let app = explore_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "chat relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("chat relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
