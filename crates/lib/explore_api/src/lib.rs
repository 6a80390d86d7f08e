//! # explore_api
//!
//! HTTP relay API for the ExploreMore chat widget.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use explore_core::credentials::{CredentialProvider, EnvCredentials};
use explore_core::upstream::CompletionClient;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, health};

/// Route paths served by [`router`].
pub mod routes {
    pub const POST_API_CHAT: &str = "/api/chat";
    pub const GET_API_HEALTH: &str = "/api/health";
}

/// Shared application state passed to all handlers.
///
/// Holds no per-request data: every relay call is independent.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Upstream completion client (shares one connection pool).
    pub completions: CompletionClient,
    /// Upstream credential source, consulted on every request.
    pub credentials: Arc<dyn CredentialProvider>,
}

impl AppState {
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        let completions =
            CompletionClient::new(config.upstream_url.clone(), config.upstream_model.clone());
        Self {
            config,
            completions,
            credentials,
        }
    }

    /// State reading the API key from the environment variable named in `config`.
    pub fn from_config(config: ApiConfig) -> Self {
        let credentials = Arc::new(EnvCredentials::new(config.api_key_var.clone()));
        Self::new(config, credentials)
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .layer(cors)
        .with_state(state)
}
