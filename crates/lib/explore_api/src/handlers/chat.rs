// @zen-component: CHAT-RelayHandler
//
//! Chat relay handler. Streams the assistant reply back as plain text.
//!
//! `POST /api/chat` that:
//! 1. Parses the body as a JSON array of `{role, content}` turns
//! 2. Resolves the upstream API key (missing key fails the request)
//! 3. Opens the upstream completion stream with the system prompt prepended
//! 4. Streams each decoded text fragment back as soon as it arrives
//!
//! Nothing is stored between requests.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use explore_core::models::ChatMessage;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Content type of the streamed reply.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// `POST /api/chat`: relay a transcript to the upstream model.
pub async fn chat_handler(State(state): State<AppState>, body: Bytes) -> AppResult<Response> {
    let turns: Vec<ChatMessage> = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    info!(turns = turns.len(), "relaying chat request");

    let fragments = state
        .completions
        .stream(state.credentials.as_ref(), turns)
        .await?;

    debug!("upstream stream opened");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(fragments))
        .map_err(|e| AppError::Internal(format!("Response build failed: {e}")))
}
