// @zen-component: CHAT-UpstreamRelay
//
//! Upstream completion client and the fragment relay stream.
//!
//! 1. Resolves the API key through a [`CredentialProvider`]
//! 2. Prepends the system prompt and POSTs `{model, stream: true, messages}`
//! 3. Feeds the response body through a [`RecordParser`]
//! 4. Yields each text fragment as its own [`Bytes`] chunk as soon as it is decoded
//!
//! The returned stream owns the upstream response. Dropping it (for example
//! when the downstream client disconnects) drops the upstream connection.

use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::CredentialProvider;
use crate::models::ChatMessage;
use crate::prompt;
use crate::records::RecordParser;

/// OpenRouter chat completions endpoint.
pub const DEFAULT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model requested from the upstream provider.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct:free";

/// Errors raised while opening or relaying the upstream stream.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Upstream API key is not configured")]
    MissingCredential,

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream stream read failed: {0}")]
    Read(String),
}

/// Boxed stream of text fragments, ready to become a response body.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send>>;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: &'a [ChatMessage],
}

/// Client for the upstream streaming completion API.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl CompletionClient {
    pub fn new(endpoint: Url, model: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, model)
    }

    /// Create a completion client sharing an existing reqwest client.
    pub fn with_client(client: reqwest::Client, endpoint: Url, model: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Open the upstream stream for `turns` and relay its fragments.
    ///
    /// Fails before any network call when the credential is missing.
    pub async fn stream(
        &self,
        credentials: &dyn CredentialProvider,
        turns: Vec<ChatMessage>,
    ) -> Result<FragmentStream, RelayError> {
        let api_key = credentials
            .api_key()
            .ok_or(RelayError::MissingCredential)?;
        let response = self.open(&api_key, turns).await?;
        Ok(relay_fragments(response.bytes_stream()))
    }

    /// Send the completion request and check the status.
    ///
    /// The system prompt is prepended here; callers pass only conversation turns.
    pub async fn open(
        &self,
        api_key: &str,
        turns: Vec<ChatMessage>,
    ) -> Result<reqwest::Response, RelayError> {
        let messages = prompt::with_system_prompt(turns);
        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            messages = messages.len(),
            "opening upstream completion stream"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.model,
                stream: true,
                messages: &messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

/// Turn a raw upstream byte stream into a stream of text fragments.
///
/// Each fragment is yielded on its own, in upstream order, as soon as the
/// record carrying it is complete. A read error ends the stream with
/// [`RelayError::Read`]; the sentinel ends it normally without reading further.
pub fn relay_fragments<S, E>(byte_stream: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut upstream = Box::pin(byte_stream);
        let mut parser = RecordParser::new();

        while let Some(chunk) = upstream.next().await {
            let chunk = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("upstream read failed: {e}");
                    yield Err(RelayError::Read(e.to_string()));
                    return;
                }
            };

            let feed = parser.feed(&chunk);
            for fragment in feed.fragments {
                yield Ok(Bytes::from(fragment));
            }
            if feed.done {
                debug!("upstream sent end-of-stream sentinel");
                return;
            }
        }

        for fragment in parser.finish().fragments {
            yield Ok(Bytes::from(fragment));
        }
        debug!("upstream stream exhausted");
    })
}
