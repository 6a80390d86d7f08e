//! HTTP client for the relay endpoint.
//!
//! [`converse`] drives one full turn of a [`TranscriptController`]: submit,
//! POST the payload, feed every body chunk back, then complete or fail.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::ChatMessage;
use crate::transcript::{TranscriptController, TranscriptView};

/// Errors talking to the relay.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Relay returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Posts transcripts to the relay and exposes the streamed reply.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: Url,
}

impl RelayClient {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST `messages` as a JSON array and return the reply byte stream.
    ///
    /// A non-success status is an error; its body is never treated as reply text.
    pub async fn send(
        &self,
        messages: &[ChatMessage],
    ) -> Result<BoxStream<'static, Result<Bytes, reqwest::Error>>, ClientError> {
        debug!(url = %self.url, messages = messages.len(), "sending transcript to relay");
        let response = self.client.post(self.url.clone()).json(messages).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes_stream().boxed())
    }
}

/// Run one chat turn through `controller`.
///
/// Returns `Ok(false)` when the controller refused the submission (blank text
/// or a response already in flight). On error the controller has already been
/// notified and keeps whatever partial reply arrived.
pub async fn converse<V: TranscriptView>(
    controller: &mut TranscriptController<V>,
    client: &RelayClient,
    text: &str,
) -> Result<bool, ClientError> {
    let Some(payload) = controller.submit(text) else {
        return Ok(false);
    };

    let mut stream = match client.send(&payload).await {
        Ok(stream) => stream,
        Err(e) => {
            controller.on_error(&e);
            return Err(e);
        }
    };

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => controller.on_chunk(&bytes),
            Err(e) => {
                let e = ClientError::from(e);
                controller.on_error(&e);
                return Err(e);
            }
        }
    }

    controller.on_complete();
    Ok(true)
}
