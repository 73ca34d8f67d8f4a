//! JetStream-backed queue client
//!
//! Messages are published to the destination subject with:
//! - `Nats-Msg-Id` set to the deduplication id, so JetStream drops retried sends
//!   inside its duplicate window
//! - [`GROUP_ID_HEADER`] set to the deployment id
//!
//! The publish awaits the stream acknowledgement before returning, which keeps
//! events of one deployment in publish order.
//!
//! The connection is opened lazily on the first send; a provider running in
//! dry-run mode never dials the server.

use async_nats::jetstream;
use async_nats::{ConnectOptions, HeaderMap};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::queue::{QueueClient, QueueMessage};
use super::TransportError;

/// Header carrying the ordering group of a message
pub const GROUP_ID_HEADER: &str = "Provisioner-Group-Id";

/// Configuration for the JetStream connection
#[derive(Clone)]
pub struct NatsQueueConfig {
    /// NATS server URL
    pub url: String,
    /// Auth token presented on connect
    pub token: String,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Publish acknowledgement timeout
    pub request_timeout: Duration,
}

impl NatsQueueConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            name: "provisioner-events".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for NatsQueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NatsQueueConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("name", &self.name)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Queue client publishing through NATS JetStream
pub struct JetStreamQueueClient {
    config: NatsQueueConfig,
    context: OnceCell<jetstream::Context>,
}

impl JetStreamQueueClient {
    pub fn new(config: NatsQueueConfig) -> Self {
        Self {
            config,
            context: OnceCell::new(),
        }
    }

    async fn context(&self) -> Result<&jetstream::Context, TransportError> {
        self.context
            .get_or_try_init(|| async {
                let options = ConnectOptions::with_token(self.config.token.clone())
                    .name(&self.config.name)
                    .connection_timeout(self.config.connect_timeout)
                    .request_timeout(Some(self.config.request_timeout));

                let client = async_nats::connect_with_options(self.config.url.as_str(), options)
                    .await
                    .map_err(|e| TransportError::Connection(e.to_string()))?;

                info!("Connected to NATS at {}", self.config.url);
                Ok::<_, TransportError>(jetstream::new(client))
            })
            .await
    }
}

#[async_trait]
impl QueueClient for JetStreamQueueClient {
    async fn send(&self, message: QueueMessage) -> Result<(), TransportError> {
        let context = self.context().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            async_nats::header::NATS_MESSAGE_ID,
            message.deduplication_id.as_str(),
        );
        headers.insert(GROUP_ID_HEADER, message.group_id.as_str());

        let ack = context
            .publish_with_headers(
                message.destination.clone(),
                headers,
                Bytes::from(message.message.into_bytes()),
            )
            .await
            .map_err(|e| TransportError::Queue(e.to_string()))?
            .await
            .map_err(|e| TransportError::Queue(e.to_string()))?;

        if ack.duplicate {
            debug!(
                deduplication_id = %message.deduplication_id,
                "JetStream reported duplicate message"
            );
        }

        debug!(
            subject = %message.destination,
            stream = %ack.stream,
            sequence = ack.sequence,
            "Queue acknowledged message"
        );
        Ok(())
    }
}
