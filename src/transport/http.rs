// Copyright (c) 2025 - Cowboy AI, Inc.

//! HTTP transport
//!
//! Posts each event as JSON to the per-organization endpoint:
//!
//! ```text
//! POST {base_url}/orgs/{organization_id}/artifact
//! Authorization: Bearer {api_key}
//! ```
//!
//! Any status >= 400 is a [`TransportError::Status`] carrying the code and at
//! most [`MAX_ERROR_BODY_BYTES`] of the response body. The client carries a hard
//! timeout, so a stuck endpoint surfaces as a [`TransportError::Request`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{dry_run, Delivery, DeliveryOutcome, Transport, TransportError};
use crate::config::{DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT};
use crate::events::Event;

/// Upper bound on how much of an error response body is kept
pub const MAX_ERROR_BODY_BYTES: usize = 4096;

/// Configuration for the HTTP transport
#[derive(Clone)]
pub struct HttpConfig {
    /// API base URL (e.g., "https://api.massdriver.cloud")
    pub base_url: String,
    pub organization_id: String,
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(organization_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            organization_id: organization_id.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("organization_id", &self.organization_id)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Request/response transport
pub struct HttpTransport {
    config: HttpConfig,
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| TransportError::Request(format!("Invalid API key: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                TransportError::Request(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Endpoint events are posted to
    pub fn endpoint(&self) -> String {
        format!(
            "{}/orgs/{}/artifact",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.organization_id)
        )
    }

    fn describe(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Request(format!(
                "request timed out after {}s: {}",
                self.config.timeout.as_secs_f64(),
                err
            ))
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Read at most `limit` bytes of the response body
async fn bounded_body(mut response: Response, limit: usize) -> String {
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading error body: {}", e);
                break;
            }
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn publish(&self, event: &Event) -> DeliveryOutcome {
        if self.config.organization_id.trim().is_empty() {
            return dry_run(self.name(), event);
        }

        let body = event.to_vec()?;
        let url = self.endpoint();

        debug!(url = %url, event_type = %event.event_type(), "Posting event");

        let response = self
            .client
            .post(&url)
            .body(body)
            .send()
            .await
            .map_err(|e| self.describe(e))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = bounded_body(response, MAX_ERROR_BODY_BYTES).await;
            error!(url = %url, status = status.as_u16(), "Event rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            organization_id = %self.config.organization_id,
            event_type = %event.event_type(),
            status = status.as_u16(),
            "Event published"
        );
        Ok(Delivery::Delivered)
    }

    fn name(&self) -> &str {
        "http"
    }
}
