// Copyright (c) 2025 - Cowboy AI, Inc.

//! Publisher selection
//!
//! Chooses the transport once, at provider configuration time:
//!
//! 1. `deployment_id`, `auth_token` and a non-blank `queue_endpoint` → queue
//! 2. else `organization_id` and `api_key` present → HTTP
//! 3. else `deployment_id`, `auth_token` and a blank `queue_endpoint` → queue (dry run)
//! 4. else → [`ProvisionerError::Configuration`] naming the missing fields
//!
//! A queue endpoint that is present but blank still selects queue mode when no
//! API configuration is complete. That is the development override: the
//! transport exists, but every publish becomes a dry run. A complete API
//! configuration always beats a blank queue endpoint.

use std::sync::Arc;
use tracing::info;

use crate::config::{non_empty, ProviderConfig};
use crate::errors::{ProvisionerError, ProvisionerResult};
use crate::transport::{
    HttpConfig, HttpTransport, JetStreamQueueClient, NatsQueueConfig, QueueTransport, Transport,
};

/// Which transport a configuration selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Queue,
    Http,
}

/// Decide the transport mode without constructing anything
pub fn select_mode(config: &ProviderConfig) -> ProvisionerResult<TransportMode> {
    let deployment = non_empty(&config.deployment_id);
    let token = non_empty(&config.auth_token);
    let endpoint_declared = config.queue_endpoint.is_some();
    let endpoint_live = non_empty(&config.queue_endpoint).is_some();

    let organization = non_empty(&config.organization_id);
    let api_key = non_empty(&config.api_key);
    let http_complete = organization.is_some() && api_key.is_some();

    if deployment.is_some() && token.is_some() && endpoint_declared {
        if endpoint_live || !http_complete {
            return Ok(TransportMode::Queue);
        }
        info!("Queue endpoint is blank, using the complete API configuration");
    }

    if http_complete {
        return Ok(TransportMode::Http);
    }

    let queue_started = deployment.is_some() || token.is_some() || endpoint_declared;
    let http_started = organization.is_some() || api_key.is_some();

    let mut missing = Vec::new();
    if queue_started || !http_started {
        if deployment.is_none() {
            missing.push("deployment_id");
        }
        if token.is_none() {
            missing.push("auth_token");
        }
        if !endpoint_declared {
            missing.push("queue_endpoint");
        }
    }
    if http_started || !queue_started {
        if organization.is_none() {
            missing.push("organization_id");
        }
        if api_key.is_none() {
            missing.push("api_key");
        }
    }

    Err(ProvisionerError::Configuration { missing })
}

/// Construct the transport selected by `config`
pub fn select_transport(config: &ProviderConfig) -> ProvisionerResult<Arc<dyn Transport>> {
    match select_mode(config)? {
        TransportMode::Queue => {
            let deployment_id = config.deployment();
            let destination = config.queue_endpoint.clone().unwrap_or_default();
            let token = config.auth_token.clone().unwrap_or_default();

            let client = JetStreamQueueClient::new(NatsQueueConfig::new(config.nats_url(), token));
            let transport = QueueTransport::new(Arc::new(client), deployment_id, destination);

            info!(
                deployment_id = %deployment_id,
                live = transport.is_live(),
                "Selected queue transport"
            );
            Ok(Arc::new(transport))
        }
        TransportMode::Http => {
            let http = HttpConfig::new(
                config.organization_id.clone().unwrap_or_default(),
                config.api_key.clone().unwrap_or_default(),
            )
            .with_base_url(config.api_url());

            let transport = HttpTransport::new(http)?;
            info!(endpoint = %transport.endpoint(), "Selected HTTP transport");
            Ok(Arc::new(transport))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn missing_of(config: &ProviderConfig) -> Vec<&'static str> {
        match select_mode(config) {
            Err(ProvisionerError::Configuration { missing }) => missing,
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_queue_mode_when_all_queue_fields_present() {
        let config = ProviderConfig {
            deployment_id: some("d-1"),
            auth_token: some("t"),
            queue_endpoint: some("events"),
            ..Default::default()
        };
        assert_eq!(select_mode(&config).unwrap(), TransportMode::Queue);
    }

    #[test]
    fn test_blank_endpoint_still_selects_queue_mode() {
        let config = ProviderConfig {
            deployment_id: some("d-1"),
            auth_token: some("t"),
            queue_endpoint: some(""),
            ..Default::default()
        };
        assert_eq!(select_mode(&config).unwrap(), TransportMode::Queue);
    }

    #[test]
    fn test_queue_mode_wins_when_both_complete() {
        let config = ProviderConfig {
            deployment_id: some("d-1"),
            auth_token: some("t"),
            queue_endpoint: some("events"),
            organization_id: some("org"),
            api_key: some("key"),
            ..Default::default()
        };
        assert_eq!(select_mode(&config).unwrap(), TransportMode::Queue);
    }

    #[test]
    fn test_complete_http_beats_blank_queue_endpoint() {
        let config = ProviderConfig {
            deployment_id: some("d-1"),
            auth_token: some("tok"),
            queue_endpoint: some(""),
            organization_id: some("org-1"),
            api_key: some("key"),
            ..Default::default()
        };
        assert_eq!(select_mode(&config).unwrap(), TransportMode::Http);
    }

    #[test]
    fn test_http_mode() {
        let config = ProviderConfig {
            organization_id: some("org"),
            api_key: some("key"),
            ..Default::default()
        };
        assert_eq!(select_mode(&config).unwrap(), TransportMode::Http);
    }

    #[test]
    fn test_empty_config_names_every_field() {
        assert_eq!(
            missing_of(&ProviderConfig::default()),
            vec![
                "deployment_id",
                "auth_token",
                "queue_endpoint",
                "organization_id",
                "api_key"
            ]
        );
    }

    #[test]
    fn test_partial_queue_config_names_queue_gaps() {
        let config = ProviderConfig {
            deployment_id: some("d-1"),
            ..Default::default()
        };
        assert_eq!(missing_of(&config), vec!["auth_token", "queue_endpoint"]);
    }

    #[test]
    fn test_partial_http_config_names_http_gaps() {
        let config = ProviderConfig {
            organization_id: some("org"),
            api_key: some("   "),
            ..Default::default()
        };
        assert_eq!(missing_of(&config), vec!["api_key"]);
    }

    #[tokio::test]
    async fn test_select_transport_builds_named_transport() {
        let queue = select_transport(&ProviderConfig {
            deployment_id: some("d-1"),
            auth_token: some("t"),
            queue_endpoint: some(""),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(queue.name(), "queue");

        let http = select_transport(&ProviderConfig {
            organization_id: some("org"),
            api_key: some("key"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(http.name(), "http");
    }
}
