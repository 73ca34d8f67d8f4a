// Copyright (c) 2025 - Cowboy AI, Inc.

//! Provider configuration
//!
//! Environment lookups happen exactly once, in [`EnvSettings::from_env`]. Everything
//! downstream receives plain values, so the pipeline never consults process state
//! on its own.
//!
//! ```text
//! EnvSettings ──defaults──> ProviderConfig ──select──> Arc<dyn Transport>
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const ENV_DEPLOYMENT_ID: &str = "MASSDRIVER_DEPLOYMENT_ID";
pub const ENV_TOKEN: &str = "MASSDRIVER_TOKEN";
pub const ENV_EVENT_TOPIC: &str = "MASSDRIVER_EVENT_TOPIC_ARN";
pub const ENV_ORG_ID: &str = "MASSDRIVER_ORG_ID";
pub const ENV_API_KEY: &str = "MASSDRIVER_API_KEY";
pub const ENV_PROVISIONER: &str = "MASSDRIVER_PROVISIONER";
pub const ENV_PACKAGE_NAME: &str = "MASSDRIVER_PACKAGE_NAME";
pub const ENV_NATS_URL: &str = "MASSDRIVER_NATS_URL";
pub const ENV_API_URL: &str = "MASSDRIVER_API_URL";

pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
pub const DEFAULT_API_URL: &str = "https://api.massdriver.cloud";

/// Client-side bound on a single HTTP publish
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Label identifying the process that emitted an event
///
/// Read once at startup and never mutated. An unset label is legal and
/// serializes as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provisioner(String);

impl Provisioner {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Provisioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the environment-sourced settings
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub deployment_id: Option<String>,
    pub auth_token: Option<String>,
    pub queue_endpoint: Option<String>,
    pub organization_id: Option<String>,
    pub api_key: Option<String>,
    pub provisioner: Option<String>,
    pub package_name: Option<String>,
    pub nats_url: Option<String>,
    pub api_url: Option<String>,
}

impl EnvSettings {
    /// Read the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            deployment_id: lookup(ENV_DEPLOYMENT_ID),
            auth_token: lookup(ENV_TOKEN),
            queue_endpoint: lookup(ENV_EVENT_TOPIC),
            organization_id: lookup(ENV_ORG_ID),
            api_key: lookup(ENV_API_KEY),
            provisioner: lookup(ENV_PROVISIONER),
            package_name: lookup(ENV_PACKAGE_NAME),
            nats_url: lookup(ENV_NATS_URL),
            api_url: lookup(ENV_API_URL),
        }
    }
}

impl fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSettings")
            .field("deployment_id", &self.deployment_id)
            .field("auth_token", &redact(&self.auth_token))
            .field("queue_endpoint", &self.queue_endpoint)
            .field("organization_id", &self.organization_id)
            .field("api_key", &redact(&self.api_key))
            .field("provisioner", &self.provisioner)
            .field("package_name", &self.package_name)
            .field("nats_url", &self.nats_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Provider block as supplied by the lifecycle host
///
/// Queue mode needs `deployment_id`, `auth_token` and `queue_endpoint`.
/// HTTP mode needs `organization_id` and `api_key`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub deployment_id: Option<String>,
    #[serde(alias = "token")]
    pub auth_token: Option<String>,
    #[serde(alias = "event_topic_arn")]
    pub queue_endpoint: Option<String>,
    pub organization_id: Option<String>,
    pub api_key: Option<String>,
    pub provisioner: Option<String>,
    pub package_name: Option<String>,
    pub nats_url: Option<String>,
    pub api_url: Option<String>,
}

impl ProviderConfig {
    /// Fill every unset field from the environment snapshot; explicit values win
    pub fn with_env_defaults(self, env: &EnvSettings) -> Self {
        let EnvSettings {
            deployment_id,
            auth_token,
            queue_endpoint,
            organization_id,
            api_key,
            provisioner,
            package_name,
            nats_url,
            api_url,
        } = env.clone();

        Self {
            deployment_id: self.deployment_id.or(deployment_id),
            auth_token: self.auth_token.or(auth_token),
            queue_endpoint: self.queue_endpoint.or(queue_endpoint),
            organization_id: self.organization_id.or(organization_id),
            api_key: self.api_key.or(api_key),
            provisioner: self.provisioner.or(provisioner),
            package_name: self.package_name.or(package_name),
            nats_url: self.nats_url.or(nats_url),
            api_url: self.api_url.or(api_url),
        }
    }

    pub fn provisioner(&self) -> Provisioner {
        Provisioner::new(self.provisioner.clone().unwrap_or_default())
    }

    /// Deployment the events belong to; empty in HTTP mode
    pub fn deployment(&self) -> &str {
        self.deployment_id.as_deref().unwrap_or_default()
    }

    pub fn nats_url(&self) -> &str {
        non_empty(&self.nats_url).unwrap_or(DEFAULT_NATS_URL)
    }

    pub fn api_url(&self) -> &str {
        non_empty(&self.api_url).unwrap_or(DEFAULT_API_URL)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("deployment_id", &self.deployment_id)
            .field("auth_token", &redact(&self.auth_token))
            .field("queue_endpoint", &self.queue_endpoint)
            .field("organization_id", &self.organization_id)
            .field("api_key", &redact(&self.api_key))
            .field("provisioner", &self.provisioner)
            .field("package_name", &self.package_name)
            .field("nats_url", &self.nats_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Value of an optional field when it holds something other than whitespace
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}
