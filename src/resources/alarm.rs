// Copyright (c) 2025 - Cowboy AI, Inc.

//! Alarm resource
//!
//! Registers a package alarm for presentation in the control plane. Alarms
//! belong to a package; the package id comes from the resource or, failing
//! that, from the provider's package name.
//!
//! # Legacy Identities
//!
//! Alarms created before the control plane issued ids were recorded with an
//! RFC 3339 timestamp as their id. Those are addressed by the unpadded
//! URL-safe base64 of their cloud resource id instead.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::non_empty;
use crate::errors::{ProvisionerError, ProvisionerResult};
use crate::events::{AlarmPayload, Payload};
use crate::pipeline::{BuildContext, Operation, PayloadSource};

/// Metric an alarm watches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    /// Required for AWS and Azure, omitted for GCP
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub statistic: Option<String>,
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Dimension<'a> {
    name: &'a str,
    value: &'a str,
}

impl Metric {
    fn to_value(&self) -> Value {
        let dimensions: Vec<Dimension<'_>> = self
            .dimensions
            .iter()
            .map(|(name, value)| Dimension { name, value })
            .collect();

        serde_json::json!({
            "name": self.name,
            "namespace": self.namespace.clone().unwrap_or_default(),
            "statistic": self.statistic.clone().unwrap_or_default(),
            "dimensions": dimensions,
        })
    }
}

/// Alarm resource state as supplied by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlarmResource {
    /// Alarm identifier in the cloud (ARN, id or name)
    pub cloud_resource_id: String,
    pub display_name: String,
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub period_minutes: Option<i64>,
    #[serde(default)]
    pub comparison_operator: Option<String>,
    #[serde(default)]
    pub package_id: Option<String>,
}

impl AlarmResource {
    pub fn new(cloud_resource_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            cloud_resource_id: cloud_resource_id.into(),
            display_name: display_name.into(),
            metric: None,
            threshold: None,
            period_minutes: None,
            comparison_operator: None,
            package_id: None,
        }
    }

    /// Package this alarm belongs to
    pub fn package_id(&self, fallback: Option<&str>) -> ProvisionerResult<String> {
        non_empty(&self.package_id)
            .or(fallback.filter(|p| !p.trim().is_empty()))
            .map(str::to_owned)
            .ok_or_else(|| {
                ProvisionerError::validation(
                    "`package_id` must be set in config or MASSDRIVER_PACKAGE_NAME must be set in the environment",
                )
            })
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut alarm = Map::new();
        alarm.insert(
            "cloud_resource_id".to_string(),
            Value::String(self.cloud_resource_id.clone()),
        );
        alarm.insert(
            "display_name".to_string(),
            Value::String(self.display_name.clone()),
        );
        if let Some(threshold) = self.threshold {
            alarm.insert("threshold".to_string(), Value::from(threshold));
        }
        if let Some(period) = self.period_minutes {
            alarm.insert("period_minutes".to_string(), Value::from(period));
        }
        if let Some(op) = non_empty(&self.comparison_operator) {
            alarm.insert("comparison_operator".to_string(), Value::from(op));
        }
        if let Some(metric) = &self.metric {
            alarm.insert("metric".to_string(), metric.to_value());
        }
        alarm
    }
}

/// Whether `id` was issued by the timestamp placeholder scheme
pub fn is_legacy_id(id: &str) -> bool {
    DateTime::parse_from_rfc3339(id).is_ok()
}

/// Identifier the control plane knows the alarm by
pub fn remote_alarm_id(id: &str, cloud_resource_id: &str) -> String {
    if is_legacy_id(id) {
        URL_SAFE_NO_PAD.encode(cloud_resource_id.as_bytes())
    } else {
        id.to_string()
    }
}

/// Builds alarm payloads
pub struct AlarmBuilder<'a> {
    resource: &'a AlarmResource,
    default_package: Option<&'a str>,
}

impl<'a> AlarmBuilder<'a> {
    pub fn new(resource: &'a AlarmResource, default_package: Option<&'a str>) -> Self {
        Self {
            resource,
            default_package,
        }
    }
}

impl PayloadSource for AlarmBuilder<'_> {
    fn build_payload(&self, ctx: &BuildContext<'_>) -> ProvisionerResult<Payload> {
        let package_id = self.resource.package_id(self.default_package)?;

        let mut alarm = match ctx.operation {
            Operation::Delete => {
                let mut alarm = Map::new();
                alarm.insert(
                    "cloud_resource_id".to_string(),
                    Value::String(self.resource.cloud_resource_id.clone()),
                );
                alarm
            }
            Operation::Create | Operation::Update => self.resource.to_map(),
        };

        alarm.insert("package_id".to_string(), Value::String(package_id));
        if let (Operation::Update | Operation::Delete, Some(id)) = (ctx.operation, ctx.resource_id)
        {
            alarm.insert(
                "id".to_string(),
                Value::String(remote_alarm_id(id, &self.resource.cloud_resource_id)),
            );
        }

        Ok(Payload::Alarm(AlarmPayload {
            deployment_id: ctx.deployment_id.to_string(),
            alarm,
        }))
    }
}
