//! Request and response shapes of the manager API

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Envelope every API method answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub result: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetIdRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SidRequest {
    pub sid: SystemId,
}

/// Internal numeric identifier of a managed system (SID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub i64);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a `system.getId` lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRecord {
    pub id: SystemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A product migration target offered for a system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationTarget {
    pub base_channel_label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MigrationTarget {
    pub fn new(base_channel_label: impl Into<String>) -> Self {
        Self {
            base_channel_label: base_channel_label.into(),
            extra: Map::new(),
        }
    }
}

/// Scheduling knobs for a product migration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    pub optional_child_channels: Vec<String>,
    pub allow_vendor_change: bool,
    pub earliest_occurrence: DateTime<Utc>,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            optional_child_channels: Vec::new(),
            allow_vendor_change: true,
            earliest_occurrence: default_earliest_occurrence(),
        }
    }
}

fn default_earliest_occurrence() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Payload of `system.scheduleProductMigration`
///
/// Only constructible through [`MigrationRequest::dry_run`], so the
/// `dryRun` flag on the wire is always `true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRequest {
    pub sid: SystemId,
    pub base_channel_label: String,
    pub optional_child_channels: Vec<String>,
    dry_run: bool,
    pub allow_vendor_change: bool,
    pub earliest_occurrence: DateTime<Utc>,
}

impl MigrationRequest {
    pub fn dry_run(sid: SystemId, base_channel_label: &str, options: &ScheduleOptions) -> Self {
        Self {
            sid,
            base_channel_label: base_channel_label.to_string(),
            optional_child_channels: options.optional_child_channels.clone(),
            dry_run: true,
            allow_vendor_change: options.allow_vendor_change,
            earliest_occurrence: options.earliest_occurrence,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Opaque identifier of a scheduled action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(Value);

impl ActionId {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}
