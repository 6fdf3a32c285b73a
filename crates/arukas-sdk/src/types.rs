// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Wire types for the Arukas JSON API.
//!
//! Every response is a JSON:API document whose `data` member holds one
//! resource (`{"type", "id", "attributes", "relationships"}`) or a list of
//! them. A missing `data` is accepted and decodes as absent / empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::port::Port;

/// Resource type tag for apps.
pub const TYPE_APPS: &str = "apps";
/// Resource type tag for services.
pub const TYPE_SERVICES: &str = "services";
/// Resource type tag for service plans.
pub const TYPE_SERVICE_PLANS: &str = "service-plans";
/// Resource type tag for users.
pub const TYPE_USERS: &str = "users";

/// Service power status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Container is stopped.
    Stopped,
    /// Container is shutting down.
    Stopping,
    /// Container is starting.
    Booting,
    /// Container is up.
    Running,
    /// Container is restarting.
    Rebooting,
    /// Status missing or not recognized.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ServiceStatus {
    /// Wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Unknown => "unknown",
            ServiceStatus::Stopped => "stopped",
            ServiceStatus::Stopping => "stopping",
            ServiceStatus::Booting => "booting",
            ServiceStatus::Running => "running",
            ServiceStatus::Rebooting => "rebooting",
        }
    }

    /// Parse a wire name. Unknown names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "stopped" => ServiceStatus::Stopped,
            "stopping" => ServiceStatus::Stopping,
            "booting" => ServiceStatus::Booting,
            "running" => ServiceStatus::Running,
            "rebooting" => ServiceStatus::Rebooting,
            _ => ServiceStatus::Unknown,
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
}

impl Env {
    /// Create an environment variable.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Host side of a running port binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortMapping {
    /// Public host name.
    #[serde(default)]
    pub host: String,
    /// Public port on the host.
    #[serde(default)]
    pub port: u32,
    /// Port inside the container.
    #[serde(default)]
    pub container_port: u32,
}

/// Reference to another resource (`{"type", "id"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource ID.
    pub id: String,
}

/// A to-one relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Target of the relationship, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResourceRef>,
}

impl Relationship {
    /// Relationship pointing at `kind`/`id`.
    pub fn to(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            data: Some(ResourceRef {
                kind: kind.into(),
                id: id.into(),
            }),
        }
    }

    fn id(&self) -> Option<&str> {
        self.data.as_ref().map(|r| r.id.as_str())
    }
}

// ============================================================================
// Apps
// ============================================================================

/// App attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppAttr {
    /// App name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// App relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRelationships {
    /// The service running this app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Relationship>,
    /// The owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Relationship>,
}

/// App resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    /// Resource type tag (`apps`).
    #[serde(rename = "type")]
    pub kind: String,
    /// App ID (UUID).
    pub id: String,
    /// App attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AppAttr>,
    /// Related resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<AppRelationships>,
}

impl App {
    /// App name, or "" when attributes are missing.
    pub fn name(&self) -> &str {
        self.attributes
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or_default()
    }

    /// ID of the service backing this app.
    pub fn service_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.service.as_ref())
            .and_then(Relationship::id)
    }
}

/// Single-app document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    /// The app, absent for empty results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<App>,
}

impl AppData {
    /// App ID.
    pub fn app_id(&self) -> Option<&str> {
        self.data.as_ref().map(|a| a.id.as_str())
    }

    /// Service ID from the app's service relationship.
    pub fn service_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(App::service_id)
    }

    /// App name.
    pub fn name(&self) -> &str {
        self.data.as_ref().map(App::name).unwrap_or_default()
    }
}

/// App list document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppListData {
    /// Apps, in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<App>,
}

// ============================================================================
// Services
// ============================================================================

/// Service attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceAttr {
    /// Container image in use.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    /// Start command override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Instance count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub instances: u32,
    /// CPUs allotted per instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<f64>,
    /// Memory per instance, in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Exposed ports, decoded from either wire format.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ports: Vec<Port>,
    /// Environment variables.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environment: Vec<Env>,
    /// Power status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ServiceStatus,
    /// Public endpoint host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<String>,
    /// Subdomain under the Arukas domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    /// Custom domains routed to this service.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub custom_domains: Vec<String>,
    /// Host bindings per running instance.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub port_mappings: Vec<Vec<PortMapping>>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Service relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceRelationships {
    /// The app this service runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<Relationship>,
    /// The service plan (`<region>/<plan>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_plan: Option<Relationship>,
}

/// Service resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Resource type tag (`services`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Service ID (UUID).
    pub id: String,
    /// Service attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ServiceAttr>,
    /// Related resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<ServiceRelationships>,
}

impl Service {
    /// Current status, `Unknown` when attributes are missing.
    pub fn status(&self) -> ServiceStatus {
        self.attributes
            .as_ref()
            .map(|a| a.status)
            .unwrap_or_default()
    }

    /// Exposed ports, in server order.
    pub fn ports(&self) -> &[Port] {
        self.attributes
            .as_ref()
            .map(|a| a.ports.as_slice())
            .unwrap_or_default()
    }

    /// Public endpoint host name.
    pub fn end_point(&self) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.end_point.as_deref())
    }

    /// Plan ID from the service-plan relationship.
    pub fn plan_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.service_plan.as_ref())
            .and_then(Relationship::id)
    }
}

/// Single-service document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceData {
    /// The service, absent for empty results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Service>,
}

impl ServiceData {
    /// Service ID.
    pub fn service_id(&self) -> Option<&str> {
        self.data.as_ref().map(|s| s.id.as_str())
    }

    /// Current status, `Unknown` when nothing was returned.
    pub fn status(&self) -> ServiceStatus {
        self.data.as_ref().map(Service::status).unwrap_or_default()
    }

    /// Exposed ports.
    pub fn ports(&self) -> &[Port] {
        self.data.as_ref().map(Service::ports).unwrap_or_default()
    }

    /// Public endpoint host name.
    pub fn end_point(&self) -> Option<&str> {
        self.data.as_ref().and_then(Service::end_point)
    }
}

/// Service list document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceListData {
    /// Services, in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Service>,
}

/// Treat an explicit JSON `null` like a missing member.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
