// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request parameters for creating apps and updating services.

use serde::Serialize;

use crate::error::{Result, SdkError};
use crate::plan::{
    DEFAULT_REGION, VALID_PLANS, VALID_REGIONS, is_valid_plan, is_valid_region, plan_id,
};
use crate::port::Port;
use crate::types::{Env, Relationship, TYPE_APPS, TYPE_SERVICE_PLANS, TYPE_SERVICES};

/// Desired state of an app/service.
///
/// The same struct feeds both [`create_app`](crate::ArukasClient::create_app)
/// and [`update_service`](crate::ArukasClient::update_service), which apply
/// different validation rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParam {
    /// App name. Required for create.
    pub name: String,
    /// Container image reference, e.g. `nginx:latest`.
    pub image: String,
    /// Number of instances. Must be positive.
    pub instances: u32,
    /// Exposed ports, in order.
    pub ports: Vec<Port>,
    /// Environment variables.
    pub environment: Vec<Env>,
    /// Start command override.
    pub command: Option<String>,
    /// Plan name (see [`VALID_PLANS`]). Required for create.
    pub plan: Option<String>,
    /// Region name (see [`VALID_REGIONS`]). Defaults to the only region.
    pub region: Option<String>,
    /// Subdomain for the endpoint. Random when omitted.
    pub sub_domain: Option<String>,
}

impl RequestParam {
    /// Create parameters with a name and image and a single instance.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            instances: 1,
            ..Self::default()
        }
    }

    /// Set the instance count.
    pub fn with_instances(mut self, instances: u32) -> Self {
        self.instances = instances;
        self
    }

    /// Append an exposed port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    /// Append an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push(Env::new(key, value));
        self
    }

    /// Set the start command.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the plan.
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the subdomain.
    pub fn with_sub_domain(mut self, sub_domain: impl Into<String>) -> Self {
        self.sub_domain = Some(sub_domain.into());
        self
    }

    /// Validate for app creation.
    ///
    /// Name, image, instances, at least one port and a plan are required.
    pub fn validate_for_create(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SdkError::validation("name", "name is required"));
        }
        self.validate_image_and_instances()?;
        if self.ports.is_empty() {
            return Err(SdkError::validation("ports", "at least one port is required"));
        }
        self.validate_ports()?;
        self.validate_region()?;
        match self.plan.as_deref() {
            None | Some("") => Err(SdkError::validation("plan", "plan is required")),
            Some(plan) => validate_plan(plan),
        }
    }

    /// Validate for a service update.
    ///
    /// Only image and instances are required. Ports, region and plan are
    /// checked when present.
    pub fn validate_for_update(&self) -> Result<()> {
        self.validate_image_and_instances()?;
        self.validate_ports()?;
        self.validate_region()?;
        match self.plan.as_deref() {
            None | Some("") => Ok(()),
            Some(plan) => validate_plan(plan),
        }
    }

    /// Plan ID (`"<region>/<plan>"`) for this request, if a plan is set.
    pub fn plan_id(&self) -> Option<String> {
        let plan = self.plan.as_deref().filter(|p| !p.is_empty())?;
        let region = self
            .region
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REGION);
        Some(plan_id(region, plan))
    }

    fn validate_image_and_instances(&self) -> Result<()> {
        if self.image.is_empty() {
            return Err(SdkError::validation("image", "image is required"));
        }
        if self.instances == 0 {
            return Err(SdkError::validation(
                "instances",
                "instances must be at least 1",
            ));
        }
        Ok(())
    }

    fn validate_ports(&self) -> Result<()> {
        self.ports.iter().try_for_each(Port::validate)
    }

    fn validate_region(&self) -> Result<()> {
        match self.region.as_deref() {
            None | Some("") => Ok(()),
            Some(region) if is_valid_region(region) => Ok(()),
            Some(region) => Err(SdkError::validation(
                "region",
                format!("unknown region {:?} (expected one of {:?})", region, VALID_REGIONS),
            )),
        }
    }

    /// Body for `POST /apps`: an app resource followed by its service.
    pub(crate) fn to_create_body(&self) -> RequestBody<Vec<ResourceRequest<'_>>> {
        RequestBody {
            data: vec![
                ResourceRequest {
                    kind: TYPE_APPS,
                    id: None,
                    attributes: RequestAttributes::App(AppRequestAttr { name: &self.name }),
                    relationships: None,
                },
                self.service_resource(None),
            ],
        }
    }

    /// Body for `PATCH /services/{id}`.
    pub(crate) fn to_update_body<'a>(
        &'a self,
        service_id: &'a str,
    ) -> RequestBody<ResourceRequest<'a>> {
        RequestBody {
            data: self.service_resource(Some(service_id)),
        }
    }

    fn service_resource<'a>(&'a self, id: Option<&'a str>) -> ResourceRequest<'a> {
        ResourceRequest {
            kind: TYPE_SERVICES,
            id,
            attributes: RequestAttributes::Service(ServiceRequestAttr {
                image: &self.image,
                instances: self.instances,
                ports: &self.ports,
                environment: &self.environment,
                command: self.command.as_deref().filter(|c| !c.is_empty()),
                sub_domain: self.sub_domain.as_deref().filter(|s| !s.is_empty()),
            }),
            relationships: self.plan_id().map(|plan| ServiceRequestRelationships {
                service_plan: Relationship::to(TYPE_SERVICE_PLANS, plan),
            }),
        }
    }
}

fn validate_plan(plan: &str) -> Result<()> {
    if is_valid_plan(plan) {
        Ok(())
    } else {
        Err(SdkError::validation(
            "plan",
            format!("unknown plan {:?} (expected one of {:?})", plan, VALID_PLANS),
        ))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestBody<T> {
    pub(crate) data: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResourceRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    attributes: RequestAttributes<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relationships: Option<ServiceRequestRelationships>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestAttributes<'a> {
    App(AppRequestAttr<'a>),
    Service(ServiceRequestAttr<'a>),
}

#[derive(Debug, Serialize)]
struct AppRequestAttr<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ServiceRequestAttr<'a> {
    image: &'a str,
    instances: u32,
    #[serde(skip_serializing_if = "<[Port]>::is_empty")]
    ports: &'a [Port],
    #[serde(skip_serializing_if = "<[Env]>::is_empty")]
    environment: &'a [Env],
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_domain: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ServiceRequestRelationships {
    service_plan: Relationship,
}
