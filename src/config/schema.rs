//! Module argument schema.
//!
//! This module defines the parameters the orchestration engine passes to the
//! module. All types derive Serde traits for deserialization from the args
//! file; unknown keys (credentials, `_ansible_*` internals) are ignored.

use serde::{Deserialize, Serialize};

use crate::cloud::{RouteSpec, RouteTarget, TagSet};
use crate::config::validation::ValidationError;
use crate::reconcile::RouteTableRequest;

/// Desired lifecycle state of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Present,
    Absent,
}

/// Root argument set for one invocation.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ModuleArgs {
    /// VPC the route table lives in.
    #[serde(default)]
    pub vpc_id: String,

    /// Route table to update or delete.
    #[serde(default)]
    pub route_table_id: Option<String>,

    /// Selector when `route_table_id` is absent, and the desired tags.
    #[serde(default)]
    pub resource_tags: Option<TagSet>,

    /// Desired routes. `None` leaves routes untouched.
    #[serde(default)]
    pub routes: Option<Vec<RouteParam>>,

    /// Subnets by ID, CIDR or `Name` tag. `None` or empty leaves associations untouched.
    #[serde(default)]
    pub subnets: Option<Vec<String>>,

    /// Virtual private gateways allowed to propagate routes.
    #[serde(default)]
    pub propagating_vgw_ids: Option<Vec<String>>,

    #[serde(default)]
    pub state: State,

    /// Validate and report without mutating.
    #[serde(default)]
    pub check_mode: bool,

    /// Check mode as set by the orchestration engine.
    #[serde(default, rename = "_ansible_check_mode")]
    pub engine_check_mode: bool,
}

/// A route as written by the user.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RouteParam {
    /// Destination CIDR block.
    #[serde(default, alias = "destination_cidr_block", alias = "destination_cidr")]
    pub dest: Option<String>,

    /// Gateway ID, or `igw` for the VPC's internet gateway.
    #[serde(default)]
    pub gateway_id: Option<String>,

    #[serde(default)]
    pub instance_id: Option<String>,

    #[serde(default)]
    pub interface_id: Option<String>,

    #[serde(default, alias = "vpc_peering_connection", alias = "peering_connection_id")]
    pub vpc_peering_connection_id: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl RouteParam {
    /// Convert into a typed route; `index` is the position in `routes`.
    pub fn to_spec(&self, index: usize) -> Result<RouteSpec, ValidationError> {
        let dest = present(&self.dest)
            .ok_or(ValidationError::MissingDestination { index })?;

        let targets: Vec<RouteTarget> = [
            present(&self.gateway_id).map(|id| RouteTarget::Gateway(id.to_string())),
            present(&self.instance_id).map(|id| RouteTarget::Instance(id.to_string())),
            present(&self.interface_id).map(|id| RouteTarget::Interface(id.to_string())),
            present(&self.vpc_peering_connection_id).map(|id| RouteTarget::Peering(id.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();

        match <[RouteTarget; 1]>::try_from(targets) {
            Ok([target]) => Ok(RouteSpec::new(dest, target)),
            Err(targets) => Err(ValidationError::TargetCount {
                index,
                dest: dest.to_string(),
                found: targets.len(),
            }),
        }
    }
}

impl ModuleArgs {
    /// True when either the user or the engine asked for check mode.
    pub fn in_check_mode(&self) -> bool {
        self.check_mode || self.engine_check_mode
    }

    /// Typed reconciliation request. Fails on the first malformed route.
    pub fn to_request(&self) -> Result<RouteTableRequest, ValidationError> {
        let routes = match &self.routes {
            Some(routes) => Some(
                routes
                    .iter()
                    .enumerate()
                    .map(|(i, r)| r.to_spec(i))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(RouteTableRequest {
            vpc_id: self.vpc_id.clone(),
            route_table_id: self.route_table_id.clone().filter(|id| !id.is_empty()),
            resource_tags: self.resource_tags.clone(),
            routes,
            subnets: self.subnets.clone(),
            propagating_vgw_ids: self.propagating_vgw_ids.clone(),
        })
    }
}
