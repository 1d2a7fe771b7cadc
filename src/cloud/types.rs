//! VPC resource types and provider error definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway ID the provider reports for the implicit VPC-local route.
pub const LOCAL_GATEWAY: &str = "local";

/// Resource tags, ordered by key.
pub type TagSet = BTreeMap<String, String>;

/// Next hop of a route.
///
/// Exactly one target per route; two targets are equal only when both the
/// variant and the ID match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum RouteTarget {
    /// Internet, virtual private or the `local` gateway.
    Gateway(String),
    /// NAT instance.
    Instance(String),
    /// Elastic network interface.
    Interface(String),
    /// VPC peering connection.
    Peering(String),
}

impl RouteTarget {
    /// The raw resource ID behind the target.
    pub fn id(&self) -> &str {
        match self {
            RouteTarget::Gateway(id)
            | RouteTarget::Instance(id)
            | RouteTarget::Interface(id)
            | RouteTarget::Peering(id) => id,
        }
    }

    /// Gateway ID, if this is a gateway target.
    pub fn gateway_id(&self) -> Option<&str> {
        match self {
            RouteTarget::Gateway(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_local(&self) -> bool {
        self.gateway_id() == Some(LOCAL_GATEWAY)
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Gateway(id) => write!(f, "gateway {}", id),
            RouteTarget::Instance(id) => write!(f, "instance {}", id),
            RouteTarget::Interface(id) => write!(f, "interface {}", id),
            RouteTarget::Peering(id) => write!(f, "peering connection {}", id),
        }
    }
}

/// A desired route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub destination_cidr: String,
    pub target: RouteTarget,
}

impl RouteSpec {
    pub fn new(destination_cidr: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            destination_cidr: destination_cidr.into(),
            target,
        }
    }
}

/// How a route got into its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RouteOrigin {
    /// The implicit local route added with the table.
    CreateRouteTable,
    /// A static route.
    #[default]
    CreateRoute,
    /// Injected by a propagating virtual private gateway.
    EnableVgwRoutePropagation,
}

/// An observed route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination_cidr: String,
    pub target: RouteTarget,
    #[serde(default)]
    pub origin: RouteOrigin,
}

impl Route {
    pub fn new(destination_cidr: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            destination_cidr: destination_cidr.into(),
            target,
            origin: RouteOrigin::CreateRoute,
        }
    }

    pub fn with_origin(mut self, origin: RouteOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// The route every table carries for its own VPC CIDR.
    pub fn local(vpc_cidr: impl Into<String>) -> Self {
        Self::new(vpc_cidr, RouteTarget::Gateway(LOCAL_GATEWAY.to_string()))
            .with_origin(RouteOrigin::CreateRouteTable)
    }

    /// True when every field the spec declares equals this route's.
    pub fn matches(&self, spec: &RouteSpec) -> bool {
        self.destination_cidr == spec.destination_cidr && self.target == spec.target
    }
}

impl From<&RouteSpec> for Route {
    fn from(spec: &RouteSpec) -> Self {
        Route::new(spec.destination_cidr.clone(), spec.target.clone())
    }
}

/// Binding between a route table and a subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub id: String,
    pub route_table_id: String,
    /// `None` for the main-table association.
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub main: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub id: String,
    pub vpc_id: String,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub associations: Vec<Association>,
}

impl RouteTable {
    /// The association binding `subnet_id` to this table, if any.
    pub fn association_for(&self, subnet_id: &str) -> Option<&Association> {
        self.associations
            .iter()
            .find(|a| a.subnet_id.as_deref() == Some(subnet_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub vpc_id: String,
    pub cidr_block: String,
    #[serde(default)]
    pub tags: TagSet,
}

impl Subnet {
    pub fn name(&self) -> Option<&str> {
        self.tags.get("Name").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternetGateway {
    pub id: String,
    /// VPCs this gateway is attached to.
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Route table selection for `describe_route_tables`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTableFilter {
    /// Restrict to these IDs. Unknown IDs are silently absent from the result.
    pub ids: Vec<String>,
    /// Restrict to tables associated with this subnet.
    pub associated_subnet: Option<String>,
}

impl RouteTableFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            ids: vec![id.into()],
            associated_subnet: None,
        }
    }

    pub fn by_associated_subnet(subnet_id: impl Into<String>) -> Self {
        Self {
            ids: Vec::new(),
            associated_subnet: Some(subnet_id.into()),
        }
    }
}

/// Subnet selection for `describe_subnets`. One batched lookup per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnetFilter {
    Ids(Vec<String>),
    Cidrs(Vec<String>),
    /// Match on the `Name` tag.
    Names(Vec<String>),
}

/// Error returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct CloudError {
    /// Provider error code, e.g. `InvalidRouteTableID.NotFound`.
    pub code: String,
    pub message: String,
}

impl CloudError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Result type for provider calls.
pub type CloudResult<T> = Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_equality_is_per_variant() {
        let gw = RouteTarget::Gateway("x-1".into());
        let inst = RouteTarget::Instance("x-1".into());
        assert_ne!(gw, inst);
        assert_eq!(gw.id(), inst.id());
        assert_eq!(gw, RouteTarget::Gateway("x-1".into()));
    }

    #[test]
    fn test_local_route() {
        let route = Route::local("10.0.0.0/16");
        assert!(route.target.is_local());
        assert_eq!(route.origin, RouteOrigin::CreateRouteTable);
        assert!(!RouteTarget::Instance("local".into()).is_local());
    }

    #[test]
    fn test_route_matches_spec() {
        let route = Route::new("0.0.0.0/0", RouteTarget::Gateway("igw-1".into()));
        assert!(route.matches(&RouteSpec::new("0.0.0.0/0", RouteTarget::Gateway("igw-1".into()))));
        assert!(!route.matches(&RouteSpec::new("0.0.0.0/0", RouteTarget::Gateway("igw-2".into()))));
        assert!(!route.matches(&RouteSpec::new("10.0.0.0/8", RouteTarget::Gateway("igw-1".into()))));
    }

    #[test]
    fn test_error_display() {
        let err = CloudError::new("RouteAlreadyExists", "route 0.0.0.0/0 exists");
        assert_eq!(err.to_string(), "RouteAlreadyExists: route 0.0.0.0/0 exists");
    }
}
