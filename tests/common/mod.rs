//! Shared fixtures for integration tests.

#![allow(dead_code)]

use vpc_route_table::cloud::{MemoryVpc, RouteSpec, RouteTarget, Subnet, TagSet};
use vpc_route_table::config::{ModuleArgs, RouteParam};
use vpc_route_table::reconcile::RouteTableRequest;

pub const VPC_ID: &str = "vpc-1";
pub const VPC_CIDR: &str = "10.0.0.0/16";
pub const IGW_ID: &str = "igw-1";

pub fn tags(pairs: &[(&str, &str)]) -> TagSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn subnet(id: &str, cidr: &str, name: Option<&str>) -> Subnet {
    Subnet {
        id: id.to_string(),
        vpc_id: VPC_ID.to_string(),
        cidr_block: cidr.to_string(),
        tags: name.map(|n| tags(&[("Name", n)])).unwrap_or_default(),
    }
}

/// A VPC with one attached internet gateway and three subnets:
/// `subnet-a` (10.0.1.0/24, "web"), `subnet-b` (10.0.2.0/24, "app"),
/// `subnet-c` (10.0.3.0/24, unnamed).
pub fn vpc() -> MemoryVpc {
    MemoryVpc::new()
        .with_vpc(VPC_ID, VPC_CIDR)
        .with_internet_gateway(IGW_ID, VPC_ID)
        .with_subnet(subnet("subnet-a", "10.0.1.0/24", Some("web")))
        .with_subnet(subnet("subnet-b", "10.0.2.0/24", Some("app")))
        .with_subnet(subnet("subnet-c", "10.0.3.0/24", None))
}

pub fn default_route(gateway: &str) -> RouteSpec {
    RouteSpec::new("0.0.0.0/0", RouteTarget::Gateway(gateway.to_string()))
}

pub fn request_by_tags(pairs: &[(&str, &str)]) -> RouteTableRequest {
    RouteTableRequest {
        vpc_id: VPC_ID.to_string(),
        resource_tags: Some(tags(pairs)),
        ..RouteTableRequest::default()
    }
}

pub fn gateway_param(dest: &str, gateway_id: &str) -> RouteParam {
    RouteParam {
        dest: Some(dest.to_string()),
        gateway_id: Some(gateway_id.to_string()),
        ..RouteParam::default()
    }
}

pub fn args_by_tags(pairs: &[(&str, &str)]) -> ModuleArgs {
    ModuleArgs {
        vpc_id: VPC_ID.to_string(),
        resource_tags: Some(tags(pairs)),
        ..ModuleArgs::default()
    }
}
