//! Provider client boundary.
//!
//! # Responsibilities
//! - Describe route tables, subnets, tags and internet gateways
//! - Mutate route tables, routes, associations, propagation and tags
//!
//! # Design Decisions
//! - Opaque RPC boundary: retries, backoff and auth live behind it
//! - Every mutating call that the provider supports in dry-run takes a
//!   `dry_run` flag; a dry run validates preconditions and mutates nothing
//! - Reconcilers take the client as a generic `&C`, never a global

use crate::cloud::types::{
    CloudResult, InternetGateway, RouteSpec, RouteTable, RouteTableFilter, Subnet, SubnetFilter,
    TagSet,
};

/// Operations the reconciler needs from a VPC provider.
#[allow(async_fn_in_trait)]
pub trait VpcClient {
    /// Route tables in `vpc_id` matching `filter`.
    async fn describe_route_tables(
        &self,
        vpc_id: &str,
        filter: &RouteTableFilter,
    ) -> CloudResult<Vec<RouteTable>>;

    /// Create an empty route table (local route only).
    async fn create_route_table(&self, vpc_id: &str) -> CloudResult<RouteTable>;

    async fn delete_route_table(&self, route_table_id: &str, dry_run: bool) -> CloudResult<()>;

    async fn create_route(
        &self,
        route_table_id: &str,
        route: &RouteSpec,
        dry_run: bool,
    ) -> CloudResult<()>;

    async fn delete_route(
        &self,
        route_table_id: &str,
        destination_cidr: &str,
        dry_run: bool,
    ) -> CloudResult<()>;

    async fn enable_vgw_route_propagation(
        &self,
        route_table_id: &str,
        gateway_id: &str,
        dry_run: bool,
    ) -> CloudResult<()>;

    /// Subnets in `vpc_id` matching `filter`.
    async fn describe_subnets(&self, vpc_id: &str, filter: &SubnetFilter)
        -> CloudResult<Vec<Subnet>>;

    /// Bind a subnet to a route table, returning the association ID.
    async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> CloudResult<String>;

    async fn disassociate_route_table(&self, association_id: &str, dry_run: bool)
        -> CloudResult<()>;

    async fn describe_tags(&self, resource_id: &str) -> CloudResult<TagSet>;

    /// Create or overwrite tags.
    async fn create_tags(&self, resource_id: &str, tags: &TagSet, dry_run: bool)
        -> CloudResult<()>;

    async fn delete_tags(&self, resource_id: &str, tags: &TagSet, dry_run: bool)
        -> CloudResult<()>;

    /// Internet gateways attached to `vpc_id`.
    async fn describe_internet_gateways(&self, vpc_id: &str) -> CloudResult<Vec<InternetGateway>>;
}
