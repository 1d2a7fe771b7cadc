//! Route diffing and application.
//!
//! # Responsibilities
//! - Resolve the symbolic `igw` gateway to the VPC's internet gateway
//! - Diff desired route specs against observed routes
//! - Issue create/delete calls for the diff
//!
//! # Design Decisions
//! - Diff is a pure function; first unmatched observed route wins a tie
//! - Protected routes (local, propagating gateway, propagated origin) are
//!   never proposed for deletion
//! - Deletes are issued before creates, so a destination can move to a
//!   new target in one run

use crate::cloud::{Route, RouteOrigin, RouteSpec, RouteTable, RouteTarget, VpcClient};
use crate::reconcile::error::{LookupError, ReconcileResult, Step, StepContext};

/// Symbolic gateway ID for "the VPC's internet gateway".
pub const IGW_ALIAS: &str = "igw";

/// Work needed to converge a route table's routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDiff {
    pub to_create: Vec<RouteSpec>,
    pub to_delete: Vec<Route>,
}

impl RouteDiff {
    pub fn changed(&self) -> bool {
        !self.to_create.is_empty() || !self.to_delete.is_empty()
    }
}

/// True when the reconciler must leave `route` alone.
pub fn is_protected(route: &Route, propagating_vgw_ids: &[String]) -> bool {
    route.target.is_local()
        || route.origin == RouteOrigin::EnableVgwRoutePropagation
        || route
            .target
            .gateway_id()
            .is_some_and(|gw| propagating_vgw_ids.iter().any(|p| p == gw))
}

/// Compute the routes to create and delete.
pub fn diff_routes(
    desired: &[RouteSpec],
    observed: &[Route],
    propagating_vgw_ids: &[String],
) -> RouteDiff {
    let mut pool: Vec<&Route> = observed.iter().collect();
    let mut to_create = Vec::new();

    for spec in desired {
        match pool.iter().position(|route| route.matches(spec)) {
            Some(i) => {
                pool.remove(i);
            }
            None => to_create.push(spec.clone()),
        }
    }

    let to_delete = pool
        .into_iter()
        .filter(|route| !is_protected(route, propagating_vgw_ids))
        .cloned()
        .collect();

    RouteDiff {
        to_create,
        to_delete,
    }
}

/// Replace `gateway_id: igw` with the VPC's internet gateway ID.
///
/// The gateway is looked up at most once, and only if some spec needs it.
pub async fn resolve_internet_gateway<C: VpcClient>(
    client: &C,
    vpc_id: &str,
    specs: Vec<RouteSpec>,
) -> ReconcileResult<Vec<RouteSpec>> {
    let mut igw_id: Option<String> = None;
    let mut resolved = Vec::with_capacity(specs.len());

    for mut spec in specs {
        let is_alias = spec
            .target
            .gateway_id()
            .is_some_and(|gw| gw.eq_ignore_ascii_case(IGW_ALIAS));
        if is_alias {
            let id = match &igw_id {
                Some(id) => id.clone(),
                None => {
                    let id = find_igw(client, vpc_id).await?;
                    igw_id = Some(id.clone());
                    id
                }
            };
            spec.target = RouteTarget::Gateway(id);
        }
        resolved.push(spec);
    }

    Ok(resolved)
}

/// The single internet gateway attached to `vpc_id`.
pub async fn find_igw<C: VpcClient>(client: &C, vpc_id: &str) -> ReconcileResult<String> {
    let gateways = client
        .describe_internet_gateways(vpc_id)
        .await
        .step(Step::FindInternetGateway, vpc_id)?;

    match gateways.as_slice() {
        [] => Err(LookupError::NoInternetGateway(vpc_id.to_string()).into()),
        [gateway] => Ok(gateway.id.clone()),
        _ => Err(LookupError::MultipleInternetGateways(vpc_id.to_string()).into()),
    }
}

/// Converge the routes of `table`. Returns whether anything changed.
pub async fn ensure_routes<C: VpcClient>(
    client: &C,
    table: &RouteTable,
    desired: &[RouteSpec],
    propagating_vgw_ids: &[String],
    check_mode: bool,
) -> ReconcileResult<bool> {
    let diff = diff_routes(desired, &table.routes, propagating_vgw_ids);
    if !diff.changed() {
        return Ok(false);
    }

    tracing::info!(
        route_table_id = %table.id,
        create = diff.to_create.len(),
        delete = diff.to_delete.len(),
        check_mode,
        "Updating routes"
    );

    for route in &diff.to_delete {
        tracing::debug!(dest = %route.destination_cidr, target = %route.target, "Deleting route");
        client
            .delete_route(&table.id, &route.destination_cidr, check_mode)
            .await
            .step(Step::EnsureRoutes, &table.id)?;
    }

    for spec in &diff.to_create {
        // A dry-run delete leaves the old route in place, so the dry-run
        // create for the same destination would always conflict.
        let replaces = diff
            .to_delete
            .iter()
            .any(|r| r.destination_cidr == spec.destination_cidr);
        if check_mode && replaces {
            continue;
        }
        tracing::debug!(dest = %spec.destination_cidr, target = %spec.target, "Creating route");
        client
            .create_route(&table.id, spec, check_mode)
            .await
            .step(Step::EnsureRoutes, &table.id)?;
    }

    Ok(true)
}
