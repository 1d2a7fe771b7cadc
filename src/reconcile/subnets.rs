//! Subnet resolution.
//!
//! # Responsibilities
//! - Classify identifiers as subnet ID, CIDR block or `Name` tag
//! - Issue one batched lookup per class
//! - Require exactly one match per identifier
//!
//! # Design Decisions
//! - Output order is ID matches, then CIDR matches, then name matches;
//!   within a class, input order
//! - A subnet ID can only match once, so only its absence is checked

use std::sync::LazyLock;

use regex::Regex;

use crate::cloud::{Subnet, SubnetFilter, VpcClient};
use crate::reconcile::error::{LookupError, ReconcileResult, Step, StepContext};

static SUBNET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^subnet-[A-Za-z0-9]+$").expect("subnet ID pattern"));
static CIDR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}/\d{1,2}$").expect("CIDR pattern"));

/// How a user-supplied subnet identifier is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetRefKind {
    Id,
    Cidr,
    Name,
}

impl SubnetRefKind {
    pub fn classify(identifier: &str) -> Self {
        if SUBNET_ID_RE.is_match(identifier) {
            SubnetRefKind::Id
        } else if CIDR_RE.is_match(identifier) {
            SubnetRefKind::Cidr
        } else {
            SubnetRefKind::Name
        }
    }
}

/// Resolve identifiers to exactly one subnet each.
///
/// `route_table_id` is only used as context for provider errors.
pub async fn find_subnets<C: VpcClient>(
    client: &C,
    vpc_id: &str,
    route_table_id: &str,
    identifiers: &[String],
) -> ReconcileResult<Vec<Subnet>> {
    let mut ids = Vec::new();
    let mut cidrs = Vec::new();
    let mut names = Vec::new();
    for identifier in identifiers {
        match SubnetRefKind::classify(identifier) {
            SubnetRefKind::Id => ids.push(identifier.clone()),
            SubnetRefKind::Cidr => cidrs.push(identifier.clone()),
            SubnetRefKind::Name => names.push(identifier.clone()),
        }
    }

    let mut resolved = Vec::with_capacity(identifiers.len());

    if !ids.is_empty() {
        let found = client
            .describe_subnets(vpc_id, &SubnetFilter::Ids(ids.clone()))
            .await
            .step(Step::FindSubnets, route_table_id)?;
        for id in &ids {
            let subnet = found
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| LookupError::SubnetIdNotFound(id.clone()))?;
            resolved.push(subnet.clone());
        }
    }

    if !cidrs.is_empty() {
        let found = client
            .describe_subnets(vpc_id, &SubnetFilter::Cidrs(cidrs.clone()))
            .await
            .step(Step::FindSubnets, route_table_id)?;
        for cidr in &cidrs {
            let subnet = exactly_one(found.iter().filter(|s| &s.cidr_block == cidr))
                .map_err(|count| match count {
                    0 => LookupError::SubnetCidrNotFound(cidr.clone()),
                    _ => LookupError::MultipleSubnetCidrs(cidr.clone()),
                })?;
            resolved.push(subnet.clone());
        }
    }

    if !names.is_empty() {
        let found = client
            .describe_subnets(vpc_id, &SubnetFilter::Names(names.clone()))
            .await
            .step(Step::FindSubnets, route_table_id)?;
        for name in &names {
            let subnet = exactly_one(found.iter().filter(|s| s.name() == Some(name.as_str())))
                .map_err(|count| match count {
                    0 => LookupError::SubnetNameNotFound(name.clone()),
                    _ => LookupError::MultipleSubnetNames(name.clone()),
                })?;
            resolved.push(subnet.clone());
        }
    }

    tracing::debug!(
        vpc_id,
        by_id = ids.len(),
        by_cidr = cidrs.len(),
        by_name = names.len(),
        "Resolved subnets"
    );

    Ok(resolved)
}

/// The single item of `iter`, or the number of items found.
fn exactly_one<T>(mut iter: impl Iterator<Item = T>) -> Result<T, usize> {
    match (iter.next(), iter.next()) {
        (Some(item), None) => Ok(item),
        (None, _) => Err(0),
        (Some(_), Some(_)) => Err(2 + iter.count()),
    }
}
