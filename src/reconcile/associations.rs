//! Subnet association reconciliation.
//!
//! # Responsibilities
//! - Bind each requested subnet to the target table, severing any binding
//!   it has to another table first
//! - Sever target-table bindings to subnets no longer requested
//!
//! # Design Decisions
//! - The main-table association has no subnet and is never severed
//! - Check mode stops at the first subnet needing a (re)bind and reports
//!   a change without looking at the rest

use crate::cloud::{RouteTable, RouteTableFilter, Subnet, VpcClient};
use crate::reconcile::error::{ReconcileResult, Step, StepContext};

/// What happened to one subnet's association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationOutcome {
    /// Already bound to the target table.
    Unchanged { association_id: String },
    /// Newly bound to the target table.
    Associated { association_id: String },
    /// Check mode: a bind would have been needed.
    WouldChange,
}

/// Bind `subnet_id` to `route_table_id`.
pub async fn ensure_subnet_association<C: VpcClient>(
    client: &C,
    vpc_id: &str,
    route_table_id: &str,
    subnet_id: &str,
    check_mode: bool,
) -> ReconcileResult<AssociationOutcome> {
    let tables = client
        .describe_route_tables(vpc_id, &RouteTableFilter::by_associated_subnet(subnet_id))
        .await
        .step(Step::AssociateSubnets, route_table_id)?;

    for table in &tables {
        let Some(association) = table.association_for(subnet_id) else {
            continue;
        };
        if table.id == route_table_id {
            return Ok(AssociationOutcome::Unchanged {
                association_id: association.id.clone(),
            });
        }
        if check_mode {
            return Ok(AssociationOutcome::WouldChange);
        }
        tracing::info!(
            subnet_id,
            from = %table.id,
            to = route_table_id,
            "Moving subnet association"
        );
        client
            .disassociate_route_table(&association.id, false)
            .await
            .step(Step::AssociateSubnets, route_table_id)?;
    }

    if check_mode {
        return Ok(AssociationOutcome::WouldChange);
    }

    let association_id = client
        .associate_route_table(route_table_id, subnet_id)
        .await
        .step(Step::AssociateSubnets, route_table_id)?;
    tracing::info!(subnet_id, route_table_id, association_id = %association_id, "Associated subnet");

    Ok(AssociationOutcome::Associated { association_id })
}

/// Make `subnets` exactly the set of subnets bound to `table`.
///
/// `table` must reflect the associations as they were before this run.
pub async fn ensure_subnet_associations<C: VpcClient>(
    client: &C,
    vpc_id: &str,
    table: &RouteTable,
    subnets: &[Subnet],
    check_mode: bool,
) -> ReconcileResult<bool> {
    let mut changed = false;
    let mut kept = Vec::with_capacity(subnets.len());

    for subnet in subnets {
        match ensure_subnet_association(client, vpc_id, &table.id, &subnet.id, check_mode).await? {
            AssociationOutcome::Unchanged { association_id } => kept.push(association_id),
            AssociationOutcome::Associated { association_id } => {
                changed = true;
                kept.push(association_id);
            }
            AssociationOutcome::WouldChange => return Ok(true),
        }
    }

    let stale = table
        .associations
        .iter()
        .filter(|a| !a.main && !kept.contains(&a.id));
    for association in stale {
        tracing::info!(
            route_table_id = %table.id,
            association_id = %association.id,
            subnet_id = ?association.subnet_id,
            check_mode,
            "Removing stale association"
        );
        client
            .disassociate_route_table(&association.id, check_mode)
            .await
            .step(Step::AssociateSubnets, &table.id)?;
        changed = true;
    }

    Ok(changed)
}
