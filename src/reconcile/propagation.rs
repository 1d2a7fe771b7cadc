//! Virtual private gateway route propagation.
//!
//! The provider's read API does not report which gateways propagate into a
//! table. A route through the gateway is taken as evidence that propagation
//! is already enabled. A gateway that has propagation enabled but advertises
//! no routes is never seen, so it is enabled again and reported as a change
//! on every run.

use crate::cloud::{RouteTable, VpcClient};
use crate::reconcile::error::{ReconcileResult, Step, StepContext};

/// Enable propagation for each gateway not already seen in `table`'s routes.
pub async fn ensure_propagation<C: VpcClient>(
    client: &C,
    table: &RouteTable,
    propagating_vgw_ids: &[String],
    check_mode: bool,
) -> ReconcileResult<bool> {
    let mut changed = false;

    for vgw_id in propagating_vgw_ids {
        let seen = table
            .routes
            .iter()
            .any(|r| r.target.gateway_id() == Some(vgw_id.as_str()));
        if seen {
            tracing::debug!(route_table_id = %table.id, vgw_id = %vgw_id, "Propagation already enabled");
            continue;
        }

        tracing::info!(route_table_id = %table.id, vgw_id = %vgw_id, check_mode, "Enabling route propagation");
        client
            .enable_vgw_route_propagation(&table.id, vgw_id, check_mode)
            .await
            .step(Step::EnablePropagation, &table.id)?;
        changed = true;
    }

    Ok(changed)
}
