//! Argument validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each route names a destination and exactly one target
//! - Reject empty identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ModuleArgs → Result<(), Vec<ValidationError>>
//! - Runs before any provider call is made

use thiserror::Error;

use crate::config::schema::ModuleArgs;

/// A single semantic problem with the module arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("vpc_id is required")]
    MissingVpcId,

    #[error("must provide route_table_id or resource_tags")]
    MissingSelector,

    #[error("routes[{index}] is missing dest")]
    MissingDestination { index: usize },

    #[error(
        "routes[{index}] ({dest}) must have exactly one of gateway_id, instance_id, \
         interface_id or vpc_peering_connection_id, found {found}"
    )]
    TargetCount {
        index: usize,
        dest: String,
        found: usize,
    },

    #[error("subnets[{0}] is empty")]
    EmptySubnet(usize),

    #[error("propagating_vgw_ids[{0}] is empty")]
    EmptyGatewayId(usize),
}

/// Validate module arguments, collecting every problem found.
pub fn validate_args(args: &ModuleArgs) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if args.vpc_id.trim().is_empty() {
        errors.push(ValidationError::MissingVpcId);
    }

    for (i, route) in args.routes.iter().flatten().enumerate() {
        if let Err(e) = route.to_spec(i) {
            errors.push(e);
        }
    }

    for (i, subnet) in args.subnets.iter().flatten().enumerate() {
        if subnet.trim().is_empty() {
            errors.push(ValidationError::EmptySubnet(i));
        }
    }

    for (i, gateway) in args.propagating_vgw_ids.iter().flatten().enumerate() {
        if gateway.trim().is_empty() {
            errors.push(ValidationError::EmptyGatewayId(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
