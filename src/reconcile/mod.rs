//! Route table reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! RouteTableRequest (desired state)
//!     → table.rs (locate by ID or tags; create / delete)
//!     → propagation.rs (enable VGW propagation)
//!     → tags.rs (tag sync)
//!     → routes.rs (igw alias, diff, create / delete routes)
//!     → subnets.rs (resolve IDs / CIDRs / names)
//!     → associations.rs (bind subnets, sever stale bindings)
//!     → ReconcileOutcome { changed, route_table_id }
//! ```
//!
//! # Design Decisions
//! - Each step reads fresh provider state; nothing is cached across runs
//! - Steps run in a fixed order, one provider call at a time
//! - Every provider failure is wrapped with the step it happened in

pub mod associations;
pub mod error;
pub mod propagation;
pub mod routes;
pub mod subnets;
pub mod table;
pub mod tags;

pub use error::{LookupError, ReconcileError, ReconcileResult, Step};
pub use routes::{diff_routes, RouteDiff};
pub use subnets::find_subnets;
pub use table::{
    ensure_route_table_absent, ensure_route_table_present, find_route_table, ReconcileOutcome,
    RouteTableRequest, Selector,
};
