//! VPC provider subsystem.
//!
//! # Data Flow
//! ```text
//! reconcile::* (read-compare-mutate)
//!     → client.rs (VpcClient trait: describe / create / delete / associate)
//!     → provider implementation
//!         memory.rs: in-process state, JSON file persistence
//! ```
//!
//! # Design Decisions
//! - The reconciler only sees the trait; the provider is passed explicitly
//! - Types mirror what the provider reports, nothing derived
//! - Calls are awaited one at a time; no concurrency inside a run

pub mod client;
pub mod memory;
pub mod types;

pub use client::VpcClient;
pub use memory::{MemoryVpc, Operation, VpcState};
pub use types::{
    Association, CloudError, CloudResult, InternetGateway, Route, RouteOrigin, RouteSpec,
    RouteTable, RouteTableFilter, RouteTarget, Subnet, SubnetFilter, TagSet, LOCAL_GATEWAY,
};
