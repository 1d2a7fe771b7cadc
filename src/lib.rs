//! VPC route table reconciler library

pub mod cloud;
pub mod config;
pub mod module;
pub mod observability;
pub mod reconcile;

pub use cloud::{MemoryVpc, VpcClient};
pub use config::ModuleArgs;
pub use module::ModuleResponse;
pub use reconcile::{ReconcileError, ReconcileOutcome, RouteTableRequest};
