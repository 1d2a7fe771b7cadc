//! Module entry point.
//!
//! # Data Flow
//! ```text
//! args file + state file
//!     → runner.rs (load, validate, dispatch on state)
//!     → reconcile::ensure_route_table_{present,absent}
//!     → response.rs (JSON on stdout, exit status)
//! ```

pub mod response;
pub mod runner;

pub use response::ModuleResponse;
pub use runner::{execute, run_from_files, run_module};
