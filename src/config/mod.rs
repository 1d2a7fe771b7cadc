//! Module argument handling.
//!
//! # Data Flow
//! ```text
//! args file (JSON from the orchestration engine, or TOML)
//!     → loader.rs (parse, unwrap ANSIBLE_MODULE_ARGS envelope)
//!     → validation.rs (semantic checks)
//!     → ModuleArgs (validated)
//!     → ModuleArgs::to_request() → RouteTableRequest for the reconciler
//! ```
//!
//! # Design Decisions
//! - Every optional parameter keeps "not supplied" distinct from "empty"
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_args, parse_args, ArgsFormat, ConfigError};
pub use schema::{ModuleArgs, RouteParam, State};
pub use validation::ValidationError;
