//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! reconcile::* and cloud::*
//!     → tracing events (route_table_id, vpc_id, counts, check_mode)
//!     → logging.rs (fmt or JSON layer on stderr)
//!
//! stdout carries only the module result JSON
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
