//! Module invocation.
//!
//! # Responsibilities
//! - Turn validated arguments into a reconciliation request
//! - Dispatch on `state`
//! - Persist provider state and report a single result
//!
//! # Design Decisions
//! - Every error becomes a failure response; nothing escapes as a panic
//! - Provider state is saved even after a failed run, since completed
//!   steps are not rolled back

use std::path::Path;

use crate::cloud::{MemoryVpc, VpcClient};
use crate::config::{load_args, ModuleArgs, State};
use crate::module::response::ModuleResponse;
use crate::reconcile::{
    ensure_route_table_absent, ensure_route_table_present, ReconcileOutcome, ReconcileResult,
};

/// Reconcile `args` against `client`.
pub async fn execute<C: VpcClient>(client: &C, args: &ModuleArgs) -> ReconcileResult<ReconcileOutcome> {
    let request = args.to_request()?;
    let check_mode = args.in_check_mode();
    match args.state {
        State::Present => ensure_route_table_present(client, &request, check_mode).await,
        State::Absent => ensure_route_table_absent(client, &request, check_mode).await,
    }
}

/// Reconcile `args` against `client`, folding errors into the response.
pub async fn run_module<C: VpcClient>(client: &C, args: &ModuleArgs) -> ModuleResponse {
    tracing::info!(
        vpc_id = %args.vpc_id,
        state = ?args.state,
        check_mode = args.in_check_mode(),
        "Module invoked"
    );

    match execute(client, args).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            tracing::error!(error = %e, step = ?e.step(), "Reconciliation failed");
            ModuleResponse::failure(e.to_string())
        }
    }
}

/// Load arguments and provider state from disk, run, and save the state back.
///
/// `force_check` turns on check mode regardless of the arguments.
pub async fn run_from_files(args_path: &Path, state_path: &Path, force_check: bool) -> ModuleResponse {
    let mut args = match load_args(args_path) {
        Ok(args) => args,
        Err(e) => {
            tracing::error!(path = %args_path.display(), error = %e, "Failed to load module arguments");
            return ModuleResponse::failure(e.to_string());
        }
    };
    args.check_mode |= force_check;

    let vpc = match MemoryVpc::load_from_file(state_path) {
        Ok(vpc) => vpc,
        Err(e) => {
            tracing::error!(path = %state_path.display(), error = %e, "Failed to load VPC state");
            return ModuleResponse::failure(format!("Unable to load VPC state: {}", e));
        }
    };

    let response = run_module(&vpc, &args).await;

    if !args.in_check_mode() {
        if let Err(e) = vpc.save_to_file() {
            tracing::error!(path = %state_path.display(), error = %e, "Failed to save VPC state");
            return ModuleResponse::failure(format!("Unable to save VPC state: {}", e));
        }
    }

    response
}
