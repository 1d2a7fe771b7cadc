//! VPC route table reconciler
//!
//! Converges one route table in a VPC to a declared state and reports
//! `{changed, route_table_id}` on stdout.
//!
//! # Architecture Overview
//!
//! ```text
//!     args file (JSON / TOML)
//!         │
//!         ▼
//!   ┌───────────┐    ┌────────────────────────────────────────────┐
//!   │  config   │───▶│                reconcile                   │
//!   │ load and  │    │  locate table → propagation → tags →       │
//!   │ validate  │    │  routes → subnets → associations           │
//!   └───────────┘    └──────────────────────┬─────────────────────┘
//!                                           │ VpcClient
//!                                           ▼
//!                                    ┌─────────────┐
//!                                    │    cloud    │◀──── state file
//!                                    │  MemoryVpc  │────▶ (saved unless check mode)
//!                                    └─────────────┘
//!         │
//!         ▼
//!   stdout: {"changed": ..., "route_table_id": ...}
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vpc_route_table::module::run_from_files;
use vpc_route_table::observability::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "vpc-route-table")]
#[command(about = "Reconcile a VPC route table to a declared state", long_about = None)]
struct Cli {
    /// Module arguments file (.json or .toml)
    args_file: PathBuf,

    /// VPC state file, created if missing
    #[arg(long, default_value = "vpc-state.json")]
    state_file: PathBuf,

    /// Report what would change without changing anything
    #[arg(long)]
    check: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    tracing::info!(
        args_file = %cli.args_file.display(),
        state_file = %cli.state_file.display(),
        check = cli.check,
        "vpc-route-table v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let response = run_from_files(&cli.args_file, &cli.state_file, cli.check).await;
    println!("{}", response.to_json());
    response.exit_code()
}
