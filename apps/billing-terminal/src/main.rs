//! # Billing Terminal Entry Point
//!
//! Cashier-facing terminal front end for the billing server.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging, to stderr)
//! 2. Parse command-line flags
//! 3. Hand over to `billing_terminal_lib::run`

use billing_terminal_lib::{init_tracing, run, Cli};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Billing terminal stopped");
            eprintln!("billing-terminal: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
