//! Command-line interface for membuf-estimate
//!
//! # Usage Examples
//!
//! ```bash
//! # Insert cost of one million sysbench rows, sampling every 10,000th
//! membuf-estimate --schema sbtest.sql
//!
//! # Update cost, then see what the buffer holds with values dropped
//! membuf-estimate --schema sbtest.sql --mode update --drop-value
//!
//! # Reproducible FLOAT/DECIMAL data, no settle delay
//! membuf-estimate -s t.sql --rows 100000 --sample 100 --seed 42 --settle-ms 0
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`); the report goes to stdout.

use clap::Parser;
use mem_probe::TrackingAllocator;
use membuf_estimate::cli::Cli;
use membuf_estimate::exit_codes::ExitCode;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match membuf_estimate::run(&cli).await {
        Ok(report) => {
            println!("{}", report.summary());
            println!("====== END ======");
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(ExitCode::for_error(&e).as_i32());
        }
    }
}
