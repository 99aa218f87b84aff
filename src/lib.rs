//! membuf-estimate: estimate the write-buffer memory cost of a workload.
//!
//! The binary parses one CREATE TABLE statement, replays `rows / sample`
//! generated inserts, updates or deletes inside a single transaction,
//! measures memory around the loop and projects the sampled cost to `rows`.

pub mod cli;
pub mod exit_codes;

use anyhow::Context;
use cli::Cli;
use estimate_core::TableSchema;
use tracing::{debug, info, warn};
use workload::{PhaseReport, WorkloadDriver};

/// Run the workload selected by `cli` and return its report.
pub async fn run(cli: &Cli) -> anyhow::Result<PhaseReport> {
    let config = cli.to_config();
    config.validate()?;

    let schema = TableSchema::from_file(&cli.schema)
        .with_context(|| format!("Failed to load schema from '{}'", cli.schema.display()))?;
    debug!("Schema columns: {}", schema.column_names().join(", "));
    for column in schema.unsupported_columns() {
        warn!("Column '{}' has unsupported type {}", column.name, column.kind);
    }

    info!(
        "Estimating {} of {} rows into '{}', sampling {} rows",
        config.mode,
        config.rows,
        schema.name,
        config.sample_rows()
    );

    let mode = config.mode;
    let mut driver = WorkloadDriver::new(config, schema).context("Failed to prepare workload")?;
    let report = driver
        .run()
        .await
        .with_context(|| format!("{mode} workload failed"))?;

    Ok(report)
}
