//! Sampled workload orchestration.

use crate::config::{Isolation, Mode, WorkloadConfig};
use crate::error::WorkloadError;
use crate::metrics::PhaseTiming;
use crate::report::{IsolationReport, MemoryReport, PhaseReport};
use estimate_core::{Row, TableSchema};
use mem_probe::{per_row_estimate, MemProbe, MemStage};
use row_generator::RowGenerator;
use std::time::Instant;
use tracing::{debug, info};
use txn_buffer::{Handle, MemBuffer, MemStore, Table};

const TABLE_ID: i64 = 1;

/// Replays a sampled workload against an in-memory write buffer and
/// measures what it costs.
pub struct WorkloadDriver {
    config: WorkloadConfig,
    store: MemStore,
    table: Table,
    generator: RowGenerator,
    probe: MemProbe,
}

impl WorkloadDriver {
    /// Validate `config` and build the generator and store for `schema`.
    pub fn new(config: WorkloadConfig, schema: TableSchema) -> Result<Self, WorkloadError> {
        let probe = MemProbe::from_source(config.rss_source).with_settle_delay(config.settle_delay);
        Self::with_probe(config, schema, probe)
    }

    /// Like [`new`](Self::new) with an explicit probe.
    pub fn with_probe(
        config: WorkloadConfig,
        schema: TableSchema,
        probe: MemProbe,
    ) -> Result<Self, WorkloadError> {
        config.validate()?;

        let generator = RowGenerator::from_schema(&schema, config.random_source())?;
        let store = MemStore::new()
            .with_txn_size_limit(config.txn_size_limit)
            .with_entry_size_limit(config.entry_size_limit);
        let table = Table::new(TABLE_ID, schema);

        debug!(
            "Workload driver ready: table '{}', {} columns, process memory via {}, settle delay {:?}",
            table.schema().name,
            generator.column_count(),
            probe.reader_name(),
            probe.settle_delay()
        );

        Ok(Self {
            config,
            store,
            table,
            generator,
            probe,
        })
    }

    /// Run the configured mode.
    pub async fn run(&mut self) -> Result<PhaseReport, WorkloadError> {
        match self.config.mode {
            Mode::Insert => self.insert().await,
            Mode::Update => self.update().await,
            Mode::Delete => self.delete().await,
        }
    }

    /// Insert `sample_rows` fresh rows in one transaction.
    pub async fn insert(&mut self) -> Result<PhaseReport, WorkloadError> {
        let sample_rows = self.config.sample_rows();
        info!("Inserting {} sampled rows", sample_rows);

        let mut txn = self.store.begin();
        let baseline = self.probe.capture();
        let start = Instant::now();
        for row in self.generator.rows(sample_rows) {
            self.table.add_record(&mut txn, &row?)?;
        }
        let timing = PhaseTiming::new(sample_rows, start.elapsed());

        Ok(finish_phase(
            &self.config,
            &self.probe,
            Mode::Insert,
            timing,
            baseline,
            txn.buffer_mut(),
        )
        .await)
    }

    /// Update every column of `sample_rows` committed rows.
    pub async fn update(&mut self) -> Result<PhaseReport, WorkloadError> {
        let sample_rows = self.config.sample_rows();
        let (handles, befores) = self.prepare_rows(sample_rows)?;
        info!("Updating {} sampled rows", sample_rows);

        let touched = vec![true; self.table.schema().columns.len()];
        let mut txn = self.store.begin();
        let baseline = self.probe.capture();
        let start = Instant::now();
        for (handle, before) in handles.iter().zip(&befores) {
            let after = self.generator.next_row()?;
            self.table
                .update_record(&mut txn, *handle, before, &after, &touched)?;
        }
        let timing = PhaseTiming::new(sample_rows, start.elapsed());

        let report = finish_phase(
            &self.config,
            &self.probe,
            Mode::Update,
            timing,
            baseline,
            txn.buffer_mut(),
        )
        .await;
        drop((handles, befores));
        Ok(report)
    }

    /// Delete `sample_rows` committed rows.
    pub async fn delete(&mut self) -> Result<PhaseReport, WorkloadError> {
        let sample_rows = self.config.sample_rows();
        let (handles, befores) = self.prepare_rows(sample_rows)?;
        info!("Deleting {} sampled rows", sample_rows);

        let mut txn = self.store.begin();
        let baseline = self.probe.capture();
        let start = Instant::now();
        for (handle, before) in handles.iter().zip(&befores) {
            self.table.remove_record(&mut txn, *handle, before)?;
        }
        let timing = PhaseTiming::new(sample_rows, start.elapsed());

        let report = finish_phase(
            &self.config,
            &self.probe,
            Mode::Delete,
            timing,
            baseline,
            txn.buffer_mut(),
        )
        .await;
        drop((handles, befores));
        Ok(report)
    }

    /// Insert and commit `count` rows, returning their handles and the exact
    /// rows written.
    fn prepare_rows(&mut self, count: u64) -> Result<(Vec<Handle>, Vec<Row>), WorkloadError> {
        let capacity = usize::try_from(count).unwrap_or(0);
        let mut handles = Vec::with_capacity(capacity);
        let mut rows = Vec::with_capacity(capacity);

        let mut txn = self.store.begin();
        for row in self.generator.rows(count) {
            let row = row?;
            handles.push(self.table.add_record(&mut txn, &row)?);
            rows.push(row);
        }
        let committed = txn.commit();

        debug!("Prepared {} rows ({} entries committed)", count, committed);
        Ok((handles, rows))
    }
}

/// Measure the open transaction's cost, then run the isolation pass if one
/// is configured. The transaction itself is abandoned by the caller.
async fn finish_phase(
    config: &WorkloadConfig,
    probe: &MemProbe,
    mode: Mode,
    timing: PhaseTiming,
    baseline: MemStage,
    buffer: &mut MemBuffer,
) -> PhaseReport {
    let rows = config.rows;
    let sample_rows = timing.rows;

    let immediate = MemoryReport::new(
        mode.to_string(),
        baseline.diff(&probe.capture()),
        buffer.size(),
        rows,
        sample_rows,
    );

    let settled_stage = probe.capture_after_reclaim().await;
    let settled = MemoryReport::new(
        format!("{mode}-gc"),
        baseline.diff(&settled_stage),
        buffer.size(),
        rows,
        sample_rows,
    );

    let estimate = per_row_estimate(buffer.size(), rows, sample_rows);
    info!(
        "{} phase measured: {} staged entries, {} bytes",
        mode,
        buffer.len(),
        buffer.size()
    );

    let isolation = isolate(buffer, config.isolation);

    PhaseReport {
        mode,
        rows,
        timing,
        immediate,
        settled,
        estimate,
        isolation,
    }
}

/// Drop staged keys or values. The key set is copied out first so the
/// buffer is never mutated while being iterated.
fn isolate(buffer: &mut MemBuffer, isolation: Isolation) -> Option<IsolationReport> {
    if isolation == Isolation::None {
        return None;
    }

    let start = Instant::now();
    let keys: Vec<Vec<u8>> = buffer.keys().map(<[u8]>::to_vec).collect();
    for key in &keys {
        match isolation {
            Isolation::DropKey => buffer.discard(key),
            Isolation::DropValue => buffer.truncate_value(key),
            Isolation::None => false,
        };
    }
    let elapsed = start.elapsed();

    debug!("{} pass over {} keys took {:?}", isolation, keys.len(), elapsed);

    Some(IsolationReport {
        isolation,
        keys: keys.len(),
        elapsed,
        entries_after: buffer.len(),
        size_after: buffer.size(),
        value_bytes_after: buffer.value_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mem_probe::{ProbeError, ProcessMemoryReader, RssSource};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use row_generator::GeneratorError;
    use txn_buffer::{codec, StorageError};

    /// Reports 1000, 2000, 3000, ... bytes on successive reads.
    #[derive(Default)]
    struct GrowingReader {
        reads: AtomicU64,
    }

    impl ProcessMemoryReader for GrowingReader {
        fn name(&self) -> &'static str {
            "growing"
        }

        fn resident_bytes(&self) -> Result<u64, ProbeError> {
            Ok((self.reads.fetch_add(1, Ordering::SeqCst) + 1) * 1000)
        }
    }

    fn config(rows: u64, sample: u64) -> WorkloadConfig {
        WorkloadConfig::new(rows, sample)
            .with_settle_delay(Duration::ZERO)
            .with_rss_source(RssSource::None)
    }

    fn schema(sql: &str) -> TableSchema {
        TableSchema::from_sql(sql).unwrap()
    }

    #[tokio::test]
    async fn test_insert_single_unsigned_column() {
        let mut driver = WorkloadDriver::new(
            config(1000, 100),
            schema("CREATE TABLE t (id BIGINT UNSIGNED)"),
        )
        .unwrap();

        let report = driver.run().await.unwrap();

        assert_eq!(report.timing.rows, 10);
        assert_eq!(report.immediate.sample_rows, 10);
        assert_eq!(report.immediate.label, "insert");
        assert_eq!(report.settled.label, "insert-gc");

        let buffer = report.immediate.buffer_bytes;
        assert!(buffer > 0);
        assert_eq!(report.immediate.total_buffer_bytes, buffer * 1000 / 10);
        assert_eq!(report.estimate, (buffer / 10) * 1000);
        assert!(report.isolation.is_none());
    }

    #[tokio::test]
    async fn test_insert_writes_generated_values() {
        let mut driver = WorkloadDriver::new(
            config(1000, 100),
            schema("CREATE TABLE t (id BIGINT UNSIGNED)"),
        )
        .unwrap();

        let mut txn = driver.store.begin();
        for row in driver.generator.rows(10) {
            driver.table.add_record(&mut txn, &row.unwrap()).unwrap();
        }

        // One record per row: 19-byte key, 3-byte header, 9-byte value
        assert_eq!(txn.buffer().len(), 10);
        assert_eq!(txn.buffer().size(), 10 * (19 + 3 + 9));
        assert_eq!(driver.generator.rows_generated(), 10);

        // The k-th insert wrote value k under handle k
        for k in 1..=10u64 {
            let key = codec::record_key(TABLE_ID, Handle::new(k as i64));
            let value = txn.get(&key).unwrap();
            assert_eq!(&value[..4], &[0x80, 0x00, 0x01, 0x04]);
            assert_eq!(u64::from_le_bytes(value[4..12].try_into().unwrap()), k);
        }
    }

    #[tokio::test]
    async fn test_settled_diff_uses_loop_baseline() {
        let probe = MemProbe::new(Box::new(GrowingReader::default()))
            .with_settle_delay(Duration::ZERO);
        let mut driver = WorkloadDriver::with_probe(
            config(1000, 100),
            schema("CREATE TABLE t (id BIGINT UNSIGNED)"),
            probe,
        )
        .unwrap();

        let report = driver.run().await.unwrap();

        // Reads: baseline 1000, immediate 2000, settled 3000
        assert_eq!(report.immediate.sampled.process, 2000 - 1000);
        assert_eq!(report.settled.sampled.process, 3000 - 1000);
        assert_eq!(report.settled.total.process, 2000 * 1000 / 10);
    }

    #[tokio::test]
    async fn test_update_measures_only_the_update() {
        let mut driver = WorkloadDriver::new(
            config(500, 100).with_mode(Mode::Update),
            schema("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(8))"),
        )
        .unwrap();

        let report = driver.run().await.unwrap();

        // Setup rows were committed; the measured buffer holds 5 record
        // rewrites plus a delete and a put per primary key entry.
        assert_eq!(report.timing.rows, 5);
        assert_eq!(driver.store.len(), 10);
        assert!(report.immediate.buffer_bytes > 0);
        assert_eq!(report.settled.buffer_bytes, report.immediate.buffer_bytes);
    }

    #[tokio::test]
    async fn test_delete_leaves_committed_rows() {
        let mut driver = WorkloadDriver::new(
            config(300, 100).with_mode(Mode::Delete),
            schema("CREATE TABLE t (id BIGINT, KEY idx (id))"),
        )
        .unwrap();

        let report = driver.run().await.unwrap();

        assert_eq!(report.timing.rows, 3);
        // The measured transaction is abandoned, so the setup rows survive
        assert_eq!(driver.store.len(), 6);
        assert_eq!(report.mode, Mode::Delete);
    }

    #[tokio::test]
    async fn test_drop_key_empties_buffer() {
        let mut driver = WorkloadDriver::new(
            config(1000, 100).with_isolation(Isolation::DropKey),
            schema("CREATE TABLE t (id BIGINT UNSIGNED, c CHAR(10))"),
        )
        .unwrap();

        let report = driver.run().await.unwrap();
        let isolation = report.isolation.unwrap();

        assert_eq!(isolation.keys, 10);
        assert_eq!(isolation.entries_after, 0);
        assert_eq!(isolation.size_after, 0);
        // Measurements were taken before the pass
        assert!(report.immediate.buffer_bytes > 0);
    }

    #[tokio::test]
    async fn test_drop_value_keeps_keys() {
        let mut driver = WorkloadDriver::new(
            config(1000, 100).with_isolation(Isolation::DropValue),
            schema("CREATE TABLE t (id BIGINT UNSIGNED, c CHAR(10))"),
        )
        .unwrap();

        let report = driver.run().await.unwrap();
        let isolation = report.isolation.unwrap();

        assert_eq!(isolation.keys, 10);
        assert_eq!(isolation.entries_after, 10);
        assert_eq!(isolation.value_bytes_after, 0);
        assert_eq!(isolation.size_after, 10 * 19);
    }

    #[tokio::test]
    async fn test_txn_limit_aborts_run() {
        let mut driver = WorkloadDriver::new(
            config(1000, 100).with_txn_size_limit(64),
            schema("CREATE TABLE t (id BIGINT UNSIGNED)"),
        )
        .unwrap();

        let result = driver.run().await;

        assert!(matches!(
            result,
            Err(WorkloadError::Storage(StorageError::TxnTooLarge { .. }))
        ));
    }

    #[tokio::test]
    async fn test_entry_limit_aborts_run() {
        let mut driver = WorkloadDriver::new(
            config(1000, 100).with_entry_size_limit(16),
            schema("CREATE TABLE t (id BIGINT UNSIGNED)"),
        )
        .unwrap();

        let result = driver.run().await;

        assert!(matches!(
            result,
            Err(WorkloadError::Storage(StorageError::EntryTooLarge { size: 31, limit: 16 }))
        ));
    }

    #[test]
    fn test_unsupported_column_fails_before_any_row() {
        let result = WorkloadDriver::new(
            config(1000, 100),
            schema("CREATE TABLE t (id BIGINT, doc JSON)"),
        );

        assert!(matches!(result, Err(WorkloadError::Generator(_))));
    }

    #[test]
    fn test_oversized_byte_column_rejected() {
        assert_eq!(row_generator::MAX_BYTES_LENGTH, txn_buffer::DEFAULT_ENTRY_SIZE_LIMIT);

        let result = WorkloadDriver::new(
            config(1000, 100),
            schema("CREATE TABLE t (id BIGINT, payload VARBINARY(4294967295))"),
        );

        assert!(matches!(
            result,
            Err(WorkloadError::Generator(GeneratorError::LengthTooLarge { .. }))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = WorkloadDriver::new(config(10, 100), schema("CREATE TABLE t (id BIGINT)"));
        assert!(matches!(result, Err(WorkloadError::Config(_))));
    }
}
