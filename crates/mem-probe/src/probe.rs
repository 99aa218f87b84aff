//! Snapshot capture.

use crate::alloc::{allocator_stats, reclaim};
use crate::process::{ProcessMemoryReader, RssSource};
use crate::stage::MemStage;
use std::time::Duration;
use tracing::{debug, warn};

/// Default wait between reclaiming memory and the post-reclaim snapshot.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Takes [`MemStage`] snapshots.
pub struct MemProbe {
    reader: Box<dyn ProcessMemoryReader>,
    settle_delay: Duration,
}

impl MemProbe {
    pub fn new(reader: Box<dyn ProcessMemoryReader>) -> Self {
        Self {
            reader,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn from_source(source: RssSource) -> Self {
        Self::new(source.reader())
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn reader_name(&self) -> &'static str {
        self.reader.name()
    }

    /// Read allocator and process memory now. A process reader failure is
    /// logged and reads as zero.
    pub fn capture(&self) -> MemStage {
        let allocator = allocator_stats();
        let process_resident_bytes = match self.reader.resident_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read process memory via {}: {}", self.reader.name(), e);
                0
            }
        };
        MemStage {
            allocator,
            process_resident_bytes,
        }
    }

    /// Return free memory to the OS, wait for the settle delay, then capture.
    pub async fn capture_after_reclaim(&self) -> MemStage {
        let released = reclaim();
        debug!(
            "Reclaim released memory: {}, settling for {:?}",
            released, self.settle_delay
        );
        tokio::time::sleep(self.settle_delay).await;
        self.capture()
    }
}
