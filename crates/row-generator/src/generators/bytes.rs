//! Byte-string generator.

use estimate_core::Datum;

/// Longest byte column the generator will allocate a counter for. A longer
/// value could never be staged under the write buffer's default 6 MiB entry
/// limit.
pub const MAX_BYTES_LENGTH: u64 = 6 << 20;

/// Fixed-size buffer treated as a big-endian base-256 counter.
///
/// Every call increments the rightmost byte and carries leftward. After all
/// `256^len` combinations the buffer wraps back to all zeros and keeps
/// counting; the wrap is intended.
#[derive(Debug, Clone)]
pub struct ByteCounter {
    buffer: Vec<u8>,
}

impl ByteCounter {
    /// Create a counter of `length` bytes (at least one).
    pub fn new(length: usize) -> Self {
        Self {
            buffer: vec![0; length.max(1)],
        }
    }

    /// Width of the emitted values.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn next_value(&mut self) -> Datum {
        self.increment();
        Datum::Bytes(self.buffer.clone())
    }

    fn increment(&mut self) {
        for byte in self.buffer.iter_mut().rev() {
            if *byte < u8::MAX {
                *byte += 1;
                return;
            }
            *byte = 0;
        }
    }
}
