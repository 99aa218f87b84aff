//! Allocator statistics.
//!
//! Rust exposes no allocator counters of its own, so the binary installs
//! [`TrackingAllocator`] as its global allocator. It forwards to [`System`]
//! and keeps a running count of live bytes and the high-water mark.
//!
//! On glibc the reserved figure comes from `mallinfo2` (main arena plus
//! mmap'd chunks). Elsewhere the tracked peak stands in for it, since the
//! allocator never hands memory back on those targets without being asked.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Global allocator wrapper counting live and peak heap bytes.
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: mem_probe::TrackingAllocator = mem_probe::TrackingAllocator;
/// ```
pub struct TrackingAllocator;

#[inline]
fn record_alloc(size: usize) {
    let now = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
    PEAK.fetch_max(now, Ordering::Relaxed);
    if !ACTIVE.load(Ordering::Relaxed) {
        ACTIVE.store(true, Ordering::Relaxed);
    }
}

#[inline]
fn record_free(size: usize) {
    ALLOCATED.fetch_sub(size, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_free(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_free(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Whether [`TrackingAllocator`] is the active global allocator.
pub fn tracking_active() -> bool {
    ACTIVE.load(Ordering::Relaxed)
}

/// Heap figures at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Bytes currently handed out to the program
    pub allocated: u64,

    /// Bytes the allocator holds from the OS
    pub reserved: u64,
}

/// Read current allocator statistics.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub fn allocator_stats() -> AllocatorStats {
    // SAFETY: mallinfo2 only reads allocator bookkeeping.
    let info = unsafe { libc::mallinfo2() };
    let reserved = (info.arena + info.hblkhd) as u64;
    let allocated = if tracking_active() {
        ALLOCATED.load(Ordering::Relaxed) as u64
    } else {
        (info.uordblks + info.hblkhd) as u64
    };
    AllocatorStats {
        allocated,
        reserved,
    }
}

/// Read current allocator statistics.
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
pub fn allocator_stats() -> AllocatorStats {
    AllocatorStats {
        allocated: ALLOCATED.load(Ordering::Relaxed) as u64,
        reserved: PEAK.load(Ordering::Relaxed) as u64,
    }
}

/// Ask the allocator to return free memory to the OS. Returns whether any
/// memory was released.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub fn reclaim() -> bool {
    // SAFETY: malloc_trim has no preconditions.
    unsafe { libc::malloc_trim(0) != 0 }
}

/// Ask the allocator to return free memory to the OS. Returns whether any
/// memory was released.
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
pub fn reclaim() -> bool {
    false
}
