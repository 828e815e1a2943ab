//! Per-worker instrumentation counters.
//!
//! Each worker owns one `PerWorkerCounters` and writes it with relaxed
//! atomics so updating them never costs a lock; the Reporter reads every
//! worker's counters the same way, tolerating tearing across the fields
//! within one snapshot since they're averaged over a multi-second window
//! anyway.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals owned by a single worker thread, cache-line aligned so two
/// workers' counters never false-share.
#[repr(align(64))]
pub struct PerWorkerCounters {
    /// Running total of Content bytes emitted by this worker.
    pub bytes_sent: AtomicU64,
    /// Running total of Data packets emitted by this worker.
    pub packets_sent: AtomicU64,
    /// Running total of microseconds spent waiting in the queue.
    pub queue_micros_accum: AtomicU64,
    /// Running total of microseconds spent building and signing.
    pub process_micros_accum: AtomicU64,
    /// Running total of dequeued Interests that did not result in an emitted
    /// Data (a signing failure or a rejected `Face::put`).
    pub errors: AtomicU64,
}

impl Default for PerWorkerCounters {
    fn default() -> Self {
        PerWorkerCounters {
            bytes_sent: AtomicU64::new(0),
            packets_sent: AtomicU64::new(0),
            queue_micros_accum: AtomicU64::new(0),
            process_micros_accum: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

impl PerWorkerCounters {
    /// A snapshot of all counters taken via relaxed loads.
    pub fn load(&self) -> CounterSnapshot {
        CounterSnapshot {
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            queue_micros_accum: self.queue_micros_accum.load(Ordering::Relaxed),
            process_micros_accum: self.process_micros_accum.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Record one successfully emitted Data: `payload_size` bytes, plus the
    /// `queue_micros` spent waiting in the queue and `process_micros` spent
    /// building and signing it.
    pub fn record_success(&self, payload_size: usize, queue_micros: u64, process_micros: u64) {
        self.bytes_sent
            .fetch_add(payload_size as u64, Ordering::Relaxed);
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
        self.queue_micros_accum
            .fetch_add(queue_micros, Ordering::Relaxed);
        self.process_micros_accum
            .fetch_add(process_micros, Ordering::Relaxed);
    }

    /// Record a dequeued Interest that was dropped instead of emitted: the
    /// queue wait already happened and is still counted, but no bytes or
    /// packet is attributed to it.
    pub fn record_error(&self, queue_micros: u64) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        self.queue_micros_accum
            .fetch_add(queue_micros, Ordering::Relaxed);
    }
}

/// A point-in-time read of one worker's counters, or the sum across workers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Total Content bytes emitted.
    pub bytes_sent: u64,
    /// Total Data packets emitted.
    pub packets_sent: u64,
    /// Total microseconds spent waiting in the queue.
    pub queue_micros_accum: u64,
    /// Total microseconds spent building and signing.
    pub process_micros_accum: u64,
    /// Total dequeued Interests dropped instead of emitted.
    pub errors: u64,
}

impl CounterSnapshot {
    /// Sum a slice of per-worker counters into one process-wide snapshot.
    pub fn sum(counters: &[PerWorkerCounters]) -> CounterSnapshot {
        counters
            .iter()
            .map(PerWorkerCounters::load)
            .fold(CounterSnapshot::default(), |acc, s| CounterSnapshot {
                bytes_sent: acc.bytes_sent + s.bytes_sent,
                packets_sent: acc.packets_sent + s.packets_sent,
                queue_micros_accum: acc.queue_micros_accum + s.queue_micros_accum,
                process_micros_accum: acc.process_micros_accum + s.process_micros_accum,
                errors: acc.errors + s.errors,
            })
    }

    /// The element-wise difference `self - previous`, used by the Reporter to
    /// compute a windowed delta from two absolute snapshots taken two
    /// seconds apart.
    pub fn delta_since(&self, previous: &CounterSnapshot) -> CounterSnapshot {
        CounterSnapshot {
            bytes_sent: self.bytes_sent.saturating_sub(previous.bytes_sent),
            packets_sent: self.packets_sent.saturating_sub(previous.packets_sent),
            queue_micros_accum: self
                .queue_micros_accum
                .saturating_sub(previous.queue_micros_accum),
            process_micros_accum: self
                .process_micros_accum
                .saturating_sub(previous.process_micros_accum),
            errors: self.errors.saturating_sub(previous.errors),
        }
    }
}
