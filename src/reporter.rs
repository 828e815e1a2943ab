//! The Reporter: periodic throughput and latency summaries.

use std::time::Duration;

use crate::counters::{CounterSnapshot, PerWorkerCounters};

/// The reporting window: every two seconds, a new delta is computed and
/// logged.
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// One windowed summary, returned by each reporting tick and collected by
/// `ServerCore` for a final run summary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReporterSnapshot {
    pub kbps: u64,
    pub packets_per_sec: u64,
    /// Mean queue wait in microseconds, or `-1` if no packets were sent this
    /// window.
    pub mean_queue_micros: i64,
    /// Mean processing time in microseconds, or `-1` if no packets were sent
    /// this window.
    pub mean_process_micros: i64,
    /// Dropped Interests (signing or `Face::put` failures) in this window.
    pub errors: u64,
}

/// Compute one windowed snapshot from the totals at the start and end of a
/// `REPORT_INTERVAL`-long window.
pub fn compute_snapshot(current: &CounterSnapshot, previous: &CounterSnapshot) -> ReporterSnapshot {
    let delta = current.delta_since(previous);
    let kbps = delta.bytes_sent * 8 / (1024 * REPORT_INTERVAL.as_secs());
    let packets_per_sec = delta.packets_sent / REPORT_INTERVAL.as_secs();

    let (mean_queue_micros, mean_process_micros) = if delta.packets_sent == 0 {
        (-1, -1)
    } else {
        (
            (delta.queue_micros_accum / delta.packets_sent) as i64,
            (delta.process_micros_accum / delta.packets_sent) as i64,
        )
    };

    ReporterSnapshot {
        kbps,
        packets_per_sec,
        mean_queue_micros,
        mean_process_micros,
        errors: delta.errors,
    }
}

/// Run the reporting loop: sleep, snapshot, log, repeat, until `should_stop`
/// returns `true`. Returns every emitted snapshot, in order.
pub fn run(
    counters: &[PerWorkerCounters],
    should_stop: impl Fn() -> bool,
) -> Vec<ReporterSnapshot> {
    let mut snapshots = Vec::new();
    let mut previous = CounterSnapshot::sum(counters);
    loop {
        std::thread::sleep(REPORT_INTERVAL);
        if should_stop() {
            return snapshots;
        }
        let current = CounterSnapshot::sum(counters);
        let snapshot = compute_snapshot(&current, &previous);
        tracing::info!(
            "{} Kbps( {} pkt/s) - qtime= {} us, ptime= {} us, errors= {}",
            snapshot.kbps,
            snapshot.packets_per_sec,
            snapshot.mean_queue_micros,
            snapshot.mean_process_micros,
            snapshot.errors,
        );
        snapshots.push(snapshot);
        previous = current;
    }
}
