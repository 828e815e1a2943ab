//! The work queue between the Face callback and the worker pool.

use std::collections::VecDeque;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::name::Name;

/// One unit of work: an Interest's name plus the instant it was enqueued,
/// used by the worker to compute queue wait time.
#[derive(Clone, Debug)]
pub struct QueueEntry {
    /// The Interest's name, to become the Data's name.
    pub interest_name: Name,
    /// The instant this entry was pushed onto the queue, used by the worker
    /// to compute queue wait time.
    pub enqueued_at: Instant,
}

impl QueueEntry {
    /// Build a normal queue entry for an incoming Interest.
    pub fn new(interest_name: Name) -> Self {
        QueueEntry {
            interest_name,
            enqueued_at: Instant::now(),
        }
    }

    /// Build the shutdown sentinel: an entry carrying the empty name, which
    /// a worker recognises and never forwards to a Face.
    pub fn sentinel() -> Self {
        QueueEntry {
            interest_name: Name::empty(),
            enqueued_at: Instant::now(),
        }
    }

    /// Whether this entry is the shutdown sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.interest_name.is_empty()
    }
}

/// Unbounded MPMC FIFO with a blocking dequeue.
pub struct WorkQueue {
    state: Mutex<VecDeque<QueueEntry>>,
    not_empty: Condvar,
}

impl Default for WorkQueue {
    fn default() -> Self {
        WorkQueue {
            state: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }
}

impl WorkQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entry. Non-blocking, always succeeds, wakes one waiting
    /// worker.
    pub fn enqueue(&self, entry: QueueEntry) {
        let mut state = self.state.lock();
        state.push_back(entry);
        self.not_empty.notify_one();
    }

    /// Block until an entry is available, then return the oldest one. FIFO
    /// with respect to a single producer.
    pub fn wait_dequeue(&self) -> QueueEntry {
        let mut state = self.state.lock();
        loop {
            if let Some(entry) = state.pop_front() {
                return entry;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Current queue depth, used only by tests and the Reporter's optional
    /// diagnostics; not part of the signing hot path.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Whether the queue currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn fifo_order_for_single_producer() {
        let queue = WorkQueue::new();
        queue.enqueue(QueueEntry::new(Name::from_uri("/a")));
        queue.enqueue(QueueEntry::new(Name::from_uri("/b")));
        assert_eq!(queue.wait_dequeue().interest_name.to_string(), "/a");
        assert_eq!(queue.wait_dequeue().interest_name.to_string(), "/b");
    }

    #[test]
    fn wait_dequeue_blocks_until_enqueue() {
        let queue = Arc::new(WorkQueue::new());
        let reader = {
            let queue = queue.clone();
            thread::spawn(move || queue.wait_dequeue())
        };
        thread::sleep(std::time::Duration::from_millis(20));
        queue.enqueue(QueueEntry::new(Name::from_uri("/a")));
        let entry = reader.join().unwrap();
        assert_eq!(entry.interest_name.to_string(), "/a");
    }

    #[test]
    fn sentinel_is_recognised() {
        let sentinel = QueueEntry::sentinel();
        assert!(sentinel.is_sentinel());
        assert!(!QueueEntry::new(Name::from_uri("/a")).is_sentinel());
    }
}
