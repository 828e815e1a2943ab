//! Process-wide shutdown coordination.
//!
//! A cloneable `Arc<AtomicBool>` flag: `ServerCore` installs a signal hook
//! that sets it, and workers and the reporter observe it without taking a
//! lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag that starts `false` and is set `true` exactly once, on
/// shutdown.
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// A fresh flag, not yet signalled.
    pub fn new() -> Self {
        ShutdownFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Whether shutdown has been requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Request shutdown. Idempotent.
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Install this flag as the target of the process's interrupt signal.
    /// The hook may only be installed once per process; later calls are a
    /// no-op (mirrors `ctrlc::set_handler`'s own restriction).
    pub fn install_signal_hook(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.set())
    }
}
