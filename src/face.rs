//! The Face abstraction: the forwarder connection that delivers Interests and
//! accepts outgoing Data.
//!
//! No real NFD transport is implemented here; the trait exists so the server
//! core and the worker pool depend only on the shape of a face, and so tests
//! can drive the whole pipeline with a scripted in-memory double. All methods
//! take `&self`: workers share one `Face` concurrently while the calling
//! thread drives `process_events`, so any mutable state a concrete adapter
//! needs must be behind interior mutability.
use crate::error::Result;
use crate::name::Name;

/// A connection to a Named Data Networking forwarder.
pub trait Face: Sync {
    /// Register `prefix` with the forwarder. An `Err` here is fatal to
    /// startup: no workers are spawned and the process exits non-zero.
    fn register_prefix(&self, prefix: &Name) -> Result<()>;

    /// Send a fully wire-encoded Data packet out on the face.
    fn put(&self, data_wire: Vec<u8>) -> Result<()>;

    /// Run the event loop, invoking `on_interest` once per incoming
    /// Interest's name. A real face blocks here until the process is asked to
    /// shut down; the in-memory double delivers its scripted batch and
    /// returns.
    fn process_events(&self, on_interest: &mut dyn FnMut(Name));
}

/// An in-memory `Face` double for tests: delivers a fixed script of
/// Interests and records every Data wire handed to `put`.
pub struct InMemoryFace {
    script: parking_lot::Mutex<Vec<Name>>,
    registered_prefix: parking_lot::Mutex<Option<Name>>,
    fail_registration: bool,
    reject_put: bool,
    emitted: parking_lot::Mutex<Vec<Vec<u8>>>,
}

impl InMemoryFace {
    /// A face that delivers `script` (in order) once `process_events` runs.
    pub fn new(script: Vec<Name>) -> Self {
        InMemoryFace {
            script: parking_lot::Mutex::new(script),
            registered_prefix: parking_lot::Mutex::new(None),
            fail_registration: false,
            reject_put: false,
            emitted: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// A face whose `register_prefix` always fails, for exercising the
    /// registration-failure exit path.
    pub fn failing_registration() -> Self {
        InMemoryFace {
            script: parking_lot::Mutex::new(Vec::new()),
            registered_prefix: parking_lot::Mutex::new(None),
            fail_registration: true,
            reject_put: false,
            emitted: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// A face that registers normally but rejects every `put`, for
    /// exercising a worker's per-packet error path.
    pub fn rejecting_put() -> Self {
        InMemoryFace {
            script: parking_lot::Mutex::new(Vec::new()),
            registered_prefix: parking_lot::Mutex::new(None),
            fail_registration: false,
            reject_put: true,
            emitted: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// The prefix most recently registered, if any.
    pub fn registered_prefix(&self) -> Option<Name> {
        self.registered_prefix.lock().clone()
    }

    /// Every Data wire handed to `put` so far, in order.
    pub fn emitted(&self) -> Vec<Vec<u8>> {
        self.emitted.lock().clone()
    }
}

impl Face for InMemoryFace {
    fn register_prefix(&self, prefix: &Name) -> Result<()> {
        if self.fail_registration {
            return Err(crate::error::AppError::Registration(format!(
                "simulated registration failure for {prefix}"
            )));
        }
        *self.registered_prefix.lock() = Some(prefix.clone());
        Ok(())
    }

    fn put(&self, data_wire: Vec<u8>) -> Result<()> {
        if self.reject_put {
            return Err(crate::error::AppError::Signing(
                "simulated Face::put rejection".into(),
            ));
        }
        self.emitted.lock().push(data_wire);
        Ok(())
    }

    fn process_events(&self, on_interest: &mut dyn FnMut(Name)) {
        let script = std::mem::take(&mut *self.script.lock());
        for name in script {
            on_interest(name);
        }
    }
}
