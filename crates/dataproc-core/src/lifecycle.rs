//! Reference-counted lifecycle management
//!
//! Engine handles share one-time setup through a [`Lifecycle`]. Each handle
//! holds a [`LifecycleGuard`]; the first acquisition initializes the shared
//! state and dropping the last guard tears it down again.
//!
//! Callers can create an explicit context with [`Lifecycle::new`] and pass it
//! to every handle, or use the lazily created [`Lifecycle::global`].
//!
//! The reference count and the initialized flag live behind a single mutex.
//! A generation counter advances on every teardown so that guards issued
//! before a forced [`Lifecycle::shutdown`] can tell they are stale.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

lazy_static! {
    static ref GLOBAL_LIFECYCLE: Arc<Lifecycle> = Arc::new(Lifecycle::new());
}

#[derive(Debug, Default)]
struct LifecycleState {
    initialized: bool,
    reference_count: usize,
    generation: u64,
}

/// Shared lifecycle context
#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<LifecycleState>,
    capacity: Option<usize>,
}

impl Lifecycle {
    /// Create an unbounded lifecycle context
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::default()),
            capacity: None,
        }
    }

    /// Create a context that admits at most `max_handles` live guards
    pub fn with_capacity(max_handles: usize) -> Self {
        Self {
            state: Mutex::new(LifecycleState::default()),
            capacity: Some(max_handles),
        }
    }

    /// The process-wide context
    pub fn global() -> Arc<Lifecycle> {
        Arc::clone(&GLOBAL_LIFECYCLE)
    }

    fn lock(&self) -> Result<MutexGuard<'_, LifecycleState>> {
        self.state
            .lock()
            .map_err(|e| Error::RuntimeFailure(format!("Failed to lock lifecycle state: {e}")))
    }

    /// Register a new handle, initializing shared state on first use
    ///
    /// Fails with `RuntimeFailure` when the context is at capacity.
    pub fn acquire(self: &Arc<Self>) -> Result<LifecycleGuard> {
        let mut state = self.lock()?;

        if let Some(capacity) = self.capacity {
            if state.reference_count >= capacity {
                return Err(Error::RuntimeFailure(format!(
                    "shared resources exhausted: {capacity} handles already live"
                )));
            }
        }

        if !state.initialized {
            state.initialized = true;
            debug!(generation = state.generation, "lifecycle initialized");
        }
        state.reference_count += 1;

        Ok(LifecycleGuard {
            lifecycle: Arc::clone(self),
            generation: state.generation,
        })
    }

    /// Tear down shared state regardless of outstanding guards
    ///
    /// Outstanding guards become stale; their handles report
    /// `NotInitialized` from then on.
    pub fn shutdown(&self) -> Result<()> {
        let mut state = self.lock()?;
        if state.initialized {
            Self::teardown(&mut state);
        }
        Ok(())
    }

    fn teardown(state: &mut LifecycleState) {
        state.initialized = false;
        state.reference_count = 0;
        state.generation += 1;
        debug!(generation = state.generation, "lifecycle torn down");
    }

    fn release(&self, generation: u64) {
        // A poisoned lock only means another handle panicked mid-update; the
        // counters themselves are still consistent.
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.generation != generation || !state.initialized {
            return;
        }
        state.reference_count = state.reference_count.saturating_sub(1);
        if state.reference_count == 0 {
            Self::teardown(&mut state);
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock()
            .map(|state| state.initialized && state.generation == generation)
            .unwrap_or(false)
    }

    /// Number of live guards
    pub fn reference_count(&self) -> usize {
        self.lock().map(|state| state.reference_count).unwrap_or(0)
    }

    /// Whether shared state is currently set up
    pub fn is_initialized(&self) -> bool {
        self.lock().map(|state| state.initialized).unwrap_or(false)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Membership of one handle in a [`Lifecycle`]
///
/// Not `Clone`: each guard accounts for exactly one reference.
#[derive(Debug)]
pub struct LifecycleGuard {
    lifecycle: Arc<Lifecycle>,
    generation: u64,
}

impl LifecycleGuard {
    /// Whether the shared state this guard joined is still alive
    pub fn is_valid(&self) -> bool {
        self.lifecycle.is_current(self.generation)
    }

    /// Fail with `NotInitialized` if the shared state was torn down
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::NotInitialized(
                "shared resources were torn down".to_string(),
            ))
        }
    }

    /// The context this guard belongs to
    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        self.lifecycle.release(self.generation);
    }
}
