//! State shared by every engine handle

use dataproc_core::{
    DiagnosticEvent, DiagnosticsSink, Error, Lifecycle, LifecycleGuard, LoggingSink, Result,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Lifecycle membership, error bookkeeping and diagnostics of one handle
pub(crate) struct HandleCore {
    guard: Option<LifecycleGuard>,
    init_error: Option<Error>,
    last_error: Mutex<String>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl HandleCore {
    /// Join `lifecycle`; a failure leaves the handle permanently invalid
    pub(crate) fn new(lifecycle: &Arc<Lifecycle>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        let mut core = Self {
            guard: None,
            init_error: None,
            last_error: Mutex::new(String::new()),
            diagnostics,
        };
        match lifecycle.acquire() {
            Ok(guard) => core.guard = Some(guard),
            Err(e) => {
                core.report("create", &e);
                core.init_error = Some(e);
            }
        }
        core
    }

    /// Join `lifecycle`, returning the failure instead of keeping it
    pub(crate) fn try_new(
        lifecycle: &Arc<Lifecycle>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self> {
        let core = Self::new(lifecycle, diagnostics);
        match core.init_error.clone() {
            Some(e) => Err(e),
            None => Ok(core),
        }
    }

    pub(crate) fn default_sink() -> Arc<dyn DiagnosticsSink> {
        Arc::new(LoggingSink::default())
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.guard.as_ref().is_some_and(LifecycleGuard::is_valid)
    }

    pub(crate) fn last_error(&self) -> String {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check(&self) -> Result<()> {
        match (&self.guard, &self.init_error) {
            (Some(guard), _) => guard.ensure_valid(),
            (None, Some(e)) => Err(Error::NotInitialized(format!(
                "handle construction failed: {}",
                e.message()
            ))),
            (None, None) => Err(Error::NotInitialized("handle has no lifecycle".to_string())),
        }
    }

    /// Run `f` if the handle is live, recording any failure
    pub(crate) fn run<T>(&self, operation: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let result = self.check().and_then(|_| f());
        if let Err(e) = &result {
            self.report(operation, e);
        }
        result
    }

    fn report(&self, operation: &'static str, error: &Error) {
        let event = DiagnosticEvent::from_error(operation, error);
        warn!(
            operation,
            kind = %event.kind,
            trace_id = %event.trace_id,
            "{}",
            event.message
        );
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = error.to_string();
        self.diagnostics.record(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataproc_core::{CollectingSink, ErrorKind};

    #[test]
    fn test_failed_construction_short_circuits() {
        let lifecycle = Arc::new(Lifecycle::with_capacity(0));
        let sink = Arc::new(CollectingSink::new());
        let core = HandleCore::new(&lifecycle, sink.clone());

        assert!(!core.is_valid());
        let mut called = false;
        let err = core
            .run("process", || {
                called = true;
                Ok(())
            })
            .unwrap_err();
        assert!(!called);
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
        assert!(core.last_error().starts_with("Not initialized: "));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].operation, "create");
        assert_eq!(events[0].kind, ErrorKind::RuntimeFailure);
        assert_eq!(events[1].operation, "process");
    }

    #[test]
    fn test_try_new_returns_error() {
        let lifecycle = Arc::new(Lifecycle::with_capacity(1));
        let first = HandleCore::try_new(&lifecycle, HandleCore::default_sink()).unwrap();
        assert!(first.is_valid());
        assert!(HandleCore::try_new(&lifecycle, HandleCore::default_sink()).is_err());
    }

    #[test]
    fn test_last_error_tracks_latest_failure() {
        let lifecycle = Arc::new(Lifecycle::new());
        let core = HandleCore::new(&lifecycle, HandleCore::default_sink());
        assert_eq!(core.last_error(), "");

        let _ = core.run::<()>("a", || Err(Error::InvalidArgument("first".to_string())));
        let _ = core.run::<()>("b", || Err(Error::busy()));
        assert_eq!(core.last_error(), "Runtime error: busy");

        // Success keeps the last failure
        core.run("c", || Ok(())).unwrap();
        assert_eq!(core.last_error(), "Runtime error: busy");
    }
}
