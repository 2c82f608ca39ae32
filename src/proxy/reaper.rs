//! Deferred walker teardown.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::{Error, Result};
use crate::strategy::Walker;

/// Thread name of the runtime created by [`Reaper::dedicated`].
pub const REAPER_THREAD_NAME: &str = "snmp-proxy-session-reaper";

/// Closes walkers off the thread that reported their completion.
///
/// [`Walker::close`] may wait for the walker's own callback work to drain,
/// so calling it from inside the completion callback would have the callback
/// wait on itself. The reaper hands every close to the blocking pool of its
/// runtime and never waits for the outcome: failures and panics are logged,
/// not propagated.
///
/// [`Reaper::dedicated`] owns a runtime reserved for teardown; it is what
/// [`SnmpProxyBuilder`](crate::proxy::SnmpProxyBuilder) uses unless told
/// otherwise. [`Reaper::new`] runs closes on an injected runtime instead.
/// Clones share the same pool.
#[derive(Debug, Clone)]
pub struct Reaper {
    handle: Handle,
    owned: Option<Arc<OwnedRuntime>>,
}

/// Runtime kept alive by dedicated reapers.
#[derive(Debug)]
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        // The last reaper may be dropped inside async code, where a blocking
        // shutdown would panic. Closes not yet started are discarded.
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

impl Reaper {
    /// Create a reaper running closes on `handle`'s blocking pool.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            owned: None,
        }
    }

    /// Create a reaper with its own runtime, named [`REAPER_THREAD_NAME`].
    ///
    /// The runtime lives as long as the reaper or any of its clones.
    pub fn dedicated() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(REAPER_THREAD_NAME)
            .build()
            .map_err(|source| Error::Io {
                target: None,
                source,
            })?;

        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Create a reaper on the current tokio runtime.
    pub fn try_current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| Error::NoRuntime)
    }

    /// Whether this reaper owns its runtime.
    pub fn is_dedicated(&self) -> bool {
        self.owned.is_some()
    }

    /// Schedule `walker` to be closed. Returns immediately.
    pub fn reap<W: Walker>(&self, walker: Arc<W>) {
        tracing::trace!("scheduling walker close");
        // Detached: nobody waits on a close.
        drop(self.handle.spawn_blocking(move || close_walker(walker.as_ref())));
    }
}

fn close_walker<W: Walker + ?Sized>(walker: &W) {
    match panic::catch_unwind(AssertUnwindSafe(|| walker.close())) {
        Ok(Ok(())) => tracing::trace!("walker closed"),
        Ok(Err(e)) => tracing::warn!(error = %e, "failed to close walker"),
        Err(_) => tracing::error!("walker close panicked"),
    }
}
