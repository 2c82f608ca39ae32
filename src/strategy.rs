//! SNMP strategy abstraction.
//!
//! The proxy does not speak the SNMP wire protocol. It drives an
//! [`SnmpStrategy`], which provides two primitives:
//!
//! - a pull-style multi-OID GET returning a future, and
//! - a push-style [`Walker`] that reports rows through tracker sinks and
//!   signals the end of the walk through a single-shot [`WalkCallback`].
//!
//! Retries, timeouts, version handling and PDU packing all live behind this
//! trait.

use std::future::Future;

use crate::agent::AgentConfig;
use crate::error::Result;
use crate::oid::Oid;
use crate::tracker::Tracker;
use crate::value::Value;

/// Completion handler for a walk.
///
/// Receives `Ok(())` when the walk finished and `Err` with the cause when it
/// failed. Invoked at most once, from whatever thread the walker runs on.
pub type WalkCallback = Box<dyn FnOnce(Result<()>) + Send + 'static>;

/// Client-side SNMP implementation the proxy executes requests against.
///
/// Implementations are shared across concurrently running requests, hence
/// `Send + Sync + 'static`.
pub trait SnmpStrategy: Send + Sync + 'static {
    /// Walker type produced by [`create_walker`](Self::create_walker).
    type Walker: Walker;

    /// Fetch `oids` from `agent` in one logical GET.
    ///
    /// On success the returned values are position-aligned with `oids`. The
    /// future fails when the agent is unreachable or any OID read fails.
    fn get(
        &self,
        agent: &AgentConfig,
        oids: &[Oid],
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// Create a walker for `tracker`. The walk does not begin until
    /// [`Walker::start`] is called.
    fn create_walker(&self, agent: &AgentConfig, description: &str, tracker: Tracker)
    -> Self::Walker;
}

/// A running (or ready-to-run) walk over a tracker tree.
///
/// # Lifecycle
///
/// 1. [`set_callback`](Self::set_callback) registers the completion handler.
/// 2. [`start`](Self::start) begins the walk and returns immediately. Rows are
///    pushed into the tracker sinks as they arrive; the callback fires exactly
///    once when the walk completes or fails.
/// 3. [`close`](Self::close) releases session resources. It may block until
///    in-flight callback work has drained, so it must never be called from
///    inside the completion callback.
pub trait Walker: Send + Sync + 'static {
    /// Register the completion handler, replacing any previous one.
    fn set_callback(&self, callback: WalkCallback);

    /// Begin walking.
    fn start(&self);

    /// Release the walker's session resources.
    fn close(&self) -> Result<()>;
}
