//! Walk trackers.
//!
//! A [`Tracker`] describes what a walk should retrieve and where discovered
//! rows go. It is a small tree of three variants:
//!
//! - [`TrackerKind::SingleInstance`] fetches one cell (base OID + instance).
//! - [`TrackerKind::Column`] walks every row of one table column.
//! - [`TrackerKind::Aggregate`] groups child trackers into one unit of work.
//!
//! Each node may carry a result sink (the `store_result` hook) and a
//! max-repetitions bound. A strategy normally does not traverse the tree
//! itself; it calls [`Tracker::targets()`] to get the flattened leaves, each
//! already resolved to the nearest sink and bound on its path to the root.
//!
//! ```rust
//! use async_snmp_proxy::tracker::Tracker;
//! use async_snmp_proxy::{SnmpResult, Value, oid};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let tracker = Tracker::aggregate(vec![
//!     Tracker::column(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)),
//!     Tracker::column(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)),
//! ])
//! .with_max_repetitions(25)
//! .on_result(move |res| sink.lock().unwrap().push(res));
//!
//! for target in tracker.targets() {
//!     assert_eq!(target.max_repetitions, Some(25));
//!     target.store_result(SnmpResult::new(target.oid.clone(), Some(oid!(1)), Value::Integer(1)));
//! }
//! assert_eq!(seen.lock().unwrap().len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::oid::Oid;
use crate::response::SnmpResult;

/// Callback invoked for every row a tracker discovers.
pub type ResultSink = Arc<dyn Fn(SnmpResult) + Send + Sync>;

/// Walk tracker node.
#[derive(Clone)]
pub struct Tracker {
    kind: TrackerKind,
    max_repetitions: Option<u32>,
    sink: Option<ResultSink>,
}

/// The variant of a [`Tracker`] node.
#[derive(Debug, Clone)]
pub enum TrackerKind {
    /// A single cell: `oid` followed by `instance`.
    SingleInstance { oid: Oid, instance: Oid },
    /// Every row of a table column.
    Column { oid: Oid },
    /// Child trackers walked together.
    Aggregate { children: Vec<Tracker> },
}

impl Tracker {
    fn from_kind(kind: TrackerKind) -> Self {
        Self {
            kind,
            max_repetitions: None,
            sink: None,
        }
    }

    /// Track a single instance of `oid`.
    pub fn single_instance(oid: Oid, instance: Oid) -> Self {
        Self::from_kind(TrackerKind::SingleInstance { oid, instance })
    }

    /// Track every row of the column `oid`.
    pub fn column(oid: Oid) -> Self {
        Self::from_kind(TrackerKind::Column { oid })
    }

    /// Group `children` into one tracker.
    pub fn aggregate(children: Vec<Tracker>) -> Self {
        Self::from_kind(TrackerKind::Aggregate { children })
    }

    /// Cap the GETBULK repetitions used for this subtree.
    pub fn set_max_repetitions(&mut self, max: u32) {
        self.max_repetitions = Some(max);
    }

    /// Builder form of [`set_max_repetitions`](Self::set_max_repetitions).
    pub fn with_max_repetitions(mut self, max: u32) -> Self {
        self.set_max_repetitions(max);
        self
    }

    /// Route rows discovered anywhere below this node to `sink`.
    ///
    /// A sink set on a descendant takes precedence for that descendant's rows.
    pub fn on_result<F>(mut self, sink: F) -> Self
    where
        F: Fn(SnmpResult) + Send + Sync + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Node variant.
    pub fn kind(&self) -> &TrackerKind {
        &self.kind
    }

    /// Max-repetitions set directly on this node.
    pub fn max_repetitions(&self) -> Option<u32> {
        self.max_repetitions
    }

    /// Children of an aggregate; empty for leaves.
    pub fn children(&self) -> &[Tracker] {
        match &self.kind {
            TrackerKind::Aggregate { children } => children,
            _ => &[],
        }
    }

    /// Deliver `result` to this node's own sink.
    ///
    /// Returns `false` if the node has no sink and the result was dropped.
    pub fn store_result(&self, result: SnmpResult) -> bool {
        match &self.sink {
            Some(sink) => {
                sink(result);
                true
            }
            None => false,
        }
    }

    /// Flattened leaves in depth-first order.
    pub fn targets(&self) -> Vec<WalkTarget<'_>> {
        let mut out = Vec::new();
        self.collect_targets(None, None, &mut out);
        out
    }

    fn collect_targets<'a>(
        &'a self,
        inherited_max: Option<u32>,
        inherited_sink: Option<&'a ResultSink>,
        out: &mut Vec<WalkTarget<'a>>,
    ) {
        let max_repetitions = self.max_repetitions.or(inherited_max);
        let sink = self.sink.as_ref().or(inherited_sink);

        match &self.kind {
            TrackerKind::SingleInstance { oid, instance } => out.push(WalkTarget {
                oid,
                instance: Some(instance),
                max_repetitions,
                sink,
            }),
            TrackerKind::Column { oid } => out.push(WalkTarget {
                oid,
                instance: None,
                max_repetitions,
                sink,
            }),
            TrackerKind::Aggregate { children } => {
                for child in children {
                    child.collect_targets(max_repetitions, sink, out);
                }
            }
        }
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("kind", &self.kind)
            .field("max_repetitions", &self.max_repetitions)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

/// A leaf of a tracker tree, as seen by a strategy.
#[derive(Clone)]
pub struct WalkTarget<'a> {
    /// Column or base OID to walk.
    pub oid: &'a Oid,
    /// Instance to fetch, for single-instance leaves.
    pub instance: Option<&'a Oid>,
    /// Effective max-repetitions (nearest bound on the path to the root).
    pub max_repetitions: Option<u32>,
    sink: Option<&'a ResultSink>,
}

impl WalkTarget<'_> {
    /// Whether this leaf fetches a single instance.
    pub fn is_single_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// Report a discovered row to the nearest sink.
    ///
    /// Returns `false` if no node on the path has a sink.
    pub fn store_result(&self, result: SnmpResult) -> bool {
        match self.sink {
            Some(sink) => {
                sink(result);
                true
            }
            None => {
                tracing::trace!(snmp.oid = %self.oid, "walk result dropped: no sink on path");
                false
            }
        }
    }
}

impl fmt::Debug for WalkTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkTarget")
            .field("oid", &self.oid)
            .field("instance", &self.instance)
            .field("max_repetitions", &self.max_repetitions)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
