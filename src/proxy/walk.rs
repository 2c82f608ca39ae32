//! Table walk orchestration.
//!
//! A batch's walks are folded into one aggregate tracker and handed to a
//! single walker. The walk moves through three typed stages:
//!
//! - [`WalkPlan`]: trackers built and validated, nothing sent yet.
//! - [`RunningWalk`]: walker started, completion pending.
//! - resolved: [`RunningWalk::finish`] yields the correlated responses or
//!   the walker's failure.
//!
//! Whatever the outcome, the walker is closed exactly once through the
//! [`Reaper`], never inside its own completion callback.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::agent::AgentConfig;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::request::WalkRequest;
use crate::response::SnmpResponse;
use crate::strategy::{SnmpStrategy, Walker};
use crate::tracker::Tracker;

use super::OidList;
use super::correlator::ResultCorrelator;
use super::reaper::Reaper;

/// Build the tracker for one walk request.
///
/// Single-instance requests must name exactly one OID. Multi-column requests
/// become an aggregate of column trackers. Every row found is correlated
/// under the request's correlation id.
pub fn build_tracker(walk: &WalkRequest, correlator: &Arc<ResultCorrelator>) -> Result<Tracker> {
    let mut tracker = match &walk.instance {
        Some(instance) => {
            let [oid] = walk.oids.as_slice() else {
                return Err(Error::SingleInstanceOidCount {
                    correlation_id: walk.correlation_id.as_str().into(),
                    count: walk.oids.len(),
                });
            };
            Tracker::single_instance(oid.clone(), instance.clone())
        }
        None => Tracker::aggregate(walk.oids.iter().cloned().map(Tracker::column).collect()),
    };

    if let Some(max) = walk.max_repetitions {
        tracker.set_max_repetitions(max);
    }

    let correlator = Arc::clone(correlator);
    let correlation_id = walk.correlation_id.clone();
    Ok(tracker.on_result(move |result| correlator.add_result(&correlation_id, result)))
}

/// Validated trackers for every walk in a batch.
pub(crate) struct WalkPlan {
    tracker: Tracker,
    correlator: Arc<ResultCorrelator>,
    walk_count: usize,
    /// Every walked OID, in request order.
    oids: Vec<Oid>,
}

impl WalkPlan {
    /// Build trackers for `walks`. Fails on the first malformed request.
    pub(crate) fn build(walks: &[WalkRequest]) -> Result<Self> {
        let correlator = Arc::new(ResultCorrelator::new());
        let trackers = walks
            .iter()
            .map(|walk| build_tracker(walk, &correlator))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tracker: Tracker::aggregate(trackers),
            correlator,
            walk_count: walks.len(),
            oids: walks.iter().flat_map(|walk| walk.oids.iter().cloned()).collect(),
        })
    }

    /// Create the walker, register its completion handler and start it.
    pub(crate) fn start<S: SnmpStrategy>(
        self,
        strategy: &S,
        agent: &AgentConfig,
        description: &str,
        reaper: &Reaper,
    ) -> RunningWalk<S::Walker> {
        let WalkPlan {
            tracker,
            correlator,
            walk_count,
            oids,
        } = self;
        let target = agent.socket_addr();
        let oids: Arc<[Oid]> = oids.into();

        let walker = Arc::new(strategy.create_walker(agent, description, tracker));
        let (tx, rx) = oneshot::channel();

        let callback_walker = Arc::clone(&walker);
        let callback_reaper = reaper.clone();
        let callback_oids = Arc::clone(&oids);
        walker.set_callback(Box::new(move |outcome| {
            let outcome = match outcome {
                Ok(()) => {
                    let responses = correlator.take();
                    tracing::debug!(
                        snmp.target = %target,
                        snmp.response_count = responses.len(),
                        "walk complete"
                    );
                    Ok(responses)
                }
                Err(e) => {
                    tracing::warn!(
                        snmp.target = %target,
                        snmp.oids = %OidList(&callback_oids),
                        error = %e,
                        "walk failed"
                    );
                    Err(e)
                }
            };
            // Receiver is gone only if the batch was dropped.
            let _ = tx.send(outcome);
            callback_reaper.reap(callback_walker);
        }));

        tracing::debug!(
            snmp.target = %target,
            snmp.walk_count = walk_count,
            snmp.description = description,
            "starting walk"
        );
        walker.start();

        RunningWalk {
            rx,
            walker,
            reaper: reaper.clone(),
            target,
            oids,
        }
    }
}

/// A started walk awaiting its completion callback.
pub(crate) struct RunningWalk<W: Walker> {
    rx: oneshot::Receiver<Result<Vec<SnmpResponse>>>,
    walker: Arc<W>,
    reaper: Reaper,
    target: SocketAddr,
    oids: Arc<[Oid]>,
}

impl<W: Walker> RunningWalk<W> {
    /// Wait for the walker to report completion.
    ///
    /// If the walker drops its callback without invoking it, the walk fails
    /// with [`Error::WalkAborted`] and the walker is closed here instead.
    pub(crate) async fn finish(self) -> Result<Vec<SnmpResponse>> {
        let RunningWalk {
            rx,
            walker,
            reaper,
            target,
            oids,
        } = self;

        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    snmp.target = %target,
                    snmp.oids = %OidList(&oids),
                    "walker released its callback without completing"
                );
                reaper.reap(walker);
                Err(Error::WalkAborted {
                    target: Some(target),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::response::SnmpResult;
    use crate::tracker::TrackerKind;
    use crate::value::Value;

    #[test]
    fn test_single_instance_tracker() {
        let correlator = Arc::new(ResultCorrelator::new());
        let walk = WalkRequest::new("uptime", [oid!(1, 3, 6, 1, 2, 1, 1, 3)])
            .instance(oid!(0))
            .max_repetitions(3);

        let tracker = build_tracker(&walk, &correlator).unwrap();
        assert!(matches!(
            tracker.kind(),
            TrackerKind::SingleInstance { oid, instance }
                if *oid == oid!(1, 3, 6, 1, 2, 1, 1, 3) && *instance == oid!(0)
        ));
        assert_eq!(tracker.max_repetitions(), Some(3));

        assert!(tracker.store_result(SnmpResult::new(
            oid!(1, 3, 6, 1, 2, 1, 1, 3),
            Some(oid!(0)),
            Value::TimeTicks(100),
        )));
        let responses = correlator.take();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].correlation_id, "uptime");
    }

    #[test]
    fn test_single_instance_requires_one_oid() {
        let correlator = Arc::new(ResultCorrelator::new());
        for oids in [vec![], vec![oid!(1, 1), oid!(1, 2)]] {
            let count = oids.len();
            let walk = WalkRequest::new("bad", oids).instance(oid!(0));
            let err = build_tracker(&walk, &correlator).unwrap_err();
            assert!(matches!(
                err,
                Error::SingleInstanceOidCount { count: c, .. } if c == count
            ));
            assert!(err.to_string().contains("single instance requests must have a single OID"));
        }
    }

    #[test]
    fn test_column_aggregate_tracker() {
        let correlator = Arc::new(ResultCorrelator::new());
        let walk = WalkRequest::new(
            "w1",
            [oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2), oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)],
        );

        let tracker = build_tracker(&walk, &correlator).unwrap();
        assert_eq!(tracker.children().len(), 2);
        assert!(
            tracker
                .children()
                .iter()
                .all(|child| matches!(child.kind(), TrackerKind::Column { .. }))
        );
        assert_eq!(tracker.max_repetitions(), None);

        for target in tracker.targets() {
            target.store_result(SnmpResult::new(target.oid.clone(), Some(oid!(1)), Value::Counter32(7)));
        }
        let responses = correlator.take();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].results.len(), 2);
    }

    #[test]
    fn test_plan_fails_on_any_bad_walk() {
        let walks = vec![
            WalkRequest::new("ok", [oid!(1, 1)]),
            WalkRequest::new("bad", [oid!(1, 2), oid!(1, 3)]).instance(oid!(0)),
        ];
        assert!(matches!(
            WalkPlan::build(&walks),
            Err(Error::SingleInstanceOidCount { .. })
        ));
    }

    #[test]
    fn test_plan_collects_walked_oids() {
        let walks = vec![
            WalkRequest::new("X", [oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)]),
            WalkRequest::new("X", [oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5), oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)]),
        ];
        let plan = WalkPlan::build(&walks).unwrap();
        assert_eq!(
            OidList(&plan.oids).to_string(),
            "1.3.6.1.2.1.2.2.1.2, 1.3.6.1.2.1.2.2.1.5, 1.3.6.1.2.1.2.2.1.10"
        );
    }

    #[test]
    fn test_plan_routes_each_walk_to_its_key() {
        let walks = vec![
            WalkRequest::new("a", [oid!(1, 1)]),
            WalkRequest::new("b", [oid!(1, 2)]).instance(oid!(5)),
        ];
        let plan = WalkPlan::build(&walks).unwrap();
        assert_eq!(plan.walk_count, 2);
        assert_eq!(plan.oids, [oid!(1, 1), oid!(1, 2)]);

        for target in plan.tracker.targets() {
            let instance = target.instance.cloned().unwrap_or_else(|| oid!(1));
            target.store_result(SnmpResult::new(target.oid.clone(), Some(instance), Value::Null));
        }
        let responses = plan.correlator.take();
        let keys: Vec<_> = responses.iter().map(|r| r.correlation_id.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }
}
