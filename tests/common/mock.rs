//! In-process strategy double.
//!
//! `MockStrategy` answers GETs from a canned value table and walks from
//! canned table rows. Its walker runs on its own OS thread like a real
//! session would, and its `close` waits for the completion callback to
//! return so a close issued from inside the callback shows up as a timeout.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_snmp_proxy::{
    AgentConfig, Error, Oid, Result, SnmpResult, SnmpStrategy, Tracker, Value, WalkCallback,
    Walker,
};
use parking_lot::{Condvar, Mutex};

/// How long `close` waits for the completion callback to return.
const CALLBACK_WAIT: Duration = Duration::from_secs(2);

type Rows = HashMap<Oid, Vec<(Oid, Value)>>;

/// Observations shared by a strategy and all its walkers.
#[derive(Debug, Default)]
pub struct MockStats {
    pub get_calls: AtomicUsize,
    pub walkers: AtomicUsize,
    pub closes: AtomicUsize,
    /// For each close: whether the completion callback had already returned.
    pub close_after_callback: Mutex<Vec<bool>>,
    /// Name of the thread each close ran on.
    pub close_threads: Mutex<Vec<Option<String>>>,
    /// Read community of every GET and walker creation.
    pub communities: Mutex<Vec<String>>,
    pub descriptions: Mutex<Vec<String>>,
    /// Effective max-repetitions of every walk target, per walker.
    pub walk_max_repetitions: Mutex<Vec<Vec<Option<u32>>>>,
}

impl MockStats {
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn walkers(&self) -> usize {
        self.walkers.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` walkers have been closed.
    pub async fn wait_for_closes(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.closes() < n {
            assert!(
                Instant::now() < deadline,
                "expected {} closes, saw {}",
                n,
                self.closes()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// Canned strategy.
#[derive(Default)]
pub struct MockStrategy {
    values: HashMap<Oid, Value>,
    failing: HashSet<Oid>,
    short_reply: bool,
    get_delay: Option<Duration>,
    rows: Arc<Rows>,
    walk_error: Option<String>,
    walk_delay: Option<Duration>,
    drop_walk_callback: bool,
    pub stats: Arc<MockStats>,
}

impl MockStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GETs of `oid` with `value`.
    pub fn value(mut self, oid: Oid, value: impl Into<Value>) -> Self {
        self.values.insert(oid, value.into());
        self
    }

    /// Fail any GET that includes `oid` with a timeout.
    pub fn failing(mut self, oid: Oid) -> Self {
        self.failing.insert(oid);
        self
    }

    /// Return one value fewer than requested.
    pub fn short_reply(mut self) -> Self {
        self.short_reply = true;
        self
    }

    pub fn get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = Some(delay);
        self
    }

    /// Add a table row `column.instance = value`.
    pub fn row(mut self, column: Oid, instance: Oid, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.rows)
            .entry(column)
            .or_default()
            .push((instance, value.into()));
        self
    }

    /// Fail every walk after its rows were delivered.
    pub fn walk_error(mut self, message: &str) -> Self {
        self.walk_error = Some(message.to_owned());
        self
    }

    pub fn walk_delay(mut self, delay: Duration) -> Self {
        self.walk_delay = Some(delay);
        self
    }

    /// Drop the completion callback without invoking it.
    pub fn drop_walk_callback(mut self) -> Self {
        self.drop_walk_callback = true;
        self
    }
}

impl SnmpStrategy for MockStrategy {
    type Walker = MockWalker;

    async fn get(&self, agent: &AgentConfig, oids: &[Oid]) -> Result<Vec<Value>> {
        self.stats.get_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.communities.lock().push(agent.read_community.clone());

        if let Some(delay) = self.get_delay {
            tokio::time::sleep(delay).await;
        }

        if oids.iter().any(|oid| self.failing.contains(oid)) {
            return Err(Error::Timeout {
                target: Some(agent.socket_addr()),
                elapsed: agent.timeout,
                retries: agent.retries,
            });
        }

        let mut values: Vec<Value> = oids
            .iter()
            .map(|oid| self.values.get(oid).cloned().unwrap_or(Value::NoSuchObject))
            .collect();
        if self.short_reply {
            values.pop();
        }
        Ok(values)
    }

    fn create_walker(&self, agent: &AgentConfig, description: &str, tracker: Tracker) -> MockWalker {
        self.stats.walkers.fetch_add(1, Ordering::SeqCst);
        self.stats.communities.lock().push(agent.read_community.clone());
        self.stats.descriptions.lock().push(description.to_owned());
        self.stats
            .walk_max_repetitions
            .lock()
            .push(tracker.targets().iter().map(|t| t.max_repetitions).collect());

        MockWalker {
            target: agent.socket_addr(),
            tracker,
            rows: Arc::clone(&self.rows),
            error: self.walk_error.clone(),
            delay: self.walk_delay,
            drop_callback: self.drop_walk_callback,
            callback: Mutex::new(None),
            callback_returned: Arc::new((Mutex::new(false), Condvar::new())),
            stats: Arc::clone(&self.stats),
        }
    }
}

/// Walker delivering canned rows from a background thread.
pub struct MockWalker {
    target: SocketAddr,
    tracker: Tracker,
    rows: Arc<Rows>,
    error: Option<String>,
    delay: Option<Duration>,
    drop_callback: bool,
    callback: Mutex<Option<WalkCallback>>,
    callback_returned: Arc<(Mutex<bool>, Condvar)>,
    stats: Arc<MockStats>,
}

impl Walker for MockWalker {
    fn set_callback(&self, callback: WalkCallback) {
        *self.callback.lock() = Some(callback);
    }

    fn start(&self) {
        let tracker = self.tracker.clone();
        let rows = Arc::clone(&self.rows);
        let callback = self.callback.lock().take();
        let outcome = match &self.error {
            Some(message) => Err(Error::walk(Some(self.target), message.as_str())),
            None => Ok(()),
        };
        let delay = self.delay;
        let drop_callback = self.drop_callback;
        let returned = Arc::clone(&self.callback_returned);

        std::thread::spawn(move || {
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }

            for target in tracker.targets() {
                let Some(column) = rows.get(target.oid) else {
                    continue;
                };
                for (instance, value) in column {
                    if target.instance.is_some_and(|wanted| wanted != instance) {
                        continue;
                    }
                    target.store_result(SnmpResult::new(
                        target.oid.clone(),
                        Some(instance.clone()),
                        value.clone(),
                    ));
                }
            }

            match callback {
                Some(callback) if !drop_callback => callback(outcome),
                other => drop(other),
            }

            let (lock, cvar) = &*returned;
            *lock.lock() = true;
            cvar.notify_all();
        });
    }

    fn close(&self) -> Result<()> {
        let (lock, cvar) = &*self.callback_returned;
        let deadline = Instant::now() + CALLBACK_WAIT;
        let mut returned = lock.lock();
        while !*returned {
            if cvar.wait_until(&mut returned, deadline).timed_out() {
                break;
            }
        }
        let after_callback = *returned;
        drop(returned);

        self.stats.close_after_callback.lock().push(after_callback);
        self.stats
            .close_threads
            .lock()
            .push(std::thread::current().name().map(str::to_owned));
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
