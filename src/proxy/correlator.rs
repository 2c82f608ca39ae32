//! Correlation of walk rows to per-id responses.

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::response::{SnmpResponse, SnmpResult};

/// Accumulates results into one [`SnmpResponse`] per correlation id.
///
/// Shared by every tracker sink of a single batch. Rows may arrive from
/// several walker threads at once; appends for the same id keep their
/// arrival order. Ids are reported in first-seen order.
#[derive(Debug, Default)]
pub struct ResultCorrelator {
    responses: Mutex<IndexMap<String, SnmpResponse>>,
}

impl ResultCorrelator {
    /// Create an empty correlator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `result` to the response for `correlation_id`, creating it on first use.
    pub fn add_result(&self, correlation_id: &str, result: SnmpResult) {
        tracing::trace!(
            snmp.correlation_id = correlation_id,
            snmp.oid = %result.absolute_oid(),
            "correlating walk result"
        );

        let mut responses = self.responses.lock();
        match responses.get_mut(correlation_id) {
            Some(response) => response.results.push(result),
            None => {
                let mut response = SnmpResponse::empty(correlation_id);
                response.results.push(result);
                responses.insert(correlation_id.to_owned(), response);
            }
        }
    }

    /// Number of correlation ids seen so far.
    pub fn len(&self) -> usize {
        self.responses.lock().len()
    }

    /// Whether nothing has been correlated yet.
    pub fn is_empty(&self) -> bool {
        self.responses.lock().is_empty()
    }

    /// Drain the accumulated responses.
    pub fn take(&self) -> Vec<SnmpResponse> {
        std::mem::take(&mut *self.responses.lock())
            .into_values()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;
    use std::sync::Arc;

    fn row(column: u32, index: u32) -> SnmpResult {
        SnmpResult::new(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, column),
            Some(oid!(index)),
            Value::Integer(index as i32),
        )
    }

    #[test]
    fn test_lazily_creates_and_appends_in_order() {
        let correlator = ResultCorrelator::new();
        assert!(correlator.is_empty());

        correlator.add_result("if", row(2, 1));
        correlator.add_result("ip", row(3, 1));
        correlator.add_result("if", row(2, 2));

        assert_eq!(correlator.len(), 2);
        let responses = correlator.take();
        assert_eq!(responses[0].correlation_id, "if");
        assert_eq!(responses[0].results, vec![row(2, 1), row(2, 2)]);
        assert_eq!(responses[1].correlation_id, "ip");
        assert_eq!(responses[1].results, vec![row(3, 1)]);
    }

    #[test]
    fn test_take_drains() {
        let correlator = ResultCorrelator::new();
        correlator.add_result("a", row(1, 1));
        assert_eq!(correlator.take().len(), 1);
        assert!(correlator.take().is_empty());
    }

    #[test]
    fn test_concurrent_appends() {
        let correlator = Arc::new(ResultCorrelator::new());
        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let correlator = correlator.clone();
                std::thread::spawn(move || {
                    let id = format!("key-{}", t);
                    for i in 0..100 {
                        correlator.add_result(&id, row(t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let responses = correlator.take();
        assert_eq!(responses.len(), 4);
        for response in responses {
            assert_eq!(response.results.len(), 100);
            // Per-key arrival order is preserved.
            for (i, result) in response.results.iter().enumerate() {
                assert_eq!(result.instance, Some(oid!(i as u32)));
            }
        }
    }
}
