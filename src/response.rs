//! Response types produced by the proxy.

use crate::error::Error;
use crate::oid::Oid;
use crate::value::Value;

/// One discovered value: base OID, optional instance qualifier and value.
///
/// GET results leave `instance` unset. Walk results carry the row index (or
/// the requested instance in single-instance mode) separately from the column
/// OID so callers can group cells by row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnmpResult {
    /// Base (column or scalar) OID.
    pub oid: Oid,
    /// Instance qualifier.
    pub instance: Option<Oid>,
    /// Value reported by the agent.
    pub value: Value,
}

impl SnmpResult {
    /// Create a result.
    pub fn new(oid: Oid, instance: Option<Oid>, value: Value) -> Self {
        Self {
            oid,
            instance,
            value,
        }
    }

    /// Full OID of the value (`oid` followed by `instance`).
    pub fn absolute_oid(&self) -> Oid {
        match &self.instance {
            Some(instance) => self.oid.concat(instance),
            None => self.oid.clone(),
        }
    }
}

impl std::fmt::Display for SnmpResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.absolute_oid(), self.value)
    }
}

/// All results collected under one correlation id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnmpResponse {
    /// Correlation id of the originating GET or walk(s).
    pub correlation_id: String,
    /// Results in arrival order.
    pub results: Vec<SnmpResult>,
}

impl SnmpResponse {
    /// Create a response with no results.
    pub fn empty(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            results: Vec::new(),
        }
    }

    /// Create a response with the given results.
    pub fn with_results(correlation_id: impl Into<String>, results: Vec<SnmpResult>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            results,
        }
    }
}

/// Aggregated response to a [`SnmpRequest`](crate::request::SnmpRequest).
///
/// Holds one [`SnmpResponse`] per distinct correlation id. Fragments pushed
/// under an id that is already present are merged into the existing entry.
/// No ordering between correlation ids is guaranteed.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiResponse {
    /// Responses, one per correlation id.
    pub responses: Vec<SnmpResponse>,
    /// Failure cause, set only on error responses.
    #[cfg_attr(feature = "serde", serde(default))]
    pub error: Option<String>,
}

impl MultiResponse {
    /// Create an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error response carrying only the failure cause.
    ///
    /// Used by RPC layers that must always answer with a response envelope.
    pub fn from_error(error: &Error) -> Self {
        Self {
            responses: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Fold a fragment in, merging with an existing entry for the same id.
    pub fn push(&mut self, fragment: SnmpResponse) {
        match self
            .responses
            .iter_mut()
            .find(|r| r.correlation_id == fragment.correlation_id)
        {
            Some(existing) => existing.results.extend(fragment.results),
            None => self.responses.push(fragment),
        }
    }

    /// Fold several fragments in.
    pub fn extend(&mut self, fragments: impl IntoIterator<Item = SnmpResponse>) {
        for fragment in fragments {
            self.push(fragment);
        }
    }

    /// Look up the response for a correlation id.
    pub fn get(&self, correlation_id: &str) -> Option<&SnmpResponse> {
        self.responses
            .iter()
            .find(|r| r.correlation_id == correlation_id)
    }

    /// Number of correlation ids present.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Whether no responses are present.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Whether this is an error response.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
