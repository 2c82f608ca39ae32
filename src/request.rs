//! Batched SNMP request model.
//!
//! A [`SnmpRequest`] bundles any number of scalar GETs and table walks for a
//! single agent. Each sub-request carries a caller-chosen correlation id that
//! routes its results back into the matching
//! [`SnmpResponse`](crate::response::SnmpResponse).

use crate::agent::AgentConfig;
use crate::oid::Oid;

/// A batch of GETs and walks addressed to one agent.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnmpRequest {
    /// Agent to query. Required for dispatch.
    pub agent: Option<AgentConfig>,
    /// Monitoring location the request is executed from.
    pub location: Option<String>,
    /// Human-readable description, handed to the walker for diagnostics.
    pub description: String,
    /// Scalar GETs, one response per entry.
    pub gets: Vec<GetRequest>,
    /// Walks, executed together as one walk transaction.
    pub walks: Vec<WalkRequest>,
}

impl SnmpRequest {
    /// Create an empty request for `agent`.
    pub fn new(agent: AgentConfig) -> Self {
        Self {
            agent: Some(agent),
            ..Default::default()
        }
    }

    /// Set the location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a GET.
    pub fn get(mut self, get: GetRequest) -> Self {
        self.gets.push(get);
        self
    }

    /// Append a walk.
    pub fn walk(mut self, walk: WalkRequest) -> Self {
        self.walks.push(walk);
        self
    }
}

/// One multi-OID GET.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetRequest {
    /// Correlation id of the response this GET produces.
    pub correlation_id: String,
    /// OIDs to fetch; results come back position-aligned.
    pub oids: Vec<Oid>,
}

impl GetRequest {
    /// Create a GET for `oids`.
    pub fn new(correlation_id: impl Into<String>, oids: impl IntoIterator<Item = Oid>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            oids: oids.into_iter().collect(),
        }
    }
}

/// One walk specification.
///
/// Without an instance, every OID is walked as a table column. With an
/// instance, exactly one OID must be given and only that cell is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkRequest {
    /// Correlation id the discovered rows are reported under.
    pub correlation_id: String,
    /// Column OIDs, or the single base OID in single-instance mode.
    pub oids: Vec<Oid>,
    /// Single-instance qualifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instance: Option<Oid>,
    /// GETBULK max-repetitions override.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_repetitions: Option<u32>,
}

impl WalkRequest {
    /// Create a column walk over `oids`.
    pub fn new(correlation_id: impl Into<String>, oids: impl IntoIterator<Item = Oid>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            oids: oids.into_iter().collect(),
            instance: None,
            max_repetitions: None,
        }
    }

    /// Fetch only `instance` of the (single) OID.
    pub fn instance(mut self, instance: Oid) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Override GETBULK max-repetitions.
    pub fn max_repetitions(mut self, max: u32) -> Self {
        self.max_repetitions = Some(max);
        self
    }

    /// Whether this walk targets a single instance.
    pub fn is_single_instance(&self) -> bool {
        self.instance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_request_builder() {
        let request = SnmpRequest::new(AgentConfig::default())
            .location("Default")
            .description("interfaces")
            .get(GetRequest::new("g1", [oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]))
            .walk(WalkRequest::new("w1", [oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)]).max_repetitions(20));

        assert!(request.agent.is_some());
        assert_eq!(request.location.as_deref(), Some("Default"));
        assert_eq!(request.gets.len(), 1);
        assert_eq!(request.walks[0].max_repetitions, Some(20));
        assert!(!request.walks[0].is_single_instance());
    }

    #[test]
    fn test_single_instance_walk() {
        let walk = WalkRequest::new("w1", [oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)]).instance(oid!(1));
        assert!(walk.is_single_instance());
        assert_eq!(walk.instance, Some(oid!(1)));
    }
}
