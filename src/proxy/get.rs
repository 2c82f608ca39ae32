//! Scalar GET dispatch.

use crate::agent::AgentConfig;
use crate::error::Result;
use crate::oid::Oid;
use crate::request::GetRequest;
use crate::response::{SnmpResponse, SnmpResult};
use crate::strategy::SnmpStrategy;
use crate::value::Value;

use super::OidList;

/// Execute one GET and turn its values into a response.
///
/// Transport failures are logged and propagated unchanged; no retries are
/// attempted here.
pub(crate) async fn get<S: SnmpStrategy>(
    strategy: &S,
    agent: &AgentConfig,
    request: GetRequest,
) -> Result<SnmpResponse> {
    let GetRequest {
        correlation_id,
        oids,
    } = request;

    if oids.is_empty() {
        return Ok(SnmpResponse::empty(correlation_id));
    }

    tracing::debug!(
        snmp.target = %agent.socket_addr(),
        snmp.correlation_id = %correlation_id,
        snmp.varbind_count = oids.len(),
        "sending GET"
    );

    let values = strategy.get(agent, &oids).await.inspect_err(|e| {
        tracing::warn!(
            snmp.target = %agent.socket_addr(),
            snmp.correlation_id = %correlation_id,
            snmp.oids = %OidList(&oids),
            error = %e,
            "GET failed"
        );
    })?;

    Ok(build_response(agent, correlation_id, oids, values))
}

/// Zip requested OIDs with returned values.
///
/// A reply shorter than the request is a strategy contract violation. It is
/// logged and answered with an empty response instead of misaligned results.
fn build_response(
    agent: &AgentConfig,
    correlation_id: String,
    oids: Vec<Oid>,
    values: Vec<Value>,
) -> SnmpResponse {
    if values.len() < oids.len() {
        tracing::warn!(
            snmp.target = %agent.socket_addr(),
            snmp.correlation_id = %correlation_id,
            snmp.oids = %OidList(&oids),
            snmp.value_count = values.len(),
            "short GET reply from agent, returning empty response"
        );
        return SnmpResponse::empty(correlation_id);
    }

    let results = oids
        .into_iter()
        .zip(values)
        .map(|(oid, value)| SnmpResult::new(oid, None, value))
        .collect();
    SnmpResponse::with_results(correlation_id, results)
}
