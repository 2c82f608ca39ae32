//! SNMP version of a managed agent.

use std::str::FromStr;

/// SNMP protocol version spoken by an agent.
///
/// The proxy never negotiates versions itself; the version is carried on the
/// [`AgentConfig`](crate::agent::AgentConfig) and interpreted by the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[non_exhaustive]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901)
    #[default]
    V2c,
    /// SNMPv3 (RFC 3411-3418)
    V3,
}

impl Version {
    /// Whether GETBULK (and therefore max-repetitions) is available.
    pub const fn supports_bulk(self) -> bool {
        !matches!(self, Version::V1)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
            Version::V3 => write!(f, "SNMPv3"),
        }
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "v1" | "snmpv1" => Ok(Version::V1),
            "2c" | "v2c" | "snmpv2c" => Ok(Version::V2c),
            "3" | "v3" | "snmpv3" => Ok(Version::V3),
            other => Err(format!("unknown SNMP version: {}", other)),
        }
    }
}
