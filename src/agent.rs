//! Managed agent descriptor.
//!
//! [`AgentConfig`] describes the device a batch is addressed to. The proxy only
//! reads the address (for logging and credential substitution) and the read
//! community (which it may replace); every other setting is passed through to
//! the [`SnmpStrategy`](crate::strategy::SnmpStrategy) untouched.
//!
//! # Example
//!
//! ```rust
//! use async_snmp_proxy::{AgentConfig, Version};
//! use std::time::Duration;
//!
//! let agent = AgentConfig::new("192.0.2.10".parse().unwrap())
//!     .version(Version::V2c)
//!     .read_community("monitoring")
//!     .timeout(Duration::from_secs(3))
//!     .max_repetitions(10);
//!
//! assert_eq!(agent.socket_addr().to_string(), "192.0.2.10:161");
//! ```

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::version::Version;

/// Default SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Connection and credential settings for one managed agent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Agent address.
    pub address: IpAddr,
    /// Agent UDP port.
    pub port: u16,
    /// SNMP version spoken by the agent.
    pub version: Version,
    /// Community used for GET and walk requests.
    pub read_community: String,
    /// Community used for SET requests.
    pub write_community: String,
    /// Per-request timeout enforced by the strategy.
    pub timeout: Duration,
    /// Retries performed by the strategy before reporting a timeout.
    pub retries: u32,
    /// Default GETBULK max-repetitions for walks.
    pub max_repetitions: u32,
    /// Maximum varbinds the strategy packs into one PDU.
    pub max_vars_per_pdu: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            version: Version::V2c,
            read_community: "public".into(),
            write_community: "private".into(),
            timeout: Duration::from_millis(1800),
            retries: 1,
            max_repetitions: 2,
            max_vars_per_pdu: 10,
        }
    }
}

impl AgentConfig {
    /// Create an agent descriptor with default settings for `address`.
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Set the agent port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the SNMP version.
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the read community.
    pub fn read_community(mut self, community: impl Into<String>) -> Self {
        self.read_community = community.into();
        self
    }

    /// Set the write community.
    pub fn write_community(mut self, community: impl Into<String>) -> Self {
        self.write_community = community.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the default GETBULK max-repetitions.
    pub fn max_repetitions(mut self, max: u32) -> Self {
        self.max_repetitions = max;
        self
    }

    /// Set the maximum varbinds per PDU.
    pub fn max_vars_per_pdu(mut self, max: usize) -> Self {
        self.max_vars_per_pdu = max;
        self
    }

    /// Address and port as a socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl std::fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.socket_addr(), self.version)
    }
}
