//! Common test fixtures and constants.

use std::net::IpAddr;

use async_snmp_proxy::{AgentConfig, Oid, oid};

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

/// sysUpTime without its instance arc, for single-instance walks.
pub fn sys_uptime_base() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3)
}

// =============================================================================
// ifTable columns (1.3.6.1.2.1.2.2.1.*)
// =============================================================================

pub fn if_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)
}
pub fn if_speed() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 5)
}
pub fn if_in_octets() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)
}

// =============================================================================
// Agents
// =============================================================================

/// Documentation-range address; never contacted.
pub fn remote_agent() -> AgentConfig {
    AgentConfig::new(IpAddr::from([192, 0, 2, 10]))
}

pub fn loopback_agent() -> AgentConfig {
    AgentConfig::new(IpAddr::from([127, 0, 0, 1]))
}

/// Default read community of [`AgentConfig`].
pub const COMMUNITY_RO: &str = "public";

/// Appliance community stored in test vaults.
pub const APPLIANCE_COMMUNITY: &str = "appliance-s3cret";
