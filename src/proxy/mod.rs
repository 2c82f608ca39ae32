//! Request execution.
//!
//! [`SnmpProxy`] turns one [`SnmpRequest`] into concurrent work against an
//! [`SnmpStrategy`]: one GET per get request and one walker for all walk
//! requests together. The fragments are merged into a single
//! [`MultiResponse`].
//!
//! # Example
//!
//! ```rust,ignore
//! use async_snmp_proxy::{AgentConfig, GetRequest, SnmpProxy, SnmpRequest, WalkRequest, oid};
//!
//! let proxy = SnmpProxy::builder(strategy).build()?;
//!
//! let request = SnmpRequest::new(AgentConfig::new("192.0.2.1".parse()?))
//!     .get(GetRequest::new("sys", [oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]))
//!     .walk(WalkRequest::new("ifaces", [oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)]));
//!
//! let response = proxy.execute(request).await?;
//! for result in &response.get("ifaces").unwrap().results {
//!     println!("{}", result);
//! }
//! ```

mod correlator;
mod credentials;
mod get;
mod reaper;
mod walk;

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::agent::AgentConfig;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::request::SnmpRequest;
use crate::response::{MultiResponse, SnmpResponse};
use crate::strategy::SnmpStrategy;

pub use correlator::ResultCorrelator;
pub use credentials::{Credentials, CredentialsVault, StaticVault};
pub use reaper::{REAPER_THREAD_NAME, Reaper};
pub use walk::build_tracker;

use walk::WalkPlan;

/// Identifier the proxy registers under with an RPC dispatcher.
pub const RPC_MODULE_ID: &str = "SNMP";

/// Location name that never receives appliance credentials.
pub const DEFAULT_LOCATION: &str = "Default";

/// Vault alias holding the appliance community.
pub const DEFAULT_COMMUNITY_ALIAS: &str = "snmp-community-for-appliances";

/// Credential attribute holding the community string.
pub const DEFAULT_COMMUNITY_ATTRIBUTE: &str = "community";

/// Proxy-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Requests from this location keep their own community.
    pub default_location: String,
    /// Vault alias consulted for the appliance community.
    pub community_alias: String,
    /// Attribute of the vault entry holding the community.
    pub community_attribute: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_owned(),
            community_alias: DEFAULT_COMMUNITY_ALIAS.to_owned(),
            community_attribute: DEFAULT_COMMUNITY_ATTRIBUTE.to_owned(),
        }
    }
}

/// Executes SNMP request batches against a strategy.
///
/// Cheap to clone; clones share the strategy, reaper and vault.
pub struct SnmpProxy<S: SnmpStrategy> {
    strategy: Arc<S>,
    reaper: Reaper,
    vault: Option<Arc<dyn CredentialsVault>>,
    config: ProxyConfig,
}

impl<S: SnmpStrategy> Clone for SnmpProxy<S> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            reaper: self.reaper.clone(),
            vault: self.vault.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: SnmpStrategy> fmt::Debug for SnmpProxy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnmpProxy")
            .field("reaper", &self.reaper)
            .field("has_vault", &self.vault.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: SnmpStrategy> SnmpProxy<S> {
    /// Identifier the proxy registers under.
    pub const MODULE_ID: &'static str = RPC_MODULE_ID;

    /// Create a proxy with default settings and no vault.
    pub fn new(strategy: S, reaper: Reaper) -> Self {
        Self {
            strategy: Arc::new(strategy),
            reaper,
            vault: None,
            config: ProxyConfig::default(),
        }
    }

    /// Start building a proxy around `strategy`.
    pub fn builder(strategy: S) -> SnmpProxyBuilder<S> {
        SnmpProxyBuilder::new(strategy)
    }

    /// The module identifier.
    pub fn module_id(&self) -> &'static str {
        Self::MODULE_ID
    }

    /// The underlying strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Proxy settings.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Reaper closing this proxy's walkers.
    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    /// Execute every get and walk of `request` concurrently.
    ///
    /// Resolves once all branches have finished. Fails with the first branch
    /// failure in completion order; other branches are not cancelled, their
    /// results are discarded. Malformed walk requests fail before anything
    /// is sent to the agent.
    pub async fn execute(&self, request: SnmpRequest) -> Result<MultiResponse> {
        let SnmpRequest {
            agent,
            location,
            description,
            gets,
            walks,
        } = request;

        let mut agent = agent.ok_or(Error::MissingAgent)?;
        self.apply_appliance_community(&mut agent, location.as_deref());

        let walk = if walks.is_empty() {
            None
        } else {
            Some(WalkPlan::build(&walks)?)
        };

        tracing::debug!(
            snmp.target = %agent.socket_addr(),
            snmp.get_count = gets.len(),
            snmp.walk_count = walks.len(),
            snmp.description = %description,
            "dispatching SNMP batch"
        );

        let agent = Arc::new(agent);
        let mut branches: JoinSet<Result<Vec<SnmpResponse>>> = JoinSet::new();

        for request in gets {
            let strategy = Arc::clone(&self.strategy);
            let agent = Arc::clone(&agent);
            branches.spawn(async move {
                get::get(strategy.as_ref(), &agent, request)
                    .await
                    .map(|response| vec![response])
            });
        }

        if let Some(plan) = walk {
            let running = plan.start(self.strategy.as_ref(), &agent, &description, &self.reaper);
            branches.spawn(running.finish());
        }

        let mut response = MultiResponse::new();
        let mut failure: Option<Error> = None;
        while let Some(joined) = branches.join_next().await {
            match joined.map_err(Error::from).and_then(|branch| branch) {
                Ok(fragments) if failure.is_none() => response.extend(fragments),
                Ok(_) => {}
                Err(e) if failure.is_none() => failure = Some(e),
                Err(e) => tracing::debug!(error = %e, "additional branch failure after batch failed"),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(response),
        }
    }

    /// Execute `request`, folding any failure into the response.
    pub async fn handle(&self, request: SnmpRequest) -> MultiResponse {
        match self.execute(request).await {
            Ok(response) => response,
            Err(e) => MultiResponse::from_error(&e),
        }
    }

    /// Replace the read community of loopback agents outside the default
    /// location with the appliance community from the vault.
    fn apply_appliance_community(&self, agent: &mut AgentConfig, location: Option<&str>) {
        let Some(vault) = &self.vault else {
            return;
        };
        if !agent.address.is_loopback() || location == Some(self.config.default_location.as_str()) {
            return;
        }

        let community = vault
            .credentials(&self.config.community_alias)
            .and_then(|creds| {
                creds
                    .get_attribute(&self.config.community_attribute)
                    .map(str::to_owned)
            });

        match community {
            Some(community) => {
                tracing::debug!(
                    snmp.target = %agent.socket_addr(),
                    snmp.location = ?location,
                    "using appliance community for loopback agent"
                );
                agent.read_community = community;
            }
            None => tracing::debug!(
                snmp.alias = %self.config.community_alias,
                "no appliance community in vault, keeping request community"
            ),
        }
    }
}

/// Builder for [`SnmpProxy`].
pub struct SnmpProxyBuilder<S> {
    strategy: S,
    reaper: Option<Reaper>,
    vault: Option<Arc<dyn CredentialsVault>>,
    config: ProxyConfig,
}

impl<S: SnmpStrategy> SnmpProxyBuilder<S> {
    /// Create a builder around `strategy`.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            reaper: None,
            vault: None,
            config: ProxyConfig::default(),
        }
    }

    /// Set the reaper that closes finished walkers.
    ///
    /// Defaults to [`Reaper::dedicated`].
    pub fn reaper(mut self, reaper: Reaper) -> Self {
        self.reaper = Some(reaper);
        self
    }

    /// Set the vault consulted for the appliance community.
    pub fn credentials_vault(self, vault: impl CredentialsVault + 'static) -> Self {
        self.shared_credentials_vault(Arc::new(vault))
    }

    /// Set a shared vault.
    pub fn shared_credentials_vault(mut self, vault: Arc<dyn CredentialsVault>) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Set the location that keeps its own community (default: `"Default"`).
    pub fn default_location(mut self, location: impl Into<String>) -> Self {
        self.config.default_location = location.into();
        self
    }

    /// Set the vault alias of the appliance community.
    pub fn community_alias(mut self, alias: impl Into<String>) -> Self {
        self.config.community_alias = alias.into();
        self
    }

    /// Set the credential attribute holding the community.
    pub fn community_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config.community_attribute = attribute.into();
        self
    }

    /// Replace all proxy settings.
    pub fn config(mut self, config: ProxyConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the proxy.
    ///
    /// Without an explicit reaper this starts a dedicated teardown runtime,
    /// and fails with [`Error::Io`] if its threads cannot be spawned.
    pub fn build(self) -> Result<SnmpProxy<S>> {
        let reaper = match self.reaper {
            Some(reaper) => reaper,
            None => Reaper::dedicated()?,
        };

        Ok(SnmpProxy {
            strategy: Arc::new(self.strategy),
            reaper,
            vault: self.vault,
            config: self.config,
        })
    }
}

/// Comma-separated OIDs for log fields.
pub(crate) struct OidList<'a>(pub(crate) &'a [Oid]);

impl fmt::Display for OidList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, oid) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", oid)?;
        }
        Ok(())
    }
}
