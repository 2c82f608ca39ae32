// Allow large error types - the Error enum carries targets and OIDs inline for diagnostics.
#![allow(clippy::result_large_err)]

//! # async-snmp-proxy
//!
//! Async request orchestration for SNMP.
//!
//! The crate sits between a request/response RPC surface and a client-side
//! SNMP implementation. A single [`SnmpRequest`] names one agent and any
//! number of scalar GETs and table walks, each tagged with a correlation id.
//! [`SnmpProxy::execute`] runs them concurrently and returns one
//! [`MultiResponse`] with the results grouped by correlation id.
//!
//! ## Features
//!
//! - Strategy-agnostic: any [`SnmpStrategy`] provides the GET and walk primitives
//! - All GETs and the batch's walk run concurrently on Tokio
//! - Walk rows are correlated back to their request as they arrive
//! - Walkers are closed off their completion thread by a [`Reaper`] with its own runtime
//! - Optional serde support for requests and responses (`serde` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use async_snmp_proxy::{
//!     AgentConfig, GetRequest, Oid, Result, SnmpProxy, SnmpRequest, SnmpStrategy, Tracker,
//!     Value, WalkCallback, Walker, oid,
//! };
//!
//! struct Fixed;
//! struct IdleWalker;
//!
//! impl Walker for IdleWalker {
//!     fn set_callback(&self, _callback: WalkCallback) {}
//!     fn start(&self) {}
//!     fn close(&self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! impl SnmpStrategy for Fixed {
//!     type Walker = IdleWalker;
//!
//!     async fn get(&self, _agent: &AgentConfig, oids: &[Oid]) -> Result<Vec<Value>> {
//!         Ok(oids.iter().map(|_| Value::from("demo")).collect())
//!     }
//!
//!     fn create_walker(&self, _agent: &AgentConfig, _description: &str, _tracker: Tracker) -> IdleWalker {
//!         IdleWalker
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let proxy = SnmpProxy::builder(Fixed).build()?;
//!
//!     let request = SnmpRequest::new(AgentConfig::new([192, 0, 2, 1].into()))
//!         .get(GetRequest::new("sys", [oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]));
//!
//!     let response = proxy.execute(request).await?;
//!     assert_eq!(response.get("sys").unwrap().results[0].value, Value::from("demo"));
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! A batch either succeeds as a whole or fails with the first branch error
//! in completion order. Malformed requests ([`Error::MissingAgent`],
//! [`Error::SingleInstanceOidCount`]) fail before anything is sent.
//! [`SnmpProxy::handle`] folds a failure into [`MultiResponse::error`] for
//! RPC surfaces that report errors in-band.
//!
//! ## Tracing
//!
//! The library uses the `tracing` crate. Install any subscriber to see output.
//!
//! ### Log Levels
//!
//! | Level | What's Logged |
//! |-------|---------------|
//! | ERROR | Walker close panicked |
//! | WARN | GET or walk failure, short GET reply, walker close failure |
//! | DEBUG | Batch dispatch, GET send, walk start/completion, appliance community use |
//! | TRACE | Row correlation, reaper scheduling and close |
//!
//! ### Structured Fields
//!
//! All fields use the `snmp.` prefix for easy filtering:
//!
//! | Field | Description |
//! |-------|-------------|
//! | `snmp.target` | Agent address |
//! | `snmp.correlation_id` | Correlation id of the get or walk |
//! | `snmp.oid` / `snmp.oids` | OIDs involved |
//! | `snmp.get_count` | GETs in the batch |
//! | `snmp.walk_count` | Walks in the batch |
//! | `snmp.varbind_count` | OIDs in one GET |
//! | `snmp.value_count` | Values returned by a short GET |
//! | `snmp.response_count` | Correlation ids produced by a walk |
//! | `snmp.description` | Batch description passed to the walker |
//! | `snmp.location` | Request location |
//!
//! ### Filtering Examples
//!
//! ```bash
//! # Everything at debug level
//! RUST_LOG=async_snmp_proxy=debug cargo run
//! # Only failures
//! RUST_LOG=async_snmp_proxy=warn cargo run
//! ```

pub mod agent;
pub mod error;
pub mod oid;
pub mod prelude;
pub mod proxy;
pub mod request;
pub mod response;
pub mod strategy;
pub mod tracker;
pub mod value;
pub mod version;

// Re-exports for convenience
pub use agent::AgentConfig;
pub use error::{Error, ErrorStatus, OidErrorKind, Result};
pub use oid::Oid;
pub use proxy::{
    Credentials, CredentialsVault, ProxyConfig, REAPER_THREAD_NAME, RPC_MODULE_ID, Reaper,
    ResultCorrelator, SnmpProxy, SnmpProxyBuilder, StaticVault, build_tracker,
};
pub use request::{GetRequest, SnmpRequest, WalkRequest};
pub use response::{MultiResponse, SnmpResponse, SnmpResult};
pub use strategy::{SnmpStrategy, WalkCallback, Walker};
pub use tracker::{ResultSink, Tracker, TrackerKind, WalkTarget};
pub use value::Value;
pub use version::Version;
