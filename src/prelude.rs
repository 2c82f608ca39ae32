//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use async_snmp_proxy::prelude::*;
//! ```
//!
//! This imports:
//! - Request execution: [`SnmpProxy`], [`SnmpStrategy`], [`Walker`]
//! - Request and response types: [`SnmpRequest`], [`GetRequest`], [`WalkRequest`], [`MultiResponse`]
//! - Core types: [`AgentConfig`], [`Oid`], [`Value`], [`Version`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro for OID construction

pub use crate::agent::AgentConfig;
pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::proxy::SnmpProxy;
pub use crate::request::{GetRequest, SnmpRequest, WalkRequest};
pub use crate::response::{MultiResponse, SnmpResponse, SnmpResult};
pub use crate::strategy::{SnmpStrategy, Walker};
pub use crate::value::Value;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
