//! Error types for async-snmp-proxy.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.
//!
//! Errors fall into three groups:
//!
//! - **Caller errors** ([`Error::MissingAgent`], [`Error::SingleInstanceOidCount`],
//!   [`Error::InvalidOid`]) are detected before any request is dispatched.
//! - **Transport errors** ([`Error::Io`], [`Error::Timeout`], [`Error::Snmp`],
//!   [`Error::Walk`], [`Error::WalkAborted`]) are reported by the
//!   [`SnmpStrategy`](crate::strategy::SnmpStrategy) and surface unchanged to the caller.
//! - **Runtime errors** ([`Error::Task`], [`Error::NoRuntime`]) come from the
//!   tokio runtime the proxy executes on.

use std::net::SocketAddr;
use std::time::Duration;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    AuthorizationError,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            16 => Self::AuthorizationError,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::AuthorizationError => 16,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during communication with the agent.
    #[error("I/O error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// Request timed out (after the transport's own retries).
    #[error("timeout after {elapsed:?}{} (retries={retries})", target.map(|t| format!(" waiting for {}", t)).unwrap_or_default())]
    Timeout {
        target: Option<SocketAddr>,
        elapsed: Duration,
        retries: u32,
    },

    /// SNMP protocol error returned by the agent.
    #[error("SNMP error{}: {status} at index {index}", target.map(|t| format!(" from {}", t)).unwrap_or_default())]
    Snmp {
        target: Option<SocketAddr>,
        status: ErrorStatus,
        index: u32,
        oid: Option<crate::oid::Oid>,
    },

    /// Walk failed inside the walker (malformed response, agent misbehavior, ...).
    #[error("walk failed{}: {message}", target.map(|t| format!(" against {}", t)).unwrap_or_default())]
    Walk {
        target: Option<SocketAddr>,
        message: Box<str>,
    },

    /// The walker was released without ever reporting completion.
    #[error("walker dropped its completion callback without reporting an outcome")]
    WalkAborted { target: Option<SocketAddr> },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Request submitted without an agent.
    #[error("request has no agent")]
    MissingAgent,

    /// Single-instance walk requested with other than exactly one OID.
    #[error("single instance requests must have a single OID (correlation id {correlation_id:?} has {count})")]
    SingleInstanceOidCount {
        correlation_id: Box<str>,
        count: usize,
    },

    /// A spawned request branch panicked or was aborted.
    #[error("request task failed: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    /// [`Reaper::try_current`](crate::proxy::Reaper::try_current) was called
    /// outside a tokio runtime.
    #[error("no tokio runtime available for the session reaper")]
    NoRuntime,
}

impl Error {
    /// Create a free-form walk error.
    pub fn walk(target: Option<SocketAddr>, message: impl Into<Box<str>>) -> Self {
        Self::Walk {
            target,
            message: message.into(),
        }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Get the target address if this error has one.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. } => *target,
            Self::Timeout { target, .. } => *target,
            Self::Snmp { target, .. } => *target,
            Self::Walk { target, .. } => *target,
            Self::WalkAborted { target } => *target,
            _ => None,
        }
    }

    /// Whether the error was caused by a malformed request rather than the agent or transport.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::MissingAgent | Self::SingleInstanceOidCount { .. } | Self::InvalidOid { .. }
        )
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }
}
