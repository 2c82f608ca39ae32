//! Credential lookup for appliance agents.

use std::collections::HashMap;
use std::fmt;

/// A named credential entry.
///
/// Besides the optional username and password, entries carry free-form
/// attributes; the appliance SNMP community is stored as one of them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Login name, if the entry has one.
    pub username: Option<String>,
    /// Secret paired with the username.
    pub password: Option<String>,
    attributes: HashMap<String, String>,
}

impl Credentials {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Add an attribute.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute.
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Attribute values may be secrets too; only show keys.
        let mut keys: Vec<_> = self.attributes.keys().collect();
        keys.sort();
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("attributes", &keys)
            .finish()
    }
}

/// Source of credentials by alias.
pub trait CredentialsVault: Send + Sync {
    /// Look up the entry stored under `alias`.
    fn credentials(&self, alias: &str) -> Option<Credentials>;
}

/// In-memory [`CredentialsVault`].
#[derive(Debug, Clone, Default)]
pub struct StaticVault {
    entries: HashMap<String, Credentials>,
}

impl StaticVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `credentials` under `alias`, replacing any previous entry.
    pub fn insert(&mut self, alias: impl Into<String>, credentials: Credentials) {
        self.entries.insert(alias.into(), credentials);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, alias: impl Into<String>, credentials: Credentials) -> Self {
        self.insert(alias, credentials);
        self
    }
}

impl CredentialsVault for StaticVault {
    fn credentials(&self, alias: &str) -> Option<Credentials> {
        self.entries.get(alias).cloned()
    }
}
