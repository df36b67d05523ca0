//! DoH provider registry with round-robin selection

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{DomainScoutError, Result};

/// HTTP method a provider accepts for dns-json queries.
///
/// Anything else is a configuration mistake and is rejected when the
/// registry is built, never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DohMethod {
    Get,
    Post,
}

impl FromStr for DohMethod {
    type Err = DomainScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(DohMethod::Get),
            "POST" => Ok(DohMethod::Post),
            other => Err(DomainScoutError::config(format!(
                "Unsupported DoH method '{}': only GET and POST are allowed",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DohMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DohMethod::Get => write!(f, "GET"),
            DohMethod::Post => write!(f, "POST"),
        }
    }
}

/// One DoH endpoint descriptor
#[derive(Debug, Clone)]
pub struct Provider {
    pub name: String,
    pub base_url: String,
    pub method: DohMethod,
    pub headers: Vec<(String, String)>,
}

impl Provider {
    /// Build a provider using the JSON GET convention every public
    /// resolver accepts.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            method: DohMethod::Get,
            headers: vec![("Accept".to_string(), "application/dns-json".to_string())],
        }
    }

    pub fn with_method(mut self, method: DohMethod) -> Self {
        self.method = method;
        self
    }
}

/// Ordered pool of DoH providers.
///
/// The cursor is the only cross-call mutable state in the engine; it is
/// an atomic so concurrent wildcard probes never skip or repeat a
/// provider.
pub struct ProviderRegistry {
    providers: Vec<Provider>,
    cursor: AtomicUsize,
}

impl ProviderRegistry {
    /// Build a registry from an explicit provider list
    pub fn new(providers: Vec<Provider>) -> Result<Self> {
        if providers.is_empty() {
            return Err(DomainScoutError::config(
                "Provider registry requires at least one DoH endpoint",
            ));
        }
        Ok(Self {
            providers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// The built-in public resolver pool
    pub fn with_defaults() -> Self {
        Self {
            providers: vec![
                Provider::new("cloudflare", "https://cloudflare-dns.com/dns-query"),
                Provider::new("google", "https://dns.google/resolve"),
                Provider::new("quad9", "https://dns.quad9.net:5053/dns-query"),
            ],
            cursor: AtomicUsize::new(0),
        }
    }

    /// Get the next provider in rotation.
    ///
    /// Used only for non-critical load (the wildcard probe); consensus
    /// queries always go to the fixed primary subset.
    pub fn next_round_robin(&self) -> &Provider {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.providers.len();
        &self.providers[index]
    }

    /// The fixed primary subset used for consensus-bearing queries:
    /// the first two configured providers (or fewer if the pool is
    /// smaller).
    pub fn primary(&self) -> &[Provider] {
        let end = self.providers.len().min(2);
        &self.providers[..end]
    }

    pub fn all(&self) -> &[Provider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
