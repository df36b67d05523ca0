//! DNS-over-HTTPS layer: transport, provider registry, wildcard probing

pub mod providers;
pub mod transport;
pub mod wildcard;

// Re-export main functionality
pub use providers::{DohMethod, Provider, ProviderRegistry};
pub use transport::DohClient;
pub use wildcard::WildcardDetector;

use crate::error::Result;
use crate::types::{DnsQuestion, DnsResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for sending one DNS question to one DoH provider.
///
/// The transport performs exactly one network call: no retries, no
/// fallback. Those policies belong to the orchestrator above it.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Send `question` to `provider`, bounded by `timeout`
    async fn send(
        &self,
        provider: &Provider,
        question: &DnsQuestion,
        timeout: Duration,
    ) -> Result<DnsResponse>;
}
