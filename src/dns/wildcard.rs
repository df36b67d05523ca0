//! Wildcard (catch-all) DNS detection

use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::dns::providers::ProviderRegistry;
use crate::dns::DnsTransport;
use crate::error::Result;
use crate::types::{DnsQuestion, RecordType};

/// Answer record types that count as a wildcard hit
const WILDCARD_ANSWER_TYPES: &[RecordType] =
    &[RecordType::A, RecordType::Cname, RecordType::Aaaa];

/// Probes a domain for catch-all DNS by resolving a subdomain that is
/// virtually guaranteed not to exist. A zone that answers it with real
/// records would also answer for unregistered-looking names, which
/// breaks NXDOMAIN-based availability inference.
pub struct WildcardDetector {
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn DnsTransport>,
    timeout: Duration,
}

impl WildcardDetector {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        transport: Arc<dyn DnsTransport>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            timeout,
        }
    }

    /// `<random-12-char-token>-<ms-timestamp>.<domain>`
    fn probe_name(domain: &str) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        format!(
            "{}-{}.{}",
            token,
            chrono::Utc::now().timestamp_millis(),
            domain
        )
    }

    /// Returns `Ok(true)` iff the probe resolved with NOERROR and at
    /// least one A/CNAME/AAAA answer. Transport failures propagate;
    /// the caller decides how to treat an inconclusive probe.
    pub async fn detect(&self, domain: &str) -> Result<bool> {
        let probe = Self::probe_name(domain);
        let provider = self.registry.next_round_robin();
        let question = DnsQuestion::new(&probe, RecordType::A);

        debug!(
            domain = %domain,
            probe = %probe,
            provider = %provider.name,
            "Probing for wildcard DNS"
        );

        let response = self.transport.send(provider, &question, self.timeout).await?;
        let wildcard = response.is_noerror() && response.has_answer_of(WILDCARD_ANSWER_TYPES);

        debug!(
            domain = %domain,
            wildcard = wildcard,
            rcode = %response.status,
            "Wildcard probe completed"
        );

        Ok(wildcard)
    }
}
