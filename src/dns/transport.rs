//! DoH transport over HTTPS (dns-json convention)

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::dns::providers::{DohMethod, Provider};
use crate::dns::DnsTransport;
use crate::error::{DomainScoutError, Result};
use crate::types::{CheckConfig, DnsQuestion, DnsResponse};

/// Production DoH client backed by a pooled reqwest [`Client`].
///
/// GET encodes the question as `?name=&type=` query parameters; POST
/// sends the same dns-json question as a JSON body. Either way the
/// response is parsed as the dns-json envelope.
pub struct DohClient {
    client: Client,
}

impl DohClient {
    /// Build a client from checker configuration
    pub fn new(config: &CheckConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.connection_pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to create pooled HTTP client: {}. Using default.", e);
                Client::new()
            });
        Self { client }
    }

    /// Wrap an existing reqwest client. The deadline passed to `send`
    /// bounds the whole exchange, so the client needs no timeout of
    /// its own.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for DohClient {
    fn default() -> Self {
        Self::new(&CheckConfig::default())
    }
}

#[async_trait]
impl DnsTransport for DohClient {
    async fn send(
        &self,
        provider: &Provider,
        question: &DnsQuestion,
        deadline: Duration,
    ) -> Result<DnsResponse> {
        let deadline_ms = deadline.as_millis() as u64;
        let type_code = question.record_type.code().to_string();

        debug!(
            provider = %provider.name,
            name = %question.name,
            rtype = %question.record_type,
            method = %provider.method,
            "Sending DoH query"
        );

        let mut request = match provider.method {
            DohMethod::Get => self
                .client
                .get(&provider.base_url)
                .query(&[("name", question.name.as_str()), ("type", type_code.as_str())]),
            DohMethod::Post => self.client.post(&provider.base_url).json(question),
        };
        for (key, value) in &provider.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        // One guard around send plus body read keeps the whole call
        // within the deadline even when the client has no timeout.
        let exchange = async {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    DomainScoutError::timeout(
                        format!("{} {} query", provider.name, question.record_type),
                        deadline_ms,
                    )
                } else {
                    DomainScoutError::network(
                        e.to_string(),
                        e.status().map(|s| s.as_u16()),
                        Some(provider.base_url.clone()),
                    )
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(DomainScoutError::dns(
                    &provider.name,
                    format!(
                        "HTTP {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    ),
                    Some(status.as_u16()),
                ));
            }

            response.text().await.map_err(|e| {
                DomainScoutError::network(e.to_string(), None, Some(provider.base_url.clone()))
            })
        };

        let body = timeout(deadline, exchange)
            .await
            .map_err(|_| {
                DomainScoutError::timeout(
                    format!("{} {} query", provider.name, question.record_type),
                    deadline_ms,
                )
            })??;

        let envelope: DnsResponse = serde_json::from_str(&body).map_err(|e| {
            DomainScoutError::parse(
                format!("Invalid dns-json envelope from {}: {}", provider.name, e),
                Some(body),
            )
        })?;

        debug!(
            provider = %provider.name,
            name = %question.name,
            rtype = %question.record_type,
            rcode = %envelope.status,
            answers = envelope.answer.len(),
            "DoH query completed"
        );

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordType;

    #[test]
    fn client_builds_from_default_config() {
        let _client = DohClient::default();
    }

    #[tokio::test]
    async fn connection_failure_maps_to_network_error() {
        // Nothing listens on this port; connect is refused immediately.
        let client = DohClient::default();
        let provider = Provider::new("local", "http://127.0.0.1:9");
        let question = DnsQuestion::new("example.com", RecordType::Ns);

        let err = client
            .send(&provider, &question, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainScoutError::Network { .. }));
        assert!(!err.suggests_domain_exists());
    }
}
