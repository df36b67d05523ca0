//! Domain checking: per-domain query orchestration and batch coordination

pub mod batch;
pub mod cache;

// Re-export main functionality
pub use batch::BatchCoordinator;
pub use cache::ResultCache;

use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::analysis::classify;
use crate::catalog::is_wildcard_prone_tld;
use crate::dns::{DnsTransport, DohClient, Provider, ProviderRegistry, WildcardDetector};
use crate::error::{ClassifiedError, DomainScoutError, Result};
use crate::types::{
    CheckConfig, CheckMetrics, CheckStage, DnsQuestion, DomainResult, DomainStatus,
    MetricsSnapshot, ProviderOutcome, RecordType,
};

/// Record types fanned out to every primary provider
const PRIMARY_RECORD_TYPES: [RecordType; 2] = [RecordType::Ns, RecordType::Txt];

/// Cooperative cancellation flag shared between a caller and running
/// checks. Cancelling stops further queries from being issued; whatever
/// is already in flight finishes and its results are discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Domain status checker with performance monitoring.
///
/// Cloning is cheap; clones share the provider registry, transport,
/// concurrency limit, and metrics.
#[derive(Clone)]
pub struct DomainChecker {
    config: CheckConfig,
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn DnsTransport>,
    semaphore: Arc<Semaphore>,
    metrics: Arc<CheckMetrics>,
}

impl DomainChecker {
    /// Create a new checker with default configuration and providers
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a new checker with custom configuration
    pub fn with_config(config: CheckConfig) -> Self {
        let transport: Arc<dyn DnsTransport> = Arc::new(DohClient::new(&config));
        Self::with_parts(config, Arc::new(ProviderRegistry::with_defaults()), transport)
    }

    /// Create a checker from explicit parts. This is the seam for
    /// pointing the checker at test servers or a scripted transport.
    pub fn with_parts(
        config: CheckConfig,
        registry: Arc<ProviderRegistry>,
        transport: Arc<dyn DnsTransport>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrent_checks));
        let metrics = Arc::new(CheckMetrics::new());

        Self {
            config,
            registry,
            transport,
            semaphore,
            metrics,
        }
    }

    /// Check a single domain
    pub async fn check(&self, domain: &str) -> Result<DomainResult> {
        self.check_with_observer(domain, |_| {}).await
    }

    /// Check a single domain, reporting each pipeline stage as it is
    /// entered.
    pub async fn check_with_observer<F>(&self, domain: &str, on_stage: F) -> Result<DomainResult>
    where
        F: Fn(CheckStage) + Send + Sync,
    {
        self.check_cancellable(domain, &CancelHandle::new(), on_stage)
            .await
    }

    /// Full-control variant: stage observer plus cooperative
    /// cancellation. Fails only on invalid input or cancellation;
    /// transport problems surface as an Error-status result instead.
    pub async fn check_cancellable<F>(
        &self,
        domain: &str,
        cancel: &CancelHandle,
        on_stage: F,
    ) -> Result<DomainResult>
    where
        F: Fn(CheckStage) + Send + Sync,
    {
        let _permit = self.semaphore.acquire().await.map_err(|e| {
            DomainScoutError::internal(format!("Failed to acquire semaphore: {}", e))
        })?;

        let start_time = Instant::now();

        on_stage(CheckStage::Preparing);
        let domain = domain.trim().trim_end_matches('.').to_lowercase();
        if domain.is_empty() {
            return Err(crate::validation_error!("Domain must not be empty"));
        }
        if domain.contains(char::is_whitespace) {
            return Err(crate::validation_error!(
                "Domain must not contain whitespace: '{}'",
                domain
            ));
        }
        if cancel.is_cancelled() {
            return Err(DomainScoutError::cancelled("Check cancelled before start"));
        }

        let mut evidence = Vec::new();

        // Wildcard probe first; its verdict shapes how NXDOMAIN and
        // NOERROR answers are read later.
        on_stage(CheckStage::WildcardCheck);
        let detector = WildcardDetector::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.transport),
            self.config.timeout(),
        );
        self.metrics.increment_queries_sent();
        let wildcard_detected = match detector.detect(&domain).await {
            Ok(found) => {
                if found {
                    evidence.push("Wildcard probe resolved; zone serves catch-all DNS".to_string());
                } else {
                    evidence.push("Wildcard probe returned no records".to_string());
                }
                found
            }
            Err(e) => {
                // Inconclusive probe; proceed as if no wildcard.
                tracing::debug!(domain = %domain, error = %e, "Wildcard probe failed");
                evidence.push(format!("Wildcard probe failed ({})", e.category()));
                false
            }
        };
        let wildcard_prone = is_wildcard_prone_tld(&domain);

        if cancel.is_cancelled() {
            return Err(DomainScoutError::cancelled("Check cancelled after wildcard probe"));
        }

        // NS and TXT against every primary provider, all in parallel.
        // A failed query becomes a failed outcome, never an early return.
        on_stage(CheckStage::PrimaryQuery);
        let primary = self.registry.primary();
        let mut queries = Vec::with_capacity(primary.len() * PRIMARY_RECORD_TYPES.len());
        for provider in primary {
            for record_type in PRIMARY_RECORD_TYPES {
                queries.push(
                    self.query_with_retry(provider, DnsQuestion::new(&domain, record_type)),
                );
            }
        }
        let mut outcomes: Vec<ProviderOutcome> = join_all(queries).await;

        // SOA fallback when no NS answer settled the question either way
        let ns_inconclusive = outcomes
            .iter()
            .filter(|o| o.record_type == RecordType::Ns)
            .all(|o| match o.response() {
                Some(response) => !response.is_noerror() && !response.is_nxdomain(),
                None => true,
            });
        if ns_inconclusive {
            if cancel.is_cancelled() {
                return Err(DomainScoutError::cancelled("Check cancelled before SOA fallback"));
            }
            on_stage(CheckStage::FallbackQuery);
            evidence.push("NS queries inconclusive; falling back to SOA".to_string());
            let soa_queries = primary.iter().map(|provider| {
                self.query_with_retry(provider, DnsQuestion::new(&domain, RecordType::Soa))
            });
            outcomes.extend(join_all(soa_queries).await);
        }

        on_stage(CheckStage::Analyzing);
        let result = classify(
            &domain,
            &outcomes,
            wildcard_detected,
            wildcard_prone,
            evidence,
            &self.config,
        );

        on_stage(CheckStage::Finalizing);
        let duration = start_time.elapsed();
        self.metrics.increment_domains_checked();
        self.metrics.add_check_time(duration.as_millis() as u64);
        if result.status == DomainStatus::Error {
            self.metrics.increment_errors();
        }

        tracing::debug!(
            domain = %domain,
            status = %result.status,
            duration_ms = %duration.as_millis(),
            "Domain check completed"
        );

        on_stage(CheckStage::Complete);
        Ok(result)
    }

    /// Send one question, retrying transient failures with a short
    /// backoff. Always yields an outcome; errors are captured, not
    /// propagated.
    async fn query_with_retry(&self, provider: &Provider, question: DnsQuestion) -> ProviderOutcome {
        let mut attempt = 0u32;
        loop {
            self.metrics.increment_queries_sent();
            match self
                .transport
                .send(provider, &question, self.config.timeout())
                .await
            {
                Ok(response) => {
                    return ProviderOutcome::succeeded(&provider.name, question.record_type, response)
                }
                Err(e) => {
                    if attempt < self.config.max_retries && e.is_transient() {
                        attempt += 1;
                        self.metrics.increment_retries();
                        tracing::debug!(
                            provider = %provider.name,
                            name = %question.name,
                            attempt = attempt,
                            error = %e,
                            "Retrying transient DNS failure"
                        );
                        tokio::time::sleep(self.config.retry_backoff()).await;
                        continue;
                    }
                    return ProviderOutcome::failed(
                        &provider.name,
                        question.record_type,
                        ClassifiedError::from_error(&e),
                    );
                }
            }
        }
    }

    /// Check multiple domains concurrently
    pub async fn check_many(&self, domains: &[String]) -> Result<Vec<DomainResult>> {
        let batch_start = Instant::now();
        let futures = domains.iter().map(|domain| self.check(domain));
        let results = join_all(futures).await;

        let mut success_results = Vec::new();
        let mut error_count = 0u32;

        for (domain, result) in domains.iter().zip(results.into_iter()) {
            match result {
                Ok(domain_result) => success_results.push(domain_result),
                Err(e) => {
                    error_count += 1;
                    tracing::warn!(domain = %domain, error = %e, "Failed to check domain");
                }
            }
        }

        let batch_duration = batch_start.elapsed();
        tracing::info!(
            domains_requested = %domains.len(),
            domains_processed = %success_results.len(),
            errors = %error_count,
            batch_duration_ms = %batch_duration.as_millis(),
            "Batch domain check completed"
        );

        Ok(success_results)
    }

    /// Get checker configuration
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Get the provider registry backing this checker
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Get performance metrics
    pub fn get_metrics(&self) -> Arc<CheckMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.get_stats()
    }
}

impl Default for DomainChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DnsResponse, Rcode, ResourceRecord};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Transport that replays scripted responses per (provider, type)
    /// and falls back to NXDOMAIN when the script runs out.
    struct ScriptedTransport {
        script: Mutex<HashMap<String, VecDeque<Result<DnsResponse>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self {
                script: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn push(&self, provider: &str, record_type: RecordType, outcome: Result<DnsResponse>) {
            self.script
                .lock()
                .entry(format!("{}/{}", provider, record_type))
                .or_default()
                .push_back(outcome);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DnsTransport for ScriptedTransport {
        async fn send(
            &self,
            provider: &Provider,
            question: &DnsQuestion,
            _timeout: Duration,
        ) -> Result<DnsResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = format!("{}/{}", provider.name, question.record_type);
            let scripted = self.script.lock().get_mut(&key).and_then(VecDeque::pop_front);
            scripted.unwrap_or_else(|| {
                Ok(DnsResponse {
                    status: Rcode::NxDomain,
                    ..DnsResponse::default()
                })
            })
        }
    }

    fn record(record_type: RecordType, data: &str) -> ResourceRecord {
        ResourceRecord {
            name: "example.com".to_string(),
            record_type,
            ttl: 300,
            data: data.to_string(),
        }
    }

    fn noerror_with(records: Vec<ResourceRecord>) -> DnsResponse {
        DnsResponse {
            status: Rcode::NoError,
            answer: records,
            ..DnsResponse::default()
        }
    }

    fn checker_with(transport: Arc<ScriptedTransport>) -> DomainChecker {
        let config = CheckConfig {
            retry_backoff_ms: 0,
            ..CheckConfig::default()
        };
        DomainChecker::with_parts(
            config,
            Arc::new(ProviderRegistry::with_defaults()),
            transport,
        )
    }

    #[tokio::test]
    async fn blank_domain_is_rejected() {
        let checker = checker_with(Arc::new(ScriptedTransport::new()));
        let err = checker.check("   ").await.unwrap_err();
        assert!(matches!(err, DomainScoutError::Validation { .. }));
    }

    #[tokio::test]
    async fn unanimous_nxdomain_reads_as_available() {
        // Scripted transport defaults every query to NXDOMAIN.
        let transport = Arc::new(ScriptedTransport::new());
        let checker = checker_with(Arc::clone(&transport));

        let result = checker.check("surely-not-taken-4821.com").await.unwrap();
        assert_eq!(result.status, DomainStatus::Available);
        assert!(!result.wildcard_detected);

        // One wildcard probe plus NS+TXT against both primaries.
        assert_eq!(transport.calls(), 5);
        assert_eq!(checker.get_metrics_snapshot().queries_sent, 5);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(
            "cloudflare",
            RecordType::Ns,
            Err(DomainScoutError::timeout("NS query", 5000)),
        );
        transport.push(
            "cloudflare",
            RecordType::Ns,
            Ok(noerror_with(vec![record(RecordType::Ns, "ns1.example-dns.com.")])),
        );
        let checker = checker_with(Arc::clone(&transport));

        let result = checker.check("example.com").await.unwrap();
        assert_eq!(result.status, DomainStatus::Registered);

        let stats = checker.get_metrics_snapshot();
        assert_eq!(stats.retries_attempted, 1);
        // Probe + 4 primary queries + 1 retry.
        assert_eq!(transport.calls(), 6);
    }

    #[tokio::test]
    async fn refused_nameservers_trigger_soa_fallback() {
        let transport = Arc::new(ScriptedTransport::new());
        for provider in ["cloudflare", "google"] {
            transport.push(
                provider,
                RecordType::Ns,
                Ok(DnsResponse {
                    status: Rcode::Refused,
                    ..DnsResponse::default()
                }),
            );
            transport.push(provider, RecordType::Txt, Ok(noerror_with(Vec::new())));
        }
        transport.push(
            "cloudflare",
            RecordType::Soa,
            Ok(noerror_with(vec![record(
                RecordType::Soa,
                "ns1.example-dns.com. hostmaster.example.com. 1 7200 3600 1209600 3600",
            )])),
        );
        let checker = checker_with(Arc::clone(&transport));

        let result = checker.check("example.com").await.unwrap();
        assert_eq!(result.status, DomainStatus::Registered);
        assert!(result
            .evidence
            .iter()
            .any(|line| line.contains("falling back to SOA")));
    }

    #[tokio::test]
    async fn stages_are_reported_in_order() {
        let transport = Arc::new(ScriptedTransport::new());
        let checker = checker_with(transport);

        let seen = Mutex::new(Vec::new());
        checker
            .check_with_observer("example.com", |stage| seen.lock().push(stage))
            .await
            .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.first(), Some(&CheckStage::Preparing));
        assert_eq!(seen.last(), Some(&CheckStage::Complete));
        assert!(seen.windows(2).all(|w| w[0].index() < w[1].index()));
    }

    #[tokio::test]
    async fn cancelled_check_stops_before_querying() {
        let transport = Arc::new(ScriptedTransport::new());
        let checker = checker_with(Arc::clone(&transport));

        let cancel = CancelHandle::new();
        cancel.cancel();
        let err = checker
            .check_cancellable("example.com", &cancel, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, DomainScoutError::Cancelled { .. }));
        assert_eq!(transport.calls(), 0);
    }
}
