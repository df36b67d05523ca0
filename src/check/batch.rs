//! Batch coordination: one base name fanned out across TLDs, with
//! cached results, live progress, and cooperative cancellation.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::links::link_for;
use crate::check::cache::ResultCache;
use crate::check::{CancelHandle, DomainChecker};
use crate::error::{DomainScoutError, Result};
use crate::types::{CheckStage, DomainResult, DomainStatus, GroupedResults, ProgressState};

/// Monotonic progress ledger. Each domain's stage index only ever
/// advances; the percentage is derived from the per-domain stage sum so
/// it cannot move backwards and lands on exactly 100 when every domain
/// reaches the final stage. Reporting happens while the ledger is
/// locked, which keeps emitted percentages in order even when checks
/// advance concurrently.
struct ProgressLedger<F> {
    stages: Vec<usize>,
    on_progress: F,
}

impl<F: Fn(&ProgressState)> ProgressLedger<F> {
    const UNITS_PER_DOMAIN: usize = CheckStage::COUNT - 1;

    fn new(total_domains: usize, on_progress: F) -> Self {
        Self {
            stages: vec![0; total_domains],
            on_progress,
        }
    }

    fn report(&mut self, idx: usize, domain: &str, stage: CheckStage) {
        let units = stage.index();
        if units > self.stages[idx] {
            self.stages[idx] = units;
        }

        let completed: usize = self.stages.iter().sum();
        let total_units = Self::UNITS_PER_DOMAIN * self.stages.len();
        let percentage = (completed as f64 / total_units as f64) * 100.0;
        let domains_processed = self
            .stages
            .iter()
            .filter(|s| **s == Self::UNITS_PER_DOMAIN)
            .count();

        (self.on_progress)(&ProgressState {
            percentage,
            stage,
            domains_processed,
            total_domains: self.stages.len(),
            current_domain: domain.to_string(),
            detailed_message: format!("{}: {}", domain, stage),
        });
    }
}

/// Error-status result for a domain whose check could not run
fn failure_result(domain: &str, err: &DomainScoutError) -> DomainResult {
    DomainResult {
        domain: domain.to_string(),
        status: DomainStatus::Error,
        error_category: Some(err.category()),
        error_message: Some(err.to_string()),
        link: link_for(DomainStatus::Error, domain),
        evidence: vec![format!("Check failed before completion: {}", err)],
        dnssec_validated: false,
        wildcard_detected: false,
        is_parked_by_ns: false,
        is_parked_by_txt: false,
        checked_at: chrono::Utc::now(),
    }
}

/// Coordinates batch checks of `basename × TLDs` combinations.
///
/// Identical batches within the cache TTL are served without any
/// network traffic.
pub struct BatchCoordinator {
    checker: DomainChecker,
    cache: Arc<ResultCache>,
}

impl BatchCoordinator {
    pub fn new(checker: DomainChecker) -> Self {
        let cache = Arc::new(ResultCache::new(checker.config().cache_ttl()));
        Self::with_cache(checker, cache)
    }

    /// Use a shared cache, e.g. one surviving across coordinators
    pub fn with_cache(checker: DomainChecker, cache: Arc<ResultCache>) -> Self {
        Self { checker, cache }
    }

    pub fn checker(&self) -> &DomainChecker {
        &self.checker
    }

    /// Lowercase, ensure a leading dot, then sort and dedup so that
    /// equivalent TLD lists produce the same batch and cache key.
    fn normalize_tlds(tlds: &[String]) -> Vec<String> {
        let mut normalized: Vec<String> = tlds
            .iter()
            .map(|tld| tld.trim().trim_matches('.').to_lowercase())
            .filter(|tld| !tld.is_empty())
            .map(|tld| format!(".{}", tld))
            .collect();
        normalized.sort();
        normalized.dedup();
        normalized
    }

    fn cache_key(base: &str, tlds: &[String]) -> String {
        format!("{}|{}", base, tlds.join(","))
    }

    /// Check `base_name` against every TLD, reporting progress along
    /// the way. Fails only on invalid input or cancellation; individual
    /// domain problems come back as Error-status results inside the
    /// grouping.
    pub async fn run_batch<F>(
        &self,
        base_name: &str,
        tlds: &[String],
        on_progress: F,
    ) -> Result<GroupedResults>
    where
        F: Fn(&ProgressState) + Send + Sync + 'static,
    {
        self.run_batch_with_cancel(base_name, tlds, &CancelHandle::new(), on_progress)
            .await
    }

    /// Like [`run_batch`](Self::run_batch) but stoppable: once the
    /// handle is cancelled no further queries are issued, in-flight
    /// results are discarded, and nothing is written to the cache.
    pub async fn run_batch_with_cancel<F>(
        &self,
        base_name: &str,
        tlds: &[String],
        cancel: &CancelHandle,
        on_progress: F,
    ) -> Result<GroupedResults>
    where
        F: Fn(&ProgressState) + Send + Sync + 'static,
    {
        let base = base_name.trim().trim_matches('.').to_lowercase();
        if base.is_empty() {
            return Err(crate::validation_error!("Base domain name must not be empty"));
        }
        let tlds = Self::normalize_tlds(tlds);
        if tlds.is_empty() {
            return Err(crate::validation_error!("At least one TLD is required"));
        }

        let key = Self::cache_key(&base, &tlds);
        if let Some(cached) = self.cache.get(&key) {
            self.checker.get_metrics().increment_cache_hits();
            debug!(key = %key, results = cached.len(), "Batch served from cache");
            on_progress(&ProgressState {
                percentage: 100.0,
                stage: CheckStage::Complete,
                domains_processed: cached.len(),
                total_domains: cached.len(),
                current_domain: String::new(),
                detailed_message: format!("Served {} cached result(s)", cached.len()),
            });
            return Ok(cached.into_iter().collect());
        }

        let domains: Vec<String> = tlds.iter().map(|tld| format!("{}{}", base, tld)).collect();
        let ledger = Arc::new(Mutex::new(ProgressLedger::new(domains.len(), on_progress)));

        info!(
            base = %base,
            domains = %domains.len(),
            "Starting batch domain check"
        );

        let mut handles = Vec::with_capacity(domains.len());
        for (idx, domain) in domains.iter().cloned().enumerate() {
            let checker = self.checker.clone();
            let cancel = cancel.clone();
            let ledger = Arc::clone(&ledger);

            handles.push(tokio::spawn(async move {
                let observer = {
                    let ledger = Arc::clone(&ledger);
                    let domain = domain.clone();
                    move |stage: CheckStage| ledger.lock().report(idx, &domain, stage)
                };

                match checker.check_cancellable(&domain, &cancel, observer).await {
                    Ok(result) => result,
                    Err(e) => {
                        if !matches!(e, DomainScoutError::Cancelled { .. }) {
                            warn!(domain = %domain, error = %e, "Domain check failed");
                            ledger.lock().report(idx, &domain, CheckStage::Complete);
                        }
                        failure_result(&domain, &e)
                    }
                }
            }));
        }

        let mut results = Vec::with_capacity(domains.len());
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(result) => results.push(result),
                Err(join_err) => {
                    let domain = &domains[idx];
                    warn!(domain = %domain, error = %join_err, "Domain check task aborted");
                    ledger.lock().report(idx, domain, CheckStage::Complete);
                    results.push(failure_result(
                        domain,
                        &DomainScoutError::internal(format!("Check task aborted: {}", join_err)),
                    ));
                }
            }
        }

        if cancel.is_cancelled() {
            debug!(base = %base, "Batch cancelled; discarding results");
            return Err(DomainScoutError::cancelled(format!(
                "Batch check of '{}' was cancelled",
                base
            )));
        }

        self.cache.insert(key, results.clone());

        let grouped: GroupedResults = results.into_iter().collect();
        info!(
            base = %base,
            available = %grouped.available.len(),
            registered = %grouped.registered.len(),
            premium = %grouped.premium.len(),
            other = %grouped.other.len(),
            "Batch domain check completed"
        );
        Ok(grouped)
    }
}
