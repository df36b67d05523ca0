//! Core types and structures for domain-scout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{ClassifiedError, ErrorCategory};

/// DNS record type, carried on the wire as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", from = "u16")]
pub enum RecordType {
    A,
    Ns,
    Cname,
    Soa,
    Mx,
    Txt,
    Aaaa,
    Rrsig,
    Nsec3,
    Other(u16),
}

impl RecordType {
    /// Numeric type code used by the dns-json wire format
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Cname => 5,
            RecordType::Soa => 6,
            RecordType::Mx => 15,
            RecordType::Txt => 16,
            RecordType::Aaaa => 28,
            RecordType::Rrsig => 46,
            RecordType::Nsec3 => 50,
            RecordType::Other(code) => *code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::Ns,
            5 => RecordType::Cname,
            6 => RecordType::Soa,
            15 => RecordType::Mx,
            16 => RecordType::Txt,
            28 => RecordType::Aaaa,
            46 => RecordType::Rrsig,
            50 => RecordType::Nsec3,
            other => RecordType::Other(other),
        }
    }
}

impl From<RecordType> for u16 {
    fn from(rt: RecordType) -> u16 {
        rt.code()
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        RecordType::from_code(code)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Ns => write!(f, "NS"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Soa => write!(f, "SOA"),
            RecordType::Mx => write!(f, "MX"),
            RecordType::Txt => write!(f, "TXT"),
            RecordType::Aaaa => write!(f, "AAAA"),
            RecordType::Rrsig => write!(f, "RRSIG"),
            RecordType::Nsec3 => write!(f, "NSEC3"),
            RecordType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// DNS response code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", from = "u16")]
pub enum Rcode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u16),
}

impl Rcode {
    pub fn code(&self) -> u16 {
        match self {
            Rcode::NoError => 0,
            Rcode::FormErr => 1,
            Rcode::ServFail => 2,
            Rcode::NxDomain => 3,
            Rcode::NotImp => 4,
            Rcode::Refused => 5,
            Rcode::Other(code) => *code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Rcode::NoError,
            1 => Rcode::FormErr,
            2 => Rcode::ServFail,
            3 => Rcode::NxDomain,
            4 => Rcode::NotImp,
            5 => Rcode::Refused,
            other => Rcode::Other(other),
        }
    }

    pub fn is_noerror(&self) -> bool {
        matches!(self, Rcode::NoError)
    }

    pub fn is_nxdomain(&self) -> bool {
        matches!(self, Rcode::NxDomain)
    }

    pub fn is_servfail(&self) -> bool {
        matches!(self, Rcode::ServFail)
    }
}

impl From<Rcode> for u16 {
    fn from(rcode: Rcode) -> u16 {
        rcode.code()
    }
}

impl From<u16> for Rcode {
    fn from(code: u16) -> Self {
        Rcode::from_code(code)
    }
}

impl std::fmt::Display for Rcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rcode::NoError => write!(f, "NOERROR"),
            Rcode::FormErr => write!(f, "FORMERR"),
            Rcode::ServFail => write!(f, "SERVFAIL"),
            Rcode::NxDomain => write!(f, "NXDOMAIN"),
            Rcode::NotImp => write!(f, "NOTIMP"),
            Rcode::Refused => write!(f, "REFUSED"),
            Rcode::Other(code) => write!(f, "RCODE{}", code),
        }
    }
}

/// A single DNS question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl DnsQuestion {
    /// Build a question with the name normalized to a lowercase FQDN
    /// without a trailing dot.
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        let name = name.into();
        Self {
            name: name.trim().trim_end_matches('.').to_lowercase(),
            record_type,
        }
    }
}

/// One resource record from a DoH response section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    #[serde(default)]
    pub data: String,
}

impl ResourceRecord {
    /// TXT payloads arrive wrapped in quotes; strip one layer of them.
    /// Unbalanced quotes are left alone.
    pub fn unquoted_data(&self) -> &str {
        let data = self.data.trim();
        data.strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(data)
    }

    /// Hostname form suitable for comparison: lowercase, no trailing dot.
    pub fn normalized_host(&self) -> String {
        self.data.trim().trim_end_matches('.').to_lowercase()
    }
}

/// The JSON envelope returned by DoH providers (dns-json convention).
///
/// Immutable once received; the call that produced it owns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsResponse {
    #[serde(rename = "Status")]
    pub status: Rcode,
    #[serde(rename = "TC", default)]
    pub truncated: bool,
    #[serde(rename = "RD", default)]
    pub recursion_desired: bool,
    #[serde(rename = "RA", default)]
    pub recursion_available: bool,
    #[serde(rename = "AD", default)]
    pub authenticated_data: bool,
    #[serde(rename = "CD", default)]
    pub checking_disabled: bool,
    #[serde(rename = "Question", default)]
    pub question: Vec<DnsQuestion>,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<ResourceRecord>,
    #[serde(rename = "Authority", default)]
    pub authority: Vec<ResourceRecord>,
    #[serde(rename = "Additional", default)]
    pub additional: Vec<ResourceRecord>,
}

impl DnsResponse {
    pub fn is_noerror(&self) -> bool {
        self.status.is_noerror()
    }

    pub fn is_nxdomain(&self) -> bool {
        self.status.is_nxdomain()
    }

    /// Answer-section records of the given type
    pub fn answers_of(&self, record_type: RecordType) -> Vec<&ResourceRecord> {
        self.answer
            .iter()
            .filter(|r| r.record_type == record_type)
            .collect()
    }

    /// Whether the answer section holds at least one record of any
    /// of the given types.
    pub fn has_answer_of(&self, types: &[RecordType]) -> bool {
        self.answer.iter().any(|r| types.contains(&r.record_type))
    }
}

/// The outcome of asking one provider one question.
///
/// Produced once per (provider, record type) pair per domain check and
/// never mutated.
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider: String,
    pub record_type: RecordType,
    pub outcome: Result<DnsResponse, ClassifiedError>,
}

impl ProviderOutcome {
    pub fn succeeded(
        provider: impl Into<String>,
        record_type: RecordType,
        response: DnsResponse,
    ) -> Self {
        Self {
            provider: provider.into(),
            record_type,
            outcome: Ok(response),
        }
    }

    pub fn failed(
        provider: impl Into<String>,
        record_type: RecordType,
        error: ClassifiedError,
    ) -> Self {
        Self {
            provider: provider.into(),
            record_type,
            outcome: Err(error),
        }
    }

    pub fn response(&self) -> Option<&DnsResponse> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        self.outcome.as_ref().err()
    }
}

/// Confidence-scored parking/premium signal from TXT analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSignal {
    pub is_parked: bool,
    pub is_premium: bool,
    pub confidence: u8,
    pub matched_patterns: BTreeSet<String>,
    pub has_active_usage_indicators: bool,
}

/// Domain status taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Available,
    Registered,
    Premium,
    Indeterminate,
    Error,
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainStatus::Available => write!(f, "available"),
            DomainStatus::Registered => write!(f, "registered"),
            DomainStatus::Premium => write!(f, "premium"),
            DomainStatus::Indeterminate => write!(f, "indeterminate"),
            DomainStatus::Error => write!(f, "error"),
        }
    }
}

/// Terminal artifact of one domain check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResult {
    pub domain: String,
    pub status: DomainStatus,
    pub error_category: Option<ErrorCategory>,
    pub error_message: Option<String>,
    pub link: String,
    pub evidence: Vec<String>,
    pub dnssec_validated: bool,
    pub wildcard_detected: bool,
    pub is_parked_by_ns: bool,
    pub is_parked_by_txt: bool,
    pub checked_at: DateTime<Utc>,
}

/// Batch results partitioned by status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupedResults {
    pub available: Vec<DomainResult>,
    pub registered: Vec<DomainResult>,
    pub premium: Vec<DomainResult>,
    pub other: Vec<DomainResult>,
}

impl GroupedResults {
    pub fn push(&mut self, result: DomainResult) {
        match result.status {
            DomainStatus::Available => self.available.push(result),
            DomainStatus::Registered => self.registered.push(result),
            DomainStatus::Premium => self.premium.push(result),
            DomainStatus::Indeterminate | DomainStatus::Error => self.other.push(result),
        }
    }

    pub fn total(&self) -> usize {
        self.available.len() + self.registered.len() + self.premium.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainResult> {
        self.available
            .iter()
            .chain(self.registered.iter())
            .chain(self.premium.iter())
            .chain(self.other.iter())
    }
}

impl FromIterator<DomainResult> for GroupedResults {
    fn from_iter<I: IntoIterator<Item = DomainResult>>(iter: I) -> Self {
        let mut grouped = Self::default();
        for result in iter {
            grouped.push(result);
        }
        grouped
    }
}

/// Pipeline stage a domain check moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStage {
    Preparing,
    WildcardCheck,
    PrimaryQuery,
    FallbackQuery,
    Analyzing,
    Finalizing,
    Complete,
}

impl CheckStage {
    pub const COUNT: usize = 7;

    pub fn index(self) -> usize {
        match self {
            CheckStage::Preparing => 0,
            CheckStage::WildcardCheck => 1,
            CheckStage::PrimaryQuery => 2,
            CheckStage::FallbackQuery => 3,
            CheckStage::Analyzing => 4,
            CheckStage::Finalizing => 5,
            CheckStage::Complete => 6,
        }
    }
}

impl std::fmt::Display for CheckStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStage::Preparing => write!(f, "preparing"),
            CheckStage::WildcardCheck => write!(f, "wildcard-check"),
            CheckStage::PrimaryQuery => write!(f, "primary-query"),
            CheckStage::FallbackQuery => write!(f, "fallback-query"),
            CheckStage::Analyzing => write!(f, "analyzing"),
            CheckStage::Finalizing => write!(f, "finalizing"),
            CheckStage::Complete => write!(f, "complete"),
        }
    }
}

/// Live progress of a running batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressState {
    pub percentage: f64,
    pub stage: CheckStage,
    pub domains_processed: usize,
    pub total_domains: usize,
    pub current_domain: String,
    pub detailed_message: String,
}

/// Configuration for domain checking.
///
/// The thresholds are empirically chosen, not derived from a model;
/// they are fields rather than constants so callers can tune them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub parked_confidence_threshold: u8,
    pub premium_confidence_threshold: u8,
    pub cache_ttl_secs: u64,
    pub concurrent_checks: usize,
    pub connection_pool_size: usize,
    pub user_agent: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            max_retries: 1,
            retry_backoff_ms: 200,
            parked_confidence_threshold: 40,
            premium_confidence_threshold: 70,
            cache_ttl_secs: 300,
            concurrent_checks: 8,
            connection_pool_size: 10,
            user_agent: format!("domain-scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Performance counters shared across concurrent checks
#[derive(Debug, Default)]
pub struct CheckMetrics {
    domains_checked: AtomicU64,
    queries_sent: AtomicU64,
    retries_attempted: AtomicU64,
    cache_hits: AtomicU64,
    errors_encountered: AtomicU64,
    total_check_time_ms: AtomicU64,
}

impl CheckMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_domains_checked(&self) {
        self.domains_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_sent(&self) {
        self.queries_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retries(&self) {
        self.retries_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_check_time(&self, ms: u64) {
        self.total_check_time_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        let domains_checked = self.domains_checked.load(Ordering::Relaxed);
        let total_ms = self.total_check_time_ms.load(Ordering::Relaxed);
        MetricsSnapshot {
            domains_checked,
            queries_sent: self.queries_sent.load(Ordering::Relaxed),
            retries_attempted: self.retries_attempted.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            errors_encountered: self.errors_encountered.load(Ordering::Relaxed),
            avg_check_time_ms: total_ms / domains_checked.max(1),
        }
    }
}

/// Point-in-time view of [`CheckMetrics`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub domains_checked: u64,
    pub queries_sent: u64,
    pub retries_attempted: u64,
    pub cache_hits: u64,
    pub errors_encountered: u64,
    pub avg_check_time_ms: u64,
}
