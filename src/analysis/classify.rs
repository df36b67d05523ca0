//! Classification engine: folds provider outcomes into a domain status.
//!
//! The decision logic is an ordered rule table evaluated top-down with
//! early exit. Each rule is a named function over the same tally, so
//! the priority order stays auditable in one place and every rule can
//! be unit-tested on its own.

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analysis::parking_ns::parking_service_for;
use crate::analysis::patterns::PatternAnalyzer;
use crate::catalog::links::link_for;
use crate::error::ErrorCategory;
use crate::types::{
    CheckConfig, DnsResponse, DomainResult, DomainStatus, ProviderOutcome, RecordType,
    ResourceRecord,
};

/// Aggregated per-provider observations.
///
/// Counts are provider-level: a provider that answered NS and TXT both
/// with NXDOMAIN still contributes one to the NXDOMAIN count, keeping
/// every count comparable against the consensus threshold.
#[derive(Debug, Default)]
struct Tally {
    queried_providers: usize,
    responding_providers: usize,
    failed_providers: usize,
    nxdomain: usize,
    noerror_with_records: usize,
    noerror_empty: usize,
    noerror_any: usize,
    servfail: usize,
    other_dns_error: usize,
    existence_hint_errors: usize,
    parked_ns_count: usize,
    parked_txt_count: usize,
    premium_txt_count: usize,
    has_active_usage: bool,
    dnssec_validated: bool,
    error_categories: Vec<ErrorCategory>,
    first_error_message: Option<String>,
}

impl Tally {
    /// `max(1, ceil(respondingProviders / 2))`
    fn consensus_threshold(&self) -> usize {
        self.responding_providers.div_ceil(2).max(1)
    }

    fn has_strong_parking_signal(&self, wildcard: bool) -> bool {
        let threshold = self.consensus_threshold();
        self.parked_ns_count >= threshold
            || self.parked_txt_count >= threshold
            || (wildcard && (self.parked_ns_count > 0 || self.parked_txt_count > 0))
    }

    fn has_premium_txt_consensus(&self) -> bool {
        self.premium_txt_count > 0 && self.premium_txt_count >= self.consensus_threshold()
    }

    /// Most frequent failure category; ties go to the category that
    /// says more about the target domain. REFUSED-style responses with
    /// no transport failures count as DNS-level errors.
    fn dominant_error_category(&self) -> Option<ErrorCategory> {
        const PRIORITY: &[ErrorCategory] = &[
            ErrorCategory::Timeout,
            ErrorCategory::Network,
            ErrorCategory::DnsError,
            ErrorCategory::Unknown,
        ];
        let mut best = None;
        let mut best_count = 0;
        for &category in PRIORITY {
            let count = self
                .error_categories
                .iter()
                .filter(|c| **c == category)
                .count();
            if count > best_count {
                best = Some(category);
                best_count = count;
            }
        }
        best.or(if self.other_dns_error > 0 {
            Some(ErrorCategory::DnsError)
        } else {
            None
        })
    }
}

fn build_tally(
    outcomes: &[ProviderOutcome],
    analyzer: &PatternAnalyzer,
    evidence: &mut Vec<String>,
) -> Tally {
    // Query log first, in fan-out order.
    for outcome in outcomes {
        match &outcome.outcome {
            Ok(response) => evidence.push(format!(
                "{}: {} query returned {} ({} answer records)",
                outcome.provider,
                outcome.record_type,
                response.status,
                response.answer.len()
            )),
            Err(error) => evidence.push(format!(
                "{}: {} query failed ({}: {})",
                outcome.provider, outcome.record_type, error.category, error.message
            )),
        }
    }

    let mut by_provider: BTreeMap<&str, Vec<&ProviderOutcome>> = BTreeMap::new();
    for outcome in outcomes {
        by_provider
            .entry(outcome.provider.as_str())
            .or_default()
            .push(outcome);
    }

    let mut tally = Tally {
        queried_providers: by_provider.len(),
        ..Tally::default()
    };

    for (provider, provider_outcomes) in &by_provider {
        let responses: Vec<&DnsResponse> =
            provider_outcomes.iter().filter_map(|o| o.response()).collect();

        if responses.is_empty() {
            tally.failed_providers += 1;
        } else {
            tally.responding_providers += 1;
        }

        if responses.iter().any(|r| r.is_nxdomain()) {
            tally.nxdomain += 1;
        }
        if responses.iter().any(|r| r.is_noerror()) {
            tally.noerror_any += 1;
        }
        if responses
            .iter()
            .any(|r| r.is_noerror() && r.has_answer_of(&[RecordType::Ns, RecordType::Soa]))
        {
            tally.noerror_with_records += 1;
        }
        if responses.iter().any(|r| r.is_noerror() && r.answer.is_empty()) {
            tally.noerror_empty += 1;
        }
        if responses.iter().any(|r| r.status.is_servfail()) {
            tally.servfail += 1;
        }
        if responses
            .iter()
            .any(|r| !r.is_noerror() && !r.is_nxdomain() && !r.status.is_servfail())
        {
            tally.other_dns_error += 1;
        }
        if responses.iter().any(|r| r.authenticated_data) {
            tally.dnssec_validated = true;
        }

        let mut provider_failed_with_hint = false;
        for outcome in provider_outcomes {
            if let Some(error) = outcome.error() {
                tally.error_categories.push(error.category);
                provider_failed_with_hint |= error.suggests_domain_exists;
                if tally.first_error_message.is_none() {
                    tally.first_error_message = Some(error.message.clone());
                }
            }
        }
        if provider_failed_with_hint {
            tally.existence_hint_errors += 1;
        }

        // Known parking nameservers.
        let mut parked_by_ns = false;
        for record in responses.iter().flat_map(|r| r.answers_of(RecordType::Ns)) {
            let host = record.normalized_host();
            if let Some(service) = parking_service_for(&host) {
                parked_by_ns = true;
                evidence.push(format!(
                    "{}: nameserver {} belongs to parking service {}",
                    provider, host, service
                ));
            }
        }
        if parked_by_ns {
            tally.parked_ns_count += 1;
        }

        // TXT parking/premium fingerprints.
        let txt_records: Vec<ResourceRecord> = responses
            .iter()
            .flat_map(|r| r.answer.iter())
            .filter(|rec| rec.record_type == RecordType::Txt)
            .cloned()
            .collect();
        if !txt_records.is_empty() {
            let signal = analyzer.analyze(&txt_records);
            if !signal.matched_patterns.is_empty() {
                let patterns: Vec<String> = signal.matched_patterns.iter().cloned().collect();
                evidence.push(format!(
                    "{}: TXT analysis confidence {} ({})",
                    provider,
                    signal.confidence,
                    patterns.join(", ")
                ));
            }
            if signal.is_parked {
                tally.parked_txt_count += 1;
            }
            if signal.is_premium {
                tally.premium_txt_count += 1;
            }
            if signal.has_active_usage_indicators {
                tally.has_active_usage = true;
            }
        }
    }

    tally
}

struct RuleCtx<'a> {
    tally: &'a Tally,
    wildcard: bool,
}

type RuleFn = fn(&RuleCtx) -> Option<(DomainStatus, String)>;

/// Priority-ordered decision table; first match wins.
const RULES: &[(&str, RuleFn)] = &[
    ("active-usage-override", rule_active_usage),
    ("confirming-records", rule_confirming_records),
    ("nxdomain", rule_nxdomain),
    ("premium-txt-consensus", rule_premium_consensus),
    ("existence-signals", rule_existence_signals),
    ("noerror-empty", rule_noerror_empty),
    ("all-errors", rule_all_errors),
];

/// Active verification tokens beat every parking/premium signal.
fn rule_active_usage(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    if ctx.tally.has_active_usage {
        Some((
            DomainStatus::Registered,
            "Active site-verification TXT records found; domain is registered and in use".to_string(),
        ))
    } else {
        None
    }
}

fn rule_confirming_records(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    if ctx.tally.noerror_with_records > 0 {
        Some((
            DomainStatus::Registered,
            format!(
                "{} provider(s) returned NOERROR with NS/SOA records",
                ctx.tally.noerror_with_records
            ),
        ))
    } else {
        None
    }
}

fn rule_nxdomain(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    let t = ctx.tally;
    if t.nxdomain == 0 || t.noerror_with_records > 0 || t.servfail > 0 {
        return None;
    }

    if !ctx.wildcard {
        // Full agreement means every queried provider answered and said
        // NXDOMAIN; failures demote the verdict to the covered branch.
        let all_agree = t.queried_providers > 0
            && t.responding_providers == t.queried_providers
            && t.nxdomain == t.responding_providers;
        let covered_with_errors =
            !all_agree && t.nxdomain + t.failed_providers >= t.queried_providers;
        if all_agree || covered_with_errors {
            if t.has_premium_txt_consensus() {
                return Some((
                    DomainStatus::Indeterminate,
                    "NXDOMAIN responses conflict with premium marketplace TXT consensus"
                        .to_string(),
                ));
            }
            let line = if all_agree {
                format!(
                    "All {} responding provider(s) agree NXDOMAIN with no wildcard detected",
                    t.responding_providers
                )
            } else {
                format!(
                    "{} NXDOMAIN response(s) plus {} provider failure(s) cover all queried providers (lower confidence)",
                    t.nxdomain, t.failed_providers
                )
            };
            return Some((DomainStatus::Available, line));
        }
        return Some((
            DomainStatus::Indeterminate,
            "Providers disagree on NXDOMAIN without confirming records".to_string(),
        ));
    }

    if t.has_strong_parking_signal(ctx.wildcard) || t.has_premium_txt_consensus() {
        return Some((
            DomainStatus::Registered,
            "NXDOMAIN under wildcard DNS with parking/premium signals; likely registered (low confidence)"
                .to_string(),
        ));
    }
    Some((
        DomainStatus::Indeterminate,
        "Wildcard DNS makes NXDOMAIN responses unreliable".to_string(),
    ))
}

fn rule_premium_consensus(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    let t = ctx.tally;
    if t.noerror_with_records == 0 && t.nxdomain == 0 && t.has_premium_txt_consensus() {
        Some((
            DomainStatus::Premium,
            format!(
                "{} provider(s) report premium marketplace TXT markers",
                t.premium_txt_count
            ),
        ))
    } else {
        None
    }
}

/// SERVFAIL and existence-hinting failures correlate with registered
/// domains. Consensus over failures needs at least one responder, so a
/// fully dark pool falls through to the error rule instead.
fn rule_existence_signals(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    let t = ctx.tally;
    let servfail = t.servfail > 0;
    let error_consensus = t.responding_providers > 0
        && t.existence_hint_errors >= t.consensus_threshold();
    let parking_only =
        t.has_strong_parking_signal(ctx.wildcard) && t.noerror_any == 0 && t.nxdomain == 0;

    if !(servfail || error_consensus || parking_only) {
        return None;
    }
    let reason = if servfail {
        format!(
            "{} SERVFAIL response(s); SERVFAIL correlates with registered but misconfigured domains",
            t.servfail
        )
    } else if error_consensus {
        format!(
            "{} provider failure(s) of existence-suggesting categories reached consensus",
            t.existence_hint_errors
        )
    } else {
        "Strong parking signals with no NOERROR or NXDOMAIN responses".to_string()
    };
    Some((DomainStatus::Registered, format!("{} (moderate confidence)", reason)))
}

fn rule_noerror_empty(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    if ctx.tally.noerror_empty > 0 {
        Some((
            DomainStatus::Indeterminate,
            "NOERROR responses with empty answer sections".to_string(),
        ))
    } else {
        None
    }
}

/// Nothing but failures and DNS-level refusals across the whole pool.
fn rule_all_errors(ctx: &RuleCtx) -> Option<(DomainStatus, String)> {
    let t = ctx.tally;
    if t.queried_providers > 0 && t.noerror_any == 0 && t.nxdomain == 0 && t.servfail == 0 {
        Some((
            DomainStatus::Error,
            "Every provider query ended in a network, timeout, or DNS error".to_string(),
        ))
    } else {
        None
    }
}

/// Fold provider outcomes, the wildcard verdict, and the wildcard-prone
/// TLD flag into the final [`DomainResult`].
///
/// Pure with respect to its inputs: identical outcomes and flags always
/// produce the same status, link, and evidence text.
pub fn classify(
    domain: &str,
    outcomes: &[ProviderOutcome],
    wildcard_detected: bool,
    wildcard_prone_tld: bool,
    mut evidence: Vec<String>,
    config: &CheckConfig,
) -> DomainResult {
    let analyzer = PatternAnalyzer::from_config(config);
    let tally = build_tally(outcomes, &analyzer, &mut evidence);

    if wildcard_prone_tld {
        evidence.push("TLD is known to default to catch-all DNS".to_string());
    }

    let ctx = RuleCtx {
        tally: &tally,
        wildcard: wildcard_detected,
    };

    let mut verdict: Option<(&str, DomainStatus, String)> = None;
    for (name, rule) in RULES {
        if let Some((status, line)) = rule(&ctx) {
            verdict = Some((name, status, line));
            break;
        }
    }
    let (rule_name, status, rule_line) = verdict.unwrap_or((
        "fallback",
        DomainStatus::Indeterminate,
        "No conclusive DNS signal".to_string(),
    ));
    evidence.push(rule_line);

    let (error_category, error_message) = if status == DomainStatus::Error {
        (
            tally.dominant_error_category(),
            Some(
                tally
                    .first_error_message
                    .clone()
                    .unwrap_or_else(|| "All provider queries failed".to_string()),
            ),
        )
    } else {
        (None, None)
    };

    debug!(
        domain = %domain,
        status = %status,
        rule = rule_name,
        wildcard = wildcard_detected,
        providers = tally.queried_providers,
        "Domain classified"
    );

    DomainResult {
        domain: domain.to_string(),
        status,
        error_category,
        error_message,
        link: link_for(status, domain),
        evidence,
        dnssec_validated: tally.dnssec_validated,
        wildcard_detected,
        is_parked_by_ns: tally.parked_ns_count > 0,
        is_parked_by_txt: tally.parked_txt_count > 0,
        checked_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifiedError;
    use crate::types::Rcode;

    fn record(rtype: RecordType, name: &str, data: &str) -> ResourceRecord {
        ResourceRecord {
            name: name.to_string(),
            record_type: rtype,
            ttl: 300,
            data: data.to_string(),
        }
    }

    fn response(status: Rcode, answer: Vec<ResourceRecord>) -> DnsResponse {
        DnsResponse {
            status,
            answer,
            ..DnsResponse::default()
        }
    }

    fn ok(provider: &str, rtype: RecordType, resp: DnsResponse) -> ProviderOutcome {
        ProviderOutcome::succeeded(provider, rtype, resp)
    }

    fn fail(provider: &str, rtype: RecordType, category: ErrorCategory) -> ProviderOutcome {
        ProviderOutcome::failed(
            provider,
            rtype,
            ClassifiedError {
                category,
                message: format!("simulated {} failure", category),
                suggests_domain_exists: category.suggests_domain_exists(),
            },
        )
    }

    fn classify_default(
        outcomes: &[ProviderOutcome],
        wildcard: bool,
        prone: bool,
    ) -> DomainResult {
        classify(
            "example.com",
            outcomes,
            wildcard,
            prone,
            Vec::new(),
            &CheckConfig::default(),
        )
    }

    #[test]
    fn classify_is_pure() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NxDomain, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::NxDomain, vec![])),
        ];
        let a = classify_default(&outcomes, false, false);
        let b = classify_default(&outcomes, false, false);
        assert_eq!(a.status, b.status);
        assert_eq!(a.link, b.link);
        assert_eq!(a.evidence, b.evidence);
    }

    #[test]
    fn unanimous_nxdomain_without_wildcard_is_available() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NxDomain, vec![]),
            ),
            ok(
                "cloudflare",
                RecordType::Txt,
                response(Rcode::NxDomain, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::NxDomain, vec![])),
            ok("google", RecordType::Txt, response(Rcode::NxDomain, vec![])),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Available);
        assert!(result.link.contains("namecheap.com"));
    }

    #[test]
    fn noerror_with_ns_records_is_registered_despite_parking_txt() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(
                    Rcode::NoError,
                    vec![record(RecordType::Ns, "example.com", "ns1.sedoparking.com.")],
                ),
            ),
            ok(
                "cloudflare",
                RecordType::Txt,
                response(
                    Rcode::NoError,
                    vec![
                        record(RecordType::Txt, "example.com", "\"v=spf1 -all\""),
                        record(RecordType::Txt, "example.com", "\"sedoparking\""),
                    ],
                ),
            ),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Registered);
        assert_eq!(result.link, "http://example.com");
        assert!(result.is_parked_by_ns);
        assert!(result.is_parked_by_txt);
    }

    #[test]
    fn active_usage_token_overrides_parking_nameservers() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(
                    Rcode::NxDomain,
                    vec![record(RecordType::Ns, "example.com", "ns1.parkingcrew.net.")],
                ),
            ),
            ok(
                "cloudflare",
                RecordType::Txt,
                response(
                    Rcode::NoError,
                    vec![record(
                        RecordType::Txt,
                        "example.com",
                        "\"google-site-verification=abc123\"",
                    )],
                ),
            ),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Registered);
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("site-verification")));
    }

    #[test]
    fn wildcard_with_parking_ns_is_low_confidence_registered() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(
                    Rcode::NxDomain,
                    vec![record(RecordType::Ns, "example.tk", "ns1.sedoparking.com.")],
                ),
            ),
            ok("google", RecordType::Ns, response(Rcode::NxDomain, vec![])),
        ];
        let result = classify_default(&outcomes, true, true);
        assert_eq!(result.status, DomainStatus::Registered);
        assert!(result.evidence.iter().any(|e| e.contains("low confidence")));
        assert!(result.wildcard_detected);
    }

    #[test]
    fn wildcard_without_signals_is_indeterminate() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NxDomain, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::NxDomain, vec![])),
        ];
        let result = classify_default(&outcomes, true, false);
        assert_eq!(result.status, DomainStatus::Indeterminate);
    }

    #[test]
    fn all_timeouts_classify_as_error_with_timeout_category() {
        let outcomes = vec![
            fail("cloudflare", RecordType::Ns, ErrorCategory::Timeout),
            fail("cloudflare", RecordType::Txt, ErrorCategory::Timeout),
            fail("cloudflare", RecordType::Soa, ErrorCategory::Timeout),
            fail("google", RecordType::Ns, ErrorCategory::Timeout),
            fail("google", RecordType::Txt, ErrorCategory::Timeout),
            fail("google", RecordType::Soa, ErrorCategory::Timeout),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Error);
        assert_eq!(result.error_category, Some(ErrorCategory::Timeout));
        assert!(result.error_message.is_some());
        assert!(result.link.contains("lookup.icann.org"));
    }

    #[test]
    fn servfail_suggests_registered() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::ServFail, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::NoError, vec![])),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Registered);
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("moderate confidence")));
    }

    #[test]
    fn premium_txt_consensus_without_records_is_premium() {
        let premium_txt = response(
            Rcode::NoError,
            vec![record(
                RecordType::Txt,
                "example.com",
                "\"premium-domain: contact broker\"",
            )],
        );
        let outcomes = vec![
            ok("cloudflare", RecordType::Ns, response(Rcode::NoError, vec![])),
            ok("cloudflare", RecordType::Txt, premium_txt.clone()),
            ok("google", RecordType::Ns, response(Rcode::NoError, vec![])),
            ok("google", RecordType::Txt, premium_txt),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Premium);
        assert!(result.link.contains("sedo.com"));
    }

    #[test]
    fn premium_consensus_downgrades_available_to_indeterminate() {
        let premium_txt = response(
            Rcode::NoError,
            vec![record(
                RecordType::Txt,
                "example.com",
                "\"premium_domain reserved\"",
            )],
        );
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NxDomain, vec![]),
            ),
            ok("cloudflare", RecordType::Txt, premium_txt.clone()),
            ok("google", RecordType::Ns, response(Rcode::NxDomain, vec![])),
            ok("google", RecordType::Txt, premium_txt),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Indeterminate);
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("premium marketplace TXT consensus")));
    }

    #[test]
    fn nxdomain_plus_total_failure_is_lower_confidence_available() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NxDomain, vec![]),
            ),
            fail("google", RecordType::Ns, ErrorCategory::Network),
            fail("google", RecordType::Txt, ErrorCategory::Network),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Available);
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("lower confidence")));
    }

    #[test]
    fn split_verdicts_are_indeterminate() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NxDomain, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::NoError, vec![])),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Indeterminate);
    }

    #[test]
    fn noerror_empty_answers_are_indeterminate() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::NoError, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::NoError, vec![])),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Indeterminate);
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("empty answer sections")));
    }

    #[test]
    fn dnssec_flag_is_carried_through() {
        let mut resp = response(
            Rcode::NoError,
            vec![record(RecordType::Ns, "example.com", "a.iana-servers.net.")],
        );
        resp.authenticated_data = true;
        let outcomes = vec![ok("cloudflare", RecordType::Ns, resp)];
        let result = classify_default(&outcomes, false, false);
        assert!(result.dnssec_validated);
        assert_eq!(result.status, DomainStatus::Registered);
    }

    #[test]
    fn refused_everywhere_is_a_dns_level_error() {
        let outcomes = vec![
            ok(
                "cloudflare",
                RecordType::Ns,
                response(Rcode::Refused, vec![]),
            ),
            ok("google", RecordType::Ns, response(Rcode::Refused, vec![])),
        ];
        let result = classify_default(&outcomes, false, false);
        assert_eq!(result.status, DomainStatus::Error);
        assert_eq!(result.error_category, Some(ErrorCategory::DnsError));
    }

    #[test]
    fn wildcard_prone_tld_adds_evidence_only() {
        let outcomes = vec![ok(
            "cloudflare",
            RecordType::Ns,
            response(
                Rcode::NoError,
                vec![record(RecordType::Ns, "example.tk", "ns1.freenom.com.")],
            ),
        )];
        let result = classify(
            "example.tk",
            &outcomes,
            false,
            true,
            Vec::new(),
            &CheckConfig::default(),
        );
        assert_eq!(result.status, DomainStatus::Registered);
        assert!(result
            .evidence
            .iter()
            .any(|e| e.contains("catch-all DNS")));
    }

    #[test]
    fn consensus_threshold_math() {
        let mut tally = Tally::default();
        assert_eq!(tally.consensus_threshold(), 1);
        tally.responding_providers = 1;
        assert_eq!(tally.consensus_threshold(), 1);
        tally.responding_providers = 2;
        assert_eq!(tally.consensus_threshold(), 1);
        tally.responding_providers = 3;
        assert_eq!(tally.consensus_threshold(), 2);
        tally.responding_providers = 4;
        assert_eq!(tally.consensus_threshold(), 2);
    }

    #[test]
    fn dominant_error_category_prefers_frequency_then_priority() {
        let mut tally = Tally::default();
        tally.error_categories = vec![
            ErrorCategory::Network,
            ErrorCategory::Network,
            ErrorCategory::Timeout,
        ];
        assert_eq!(
            tally.dominant_error_category(),
            Some(ErrorCategory::Network)
        );

        tally.error_categories = vec![ErrorCategory::Network, ErrorCategory::Timeout];
        assert_eq!(
            tally.dominant_error_category(),
            Some(ErrorCategory::Timeout)
        );

        tally.error_categories.clear();
        assert_eq!(tally.dominant_error_category(), None);
    }
}
