//! TXT record pattern analysis.
//!
//! Parked and for-sale domains leak recognizable TXT fingerprints:
//! lockdown SPF policies, revoked DKIM keys, registrar control-validation
//! tokens. Genuinely used domains leak the opposite kind: third-party
//! site-verification tokens. Each family lives in one declarative table
//! entry so adding a pattern never touches the scoring loop.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::types::{CheckConfig, ParkingSignal, RecordType, ResourceRecord};

/// Signal family a TXT pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCategory {
    Spf,
    Dkim,
    Dmarc,
    RegistrarParking,
    Premium,
    ForSale,
    ActiveUsage,
}

/// One entry in the declarative TXT pattern table
pub struct TxtPattern {
    pub category: SignalCategory,
    pub description: &'static str,
    /// Confidence added when this entry matches (once per analysis)
    pub weight: u8,
    /// Required substring of the record owner name, if any
    pub name_marker: Option<&'static str>,
    pub pattern: Lazy<Regex>,
}

impl TxtPattern {
    fn matches(&self, record: &ResourceRecord) -> bool {
        if let Some(marker) = self.name_marker {
            if !record.name.to_lowercase().contains(marker) {
                return false;
            }
        }
        self.pattern.is_match(record.unquoted_data().trim())
    }
}

/// Confidence added when a TXT record's owner name is itself a wildcard
const WILDCARD_OWNER_WEIGHT: u8 = 15;

pub static TXT_PATTERNS: &[TxtPattern] = &[
    TxtPattern {
        category: SignalCategory::Spf,
        description: "restrictive SPF policy (-all)",
        weight: 25,
        name_marker: None,
        pattern: Lazy::new(|| Regex::new(r"(?i)^v=spf1\b.*-all\s*$").unwrap()),
    },
    TxtPattern {
        category: SignalCategory::Dkim,
        description: "revoked DKIM key (empty p=)",
        weight: 20,
        name_marker: Some("_domainkey"),
        pattern: Lazy::new(|| Regex::new(r"(?i)v=dkim1.*\bp=\s*(;.*)?$").unwrap()),
    },
    TxtPattern {
        category: SignalCategory::Dmarc,
        description: "enforcing DMARC policy",
        weight: 15,
        name_marker: Some("_dmarc"),
        pattern: Lazy::new(|| Regex::new(r"(?i)v=dmarc1.*\bp=(reject|quarantine)").unwrap()),
    },
    TxtPattern {
        category: SignalCategory::RegistrarParking,
        description: "registrar parking marker",
        weight: 30,
        name_marker: None,
        pattern: Lazy::new(|| {
            Regex::new(r"(?i)(parkingcrew|sedoparking|domain_control_validation|domain[-_]?parking)")
                .unwrap()
        }),
    },
    TxtPattern {
        category: SignalCategory::Premium,
        description: "premium domain marker",
        weight: 0,
        name_marker: None,
        pattern: Lazy::new(|| {
            Regex::new(r"(?i)(premium[-_]?domain|reserved?[-_]?domain)").unwrap()
        }),
    },
    TxtPattern {
        category: SignalCategory::ForSale,
        description: "for-sale/broker marker",
        weight: 0,
        name_marker: None,
        pattern: Lazy::new(|| {
            Regex::new(r"(?i)(domain[-_]?for[-_]?sale|domainbroker|buy\s+this\s+domain|make\s+an\s+offer)")
                .unwrap()
        }),
    },
    TxtPattern {
        category: SignalCategory::ActiveUsage,
        description: "third-party site verification",
        weight: 0,
        name_marker: None,
        pattern: Lazy::new(|| {
            Regex::new(
                r"(?i)(google-site-verification=|msvalidate\.01|\bms=ms\d+|facebook-domain-verification=|apple-domain-verification=|docusign=|stripe-verification=)",
            )
            .unwrap()
        }),
    },
];

/// Scores TXT records against the pattern table. Pure: no I/O, no
/// shared state, deterministic output for identical input.
pub struct PatternAnalyzer {
    parked_confidence_threshold: u8,
    premium_confidence_threshold: u8,
}

impl PatternAnalyzer {
    pub fn new(parked_confidence_threshold: u8, premium_confidence_threshold: u8) -> Self {
        Self {
            parked_confidence_threshold,
            premium_confidence_threshold,
        }
    }

    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new(
            config.parked_confidence_threshold,
            config.premium_confidence_threshold,
        )
    }

    /// Analyze one provider's TXT records into a parking/premium signal
    pub fn analyze(&self, records: &[ResourceRecord]) -> ParkingSignal {
        let txt: Vec<&ResourceRecord> = records
            .iter()
            .filter(|r| r.record_type == RecordType::Txt)
            .collect();

        let mut confidence: u32 = 0;
        let mut matched_patterns = BTreeSet::new();
        let mut premium_marker = false;
        let mut for_sale_marker = false;
        let mut has_active_usage_indicators = false;

        for entry in TXT_PATTERNS {
            if txt.iter().any(|record| entry.matches(record)) {
                confidence += u32::from(entry.weight);
                matched_patterns.insert(entry.description.to_string());
                match entry.category {
                    SignalCategory::Premium => premium_marker = true,
                    SignalCategory::ForSale => for_sale_marker = true,
                    SignalCategory::ActiveUsage => has_active_usage_indicators = true,
                    _ => {}
                }
            }
        }

        if txt.iter().any(|record| record.name.starts_with("*.")) {
            confidence += u32::from(WILDCARD_OWNER_WEIGHT);
            matched_patterns.insert("wildcard TXT owner name".to_string());
        }

        let confidence = confidence.min(100) as u8;
        let is_parked = confidence >= self.parked_confidence_threshold;
        let is_premium = premium_marker
            || (is_parked && confidence >= self.premium_confidence_threshold && for_sale_marker);

        ParkingSignal {
            is_parked,
            is_premium,
            confidence,
            matched_patterns,
            has_active_usage_indicators,
        }
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::from_config(&CheckConfig::default())
    }
}
