//! Static TLD catalogs and link routing.
//!
//! Read-only data consumed by the engine and the UI layer; nothing in
//! here is computed or fetched.

pub mod links;

// Re-export main functionality
pub use links::{link_for, marketplace_url, neutral_lookup_url, registrar_search_url};

/// TLDs whose registries hand out catch-all DNS by default (the
/// free-registration zones). Treated as extra evidence, never as a
/// substitute for the live wildcard probe.
pub const WILDCARD_PRONE_TLDS: &[&str] = &["tk", "ml", "ga", "cf", "gq", "ws"];

/// Whether a domain's TLD is known to default to wildcard DNS
pub fn is_wildcard_prone_tld(domain: &str) -> bool {
    match domain.trim_end_matches('.').rsplit('.').next() {
        Some(tld) => {
            let tld = tld.to_lowercase();
            WILDCARD_PRONE_TLDS.contains(&tld.as_str())
        }
        None => false,
    }
}

/// Common TLD catalogs offered to the caller (leading dot included,
/// matching the form input convention)
pub const POPULAR_TLDS: &[&str] = &[
    ".com", ".net", ".org", ".io", ".ai", ".co", ".me", ".app", ".dev", ".xyz",
];

pub const COUNTRY_TLDS: &[&str] = &[
    ".us", ".uk", ".de", ".fr", ".ca", ".au", ".jp", ".br", ".in", ".nl",
];

pub const NICHE_TLDS: &[&str] = &[
    ".tech", ".store", ".online", ".site", ".studio", ".agency", ".design", ".page",
];

/// Get a TLD catalog by name
pub fn get_tld_catalog(name: &str) -> Option<Vec<String>> {
    match name.to_lowercase().as_str() {
        "popular" => Some(POPULAR_TLDS.iter().map(|s| s.to_string()).collect()),
        "country" => Some(COUNTRY_TLDS.iter().map(|s| s.to_string()).collect()),
        "niche" => Some(NICHE_TLDS.iter().map(|s| s.to_string()).collect()),
        _ => None,
    }
}

/// Get all available catalog names
pub fn get_tld_catalog_names() -> Vec<&'static str> {
    vec!["popular", "country", "niche"]
}
