//! Status-dependent outgoing links.
//!
//! We intentionally keep this a small, static mapping (convention over
//! configuration).

use crate::types::DomainStatus;

/// Registrar search URL for an available domain, routed by TLD
pub fn registrar_search_url(domain: &str) -> String {
    match tld_of(domain) {
        "io" | "ai" | "dev" | "app" | "sh" => {
            format!("https://porkbun.com/checkout/search?q={domain}")
        }
        _ => format!("https://www.namecheap.com/domains/registration/results/?domain={domain}"),
    }
}

/// Marketplace URL for a premium/reserved domain
pub fn marketplace_url(domain: &str) -> String {
    match tld_of(domain) {
        "io" | "ai" => format!("https://dan.com/buy-domain/{domain}"),
        _ => format!("https://sedo.com/search/?keyword={domain}"),
    }
}

/// Neutral lookup for indeterminate or failed checks
pub fn neutral_lookup_url(domain: &str) -> String {
    format!("https://lookup.icann.org/en/lookup?name={domain}")
}

/// Derive the outgoing link for a classified result
pub fn link_for(status: DomainStatus, domain: &str) -> String {
    match status {
        DomainStatus::Registered => format!("http://{domain}"),
        DomainStatus::Available => registrar_search_url(domain),
        DomainStatus::Premium => marketplace_url(domain),
        DomainStatus::Indeterminate | DomainStatus::Error => neutral_lookup_url(domain),
    }
}

fn tld_of(domain: &str) -> &str {
    domain
        .trim_end_matches('.')
        .rsplit('.')
        .next()
        .unwrap_or(domain)
}
