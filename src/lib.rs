//! Domain Scout - DNS-over-HTTPS domain status inference
//!
//! Checks whether domains look available, registered, parked, or listed
//! on premium marketplaces by cross-referencing DoH answers from public
//! resolvers, without any WHOIS or RDAP traffic.

pub mod analysis;
pub mod catalog;
pub mod check;
pub mod dns;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ClassifiedError, DomainScoutError, ErrorCategory, Result};
pub use types::{
    CheckConfig, CheckMetrics, CheckStage, DnsQuestion, DnsResponse, DomainResult, DomainStatus,
    GroupedResults, MetricsSnapshot, ProgressState, ProviderOutcome, Rcode, RecordType,
};

// Re-export main functionality
pub use check::{BatchCoordinator, CancelHandle, DomainChecker, ResultCache};
pub use dns::{DnsTransport, DohClient, Provider, ProviderRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
