//! Signal analysis: TXT fingerprints, parking nameservers, and the
//! classification rules that fold them into a domain status

pub mod classify;
pub mod parking_ns;
pub mod patterns;

// Re-export main functionality
pub use classify::classify;
pub use parking_ns::{is_parking_nameserver, parking_service_for, PARKING_NS_SUFFIXES};
pub use patterns::{PatternAnalyzer, SignalCategory, TxtPattern, TXT_PATTERNS};
