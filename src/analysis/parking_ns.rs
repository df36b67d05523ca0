//! Known parking-service nameservers.
//!
//! Matching is by hostname suffix, case-insensitive, with any trailing
//! dot stripped first, so `NS1.SedoParking.com.` hits `sedoparking.com`.

/// Nameserver suffixes operated by domain parking services
pub const PARKING_NS_SUFFIXES: &[&str] = &[
    "sedoparking.com",
    "parkingcrew.net",
    "bodis.com",
    "above.com",
    "cashparking.com",
    "afternic.com",
    "uniregistry.com",
    "parklogic.com",
    "smartname.com",
];

/// The parking service a nameserver belongs to, if any
pub fn parking_service_for(host: &str) -> Option<&'static str> {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    PARKING_NS_SUFFIXES
        .iter()
        .find(|suffix| host == **suffix || host.ends_with(&format!(".{suffix}")))
        .copied()
}

/// Whether a nameserver hostname belongs to a known parking service
pub fn is_parking_nameserver(host: &str) -> bool {
    parking_service_for(host).is_some()
}
