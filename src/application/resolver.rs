//! Resolver - Main application use case
//!
//! Turns an IP string into a tagged lookup outcome: validates the input,
//! queries the database handle, and normalizes the raw record. This is the
//! primary interface for the inbound adapter.

use crate::domain::entities::{LocationRecord, LookupOutcome};
use crate::domain::ports::{GeoDatabase, QueryError};
use std::net::IpAddr;
use std::sync::Arc;

/// IP resolution service.
///
/// Holds the shared database handle, or `None` when the database could not
/// be loaded at startup. The handle is never replaced or reloaded while the
/// process runs, so `resolve` is a pure function over immutable data.
pub struct Resolver {
    db: Option<Arc<dyn GeoDatabase>>,
}

impl Resolver {
    /// Create a new resolver.
    ///
    /// Pass `None` when the database failed to load; every resolution then
    /// reports `Unavailable` until the process is restarted.
    pub fn new(db: Option<Arc<dyn GeoDatabase>>) -> Self {
        Self { db }
    }

    /// Resolve a single IP string to a lookup outcome.
    ///
    /// Never panics, for any input string:
    /// 1. Missing database -> `Unavailable`, without attempting to parse
    /// 2. Unparseable input -> `Malformed` with a detail message
    /// 3. Query miss -> `NotFound`, query failure -> `Malformed`
    /// 4. Otherwise the raw record is normalized into a `LocationRecord`
    pub fn resolve(&self, ip: &str) -> LookupOutcome {
        let Some(db) = &self.db else {
            return LookupOutcome::Unavailable { ip: ip.to_string() };
        };

        let addr: IpAddr = match ip.parse() {
            Ok(addr) => addr,
            Err(_) => {
                return LookupOutcome::Malformed {
                    ip: ip.to_string(),
                    detail: format!("{ip} does not appear to be a valid IP address"),
                }
            }
        };

        match db.query(addr) {
            Ok(record) => {
                tracing::debug!("resolved {} -> {:?}", ip, record.iso_code);
                LookupOutcome::Resolved(LocationRecord::from_record(ip, record))
            }
            Err(QueryError::AddressNotFound) => LookupOutcome::NotFound { ip: ip.to_string() },
            Err(QueryError::Lookup(detail)) => LookupOutcome::Malformed {
                ip: ip.to_string(),
                detail,
            },
        }
    }

    /// Resolve a batch of IP strings independently.
    ///
    /// The output has exactly one outcome per input, in input order -
    /// duplicates and invalid entries are resolved like any other element,
    /// never deduplicated or skipped.
    pub fn resolve_batch(&self, ips: &[String]) -> Vec<LookupOutcome> {
        ips.iter().map(|ip| self.resolve(ip)).collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::entities::GeoRecord;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;

    // ===== Mock Implementations =====

    struct MockGeoDatabase {
        records: HashMap<IpAddr, GeoRecord>,
    }

    impl MockGeoDatabase {
        fn with_google_dns() -> Self {
            let mut records = HashMap::new();
            records.insert(
                IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
                GeoRecord {
                    city: Some("Mountain View".to_string()),
                    subdivisions: vec!["California".to_string()],
                    country: Some("United States".to_string()),
                    iso_code: Some("US".to_string()),
                    latitude: Some(37.386),
                    longitude: Some(-122.0838),
                    time_zone: Some("America/Los_Angeles".to_string()),
                    accuracy_radius: Some(1000),
                },
            );
            Self { records }
        }
    }

    impl GeoDatabase for MockGeoDatabase {
        fn query(&self, ip: IpAddr) -> Result<GeoRecord, QueryError> {
            self.records
                .get(&ip)
                .cloned()
                .ok_or(QueryError::AddressNotFound)
        }
    }

    struct BrokenGeoDatabase;

    impl GeoDatabase for BrokenGeoDatabase {
        fn query(&self, _ip: IpAddr) -> Result<GeoRecord, QueryError> {
            Err(QueryError::Lookup("corrupt search tree".to_string()))
        }
    }

    fn resolver() -> Resolver {
        Resolver::new(Some(Arc::new(MockGeoDatabase::with_google_dns())))
    }

    // ===== Tests =====

    #[test]
    fn test_resolve_known_ip() {
        let outcome = resolver().resolve("8.8.8.8");
        match outcome {
            LookupOutcome::Resolved(record) => {
                assert_eq!(record.ip, "8.8.8.8");
                assert_eq!(record.iso_code, "US");
                assert_eq!(record.region, "California");
            }
            other => panic!("expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unassigned_ip_is_not_found() {
        let outcome = resolver().resolve("203.0.113.1");
        assert_eq!(
            outcome,
            LookupOutcome::NotFound {
                ip: "203.0.113.1".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_malformed_input_never_panics() {
        let r = resolver();
        for input in ["not-an-ip", "", "256.256.256.256", "8.8.8", "::gg"] {
            match r.resolve(input) {
                LookupOutcome::Malformed { ip, detail } => {
                    assert_eq!(ip, input);
                    assert!(!detail.is_empty());
                }
                other => panic!("expected Malformed for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_resolve_lookup_failure_is_malformed_with_detail() {
        let r = Resolver::new(Some(Arc::new(BrokenGeoDatabase)));
        assert_eq!(
            r.resolve("8.8.8.8"),
            LookupOutcome::Malformed {
                ip: "8.8.8.8".to_string(),
                detail: "corrupt search tree".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_without_database_is_unavailable() {
        let r = Resolver::new(None);
        // Even malformed input short-circuits before parsing
        for input in ["8.8.8.8", "not-an-ip", ""] {
            assert_eq!(
                r.resolve(input),
                LookupOutcome::Unavailable {
                    ip: input.to_string()
                }
            );
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let r = resolver();
        assert_eq!(r.resolve("8.8.8.8"), r.resolve("8.8.8.8"));
        assert_eq!(r.resolve("bogus"), r.resolve("bogus"));
    }

    #[test]
    fn test_resolve_batch_preserves_length_and_order() {
        let inputs: Vec<String> = [
            "8.8.8.8",
            "not-an-ip",
            "203.0.113.1",
            "8.8.8.8", // duplicate, must not be deduplicated
            "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let outcomes = resolver().resolve_batch(&inputs);

        assert_eq!(outcomes.len(), inputs.len());
        for (input, outcome) in inputs.iter().zip(&outcomes) {
            assert_eq!(outcome.ip(), input);
        }
        assert!(matches!(outcomes[0], LookupOutcome::Resolved(_)));
        assert!(matches!(outcomes[1], LookupOutcome::Malformed { .. }));
        assert!(matches!(outcomes[2], LookupOutcome::NotFound { .. }));
        assert!(matches!(outcomes[3], LookupOutcome::Resolved(_)));
        assert!(matches!(outcomes[4], LookupOutcome::Malformed { .. }));
    }

    #[test]
    fn test_resolve_batch_empty() {
        assert!(resolver().resolve_batch(&[]).is_empty());
    }
}
