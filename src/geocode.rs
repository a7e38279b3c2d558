//! External geocoding fallback for the map search box.
//!
//! When a search query matches no local village, the map offers a
//! best-effort external marker instead. The actual lookup service (an HTTP
//! geocoder in production) stays behind the [`Geocoder`] trait; this module
//! owns only the suppression logic around it.

use crate::types::Village;
use std::collections::HashMap;

/// Best-effort place-name resolver.
///
/// Implementations return at most one coordinate pair and swallow their own
/// failures: a network error and "no result" are both `None`.
pub trait Geocoder {
    fn lookup(&self, query: &str) -> Option<[f64; 2]>;
}

/// Resolve an external marker for a query.
///
/// Returns `None` for a blank query, or when the trimmed query equals a
/// local village name case-insensitively (the local marker already covers
/// it). Otherwise delegates to the geocoder.
pub fn external_marker(
    villages: &[Village],
    query: &str,
    geocoder: &dyn Geocoder,
) -> Option<[f64; 2]> {
    let needle = query.trim();
    if needle.is_empty() {
        return None;
    }

    let lowered = needle.to_lowercase();
    if villages.iter().any(|v| v.name.to_lowercase() == lowered) {
        return None;
    }

    geocoder.lookup(needle)
}

/// Table-backed geocoder for tests and offline use.
#[derive(Default)]
pub struct FixedGeocoder {
    entries: HashMap<String, [f64; 2]>,
}

impl FixedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, place: &str, coords: [f64; 2]) {
        self.entries.insert(place.trim().to_lowercase(), coords);
    }
}

impl Geocoder for FixedGeocoder {
    fn lookup(&self, query: &str) -> Option<[f64; 2]> {
        self.entries.get(&query.trim().to_lowercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geocoder() -> FixedGeocoder {
        let mut g = FixedGeocoder::new();
        g.insert("Bhopal", [23.2599, 77.4126]);
        g
    }

    #[test]
    fn test_blank_query_yields_nothing() {
        let g = geocoder();
        assert_eq!(external_marker(&[], "", &g), None);
        assert_eq!(external_marker(&[], "   ", &g), None);
    }

    #[test]
    fn test_local_match_suppresses_external_lookup() {
        let mut g = geocoder();
        g.insert("Alpha", [10.0, 20.0]);
        let villages = vec![Village::new("Alpha", [1.0, 2.0])];

        assert_eq!(external_marker(&villages, "alpha", &g), None);
        assert_eq!(external_marker(&villages, " ALPHA ", &g), None);
    }

    #[test]
    fn test_unmatched_query_resolves_externally() {
        let g = geocoder();
        let villages = vec![Village::new("Alpha", [1.0, 2.0])];

        assert_eq!(
            external_marker(&villages, "Bhopal", &g),
            Some([23.2599, 77.4126])
        );
    }

    #[test]
    fn test_unresolvable_query_is_none() {
        let g = geocoder();
        assert_eq!(external_marker(&[], "nowhere", &g), None);
    }
}
