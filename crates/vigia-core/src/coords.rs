//! Coordinate extraction from stored map links, and marker de-collision.
//!
//! Records persist their location as a Google Maps link
//! (`https://www.google.com/maps?q=<lat>,<lng>`) in the `maps_link`
//! column. Reading the table back recovers the pair with a regular
//! expression; a link that does not match yields *absent* coordinates,
//! never zeroes, so the record drops out of map rendering but stays in
//! tabular exports.
//!
//! When many records share (near-)identical coordinates their markers
//! would stack. Each rendered marker is therefore offset by a small
//! deterministic jitter derived from the record's sequential index:
//! re-rendering the same dataset produces the same picture.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Total jitter span in degrees; offsets fall in `±JITTER_MAGNITUDE / 2`.
///
/// About nine meters of latitude, enough to separate stacked markers
/// without visibly moving a point off its block.
pub const JITTER_MAGNITUDE: f64 = 0.00008;

static MAPS_LINK: OnceLock<Regex> = OnceLock::new();

fn maps_link_pattern() -> &'static Regex {
    MAPS_LINK.get_or_init(|| {
        Regex::new(r"https?://.*maps\?q=(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)")
            .expect("maps link pattern is valid")
    })
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from a latitude/longitude pair.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format the point as the stored Google Maps link.
    pub fn maps_link(&self) -> String {
        format!("https://www.google.com/maps?q={},{}", self.lat, self.lng)
    }

    /// The point displaced by the deterministic jitter for `index`.
    pub fn jittered(&self, index: u64) -> GeoPoint {
        let (dlat, dlng) = jitter_pair(index, JITTER_MAGNITUDE);
        GeoPoint::new(self.lat + dlat, self.lng + dlng)
    }
}

/// Extract `(lat, lng)` from any string containing a `maps?q=` link.
///
/// Returns `None` when no link is present or the query is malformed;
/// callers treat that as "coordinates omitted", not as the origin.
pub fn extract_coords(text: &str) -> Option<(f64, f64)> {
    let caps = maps_link_pattern().captures(text)?;
    let lat = caps.get(1)?.as_str().parse().ok()?;
    let lng = caps.get(2)?.as_str().parse().ok()?;
    Some((lat, lng))
}

/// Deterministic lat/lng jitter offsets for a record index.
///
/// Both offsets lie in `(-magnitude / 2, magnitude / 2)` and are a pure
/// function of `index`, so repeated renders of the same dataset place
/// every marker identically.
pub fn jitter_pair(index: u64, magnitude: f64) -> (f64, f64) {
    let mut state = index;
    let a = next_unit(&mut state);
    let b = next_unit(&mut state);
    ((a - 0.5) * magnitude, (b - 0.5) * magnitude)
}

// splitmix64 step; a full-period mix of the counter into a unit float.
fn next_unit(state: &mut u64) -> f64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------------
    // extract_coords
    // ------------------------------------------------------------------------

    #[test]
    fn test_extract_plain_link() {
        let link = "https://www.google.com/maps?q=9.93,-84.08";
        assert_eq!(extract_coords(link), Some((9.93, -84.08)));
    }

    #[test]
    fn test_extract_link_embedded_in_text() {
        let cell = "ver https://www.google.com/maps?q=9.93,-84.08 (campo)";
        assert_eq!(extract_coords(cell), Some((9.93, -84.08)));
    }

    #[test]
    fn test_extract_http_scheme() {
        let link = "http://maps.google.com/maps?q=10.0,-83.5";
        assert_eq!(extract_coords(link), Some((10.0, -83.5)));
    }

    #[test]
    fn test_extract_integer_coordinates() {
        let link = "https://www.google.com/maps?q=10,-84";
        assert_eq!(extract_coords(link), Some((10.0, -84.0)));
    }

    #[test]
    fn test_extract_no_match_is_absent() {
        assert_eq!(extract_coords(""), None);
        assert_eq!(extract_coords("San José centro"), None);
        assert_eq!(extract_coords("https://www.google.com/maps"), None);
    }

    #[test]
    fn test_extract_malformed_query_is_absent() {
        assert_eq!(extract_coords("https://g.co/maps?q=lat,lng"), None);
    }

    #[test]
    fn test_roundtrip_through_maps_link() {
        let point = GeoPoint::new(9.748917, -83.753428);
        assert_eq!(
            extract_coords(&point.maps_link()),
            Some((9.748917, -83.753428))
        );
    }

    // ------------------------------------------------------------------------
    // jitter
    // ------------------------------------------------------------------------

    #[test]
    fn test_jitter_is_deterministic() {
        for index in [0u64, 1, 7, 1_000_003] {
            assert_eq!(
                jitter_pair(index, JITTER_MAGNITUDE),
                jitter_pair(index, JITTER_MAGNITUDE)
            );
        }
    }

    #[test]
    fn test_jitter_is_bounded() {
        let half = JITTER_MAGNITUDE / 2.0;
        for index in 0..10_000u64 {
            let (dlat, dlng) = jitter_pair(index, JITTER_MAGNITUDE);
            assert!(dlat.abs() < half, "lat offset {dlat} out of bounds");
            assert!(dlng.abs() < half, "lng offset {dlng} out of bounds");
        }
    }

    #[test]
    fn test_adjacent_indices_differ() {
        let (a_lat, a_lng) = jitter_pair(41, JITTER_MAGNITUDE);
        let (b_lat, b_lng) = jitter_pair(42, JITTER_MAGNITUDE);
        assert!(a_lat != b_lat || a_lng != b_lng);
    }

    #[test]
    fn test_jittered_point_stays_close() {
        let base = GeoPoint::new(9.93, -84.08);
        let moved = base.jittered(12);
        assert!((moved.lat - base.lat).abs() < JITTER_MAGNITUDE);
        assert!((moved.lng - base.lng).abs() < JITTER_MAGNITUDE);
    }

    proptest! {
        #[test]
        fn prop_extract_finds_query_anywhere(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let text = format!("{prefix}https://www.google.com/maps?q=9.93,-84.08{suffix}");
            prop_assert_eq!(extract_coords(&text), Some((9.93, -84.08)));
        }

        #[test]
        fn prop_jitter_bounded_for_any_index(index in any::<u64>()) {
            let (dlat, dlng) = jitter_pair(index, JITTER_MAGNITUDE);
            prop_assert!(dlat.abs() <= JITTER_MAGNITUDE / 2.0);
            prop_assert!(dlng.abs() <= JITTER_MAGNITUDE / 2.0);
        }
    }
}
