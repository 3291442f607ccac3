//! Facility ranking: filter, measure, sort, truncate, flag nearest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use aidline_core::{Coordinate, FacilityRecord};

use crate::geomath::{format_distance, format_eta, haversine_km, DEFAULT_SPEED_KMH};

/// Default number of facilities kept after sorting.
pub const DEFAULT_MAX_RESULTS: usize = 5;

// =============================================================================
// Raw provider records
// =============================================================================

/// Precomputed centroid of an area geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One point-of-interest element as returned by the provider.
///
/// Point geometries carry `lat`/`lon`; areas carry a `center`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFacility {
    /// Geometry kind (`node`, `way`, `relation`).
    #[serde(rename = "type", default)]
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl RawFacility {
    /// Point geometry first, then the area centroid. Zero is a valid degree.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let (lat, lon) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(c)) => (c.lat, c.lon),
            _ => return None,
        };
        if lat.is_finite() && lon.is_finite() {
            Some(Coordinate::new(lat, lon))
        } else {
            None
        }
    }

    /// Non-blank `name` tag.
    pub fn name(&self) -> Option<&str> {
        self.tag("name")
    }

    /// Stable identifier; the kind prefix keeps node and way ids apart.
    pub fn stable_id(&self) -> String {
        if self.kind.is_empty() {
            self.id.to_string()
        } else {
            format!("{}/{}", self.kind, self.id)
        }
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

// =============================================================================
// Ranking
// =============================================================================

/// Tunables for [`rank_facilities_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    pub max_results: usize,
    pub average_speed_kmh: f64,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            average_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// Rank raw records around `origin` with the default options.
pub fn rank_facilities(origin: Coordinate, raw: &[RawFacility]) -> Vec<FacilityRecord> {
    rank_facilities_with(origin, raw, &RankingOptions::default())
}

/// Rank raw records around `origin`.
///
/// Records without a name or a resolvable coordinate are dropped. The result
/// is sorted by non-decreasing distance, holds at most `max_results` entries,
/// and has `is_nearest` set on index 0 only.
pub fn rank_facilities_with(
    origin: Coordinate,
    raw: &[RawFacility],
    options: &RankingOptions,
) -> Vec<FacilityRecord> {
    let mut ranked: Vec<FacilityRecord> = raw
        .iter()
        .filter_map(|r| {
            let name = r.name()?;
            let coordinate = r.coordinate()?;
            Some(annotate(origin, r, name, coordinate, options))
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(options.max_results);

    if let Some(first) = ranked.first_mut() {
        first.is_nearest = true;
    }

    tracing::debug!(
        candidates = raw.len(),
        kept = ranked.len(),
        nearest_km = ?ranked.first().map(|f| f.distance_km),
        "Facilities ranked"
    );
    ranked
}

fn annotate(
    origin: Coordinate,
    raw: &RawFacility,
    name: &str,
    coordinate: Coordinate,
    options: &RankingOptions,
) -> FacilityRecord {
    let distance_km = haversine_km(origin, coordinate);
    FacilityRecord {
        id: raw.stable_id(),
        name: name.to_string(),
        coordinate,
        distance_km,
        distance_text: format_distance(distance_km),
        eta_text: format_eta(distance_km, options.average_speed_kmh),
        address: raw
            .tag("addr:full")
            .or_else(|| raw.tag("addr:street"))
            .map(str::to_string),
        phone: raw
            .tag("phone")
            .or_else(|| raw.tag("contact:phone"))
            .map(str::to_string),
        rating: raw.tag("rating").and_then(|r| r.parse::<f32>().ok()),
        emergency: raw.tag("emergency") != Some("no"),
        is_nearest: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, name: Option<&str>, lat: f64, lon: f64) -> RawFacility {
        let mut tags = HashMap::new();
        if let Some(n) = name {
            tags.insert("name".to_string(), n.to_string());
        }
        RawFacility {
            kind: "node".to_string(),
            id,
            lat: Some(lat),
            lon: Some(lon),
            center: None,
            tags,
        }
    }

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    // ---- Scenario ----

    #[test]
    fn test_two_records_at_equator() {
        let raw = vec![
            node(2, Some("Far Clinic"), 0.0, 0.05),
            node(1, Some("Near Hospital"), 0.0, 0.01),
        ];
        let ranked = rank_facilities(origin(), &raw);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Near Hospital");
        assert!(ranked[0].is_nearest);
        assert!(!ranked[1].is_nearest);
        assert!(ranked[0].distance_km < ranked[1].distance_km);
        assert_eq!(ranked[0].distance_text, "1.1 km");
        assert_eq!(ranked[0].eta_text, "2 min");
        assert_eq!(ranked[1].distance_text, "5.6 km");
    }

    // ---- Filtering ----

    #[test]
    fn test_drops_records_without_name() {
        let raw = vec![
            node(1, None, 0.0, 0.01),
            node(2, Some("   "), 0.0, 0.02),
            node(3, Some("Named"), 0.0, 0.03),
        ];
        let ranked = rank_facilities(origin(), &raw);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "node/3");
    }

    #[test]
    fn test_drops_records_without_coordinate() {
        let mut missing = node(1, Some("Nowhere"), 0.0, 0.0);
        missing.lat = None;
        missing.lon = None;
        let mut half = node(2, Some("Half"), 0.0, 0.0);
        half.lon = None;
        let mut nan = node(3, Some("NaN"), 0.0, 0.0);
        nan.lat = Some(f64::NAN);

        assert!(rank_facilities(origin(), &[missing, half, nan]).is_empty());
    }

    #[test]
    fn test_zero_coordinate_is_valid() {
        let raw = vec![node(1, Some("Null Island Clinic"), 0.0, 0.0)];
        let ranked = rank_facilities(origin(), &raw);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].distance_km, 0.0);
        assert_eq!(ranked[0].distance_text, "0 m");
        assert_eq!(ranked[0].eta_text, "< 1 min");
    }

    #[test]
    fn test_area_uses_center() {
        let mut way = node(9, Some("Campus Hospital"), 0.0, 0.0);
        way.kind = "way".to_string();
        way.lat = None;
        way.lon = None;
        way.center = Some(Center { lat: 0.0, lon: 0.002 });

        let ranked = rank_facilities(origin(), &[way]);
        assert_eq!(ranked[0].id, "way/9");
        assert_eq!(ranked[0].coordinate, Coordinate::new(0.0, 0.002));
        assert_eq!(ranked[0].distance_text, "222 m");
    }

    // ---- Sorting / truncation ----

    #[test]
    fn test_sorted_truncated_single_nearest() {
        let raw: Vec<RawFacility> = (1..=8)
            .rev()
            .map(|i| node(i, Some(&format!("H{}", i)), 0.0, i as f64 * 0.01))
            .collect();
        let ranked = rank_facilities(origin(), &raw);

        assert_eq!(ranked.len(), DEFAULT_MAX_RESULTS);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));
        assert_eq!(ranked.iter().filter(|f| f.is_nearest).count(), 1);
        assert_eq!(ranked[0].name, "H1");
        assert_eq!(ranked[4].name, "H5");
    }

    #[test]
    fn test_custom_options() {
        let raw: Vec<RawFacility> = (1..=4)
            .map(|i| node(i, Some("H"), 0.0, i as f64 * 0.1))
            .collect();
        let options = RankingOptions {
            max_results: 2,
            average_speed_kmh: 20.0,
        };
        let ranked = rank_facilities_with(origin(), &raw, &options);
        assert_eq!(ranked.len(), 2);
        // 11.12 km at 20 km/h
        assert_eq!(ranked[0].eta_text, "33 min");
    }

    #[test]
    fn test_empty_input_marks_nothing() {
        assert!(rank_facilities(origin(), &[]).is_empty());
    }

    // ---- Tag extraction ----

    #[test]
    fn test_optional_tags() {
        let mut r = node(1, Some("Tagged"), 0.0, 0.01);
        r.tags.insert("addr:street".into(), "MG Road".into());
        r.tags.insert("contact:phone".into(), "+91 80 5555".into());
        r.tags.insert("rating".into(), "4.5".into());
        r.tags.insert("emergency".into(), "no".into());
        let f = &rank_facilities(origin(), &[r])[0];
        assert_eq!(f.address.as_deref(), Some("MG Road"));
        assert_eq!(f.phone.as_deref(), Some("+91 80 5555"));
        assert_eq!(f.rating, Some(4.5));
        assert!(!f.emergency);
    }

    #[test]
    fn test_full_address_and_phone_take_precedence() {
        let mut r = node(1, Some("Tagged"), 0.0, 0.01);
        r.tags.insert("addr:full".into(), "1 Full St".into());
        r.tags.insert("addr:street".into(), "Street".into());
        r.tags.insert("phone".into(), "111".into());
        r.tags.insert("contact:phone".into(), "222".into());
        r.tags.insert("rating".into(), "five stars".into());
        let f = &rank_facilities(origin(), &[r])[0];
        assert_eq!(f.address.as_deref(), Some("1 Full St"));
        assert_eq!(f.phone.as_deref(), Some("111"));
        assert_eq!(f.rating, None);
        assert!(f.emergency);
    }

    #[test]
    fn test_raw_facility_deserializes_overpass_element() {
        let json = r#"{"type":"way","id":77,"center":{"lat":1.5,"lon":2.5},"tags":{"name":"W"}}"#;
        let r: RawFacility = serde_json::from_str(json).unwrap();
        assert_eq!(r.coordinate(), Some(Coordinate::new(1.5, 2.5)));
        assert_eq!(r.stable_id(), "way/77");
        assert_eq!(r.name(), Some("W"));
    }
}
