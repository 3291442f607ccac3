//! Great-circle distance and flat-rate travel estimates.

use aidline_core::Coordinate;

/// Mean Earth radius for the spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed average urban driving speed.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Haversine distance between two coordinates in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Travel time in whole minutes at a constant speed, rounded to nearest.
///
/// Non-positive speeds fall back to [`DEFAULT_SPEED_KMH`].
pub fn eta_minutes(distance_km: f64, speed_kmh: f64) -> u64 {
    let speed = if speed_kmh > 0.0 {
        speed_kmh
    } else {
        DEFAULT_SPEED_KMH
    };
    (distance_km.max(0.0) / speed * 60.0).round() as u64
}

/// ETA label: `"< 1 min"` below one rounded minute, otherwise `"N min"`.
pub fn format_eta(distance_km: f64, speed_kmh: f64) -> String {
    match eta_minutes(distance_km, speed_kmh) {
        0 => "< 1 min".to_string(),
        m => format!("{} min", m),
    }
}

/// Distance label: whole meters under 1 km, one-decimal kilometers otherwise.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as u64)
    } else {
        format!("{:.1} km", distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = Coordinate::new(12.97, 77.59);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_longitude_at_equator() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!(approx(d, 111.195, 0.01), "got {}", d);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = Coordinate::new(51.5074, -0.1278);
        let b = Coordinate::new(48.8566, 2.3522);
        let ab = haversine_km(a, b);
        assert!(approx(ab, haversine_km(b, a), 1e-9));
        // London to Paris is roughly 344 km.
        assert!(approx(ab, 343.5, 1.0), "got {}", ab);
    }

    #[test]
    fn test_eta_minutes_rounding() {
        // 40 km/h = 1.5 min per km
        assert_eq!(eta_minutes(1.2, 40.0), 2);
        assert_eq!(eta_minutes(2.0, 40.0), 3);
        assert_eq!(eta_minutes(0.3, 40.0), 0);
        assert_eq!(eta_minutes(0.34, 40.0), 1);
    }

    #[test]
    fn test_eta_minutes_bad_speed_uses_default() {
        assert_eq!(eta_minutes(2.0, 0.0), eta_minutes(2.0, DEFAULT_SPEED_KMH));
        assert_eq!(eta_minutes(2.0, -5.0), 3);
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(0.1, 40.0), "< 1 min");
        assert_eq!(format_eta(0.0, 40.0), "< 1 min");
        assert_eq!(format_eta(10.0, 40.0), "15 min");
    }

    #[test]
    fn test_format_distance_meters_below_one_km() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(0.4567), "457 m");
        assert_eq!(format_distance(0.999), "999 m");
    }

    #[test]
    fn test_format_distance_km_at_or_above_one() {
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(1.11195), "1.1 km");
        assert_eq!(format_distance(12.36), "12.4 km");
    }
}
