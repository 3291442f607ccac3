//! Nearby-facility orchestration with deterministic fallback.
//!
//! Provider and location failures never reach the caller as errors. They are
//! folded into a [`FacilityLookup`] carrying one synthetic record and an
//! inspectable [`LookupStatus::Fallback`] flag, so a display surface always
//! has something to render and can still warn the user separately.

use aidline_core::config::FacilityConfig;
use aidline_core::{Coordinate, FacilityRecord};

use crate::error::GeoError;
use crate::geomath::{format_distance, format_eta, haversine_km};
use crate::locator::Locator;
use crate::provider::FacilityProvider;
use crate::ranking::{rank_facilities_with, RankingOptions};

/// Degrees added to both axes of the origin for the fallback record.
const FALLBACK_OFFSET_DEG: f64 = 0.01;

/// Why live data was replaced by the fallback record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The provider was unreachable, answered non-2xx, or sent garbage.
    ProviderUnavailable(String),
    /// The device did not report a location.
    LocationUnavailable(String),
}

/// Provenance of a [`FacilityLookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    /// Real provider data, at least one facility.
    Live,
    /// The provider answered but nothing usable was nearby.
    NoneFound,
    /// Synthetic data; see the reason.
    Fallback(FallbackReason),
}

/// Result of one nearby-facility lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityLookup {
    pub facilities: Vec<FacilityRecord>,
    pub status: LookupStatus,
}

impl FacilityLookup {
    /// True when the facilities are synthetic.
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, LookupStatus::Fallback(_))
    }

    pub fn nearest(&self) -> Option<&FacilityRecord> {
        self.facilities.iter().find(|f| f.is_nearest)
    }

    /// User-facing notice for anything other than a normal live result.
    pub fn notice(&self) -> Option<&'static str> {
        match &self.status {
            LookupStatus::Live => None,
            LookupStatus::NoneFound => {
                Some("No hospitals found nearby. Try increasing search radius.")
            }
            LookupStatus::Fallback(FallbackReason::ProviderUnavailable(_)) => {
                Some("Could not fetch nearby hospitals. Using fallback data.")
            }
            LookupStatus::Fallback(FallbackReason::LocationUnavailable(_)) => {
                Some(
                    "Please enable location access to find nearby hospitals. \
                     Showing fallback data.",
                )
            }
        }
    }
}

/// The synthetic record used when live data is unavailable.
///
/// Fixed identity and contact details; the position is a fixed offset from
/// `origin` and the distance annotations are derived from it.
pub fn fallback_facility(origin: Coordinate, average_speed_kmh: f64) -> FacilityRecord {
    let coordinate = origin.offset(FALLBACK_OFFSET_DEG, FALLBACK_OFFSET_DEG);
    let distance_km = haversine_km(origin, coordinate);
    FacilityRecord {
        id: "fallback-1".to_string(),
        name: "City General Hospital".to_string(),
        coordinate,
        distance_km,
        distance_text: format_distance(distance_km),
        eta_text: format_eta(distance_km, average_speed_kmh),
        address: Some("123 Healthcare Ave".to_string()),
        phone: Some("+1 (555) 123-4567".to_string()),
        rating: Some(4.8),
        emergency: true,
        is_nearest: true,
    }
}

/// Owns the facility query and its failure path.
pub struct FacilityFinder<P> {
    provider: P,
    options: RankingOptions,
    default_origin: Coordinate,
}

impl<P: FacilityProvider> FacilityFinder<P> {
    pub fn new(provider: P, options: RankingOptions, default_origin: Coordinate) -> Self {
        Self {
            provider,
            options,
            default_origin,
        }
    }

    pub fn from_config(provider: P, config: &FacilityConfig) -> Self {
        Self::new(
            provider,
            RankingOptions {
                max_results: config.max_results,
                average_speed_kmh: config.average_speed_kmh,
            },
            config.default_origin,
        )
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Query the provider around `origin` and rank the answer.
    pub async fn find_nearby(&self, origin: Coordinate) -> FacilityLookup {
        match self.provider.nearby(origin).await {
            Ok(raw) => {
                let facilities = rank_facilities_with(origin, &raw, &self.options);
                let status = if facilities.is_empty() {
                    tracing::info!(raw = raw.len(), "No facilities found nearby");
                    LookupStatus::NoneFound
                } else {
                    tracing::info!(
                        count = facilities.len(),
                        nearest = %facilities[0].name,
                        distance = %facilities[0].distance_text,
                        "Nearby facilities ranked"
                    );
                    LookupStatus::Live
                };
                FacilityLookup { facilities, status }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Facility provider failed, using fallback");
                self.fallback(origin, FallbackReason::ProviderUnavailable(e.to_string()))
            }
        }
    }

    /// Resolve the device location once, then [`Self::find_nearby`].
    ///
    /// Without a location the fallback is placed relative to the configured
    /// default origin and the provider is not queried.
    pub async fn locate_and_find<L: Locator>(&self, locator: &L) -> FacilityLookup {
        match locator.locate().await {
            Ok(origin) => self.find_nearby(origin).await,
            Err(e) => {
                tracing::warn!(error = %e, "Device location unavailable, using fallback");
                let reason = match e {
                    GeoError::LocationUnavailable(r) => r,
                    other => other.to_string(),
                };
                self.fallback(self.default_origin, FallbackReason::LocationUnavailable(reason))
            }
        }
    }

    fn fallback(&self, origin: Coordinate, reason: FallbackReason) -> FacilityLookup {
        FacilityLookup {
            facilities: vec![fallback_facility(origin, self.options.average_speed_kmh)],
            status: LookupStatus::Fallback(reason),
        }
    }
}
