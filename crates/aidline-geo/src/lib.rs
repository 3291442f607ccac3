//! Aidline geo crate - distance math, facility ranking, and nearby lookup.
//!
//! Converts a device coordinate plus raw point-of-interest records into a
//! distance-sorted, ETA-annotated facility list. The [`FacilityFinder`] owns
//! the provider query and substitutes a fixed fallback record when live data
//! or the device location is unavailable.

pub mod error;
pub mod finder;
pub mod geomath;
pub mod locator;
pub mod overpass;
pub mod provider;
pub mod ranking;

pub use error::GeoError;
pub use finder::{fallback_facility, FacilityFinder, FacilityLookup, FallbackReason, LookupStatus};
pub use locator::{FixedLocator, Locator, UnavailableLocator};
pub use overpass::OverpassClient;
pub use provider::{FacilityProvider, MockFacilityProvider};
pub use ranking::{rank_facilities, rank_facilities_with, Center, RankingOptions, RawFacility};
