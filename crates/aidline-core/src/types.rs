use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AidlineError, Result};

// =============================================================================
// Coordinate
// =============================================================================

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate, rejecting values outside the valid degree ranges.
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AidlineError::InvalidCoordinate(format!("latitude {}", lat)));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(AidlineError::InvalidCoordinate(format!("longitude {}", lon)));
        }
        Ok(Self { lat, lon })
    }

    /// Shift by a fixed number of degrees on both axes.
    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self {
            lat: self.lat + dlat,
            lon: self.lon + dlon,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

// =============================================================================
// Analysis
// =============================================================================

/// Injury category assigned by the interpretation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryType {
    #[serde(rename = "Burn Injury")]
    Burn,
    #[serde(rename = "Cut/Wound")]
    CutWound,
    #[serde(rename = "Headache")]
    Headache,
    #[serde(rename = "Sprain")]
    Sprain,
    #[serde(rename = "Fracture")]
    Fracture,
    #[serde(rename = "Bleeding")]
    Bleeding,
    #[default]
    #[serde(rename = "General Injury")]
    General,
}

impl InjuryType {
    /// Display label shown on the injury card.
    pub fn label(&self) -> &'static str {
        match self {
            InjuryType::Burn => "Burn Injury",
            InjuryType::CutWound => "Cut/Wound",
            InjuryType::Headache => "Headache",
            InjuryType::Sprain => "Sprain",
            InjuryType::Fracture => "Fracture",
            InjuryType::Bleeding => "Bleeding",
            InjuryType::General => "General Injury",
        }
    }
}

impl fmt::Display for InjuryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How urgent the guidance in a reply is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    #[default]
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Minor => write!(f, "Minor"),
            Severity::Moderate => write!(f, "Moderate"),
            Severity::Severe => write!(f, "Severe"),
        }
    }
}

/// Structured reading of one model reply. Produced once per turn and never
/// mutated; the next turn's record replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub injury_type: InjuryType,
    pub severity: Severity,
    /// Placeholder signal in `[80, 95]`, not a model confidence.
    pub confidence: u8,
    /// Up to five instructions, in reply order.
    pub first_aid_steps: Vec<String>,
    /// Never empty.
    pub warnings: Vec<String>,
}

// =============================================================================
// Facilities
// =============================================================================

/// One ranked medical facility with derived distance annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Provider identifier, opaque.
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    /// Great-circle distance from the search origin.
    pub distance_km: f64,
    pub distance_text: String,
    pub eta_text: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<f32>,
    /// Whether the facility advertises an emergency department.
    pub emergency: bool,
    pub is_nearest: bool,
}

impl FacilityRecord {
    /// Address line, or a placeholder when the provider had none.
    pub fn display_address(&self) -> &str {
        self.address.as_deref().unwrap_or("Address not available")
    }

    /// Turn-by-turn directions link for the facility.
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.coordinate.lat, self.coordinate.lon
        )
    }

    /// `tel:` URI, if the provider supplied a phone number.
    pub fn dial_uri(&self) -> Option<String> {
        self.phone.as_ref().map(|p| format!("tel:{}", p))
    }
}
