//! Error types for facility lookup and geolocation.

/// Errors from the facility provider and the geolocation collaborator.
///
/// None of these reach the display layer directly: [`crate::FacilityFinder`]
/// folds them into a fallback lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("cannot reach facility provider at {0}")]
    Connection(String),
    #[error("facility provider timed out after {0}s")]
    Timeout(u64),
    #[error("facility provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("HTTP client error: {0}")]
    Http(String),
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
    #[error("geolocation is not supported on this device")]
    LocationUnsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_error_display() {
        let err = GeoError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "facility provider returned HTTP 429: rate limited"
        );
        assert_eq!(
            GeoError::Timeout(25).to_string(),
            "facility provider timed out after 25s"
        );
        assert_eq!(
            GeoError::LocationUnsupported.to_string(),
            "geolocation is not supported on this device"
        );
    }
}
