//! Facility data collaborator abstraction.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use aidline_core::Coordinate;

use crate::error::GeoError;
use crate::ranking::RawFacility;

/// Source of raw medical-facility records around a coordinate.
///
/// An empty result is a valid answer, not an error.
pub trait FacilityProvider: Send + Sync {
    fn nearby(
        &self,
        origin: Coordinate,
    ) -> impl Future<Output = Result<Vec<RawFacility>, GeoError>> + Send;
}

/// Mock provider for testing.
///
/// Returns a fixed record list, or fails every call when built with
/// [`MockFacilityProvider::failing`].
#[derive(Debug, Default)]
pub struct MockFacilityProvider {
    records: Vec<RawFacility>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockFacilityProvider {
    pub fn with_records(records: Vec<RawFacility>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Number of queries served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FacilityProvider for MockFacilityProvider {
    async fn nearby(&self, _origin: Coordinate) -> Result<Vec<RawFacility>, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(reason) => Err(GeoError::Connection(reason.clone())),
            None => Ok(self.records.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_records() {
        let provider = MockFacilityProvider::with_records(vec![RawFacility::default()]);
        let records = provider.nearby(Coordinate::new(0.0, 0.0)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let provider = MockFacilityProvider::failing("offline");
        let err = provider.nearby(Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, GeoError::Connection(_)));
    }
}
