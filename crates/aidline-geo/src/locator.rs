//! One-shot device geolocation.

use std::future::Future;

use aidline_core::Coordinate;

use crate::error::GeoError;

/// Geolocation collaborator: one request, one coordinate or a refusal.
pub trait Locator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<Coordinate, GeoError>> + Send;
}

/// Locator that always reports the same coordinate (CLI flag, config, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinate);

impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinate, GeoError> {
        Ok(self.0)
    }
}

/// Locator for environments without geolocation, or where access was denied.
#[derive(Debug, Clone, Default)]
pub struct UnavailableLocator {
    /// Denial reason; `None` means the capability is absent altogether.
    pub denied: Option<String>,
}

impl UnavailableLocator {
    pub fn denied(reason: &str) -> Self {
        Self {
            denied: Some(reason.to_string()),
        }
    }
}

impl Locator for UnavailableLocator {
    async fn locate(&self) -> Result<Coordinate, GeoError> {
        match &self.denied {
            Some(reason) => Err(GeoError::LocationUnavailable(reason.clone())),
            None => Err(GeoError::LocationUnsupported),
        }
    }
}
