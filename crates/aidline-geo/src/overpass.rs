//! OpenStreetMap Overpass API facility provider.

use std::time::Duration;

use serde::Deserialize;

use aidline_core::config::FacilityConfig;
use aidline_core::Coordinate;

use crate::error::GeoError;
use crate::provider::FacilityProvider;
use crate::ranking::RawFacility;

/// Overpass HTTP client looking up `amenity=hospital` around a point.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    endpoint: String,
    radius_m: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<RawFacility>,
}

impl OverpassClient {
    pub fn new(endpoint: &str, radius_m: u32, timeout_secs: u64) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GeoError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            radius_m,
            timeout_secs,
            client,
        })
    }

    pub fn from_config(config: &FacilityConfig) -> Result<Self, GeoError> {
        Self::new(&config.endpoint, config.radius_m, config.timeout_secs)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Overpass QL for hospitals of any geometry within `radius_m` of `origin`.
    ///
    /// `out center` makes ways and relations carry a centroid.
    pub fn build_query(origin: Coordinate, radius_m: u32, timeout_secs: u64) -> String {
        let around = format!("around:{},{},{}", radius_m, origin.lat, origin.lon);
        format!(
            "[out:json][timeout:{timeout}];(\
             node[\"amenity\"=\"hospital\"]({around});\
             way[\"amenity\"=\"hospital\"]({around});\
             relation[\"amenity\"=\"hospital\"]({around});\
             );out center;",
            timeout = timeout_secs,
            around = around,
        )
    }
}

impl FacilityProvider for OverpassClient {
    async fn nearby(&self, origin: Coordinate) -> Result<Vec<RawFacility>, GeoError> {
        let query = Self::build_query(origin, self.radius_m, self.timeout_secs);
        tracing::debug!(endpoint = %self.endpoint, radius_m = self.radius_m, "Querying Overpass");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GeoError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    GeoError::Timeout(self.timeout_secs)
                } else {
                    GeoError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .map_err(|e| GeoError::MalformedResponse(e.to_string()))?;

        tracing::debug!(elements = parsed.elements.len(), "Overpass response parsed");
        Ok(parsed.elements)
    }
}
