use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AidlineError, Result};
use crate::types::Coordinate;

/// Top-level configuration for the Aidline client.
///
/// Loaded from `~/.aidline/config.toml` by default. Each section corresponds
/// to one collaborator or engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AidlineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub facilities: FacilityConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl AidlineConfig {
    /// Parse `path`. Missing sections and keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AidlineConfig = toml::from_str(&raw)?;
        info!(path = %path.display(), "Aidline config loaded");
        Ok(config)
    }

    /// Like [`Self::load`], but a missing, unreadable, or invalid file yields
    /// defaults. Only the last two are worth a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No Aidline config file, using defaults");
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Aidline config unusable, using defaults");
            Self::default()
        })
    }

    /// Write as pretty TOML, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered =
            toml::to_string_pretty(self).map_err(|e| AidlineError::Config(e.to_string()))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, rendered)?;
        info!(path = %path.display(), "Aidline config written");
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when neither `--log-level` nor `RUST_LOG` is set.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Which remote inference collaborator the conversation talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceBackend {
    /// The `/analyze` relay: `{message}` in, `{ai_response}` out.
    #[default]
    Relay,
    /// A local Ollama instance queried directly.
    Ollama,
}

/// Remote inference configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub backend: InferenceBackend,
    /// Relay endpoint accepting `{"message": ...}`.
    pub endpoint: String,
    /// Base URL of the Ollama server (used by the `ollama` backend).
    pub ollama_url: String,
    /// Model name passed to Ollama.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum accepted message length in characters.
    pub max_message_chars: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: InferenceBackend::Relay,
            endpoint: "http://localhost:8000/analyze".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            model: "tinyllama".to_string(),
            timeout_secs: 60,
            max_message_chars: 2000,
        }
    }
}

/// Nearby-facility lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// Overpass API interpreter endpoint.
    pub endpoint: String,
    /// Search radius around the origin in meters.
    pub radius_m: u32,
    /// Number of facilities kept after sorting.
    pub max_results: usize,
    /// Flat travel speed used for ETA estimates.
    pub average_speed_kmh: f64,
    /// Provider request timeout in seconds.
    pub timeout_secs: u64,
    /// Origin used for the fallback record when the device location is unknown.
    pub default_origin: Coordinate,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            radius_m: 5000,
            max_results: 5,
            average_speed_kmh: 40.0,
            timeout_secs: 25,
            default_origin: Coordinate::new(0.0, 0.0),
        }
    }
}

/// Speech playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP 47 language tag for both playback and capture.
    pub language: String,
    /// Playback rate (1.0 = normal).
    pub rate: f32,
    /// Playback pitch (1.0 = normal).
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: "en-IN".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}
