// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transport configuration plus the config service and its storage port.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::error::TransportError;
use crate::ids::LayerMask;

/// Store key under which the transport configuration is persisted.
pub const TRANSPORT_CONFIG_KEY: &str = "transport";

/// Settings shared by every transport body in a scene.
///
/// The length scale is injected here rather than read from global state, so
/// two scenes with different unit conventions can run side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Length of the downward probe ray in metres.
    pub ray_length: f32,
    /// Height above the body position at which the probe ray starts.
    pub probe_lift: f32,
    /// Layers the probe may hit.
    pub probe_layers: LayerMask,
    /// Drive units per world unit (1000 for millimetre drives in a metre world).
    pub length_scale: f64,
    /// Enables read-only diagnostics and debug drawing.
    pub debug: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ray_length: 0.3,
            probe_lift: 0.05,
            probe_layers: LayerMask::default(),
            length_scale: 1000.0,
            debug: false,
        }
    }
}

impl TransportConfig {
    /// Checks that every value is usable by the probe and mover.
    pub fn validate(&self) -> Result<(), TransportError> {
        let problem = if !(self.ray_length.is_finite() && self.ray_length > 0.0) {
            Some(format!("ray_length must be positive, got {}", self.ray_length))
        } else if !(self.probe_lift.is_finite() && self.probe_lift >= 0.0) {
            Some(format!("probe_lift must be non-negative, got {}", self.probe_lift))
        } else if !(self.length_scale.is_finite() && self.length_scale > 0.0) {
            Some(format!(
                "length_scale must be positive, got {}",
                self.length_scale
            ))
        } else if self.probe_layers == LayerMask::NONE {
            Some("probe_layers is empty; the probe could never hit anything".to_owned())
        } else {
            None
        };
        match problem {
            Some(msg) => {
                warn!(%msg, "rejecting transport config");
                Err(TransportError::InvalidConfig(msg))
            }
            None => Ok(()),
        }
    }
}

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Stored config decoded but failed validation.
    #[error("invalid: {0}")]
    Invalid(#[from] TransportError),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Loads the transport config, falling back to defaults when none is stored.
    ///
    /// A stored config that fails [`TransportConfig::validate`] is an error,
    /// not silently replaced.
    pub fn load_transport(&self) -> Result<TransportConfig, ConfigError> {
        let config = self
            .load::<TransportConfig>(TRANSPORT_CONFIG_KEY)?
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Validates and persists the transport config.
    pub fn save_transport(&self, config: &TransportConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.save(TRANSPORT_CONFIG_KEY, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TransportConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_scale_is_rejected() {
        let cfg = TransportConfig {
            length_scale: 0.0,
            ..TransportConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(TransportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn nan_ray_length_is_rejected() {
        let cfg = TransportConfig {
            ray_length: f32::NAN,
            ..TransportConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: TransportConfig =
            serde_json::from_str(r#"{ "length_scale": 1.0, "debug": true }"#)
                .unwrap_or_default();
        assert!(cfg.debug);
        assert_eq!(cfg.length_scale, 1.0);
        assert_eq!(cfg.ray_length, 0.3);
        assert_eq!(cfg.probe_layers, LayerMask::default());
    }
}
