//! Runtime configuration for providers and the field kernel.
//!
//! Configuration is plain JSON. Every field has a default, so `{}` is a valid
//! configuration:
//!
//! ```
//! use ndcompute::ComputeConfig;
//!
//! let config = ComputeConfig::from_json_str(r#"{ "num_threads": 2 }"#).unwrap();
//! assert_eq!(config.num_threads, 2);
//! assert_eq!(config.parallel_threshold, 1000);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a [`ComputeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for this schema.
    #[error("parse error: {0}")]
    Parse(String),

    /// A field holds a value outside its allowed range.
    #[error("invalid value '{key}': {value} - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Numerical and execution settings shared by all providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Relative tolerance for singularity: an `n x n` matrix is singular
    /// when an LU pivot satisfies `|u_ii| <= singular_epsilon * n * max|m_ij|`.
    #[serde(default = "default_singular_epsilon")]
    pub singular_epsilon: f64,

    /// Minimum element count before the multicore provider goes parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Worker threads for the multicore provider (0 = rayon default).
    #[serde(default)]
    pub num_threads: usize,

    /// Parameters of the default field source.
    #[serde(default)]
    pub dipole: DipoleConfig,
}

fn default_singular_epsilon() -> f64 {
    1e-12
}
fn default_parallel_threshold() -> usize {
    1000
}

/// Oscillating electric dipole, in natural units by default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DipoleConfig {
    /// Dipole moment amplitude `p0`.
    #[serde(default = "default_unit")]
    pub moment: f64,

    /// Angular frequency `omega`.
    #[serde(default = "default_unit")]
    pub angular_frequency: f64,

    /// Speed of light `c`.
    #[serde(default = "default_unit")]
    pub speed_of_light: f64,

    /// Vacuum permittivity `epsilon_0`.
    #[serde(default = "default_unit")]
    pub permittivity: f64,
}

fn default_unit() -> f64 {
    1.0
}

impl Default for DipoleConfig {
    fn default() -> Self {
        Self {
            moment: default_unit(),
            angular_frequency: default_unit(),
            speed_of_light: default_unit(),
            permittivity: default_unit(),
        }
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            singular_epsilon: default_singular_epsilon(),
            parallel_threshold: default_parallel_threshold(),
            num_threads: 0,
            dipole: DipoleConfig::default(),
        }
    }
}

fn require_positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a finite positive number".to_string(),
        });
    }
    Ok(())
}

impl ComputeConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ComputeConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Write the configuration to `path` as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("singular_epsilon", self.singular_epsilon)?;
        require_positive("dipole.moment", self.dipole.moment)?;
        require_positive("dipole.angular_frequency", self.dipole.angular_frequency)?;
        require_positive("dipole.speed_of_light", self.dipole.speed_of_light)?;
        require_positive("dipole.permittivity", self.dipole.permittivity)?;
        Ok(())
    }
}
