//! Run configuration for the per-file integral calculation

use artmip_core::errors::{ArtmipError, ArtmipResult};
use serde::{Deserialize, Serialize};

/// Options controlling [`crate::integrals::calculate_artmip_integrals`].
///
/// Missing fields take their default values when deserialising, so a
/// configuration file only needs to list what it changes:
///
/// ```toml
/// one_timestep_test = true
/// model = "CESM2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegralConfig {
    /// Only process the first time step of each input.
    /// Default: false
    pub one_timestep_test: bool,

    /// Compute vapor transport when wind datasets are supplied.
    /// Default: true
    pub calculate_transport: bool,

    /// Model `source_id` used when a dataset does not carry one.
    /// Default: None
    pub model: Option<String>,

    /// Record source files, calculation date and crate version on the output.
    /// Default: true
    pub stamp_provenance: bool,
}

impl Default for IntegralConfig {
    fn default() -> Self {
        Self {
            one_timestep_test: false,
            calculate_transport: true,
            model: None,
            stamp_provenance: true,
        }
    }
}

impl IntegralConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> ArtmipResult<Self> {
        toml::from_str(content).map_err(|e| {
            ArtmipError::Configuration(format!("Invalid integral configuration: {}", e))
        })
    }

    pub fn fallback_model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}
