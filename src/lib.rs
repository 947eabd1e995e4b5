//! ARTMIP column integrals of CMIP6 model-level output
//!
//! The numerical work lives in [`artmip_core`]; this crate strings it together for
//! one set of humidity and wind datasets, adds run configuration and provenance,
//! and exposes the integrator to Python when built with the `python` feature.

pub mod config;
pub mod integrals;
pub mod provenance;
#[cfg(feature = "python")]
mod python;

pub use artmip_core;
pub use config::IntegralConfig;
pub use integrals::{calculate_artmip_integrals, split_outputs, ArtmipInputs};
pub use provenance::{ProvenanceInfo, RepositoryInfo};
