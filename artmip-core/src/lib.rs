//! Vertical integrals of humidity and vapor transport on CMIP6 hybrid model levels
//!
//! The entry point is [`integrate::integrate`], which resolves the model that
//! produced a [`dataset::Dataset`], computes the pressure thickness of each layer
//! with that model's formula, and replaces each 4-D variable by its mass-weighted
//! column integral.

pub mod assembly;
pub mod dataset;
pub mod example_atmosphere;
pub mod field;
pub mod integrate;
pub mod multiply;
pub mod recovery;
pub mod registry;
pub mod standard_variables;
pub mod thickness;

pub mod errors;

pub use dataset::Dataset;
pub use errors::{ArtmipError, ArtmipResult};
pub use field::GriddedField;
pub use registry::ModelKind;
