//! Registry of supported climate models.
//!
//! Each CMIP6 model encodes its hybrid vertical coordinate slightly differently, so the
//! pressure thickness of a model layer needs a model-specific formula. The set of
//! models is closed: [`ModelKind`] has one variant per supported `source_id`, and
//! every per-model fact (vertical dimension name, bounds dimension, formula family,
//! thickness calculator) is an exhaustive `match` on it. Supporting a new model means
//! adding a variant, which the compiler then forces through every one of those tables.
//!
//! # Usage
//!
//! ```rust
//! use artmip_core::dataset::{Dataset, SOURCE_ID_ATTR};
//! use artmip_core::registry::{resolve, ModelKind};
//!
//! let ds = Dataset::new().with_attr(SOURCE_ID_ATTR, "IPSL-CM6A-LR");
//! let (level_dim, model) = resolve(&ds, None).unwrap();
//! assert_eq!(model, ModelKind::IpslCm6aLr);
//! assert_eq!(level_dim, "presnivs");
//!
//! assert!("UKESM1-0-LL".parse::<ModelKind>().is_err());
//! ```

use crate::dataset::Dataset;
use crate::errors::{ArtmipError, ArtmipResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the vertical dimension in CMIP6 model-level output
pub const LEVEL_DIM: &str = "lev";
/// Vertical dimension used by IPSL-CM6A-LR
pub const PRESNIVS_DIM: &str = "presnivs";
/// Interface dimension of the IPSL-CM6A-LR coefficient arrays
pub const KLEVP1_DIM: &str = "klevp1";

/// Family of hybrid-coordinate formula used to reconstruct pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HybridFormula {
    /// $p = a p_0 + b p_s$, with a dimensionless `a`
    APZeroPlusBPs,
    /// $p = ap + b p_s$, with `ap` already in Pa
    ApPlusBPs,
}

/// Climate models with a known pressure-thickness formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "BCC-CSM2-MR")]
    BccCsm2Mr,
    #[serde(rename = "CESM2")]
    Cesm2,
    #[serde(rename = "CNRM-CM6-1")]
    CnrmCm61,
    #[serde(rename = "CNRM-ESM2-1")]
    CnrmEsm21,
    #[serde(rename = "GFDL-CM4")]
    GfdlCm4,
    #[serde(rename = "GISS-E2-1-G")]
    GissE21G,
    #[serde(rename = "MRI-ESM2-0")]
    MriEsm20,
    #[serde(rename = "SAM0-UNICON")]
    Sam0Unicon,
    #[serde(rename = "IPSL-CM6A-LR")]
    IpslCm6aLr,
}

impl ModelKind {
    pub const ALL: [ModelKind; 9] = [
        ModelKind::BccCsm2Mr,
        ModelKind::Cesm2,
        ModelKind::CnrmCm61,
        ModelKind::CnrmEsm21,
        ModelKind::GfdlCm4,
        ModelKind::GissE21G,
        ModelKind::MriEsm20,
        ModelKind::Sam0Unicon,
        ModelKind::IpslCm6aLr,
    ];

    /// CMIP6 `source_id` of the model
    pub fn source_id(self) -> &'static str {
        match self {
            ModelKind::BccCsm2Mr => "BCC-CSM2-MR",
            ModelKind::Cesm2 => "CESM2",
            ModelKind::CnrmCm61 => "CNRM-CM6-1",
            ModelKind::CnrmEsm21 => "CNRM-ESM2-1",
            ModelKind::GfdlCm4 => "GFDL-CM4",
            ModelKind::GissE21G => "GISS-E2-1-G",
            ModelKind::MriEsm20 => "MRI-ESM2-0",
            ModelKind::Sam0Unicon => "SAM0-UNICON",
            ModelKind::IpslCm6aLr => "IPSL-CM6A-LR",
        }
    }

    /// Name of the dimension that is summed over during vertical integration
    pub fn level_dim(self) -> &'static str {
        match self {
            ModelKind::IpslCm6aLr => PRESNIVS_DIM,
            _ => LEVEL_DIM,
        }
    }

    /// Name of the size-2 dimension pairing the lower and upper layer interfaces
    pub fn bounds_dim(self) -> &'static str {
        match self {
            ModelKind::Cesm2 => "nbnd",
            _ => "bnds",
        }
    }

    pub fn formula(self) -> HybridFormula {
        match self {
            ModelKind::BccCsm2Mr
            | ModelKind::Cesm2
            | ModelKind::GissE21G
            | ModelKind::MriEsm20
            | ModelKind::Sam0Unicon => HybridFormula::APZeroPlusBPs,
            ModelKind::CnrmCm61
            | ModelKind::CnrmEsm21
            | ModelKind::GfdlCm4
            | ModelKind::IpslCm6aLr => HybridFormula::ApPlusBPs,
        }
    }

    /// Whether the model is known to ship files with zeroed vertical coordinates
    /// that must be replaced from a reference file
    pub fn has_corrupt_level_recovery(self) -> bool {
        matches!(self, ModelKind::BccCsm2Mr)
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source_id())
    }
}

impl FromStr for ModelKind {
    type Err = ArtmipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.source_id() == s)
            .ok_or_else(|| ArtmipError::UnsupportedModel(s.to_string()))
    }
}

/// Determine the model that produced a dataset, and the name of its vertical dimension.
///
/// The `source_id` attribute takes precedence; `fallback` is only consulted when the
/// attribute is absent.
///
/// # Errors
///
/// * [`ArtmipError::Configuration`] if neither source provides a model identifier
/// * [`ArtmipError::UnsupportedModel`] if the identifier is not registered
pub fn resolve(dataset: &Dataset, fallback: Option<&str>) -> ArtmipResult<(&'static str, ModelKind)> {
    let model_id = dataset.source_id().or(fallback).ok_or_else(|| {
        ArtmipError::Configuration(
            "Could not infer model name from the attributes of the dataset. Please explicitly set the model."
                .to_string(),
        )
    })?;

    let kind: ModelKind = model_id.parse()?;
    Ok((kind.level_dim(), kind))
}
