//! Models whose published interface bounds can be differenced directly.

use super::{bounds_difference, layer_thickness, reference_pressure, surface_pressure};
use super::PressureThickness;
use crate::dataset::Dataset;
use crate::errors::ArtmipResult;
use crate::registry::{HybridFormula, ModelKind};

/// Thickness from `a_bnds`/`b_bnds` (or `ap_bnds`/`b_bnds`) as stored in the file
fn from_bounds(dataset: &Dataset, kind: ModelKind) -> ArtmipResult<PressureThickness> {
    let level_dim = kind.level_dim();
    let bounds_dim = kind.bounds_dim();

    let (a_name, p0) = match kind.formula() {
        HybridFormula::APZeroPlusBPs => ("a_bnds", reference_pressure(dataset)?),
        HybridFormula::ApPlusBPs => ("ap_bnds", 1.0),
    };
    let da = bounds_difference(dataset.get(a_name)?, level_dim, bounds_dim)?;
    let db = bounds_difference(dataset.get("b_bnds")?, level_dim, bounds_dim)?;
    let ps = surface_pressure(dataset)?;

    layer_thickness(level_dim, da.view(), db.view(), p0, ps)
}

/// BCC-CSM2-MR: $p = a p_0 + b p_s$
pub fn bcc_csm2_mr(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_bounds(dataset, ModelKind::BccCsm2Mr)
}

/// GISS-E2-1-G: $p = a p_0 + b p_s$
pub fn giss_e2_1_g(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_bounds(dataset, ModelKind::GissE21G)
}

/// MRI-ESM2-0: $p = a p_0 + b p_s$
pub fn mri_esm2_0(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_bounds(dataset, ModelKind::MriEsm20)
}

/// SAM0-UNICON: $p = a p_0 + b p_s$
pub fn sam0_unicon(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_bounds(dataset, ModelKind::Sam0Unicon)
}

/// GFDL-CM4: $p(n,k,j,i) = ap(k) + b(k) p_s(n,j,i)$
pub fn gfdl_cm4(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_bounds(dataset, ModelKind::GfdlCm4)
}

/// CESM2: $p = a p_0 + b p_s$
///
/// The `a_bnds` and `b_bnds` arrays in CESM2 files are stored upside down relative
/// to the data (and to `ps`), so both are reversed along `lev` before differencing.
/// The bounds dimension is `nbnd`.
pub fn cesm2(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    let kind = ModelKind::Cesm2;
    let level_dim = kind.level_dim();
    let bounds_dim = kind.bounds_dim();

    let a_bnds = dataset.get("a_bnds")?.reversed_along(level_dim)?;
    let b_bnds = dataset.get("b_bnds")?.reversed_along(level_dim)?;

    let da = bounds_difference(&a_bnds, level_dim, bounds_dim)?;
    let db = bounds_difference(&b_bnds, level_dim, bounds_dim)?;
    let p0 = reference_pressure(dataset)?;
    let ps = surface_pressure(dataset)?;

    layer_thickness(level_dim, da.view(), db.view(), p0, ps)
}
