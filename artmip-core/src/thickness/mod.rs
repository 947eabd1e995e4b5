//! Pressure thickness of hybrid-coordinate model layers
//!
//! CMIP6 models on hybrid sigma-pressure levels publish the coefficients of the
//! layer interfaces rather than the pressure itself. The pressure at an interface is
//! either
//!
//! $$ p = a p_0 + b p_s \quad \text{or} \quad p = ap + b p_s $$
//!
//! and the thickness of layer $k$ is the difference between its two interfaces:
//!
//! $$ \Delta p_k = (a_k^{upper} - a_k^{lower}) p_0 + (b_k^{upper} - b_k^{lower}) p_s $$
//!
//! The difference is taken upper minus lower, so for models whose level index
//! increases upwards the result is negative. The sign is kept as-is here and folded
//! into the integration weight by [`crate::integrate`].
//!
//! One calculator exists per supported model; [`calculator`] selects it for a
//! [`ModelKind`]. All calculators borrow the dataset and return newly allocated
//! arrays. Model-specific repairs (reversed or corrupt bounds) work on copies.

mod cnrm;
mod hybrid;
mod ipsl;

pub use cnrm::{cnrm_cm6_1, cnrm_esm2_1};
pub use hybrid::{bcc_csm2_mr, cesm2, gfdl_cm4, giss_e2_1_g, mri_esm2_0, sam0_unicon};
pub use ipsl::ipsl_cm6a_lr;

use crate::dataset::Dataset;
use crate::errors::{ArtmipError, ArtmipResult};
use crate::field::{FloatValue, GriddedField, LAT_DIM, LON_DIM, TIME_DIM};
use crate::registry::ModelKind;
use ndarray::{Array1, Array4, ArrayD, ArrayView1, ArrayView3, Ix2, Ix3};

/// Name given to the computed thickness field
pub const PRESSURE_THICKNESS_NAME: &str = "dp";

/// Signature shared by every per-model calculator
pub type ThicknessCalculator = fn(&Dataset) -> ArtmipResult<PressureThickness>;

/// Layer pressure thickness in Pa, over (time, level, lat, lon)
#[derive(Debug, Clone, PartialEq)]
pub struct PressureThickness(GriddedField);

impl PressureThickness {
    pub fn field(&self) -> &GriddedField {
        &self.0
    }

    pub fn into_field(self) -> GriddedField {
        self.0
    }

    /// Name of the vertical dimension
    pub fn level_dim(&self) -> &str {
        &self.0.dims()[1]
    }

    pub fn values(&self) -> &ArrayD<FloatValue> {
        self.0.values()
    }
}

/// Thickness calculator for a model
pub fn calculator(kind: ModelKind) -> ThicknessCalculator {
    match kind {
        ModelKind::BccCsm2Mr => bcc_csm2_mr,
        ModelKind::Cesm2 => cesm2,
        ModelKind::CnrmCm61 => cnrm_cm6_1,
        ModelKind::CnrmEsm21 => cnrm_esm2_1,
        ModelKind::GfdlCm4 => gfdl_cm4,
        ModelKind::GissE21G => giss_e2_1_g,
        ModelKind::MriEsm20 => mri_esm2_0,
        ModelKind::Sam0Unicon => sam0_unicon,
        ModelKind::IpslCm6aLr => ipsl_cm6a_lr,
    }
}

impl ModelKind {
    pub fn calculator(self) -> ThicknessCalculator {
        calculator(self)
    }
}

/// Compute the pressure thickness of `dataset` with the formula for `kind`
pub fn pressure_thickness(kind: ModelKind, dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    log::debug!(
        "Computing pressure thickness for {} using {:?}",
        kind,
        kind.formula()
    );
    calculator(kind)(dataset)
}

/// Surface pressure as a (time, lat, lon) view
pub(crate) fn surface_pressure(dataset: &Dataset) -> ArtmipResult<ArrayView3<'_, FloatValue>> {
    dataset.get("ps")?.view_as::<Ix3>(&[TIME_DIM, LAT_DIM, LON_DIM])
}

/// Reference pressure `p0`
pub(crate) fn reference_pressure(dataset: &Dataset) -> ArtmipResult<FloatValue> {
    dataset.get("p0")?.scalar_value()
}

/// Upper minus lower interface value for every layer of a bounds variable
pub(crate) fn bounds_difference(
    field: &GriddedField,
    level_dim: &str,
    bounds_dim: &str,
) -> ArtmipResult<Array1<FloatValue>> {
    let bounds = field.view_as::<Ix2>(&[level_dim, bounds_dim])?;
    if bounds.ncols() != 2 {
        return Err(ArtmipError::shape_mismatch(
            field.name(),
            format!("size 2 along `{}`", bounds_dim),
            bounds.shape(),
        ));
    }
    Ok(&bounds.column(1) - &bounds.column(0))
}

/// Combine coefficient differences with the reference and surface pressures
///
/// `p0` is 1 for the `ap + b ps` family.
pub(crate) fn layer_thickness(
    level_dim: &str,
    da: ArrayView1<'_, FloatValue>,
    db: ArrayView1<'_, FloatValue>,
    p0: FloatValue,
    ps: ArrayView3<'_, FloatValue>,
) -> ArtmipResult<PressureThickness> {
    if da.len() != db.len() {
        return Err(ArtmipError::shape_mismatch(
            "b coefficients",
            [da.len()],
            [db.len()],
        ));
    }

    let (n_time, n_lat, n_lon) = ps.dim();
    let values = Array4::from_shape_fn((n_time, da.len(), n_lat, n_lon), |(t, k, j, i)| {
        da[k] * p0 + db[k] * ps[[t, j, i]]
    });

    GriddedField::new(
        PRESSURE_THICKNESS_NAME,
        [TIME_DIM, level_dim, LAT_DIM, LON_DIM],
        values,
    )
    .map(PressureThickness)
}
