//! Mass-weighted vertical integration
//!
//! For a quantity $q$ on model levels, the column integral is
//!
//! $$ \frac{1}{g} \int_{p_{top}}^{p_s} q \, dp \approx -\frac{1}{g} \sum_k q_k \Delta p_k $$
//!
//! where $\Delta p_k$ is the signed layer thickness from [`crate::thickness`]
//! (upper minus lower interface, so negative for levels indexed from the surface).
//! For specific humidity in kg/kg the result is a column mass in kg/m².

use crate::dataset::Dataset;
use crate::errors::ArtmipResult;
use crate::field::{FloatValue, GriddedField, LAT_DIM, LON_DIM, TIME_DIM};
use crate::registry::{resolve, ModelKind};
use crate::thickness::pressure_thickness;

/// Standard gravity used by the CMIP6 post-processing (m/s²)
pub const STANDARD_GRAVITY: FloatValue = 9.806159973144531;

/// Weight applied to the signed layer thickness
pub const NEG_ONE_OVER_G: FloatValue = -1.0 / STANDARD_GRAVITY;

/// Integration weights $-\Delta p / g$ over (time, level, lat, lon)
///
/// The dataset's own level coordinate is attached to the weights so that
/// multiplying a field with different level labels fails instead of silently
/// pairing mismatched layers.
pub fn integration_weights(dataset: &Dataset, kind: ModelKind) -> ArtmipResult<GriddedField> {
    let level_dim = kind.level_dim();
    let dp = pressure_thickness(kind, dataset)?;
    let levels = dataset.require_coordinate(level_dim)?;

    dp.field()
        .scaled(NEG_ONE_OVER_G)
        .transposed(&[TIME_DIM, level_dim, LAT_DIM, LON_DIM])?
        .assign_coord(level_dim, levels)
}

/// Names of the variables spanning exactly (time, level, lat, lon)
pub fn default_variables<'a>(dataset: &'a Dataset, level_dim: &str) -> Vec<&'a str> {
    let dims = [TIME_DIM, level_dim, LAT_DIM, LON_DIM];
    dataset
        .data_variable_names()
        .into_iter()
        .filter(|name| {
            dataset
                .get(name)
                .map(|field| field.spans(&dims))
                .unwrap_or(false)
        })
        .collect()
}

/// Vertically integrate variables of a dataset
///
/// The model is resolved from the `source_id` attribute, or from `fallback_model`
/// when the attribute is absent. Each selected variable is replaced by its
/// (time, lat, lon) column integral; every other variable is passed through
/// unchanged. Without an explicit selection all 4-D (time, level, lat, lon) data
/// variables are integrated.
///
/// Integrated variables lose their attributes since their units change.
///
/// # Errors
///
/// * Any error from [`resolve`] or the model's thickness calculator
/// * [`crate::errors::ArtmipError::MissingVariable`] if a selected variable or the
///   level coordinate is absent
/// * [`crate::errors::ArtmipError::ShapeMismatch`] if a selected variable does not
///   span the same (time, level, lat, lon) grid as the layer thickness
/// * [`crate::errors::ArtmipError::CoordinateMismatch`] if a selected variable
///   carries coordinate values that disagree with the dataset
pub fn integrate(
    dataset: &Dataset,
    fallback_model: Option<&str>,
    variables: Option<&[&str]>,
) -> ArtmipResult<Dataset> {
    let (level_dim, kind) = resolve(dataset, fallback_model)?;
    let weights = integration_weights(dataset, kind)?;

    let names: Vec<&str> = match variables {
        Some(names) => names.to_vec(),
        None => default_variables(dataset, level_dim),
    };
    log::debug!("Integrating {:?} over `{}` for {}", names, level_dim, kind);

    let mut result = dataset.clone();
    for name in names {
        let field = dataset.data_array(name)?;
        let integrated = weights.try_mul(&field)?.sum_over(level_dim)?.with_name(name);
        result.insert(integrated);
    }
    Ok(result)
}
