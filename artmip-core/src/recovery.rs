//! Recovery of zeroed coordinates in BCC-CSM2-MR files
//!
//! Some BCC-CSM2-MR files were published with their coordinate variables and
//! bounds written as zeros. The data itself is intact, so the coordinates can be
//! restored from any uncorrupted file on the same grid. A corrupt file is recognised
//! by a `lev` coordinate whose first value is exactly zero.

use crate::dataset::Dataset;
use crate::errors::{ArtmipError, ArtmipResult};
use crate::field::{LAT_DIM, LON_DIM};
use crate::registry::LEVEL_DIM;
use std::borrow::Cow;

/// Coordinates replaced from the reference dataset
pub const RECOVERED_COORDINATES: [&str; 3] = [LEVEL_DIM, LAT_DIM, LON_DIM];

/// Bounds variables replaced from the reference dataset, when it has them
///
/// Only the bounds of the recovered coordinates and of the hybrid coefficients
/// (which live on `lev`) are taken over. Time bounds stay with their own file.
pub const RECOVERED_BOUNDS: [&str; 6] =
    ["lev_bnds", "lat_bnds", "lon_bnds", "a_bnds", "ap_bnds", "b_bnds"];

/// Test if a dataset carries a zeroed level coordinate
pub fn has_corrupt_levels(dataset: &Dataset) -> bool {
    dataset
        .coordinate(LEVEL_DIM)
        .and_then(|levels| levels.first().copied())
        .map(|first| first == 0.0)
        .unwrap_or(false)
}

/// Fail if any variable of `dataset` spans `dim` with a length other than `len`
fn check_length(dataset: &Dataset, source: &str, dim: &str, len: usize) -> ArtmipResult<()> {
    match dataset
        .iter()
        .find(|f| f.len_of(dim).map_or(false, |found| found != len))
    {
        Some(field) => Err(ArtmipError::shape_mismatch(
            format!("{}.{}", source, dim),
            [field.len_of(dim).unwrap_or_default()],
            [len],
        )),
        None => Ok(()),
    }
}

/// A copy of `dataset` with its coordinates and bounds taken from `reference`
///
/// `lev`, `lat` and `lon` are replaced by the reference values, as are the
/// [`RECOVERED_BOUNDS`] variables present in the reference. Every other variable,
/// `time_bnds` included, is left as it is. The recovered values are exact copies.
///
/// # Errors
///
/// * [`ArtmipError::MissingVariable`] if the reference lacks one of the coordinates
/// * [`ArtmipError::ShapeMismatch`] if a reference coordinate or bounds variable has
///   a different length to the matching dimension of `dataset`
pub fn recover_coordinates(dataset: &Dataset, reference: &Dataset) -> ArtmipResult<Dataset> {
    let mut recovered = dataset.clone();

    for dim in RECOVERED_COORDINATES {
        let values = reference.require_coordinate(dim)?;
        check_length(dataset, dim, dim, values.len())?;
        recovered.assign_coordinate(dim, values)?;
    }

    for name in RECOVERED_BOUNDS {
        if !reference.contains(name) {
            continue;
        }
        let bounds = reference.get(name)?;
        for (dim, len) in bounds.dims().iter().zip(bounds.shape()) {
            check_length(dataset, name, dim, *len)?;
        }
        recovered.insert(bounds.clone());
    }

    Ok(recovered)
}

/// Recover every dataset of a set if any one of them is corrupt
///
/// Datasets are borrowed unchanged when none is corrupt. Otherwise each one is
/// replaced by a recovered copy so that all of them share the reference grid.
///
/// # Errors
///
/// * [`ArtmipError::Configuration`] if corruption is found and no reference is given
/// * Any error from [`recover_coordinates`]
pub fn recover_corrupt_coordinates<'a>(
    datasets: &[&'a Dataset],
    reference: Option<&Dataset>,
) -> ArtmipResult<Vec<Cow<'a, Dataset>>> {
    if !datasets.iter().any(|ds| has_corrupt_levels(ds)) {
        return Ok(datasets.iter().map(|ds| Cow::Borrowed(*ds)).collect());
    }

    let reference = reference.ok_or_else(|| {
        ArtmipError::Configuration(
            "Found a zeroed `lev` coordinate but no reference dataset was provided to recover it"
                .to_string(),
        )
    })?;
    log::warn!(
        "Zeroed `lev` coordinate found; recovering coordinates of {} datasets from reference",
        datasets.len()
    );

    datasets
        .iter()
        .map(|ds| recover_coordinates(ds, reference).map(Cow::Owned))
        .collect()
}
