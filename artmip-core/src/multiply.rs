//! Products of variables that live in different datasets
//!
//! Wind and humidity come from separate files of the same model run. Their level
//! coordinates are meant to be identical but are occasionally written with
//! different floating-point noise (or, for BCC-CSM2-MR, not written at all), which
//! would make an aligned multiply fail.

use crate::dataset::Dataset;
use crate::errors::ArtmipResult;
use crate::field::GriddedField;
use crate::registry::resolve;

/// Multiply `a[var_a]` by `b[var_b]`, trusting that both share a vertical grid
///
/// The level dimension is resolved against `a` (using `fallback_model` when `a` has
/// no `source_id`). Before multiplying, the level coordinate of `a[var_a]` is
/// overwritten with the level coordinate values of `b`; the remaining dimensions
/// are aligned as usual.
///
/// **This is deliberately permissive.** Nothing checks that the two level
/// coordinates describe the same physical levels; only the number of levels must
/// agree. Callers are responsible for pairing datasets from the same model run.
///
/// The product is named `var_a` and has no attributes.
///
/// # Errors
///
/// * Any error from [`resolve`] on `a`
/// * [`crate::errors::ArtmipError::MissingVariable`] if either variable or `b`'s
///   level coordinate is absent
/// * [`crate::errors::ArtmipError::ShapeMismatch`] if the fields (or the level counts)
///   do not agree
/// * [`crate::errors::ArtmipError::CoordinateMismatch`] if any other shared
///   coordinate differs
pub fn safe_multiply(
    a: &Dataset,
    b: &Dataset,
    var_a: &str,
    var_b: &str,
    fallback_model: Option<&str>,
) -> ArtmipResult<GriddedField> {
    let (level_dim, _) = resolve(a, fallback_model)?;

    let levels = b.require_coordinate(level_dim)?;
    let lhs = a.data_array(var_a)?.assign_coord(level_dim, levels)?;
    let rhs = b.data_array(var_b)?;

    lhs.try_mul(&rhs)
}
