//! CNRM-CM6-1 and CNRM-ESM2-1
//!
//! The published upper bounds of `ap_bnds` and `b_bnds` are wrong in these files, so the
//! layer interfaces are rebuilt from the mid-level `ap` and `b` instead:
//!
//! * the interface between layers `k` and `k+1` is the mean of their mid-level values
//! * the lowest interface is the surface (`ap = 0`, `b = 1`)
//! * the top layer reuses the interface below it as its upper bound
//!
//! The last rule means the top layer always has zero thickness and contributes
//! nothing to a vertical integral.

use super::{layer_thickness, surface_pressure, PressureThickness};
use crate::dataset::Dataset;
use crate::errors::{ArtmipError, ArtmipResult};
use crate::field::FloatValue;
use crate::registry::ModelKind;
use ndarray::{Array1, ArrayView1, Ix1};

/// Rebuild (lower, upper) interface values from mid-level values
fn rebuild_bounds(
    mid: ArrayView1<'_, FloatValue>,
    surface: FloatValue,
) -> (Array1<FloatValue>, Array1<FloatValue>) {
    let n = mid.len();
    let midpoint = |k: usize| (mid[k] + mid[k + 1]) / 2.0;

    let upper = Array1::from_shape_fn(n, |k| midpoint(k.min(n - 2)));
    let lower = Array1::from_shape_fn(n, |k| if k == 0 { surface } else { midpoint(k - 1) });
    (lower, upper)
}

/// Coefficient differences (upper minus lower) for one mid-level variable
fn rebuilt_difference(
    dataset: &Dataset,
    name: &str,
    level_dim: &str,
    surface: FloatValue,
) -> ArtmipResult<Array1<FloatValue>> {
    let mid = dataset.get(name)?.view_as::<Ix1>(&[level_dim])?;
    if mid.len() < 2 {
        return Err(ArtmipError::shape_mismatch(
            name,
            format!("at least 2 levels along `{}`", level_dim),
            mid.shape(),
        ));
    }
    let (lower, upper) = rebuild_bounds(mid, surface);
    Ok(upper - lower)
}

fn from_mid_levels(dataset: &Dataset, kind: ModelKind) -> ArtmipResult<PressureThickness> {
    let level_dim = kind.level_dim();

    let da = rebuilt_difference(dataset, "ap", level_dim, 0.0)?;
    let db = rebuilt_difference(dataset, "b", level_dim, 1.0)?;
    let ps = surface_pressure(dataset)?;

    layer_thickness(level_dim, da.view(), db.view(), 1.0, ps)
}

/// CNRM-CM6-1: $p = ap + b p_s$ with interfaces rebuilt from mid-levels
pub fn cnrm_cm6_1(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_mid_levels(dataset, ModelKind::CnrmCm61)
}

/// CNRM-ESM2-1: same vertical grid and repair as CNRM-CM6-1
pub fn cnrm_esm2_1(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    from_mid_levels(dataset, ModelKind::CnrmEsm21)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_atmosphere::ExampleAtmosphere;
    use crate::field::GriddedField;
    use ndarray::{array, s, Array2, Ix4};

    #[test]
    fn rebuilt_interfaces() {
        let (lower, upper) = rebuild_bounds(array![1.0, 0.5, 0.25, 0.125].view(), 1.0);
        assert_eq!(lower, array![1.0, 0.75, 0.375, 0.1875]);
        assert_eq!(upper, array![0.75, 0.375, 0.1875, 0.1875]);
    }

    #[test]
    fn top_layer_is_empty() {
        let ds = ExampleAtmosphere::three_level()
            .with_varying_surface_pressure()
            .dataset(ModelKind::CnrmCm61)
            .unwrap();
        let dp = cnrm_cm6_1(&ds).unwrap();
        let values = dp
            .field()
            .view_as::<Ix4>(&["time", "lev", "lat", "lon"])
            .unwrap();
        let top = values.slice(s![.., 2, .., ..]);
        assert!(top.iter().all(|v| *v == 0.0));
        assert!(values.slice(s![.., 0..2, .., ..]).iter().all(|v| *v < 0.0));
    }

    #[test]
    fn published_bounds_are_ignored() {
        let mut ds = ExampleAtmosphere::three_level().dataset(ModelKind::CnrmEsm21).unwrap();
        let expected = cnrm_esm2_1(&ds).unwrap();

        for (name, junk) in [("ap_bnds", -1.0), ("b_bnds", 7.0)] {
            let bounds = Array2::from_elem((3, 2), junk);
            ds.insert(GriddedField::new(name, ["lev", "bnds"], bounds).unwrap());
        }
        assert_eq!(cnrm_esm2_1(&ds).unwrap(), expected);
    }

    #[test]
    fn both_variants_agree() {
        let atmosphere = ExampleAtmosphere::three_level();
        assert_eq!(
            cnrm_cm6_1(&atmosphere.dataset(ModelKind::CnrmCm61).unwrap()).unwrap(),
            cnrm_esm2_1(&atmosphere.dataset(ModelKind::CnrmEsm21).unwrap()).unwrap()
        );
    }

    #[test]
    fn single_level_cannot_be_rebuilt() {
        let mut ds = ExampleAtmosphere::three_level().dataset(ModelKind::CnrmCm61).unwrap();
        ds.insert(GriddedField::new("ap", ["lev"], array![0.0]).unwrap());
        assert!(matches!(
            cnrm_cm6_1(&ds),
            Err(ArtmipError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn missing_mid_levels() {
        let mut ds = ExampleAtmosphere::three_level().dataset(ModelKind::CnrmCm61).unwrap();
        ds.remove("b");
        assert_eq!(
            cnrm_cm6_1(&ds),
            Err(ArtmipError::MissingVariable("b".to_string()))
        );
    }
}
