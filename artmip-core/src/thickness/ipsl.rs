//! IPSL-CM6A-LR
//!
//! IPSL files carry `ap_bnds` and `b_bnds` on the interface dimension `klevp1`
//! (one more entry than there are layers) with a `bnds` column pair. The layer
//! thickness is taken as the first difference of the first column along `klevp1`,
//! and the result is relabelled onto the `presnivs` model levels.
//!
//! The formula family ($p = ap + b p_s$) is inferred from the variables present in the
//! files rather than taken from model documentation, and has not been verified
//! against published pressure levels.

use super::{layer_thickness, surface_pressure, PressureThickness};
use crate::dataset::Dataset;
use crate::errors::{ArtmipError, ArtmipResult};
use crate::field::FloatValue;
use crate::registry::{ModelKind, KLEVP1_DIM};
use ndarray::{Array1, Axis, Ix2};

fn interface_difference(dataset: &Dataset, name: &str, bounds_dim: &str) -> ArtmipResult<Array1<FloatValue>> {
    let bounds = dataset.get(name)?.view_as::<Ix2>(&[KLEVP1_DIM, bounds_dim])?;
    if bounds.nrows() < 2 || bounds.ncols() == 0 {
        return Err(ArtmipError::shape_mismatch(
            name,
            format!("at least 2 interfaces along `{}`", KLEVP1_DIM),
            bounds.shape(),
        ));
    }
    let first = bounds.column(0);
    let n = first.len() - 1;
    Ok(&first.slice_axis(Axis(0), (1..).into()) - &first.slice_axis(Axis(0), (..n).into()))
}

/// IPSL-CM6A-LR: $p = ap + b p_s$ on `klevp1` interfaces
pub fn ipsl_cm6a_lr(dataset: &Dataset) -> ArtmipResult<PressureThickness> {
    let kind = ModelKind::IpslCm6aLr;
    let level_dim = kind.level_dim();
    let bounds_dim = kind.bounds_dim();

    let da = interface_difference(dataset, "ap_bnds", bounds_dim)?;
    let db = interface_difference(dataset, "b_bnds", bounds_dim)?;
    let ps = surface_pressure(dataset)?;
    let presnivs = dataset.require_coordinate(level_dim)?;

    let PressureThickness(field) = layer_thickness(level_dim, da.view(), db.view(), 1.0, ps)?;
    Ok(PressureThickness(field.assign_coord(level_dim, presnivs)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_atmosphere::ExampleAtmosphere;
    use crate::field::GriddedField;
    use crate::registry::PRESNIVS_DIM;
    use ndarray::{array, Array2, Ix4};

    #[test]
    fn relabelled_onto_presnivs() {
        let ds = ExampleAtmosphere::three_level().dataset(ModelKind::IpslCm6aLr).unwrap();
        let dp = ipsl_cm6a_lr(&ds).unwrap();

        assert_eq!(dp.level_dim(), PRESNIVS_DIM);
        assert!(!dp.field().has_dim(KLEVP1_DIM));
        assert_eq!(
            dp.field().coord(PRESNIVS_DIM).unwrap(),
            &ds.require_coordinate(PRESNIVS_DIM).unwrap()
        );
    }

    #[test]
    fn first_difference_of_lower_column() {
        let mut ds = ExampleAtmosphere::three_level().dataset(ModelKind::IpslCm6aLr).unwrap();
        ds.insert(
            GriddedField::new(
                "ap_bnds",
                ["klevp1", "bnds"],
                array![[0.0, 9.0], [100.0, 9.0], [300.0, 9.0], [600.0, 9.0]],
            )
            .unwrap(),
        );
        ds.insert(GriddedField::new("b_bnds", ["klevp1", "bnds"], Array2::zeros((4, 2))).unwrap());

        let dp = ipsl_cm6a_lr(&ds).unwrap();
        let values = dp
            .field()
            .view_as::<Ix4>(&["time", PRESNIVS_DIM, "lat", "lon"])
            .unwrap();
        for (k, expected) in [100.0, 200.0, 300.0].into_iter().enumerate() {
            assert!(values.index_axis(Axis(1), k).iter().all(|v| *v == expected));
        }
    }

    #[test]
    fn presnivs_required() {
        let mut ds = ExampleAtmosphere::three_level().dataset(ModelKind::IpslCm6aLr).unwrap();
        ds.remove(PRESNIVS_DIM);
        assert_eq!(
            ipsl_cm6a_lr(&ds),
            Err(ArtmipError::MissingVariable(PRESNIVS_DIM.to_string()))
        );
    }

    #[test]
    fn presnivs_length_must_match_layers() {
        let mut ds = ExampleAtmosphere::three_level().dataset(ModelKind::IpslCm6aLr).unwrap();
        ds.insert(GriddedField::coordinate(PRESNIVS_DIM, array![90000.0, 50000.0]));
        assert!(matches!(
            ipsl_cm6a_lr(&ds),
            Err(ArtmipError::ShapeMismatch { .. })
        ));
    }
}
