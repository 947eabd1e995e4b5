//! Column mass conservation of the vertical integral
//!
//! A uniform mixing ratio $q$ integrated over a column must give
//! $q (p_s - p_{top}) / g$ for every model, whatever the axis order and
//! whatever way the model stores its vertical coordinate.

use approx::assert_relative_eq;
use artmip_core::example_atmosphere::ExampleAtmosphere;
use artmip_core::integrate::{integrate, STANDARD_GRAVITY};
use artmip_core::registry::ModelKind;
use artmip_core::thickness::pressure_thickness;
use is_close::is_close;
use ndarray::{Axis, Ix3, Ix4};

/// Upper interface pressure of the three level example atmosphere (Pa)
const P_TOP: f64 = 1000.0;

#[test]
fn test_column_closure_every_model() {
    let atmosphere = ExampleAtmosphere::three_level().with_varying_surface_pressure();
    let ps = atmosphere.surface_pressure();

    for kind in ModelKind::ALL {
        let ds = atmosphere.dataset_with(kind, &[("hus", 1.0)]).unwrap();
        let result = integrate(&ds, None, None).unwrap();
        let column = result
            .get("hus")
            .unwrap()
            .view_as::<Ix3>(&["time", "lat", "lon"])
            .unwrap()
            .to_owned();

        // CNRM models drop their top layer so their column ends one interface lower
        let top = match kind {
            ModelKind::CnrmCm61 | ModelKind::CnrmEsm21 => None,
            _ => Some(P_TOP),
        };

        for ((t, j, i), value) in column.indexed_iter() {
            let expected_thickness = match top {
                Some(p_top) => ps[[t, j, i]] - p_top,
                None => atmosphere.expected_column_thickness(kind)[[t, j, i]],
            };
            assert_relative_eq!(
                *value,
                expected_thickness / STANDARD_GRAVITY,
                max_relative = 1e-6
            );
        }
    }
}

#[test]
fn test_thickness_sums_to_column() {
    let atmosphere = ExampleAtmosphere::three_level().with_varying_surface_pressure();
    let kind = ModelKind::GissE21G;
    let ds = atmosphere.dataset(kind).unwrap();
    let dp = pressure_thickness(kind, &ds).unwrap();
    let dp = dp
        .field()
        .view_as::<Ix4>(&["time", "lev", "lat", "lon"])
        .unwrap();

    let column = dp.sum_axis(Axis(1));
    for ((t, j, i), value) in column.indexed_iter() {
        assert_relative_eq!(
            -value,
            atmosphere.surface_pressure()[[t, j, i]] - P_TOP,
            max_relative = 1e-9
        );
    }
}

#[test]
fn test_integral_is_linear() {
    let atmosphere = ExampleAtmosphere::three_level();
    let kind = ModelKind::IpslCm6aLr;
    let ds = atmosphere
        .dataset_with(kind, &[("q1", 0.002), ("q2", 0.004)])
        .unwrap();
    let result = integrate(&ds, None, Some(&["q1", "q2"])).unwrap();

    let a = result.get("q1").unwrap().values();
    let b = result.get("q2").unwrap().values();
    for (a, b) in a.iter().zip(b.iter()) {
        assert!(is_close!(*b, 2.0 * *a));
    }
}
