//! Synthetic model atmospheres for tests and documentation
//!
//! An [`ExampleAtmosphere`] is defined by its true hybrid-coordinate interfaces. From
//! those it can lay out a [`Dataset`] the way each supported model's files are laid out
//! (including each model's quirks), and it can report the layer thicknesses that a
//! correct calculator must recover.

use crate::dataset::{Dataset, SOURCE_ID_ATTR};
use crate::errors::ArtmipResult;
use crate::field::{FloatValue, GriddedField, LAT_DIM, LON_DIM, TIME_DIM, UNITS_ATTR};
use crate::registry::{HybridFormula, ModelKind, KLEVP1_DIM};
use ndarray::{Array, Array1, Array2, Array3, Array4, Axis};

/// Reference pressure used by the `a p0 + b ps` models (Pa)
pub const REFERENCE_PRESSURE: FloatValue = 1.0e5;
/// Uniform surface pressure of the example atmospheres (Pa)
pub const SURFACE_PRESSURE: FloatValue = 101_325.0;

/// Hybrid-coordinate atmosphere with known interfaces
#[derive(Debug, Clone)]
pub struct ExampleAtmosphere {
    /// Dimensionless `a` at each interface, surface first
    a_interfaces: Array1<FloatValue>,
    /// `b` at each interface, surface first
    b_interfaces: Array1<FloatValue>,
    /// Surface pressure over (time, lat, lon)
    ps: Array3<FloatValue>,
}

impl ExampleAtmosphere {
    /// Three layers over a 2 x 2 x 3 (time, lat, lon) grid with interface pressures
    /// of 101325, 65795, 28265 and 1000 Pa
    pub fn three_level() -> Self {
        Self {
            a_interfaces: Array1::from(vec![0.0, 0.05, 0.08, 0.01]),
            b_interfaces: Array1::from(vec![1.0, 0.6, 0.2, 0.0]),
            ps: Array3::from_elem((2, 2, 3), SURFACE_PRESSURE),
        }
    }

    /// Perturb the surface pressure so that every (time, lat, lon) column differs
    pub fn with_varying_surface_pressure(mut self) -> Self {
        self.ps = Array3::from_shape_fn(self.ps.dim(), |(t, j, i)| {
            SURFACE_PRESSURE - 750.0 * t as FloatValue - 1200.0 * j as FloatValue
                + 310.0 * i as FloatValue
        });
        self
    }

    pub fn n_levels(&self) -> usize {
        self.a_interfaces.len() - 1
    }

    /// (time, lat, lon) grid size
    pub fn grid(&self) -> (usize, usize, usize) {
        self.ps.dim()
    }

    pub fn surface_pressure(&self) -> &Array3<FloatValue> {
        &self.ps
    }

    /// Pressure at interface `k` for a surface pressure of `ps`
    fn interface_pressure(&self, k: usize, ps: FloatValue) -> FloatValue {
        self.a_interfaces[k] * REFERENCE_PRESSURE + self.b_interfaces[k] * ps
    }

    /// Thickness (lower minus upper interface pressure, positive) of every layer
    /// over (time, level, lat, lon)
    ///
    /// The CNRM models cannot resolve their top layer, which is reported as empty.
    pub fn expected_thickness(&self, kind: ModelKind) -> Array4<FloatValue> {
        let (n_time, n_lat, n_lon) = self.grid();
        let n = self.n_levels();
        let drops_top_layer = matches!(kind, ModelKind::CnrmCm61 | ModelKind::CnrmEsm21);

        Array4::from_shape_fn((n_time, n, n_lat, n_lon), |(t, k, j, i)| {
            if drops_top_layer && k == n - 1 {
                return 0.0;
            }
            let ps = self.ps[[t, j, i]];
            self.interface_pressure(k, ps) - self.interface_pressure(k + 1, ps)
        })
    }

    /// Total thickness of each (time, lat, lon) column
    pub fn expected_column_thickness(&self, kind: ModelKind) -> Array3<FloatValue> {
        self.expected_thickness(kind).sum_axis(Axis(1))
    }

    /// `(lower, upper)` interface pairs for each layer
    fn layer_bounds(interfaces: &Array1<FloatValue>) -> Array2<FloatValue> {
        let n = interfaces.len() - 1;
        Array2::from_shape_fn((n, 2), |(k, side)| interfaces[k + side])
    }

    /// Mid-level values whose pairwise means land exactly on the inner interfaces
    fn mid_levels(interfaces: &Array1<FloatValue>) -> Array1<FloatValue> {
        let n = interfaces.len() - 1;
        let mut mid = Array1::zeros(n);
        mid[0] = (interfaces[0] + interfaces[1]) / 2.0;
        for k in 1..n {
            mid[k] = 2.0 * interfaces[k] - mid[k - 1];
        }
        mid
    }

    /// Hybrid sigma value at each layer midpoint
    fn eta(&self) -> Array1<FloatValue> {
        let n = self.n_levels();
        Array1::from_shape_fn(n, |k| {
            (self.a_interfaces[k] + self.a_interfaces[k + 1] + self.b_interfaces[k]
                + self.b_interfaces[k + 1])
                / 2.0
        })
    }

    /// Mid-layer pressure for the undisturbed surface pressure
    fn mid_pressure(&self) -> Array1<FloatValue> {
        let n = self.n_levels();
        Array1::from_shape_fn(n, |k| {
            (self.interface_pressure(k, SURFACE_PRESSURE)
                + self.interface_pressure(k + 1, SURFACE_PRESSURE))
                / 2.0
        })
    }

    /// Coordinate values of the model's vertical dimension
    pub fn level_coordinate(&self, kind: ModelKind) -> Array1<FloatValue> {
        match kind {
            ModelKind::IpslCm6aLr => self.mid_pressure(),
            _ => self.eta(),
        }
    }

    /// A dataset holding the vertical-coordinate variables of `kind`, laid out as in
    /// that model's files
    pub fn dataset(&self, kind: ModelKind) -> ArtmipResult<Dataset> {
        let (n_time, n_lat, n_lon) = self.grid();
        let level_dim = kind.level_dim();
        let bounds_dim = kind.bounds_dim();

        let mut ds = Dataset::new()
            .with_attr(SOURCE_ID_ATTR, kind.source_id())
            .with_variable(GriddedField::coordinate(
                TIME_DIM,
                Array::range(0.0, n_time as FloatValue, 1.0) * 30.0,
            ))
            .with_variable(GriddedField::coordinate(
                LAT_DIM,
                Array::linspace(-45.0, 45.0, n_lat),
            ))
            .with_variable(GriddedField::coordinate(
                LON_DIM,
                Array::range(0.0, n_lon as FloatValue, 1.0) * 120.0,
            ))
            .with_variable(GriddedField::coordinate(
                level_dim,
                self.level_coordinate(kind),
            ))
            .with_variable(
                GriddedField::new("ps", [TIME_DIM, LAT_DIM, LON_DIM], self.ps.clone())?
                    .with_attr(UNITS_ATTR, "Pa"),
            );

        let ap_interfaces = &self.a_interfaces * REFERENCE_PRESSURE;
        match kind {
            ModelKind::Cesm2 => {
                // Stored upside down relative to the data
                let mut a_bnds = Self::layer_bounds(&self.a_interfaces);
                let mut b_bnds = Self::layer_bounds(&self.b_interfaces);
                a_bnds.invert_axis(Axis(0));
                b_bnds.invert_axis(Axis(0));
                ds.insert(GriddedField::new("a_bnds", [level_dim, bounds_dim], a_bnds)?);
                ds.insert(GriddedField::new("b_bnds", [level_dim, bounds_dim], b_bnds)?);
                ds.insert(GriddedField::scalar("p0", REFERENCE_PRESSURE));
            }
            ModelKind::CnrmCm61 | ModelKind::CnrmEsm21 => {
                ds.insert(GriddedField::new("ap", [level_dim], Self::mid_levels(&ap_interfaces))?);
                ds.insert(GriddedField::new(
                    "b",
                    [level_dim],
                    Self::mid_levels(&self.b_interfaces),
                )?);
                // The upper bounds published by these models are unusable
                for (name, interfaces) in [("ap_bnds", &ap_interfaces), ("b_bnds", &self.b_interfaces)] {
                    let mut bounds = Self::layer_bounds(interfaces);
                    bounds.column_mut(1).fill(-999.0);
                    ds.insert(GriddedField::new(name, [level_dim, bounds_dim], bounds)?);
                }
            }
            ModelKind::IpslCm6aLr => {
                for (name, interfaces) in [("ap_bnds", &ap_interfaces), ("b_bnds", &self.b_interfaces)] {
                    let n = interfaces.len();
                    let bounds = Array2::from_shape_fn((n, 2), |(k, side)| {
                        interfaces[(k + side).min(n - 1)]
                    });
                    ds.insert(GriddedField::new(name, [KLEVP1_DIM, bounds_dim], bounds)?);
                }
            }
            _ => {
                let (a_name, a_interfaces) = match kind.formula() {
                    HybridFormula::APZeroPlusBPs => {
                        ds.insert(GriddedField::scalar("p0", REFERENCE_PRESSURE));
                        ("a_bnds", &self.a_interfaces)
                    }
                    HybridFormula::ApPlusBPs => ("ap_bnds", &ap_interfaces),
                };
                ds.insert(GriddedField::new(
                    a_name,
                    [level_dim, bounds_dim],
                    Self::layer_bounds(a_interfaces),
                )?);
                ds.insert(GriddedField::new(
                    "b_bnds",
                    [level_dim, bounds_dim],
                    Self::layer_bounds(&self.b_interfaces),
                )?);
            }
        }

        Ok(ds)
    }

    /// A uniform (time, level, lat, lon) field on the model's vertical dimension
    pub fn field(&self, kind: ModelKind, name: &str, value: FloatValue) -> ArtmipResult<GriddedField> {
        let (n_time, n_lat, n_lon) = self.grid();
        GriddedField::new(
            name,
            [TIME_DIM, kind.level_dim(), LAT_DIM, LON_DIM],
            Array4::from_elem((n_time, self.n_levels(), n_lat, n_lon), value),
        )
    }

    /// [`ExampleAtmosphere::dataset`] with uniform data variables added
    pub fn dataset_with(
        &self,
        kind: ModelKind,
        variables: &[(&str, FloatValue)],
    ) -> ArtmipResult<Dataset> {
        let mut ds = self.dataset(kind)?;
        for (name, value) in variables {
            ds.insert(self.field(kind, name, *value)?);
        }
        Ok(ds)
    }
}
