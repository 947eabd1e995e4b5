//! Derived quantities built from the column integrals

use crate::dataset::Dataset;
use crate::errors::ArtmipResult;
use crate::field::GriddedField;
use crate::standard_variables::{VAR_PRW, VAR_UHUSAVI, VAR_VHUSAVI, VAR_WINDHUSAVI};

/// Name of the specific humidity variable in CMIP6 output
pub const HUS: &str = "hus";

/// Turn integrated `hus` into `prw` with its output metadata
pub fn assemble_water_vapor(mut integrated: Dataset) -> ArtmipResult<Dataset> {
    integrated.rename(HUS, VAR_PRW.name)?;
    VAR_PRW.annotate(integrated.get_mut(VAR_PRW.name)?);
    Ok(integrated)
}

/// Magnitude $\sqrt{u^2 + v^2}$ of the integrated vapor transport
pub fn vapor_transport_magnitude(
    eastward: &GriddedField,
    northward: &GriddedField,
) -> ArtmipResult<GriddedField> {
    Ok(eastward
        .try_zip_with(northward, |u, v| (u * u + v * v).sqrt())?
        .with_name(VAR_WINDHUSAVI.name))
}

/// Add `windhusavi` and annotate the transport components
///
/// Does nothing unless both `uhusavi` and `vhusavi` are present.
pub fn assemble_vapor_transport(mut integrated: Dataset) -> ArtmipResult<Dataset> {
    if !(integrated.contains(VAR_UHUSAVI.name) && integrated.contains(VAR_VHUSAVI.name)) {
        return Ok(integrated);
    }

    let mut magnitude = vapor_transport_magnitude(
        integrated.get(VAR_UHUSAVI.name)?,
        integrated.get(VAR_VHUSAVI.name)?,
    )?;
    VAR_WINDHUSAVI.annotate(&mut magnitude);
    integrated.insert(magnitude);

    for var in [VAR_UHUSAVI, VAR_VHUSAVI] {
        var.annotate(integrated.get_mut(var.name)?);
    }
    Ok(integrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ArtmipError;
    use crate::field::{LONG_NAME_ATTR, UNITS_ATTR};
    use ndarray::array;

    fn column(name: &str, values: ndarray::Array2<f64>) -> GriddedField {
        GriddedField::new(name, ["lat", "lon"], values).unwrap()
    }

    #[test]
    fn water_vapor_renamed_and_annotated() {
        let ds = Dataset::new().with_variable(column("hus", array![[20.0, 30.0]]));
        let ds = assemble_water_vapor(ds).unwrap();

        assert!(!ds.contains("hus"));
        let prw = ds.get("prw").unwrap();
        assert_eq!(prw.values(), &array![[20.0, 30.0]].into_dyn());
        assert_eq!(prw.attr(LONG_NAME_ATTR), Some("Integrated Water Vapor"));
        assert_eq!(prw.attr(UNITS_ATTR), Some("kg/m2"));
    }

    #[test]
    fn water_vapor_requires_hus() {
        assert_eq!(
            assemble_water_vapor(Dataset::new()),
            Err(ArtmipError::MissingVariable("hus".to_string()))
        );
    }

    #[test]
    fn magnitude_is_exact() {
        let u = column("uhusavi", array![[3.0, -250.5], [0.0, 1e-3]]);
        let v = column("vhusavi", array![[4.0, 120.25], [-7.0, 2e-3]]);
        let magnitude = vapor_transport_magnitude(&u, &v).unwrap();

        assert_eq!(magnitude.name(), "windhusavi");
        for ((m, u), v) in magnitude
            .values()
            .iter()
            .zip(u.values().iter())
            .zip(v.values().iter())
        {
            assert_eq!(*m, (u * u + v * v).sqrt());
        }
        assert_eq!(magnitude.values()[[0, 0]], 5.0);
    }

    #[test]
    fn transport_annotated() {
        let ds = Dataset::new()
            .with_variable(column("uhusavi", array![[3.0]]))
            .with_variable(column("vhusavi", array![[4.0]]));
        let ds = assemble_vapor_transport(ds).unwrap();

        let expected = [
            ("windhusavi", "Integrated Vapor Transport"),
            ("uhusavi", "Eastward Integrated Vapor Transport"),
            ("vhusavi", "Northward Integrated Vapor Transport"),
        ];
        for (name, long_name) in expected {
            let field = ds.get(name).unwrap();
            assert_eq!(field.attr(LONG_NAME_ATTR), Some(long_name));
            assert_eq!(field.attr(UNITS_ATTR), Some("kg/m/s"));
        }
    }

    #[test]
    fn single_component_left_alone() {
        let ds = Dataset::new().with_variable(column("uhusavi", array![[3.0]]));
        assert_eq!(assemble_vapor_transport(ds.clone()).unwrap(), ds);
    }
}
