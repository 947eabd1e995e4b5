//! Output variables of the ARTMIP vertical integrals
//!
//! Names follow the CMIP6 convention for column-integrated quantities
//! (`prw` for precipitable water, `*husavi` for vertically integrated humidity
//! fluxes).
//!
//! # Usage
//!
//! ```rust
//! use artmip_core::standard_variables::{output_variable, VAR_PRW};
//!
//! assert_eq!(VAR_PRW.units, "kg/m2");
//! assert_eq!(output_variable("uhusavi").unwrap().units, "kg/m/s");
//! assert!(output_variable("hus").is_none());
//! ```
//!
//! # Available Variables
//!
//! - `VAR_PRW` - Integrated water vapor in kg/m2
//! - `VAR_UHUSAVI` - Eastward integrated vapor transport in kg/m/s
//! - `VAR_VHUSAVI` - Northward integrated vapor transport in kg/m/s
//! - `VAR_WINDHUSAVI` - Integrated vapor transport magnitude in kg/m/s

use crate::field::{GriddedField, LONG_NAME_ATTR, UNITS_ATTR};
use serde::Serialize;

/// Definition of an output variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputVariable {
    /// Variable name in the output dataset
    pub name: &'static str,
    /// Value of the `long_name` attribute
    pub long_name: &'static str,
    pub units: &'static str,
}

impl OutputVariable {
    /// Set the `long_name` and `units` attributes of a field
    pub fn annotate(&self, field: &mut GriddedField) {
        field.set_attr(LONG_NAME_ATTR, self.long_name);
        field.set_attr(UNITS_ATTR, self.units);
    }
}

// ============================================================================
// Water vapor
// ============================================================================

pub const VAR_PRW: OutputVariable = OutputVariable {
    name: "prw",
    long_name: "Integrated Water Vapor",
    units: "kg/m2",
};

// ============================================================================
// Vapor transport
// ============================================================================

pub const VAR_UHUSAVI: OutputVariable = OutputVariable {
    name: "uhusavi",
    long_name: "Eastward Integrated Vapor Transport",
    units: "kg/m/s",
};

pub const VAR_VHUSAVI: OutputVariable = OutputVariable {
    name: "vhusavi",
    long_name: "Northward Integrated Vapor Transport",
    units: "kg/m/s",
};

pub const VAR_WINDHUSAVI: OutputVariable = OutputVariable {
    name: "windhusavi",
    long_name: "Integrated Vapor Transport",
    units: "kg/m/s",
};

/// Every output variable, water vapor first
pub static OUTPUT_VARIABLES: [OutputVariable; 4] =
    [VAR_PRW, VAR_WINDHUSAVI, VAR_UHUSAVI, VAR_VHUSAVI];

/// Look up an output variable by name
pub fn output_variable(name: &str) -> Option<&'static OutputVariable> {
    OUTPUT_VARIABLES.iter().find(|var| var.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, var) in OUTPUT_VARIABLES.iter().enumerate() {
            assert!(OUTPUT_VARIABLES[..i].iter().all(|other| other.name != var.name));
        }
    }

    #[test]
    fn transport_components_point_the_right_way() {
        assert!(VAR_UHUSAVI.long_name.starts_with("Eastward"));
        assert!(VAR_VHUSAVI.long_name.starts_with("Northward"));
    }

    #[test]
    fn annotate_sets_metadata() {
        let mut field = GriddedField::scalar("prw", 1.0);
        VAR_PRW.annotate(&mut field);
        assert_eq!(field.attr("long_name"), Some("Integrated Water Vapor"));
        assert_eq!(field.attr("units"), Some("kg/m2"));
    }
}
