//! A collection of named fields with shared coordinates
//!
//! A [`Dataset`] mirrors the content of one CMIP6 file once it has been read into
//! memory: data variables (`hus`, `ua`, ...), coordinate variables (`lev`, `lat`, ...)
//! and the auxiliary hybrid-coordinate variables (`a_bnds`, `b_bnds`, `p0`, `ps`, ...).
//! Coordinate variables are ordinary fields whose only dimension carries their own name.

use crate::errors::{ArtmipError, ArtmipResult};
use crate::field::{Attributes, FloatValue, GriddedField, TIME_DIM};
use ndarray::{Array1, ArrayView1, Ix1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dataset attribute holding the CMIP6 model identifier
pub const SOURCE_ID_ATTR: &str = "source_id";

/// Variables keyed (and ordered) by name, plus dataset-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    variables: BTreeMap<String, GriddedField>,
    #[serde(default)]
    attrs: Attributes,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Model identifier recorded in the file metadata, if any
    pub fn source_id(&self) -> Option<&str> {
        self.attr(SOURCE_ID_ATTR)
    }

    /// Add a field under its own name, returning any field it replaced
    pub fn insert(&mut self, field: GriddedField) -> Option<GriddedField> {
        self.variables.insert(field.name().to_string(), field)
    }

    pub fn with_variable(mut self, field: GriddedField) -> Self {
        self.insert(field);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<GriddedField> {
        self.variables.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Get a variable by name
    pub fn get(&self, name: &str) -> ArtmipResult<&GriddedField> {
        self.variables
            .get(name)
            .ok_or_else(|| ArtmipError::MissingVariable(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> ArtmipResult<&mut GriddedField> {
        self.variables
            .get_mut(name)
            .ok_or_else(|| ArtmipError::MissingVariable(name.to_string()))
    }

    /// Rename a variable, keeping its values and attributes
    pub fn rename(&mut self, old: &str, new: &str) -> ArtmipResult<()> {
        let field = self
            .variables
            .remove(old)
            .ok_or_else(|| ArtmipError::MissingVariable(old.to_string()))?;
        self.insert(field.with_name(new));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GriddedField> {
        self.variables.values()
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Test if a variable is a coordinate variable
    pub fn is_coordinate(&self, name: &str) -> bool {
        self.variables
            .get(name)
            .map(|f| f.dims().len() == 1 && f.dims()[0] == name)
            .unwrap_or(false)
    }

    /// Names of all non-coordinate variables
    pub fn data_variable_names(&self) -> Vec<&str> {
        self.variable_names()
            .filter(|name| !self.is_coordinate(name))
            .collect()
    }

    /// Values of the coordinate variable for `dim`, if present
    pub fn coordinate(&self, dim: &str) -> Option<ArrayView1<'_, FloatValue>> {
        if !self.is_coordinate(dim) {
            return None;
        }
        self.variables
            .get(dim)
            .and_then(|f| f.values().view().into_dimensionality::<Ix1>().ok())
    }

    /// Owned copy of a coordinate, failing if it is absent
    pub fn require_coordinate(&self, dim: &str) -> ArtmipResult<Array1<FloatValue>> {
        self.coordinate(dim)
            .map(|c| c.to_owned())
            .ok_or_else(|| ArtmipError::MissingVariable(dim.to_string()))
    }

    /// Replace (or add) a coordinate variable
    ///
    /// Fields that carry their own copy of this coordinate are updated too.
    /// Attributes of an existing coordinate variable are kept.
    pub fn assign_coordinate(&mut self, dim: &str, values: Array1<FloatValue>) -> ArtmipResult<()> {
        for field in self.variables.values_mut() {
            if field.coord(dim).is_some() {
                *field = field.clone().assign_coord(dim, values.clone())?;
            }
        }

        let mut coordinate = GriddedField::coordinate(dim, values);
        if let Some(existing) = self.variables.get(dim) {
            for (key, value) in existing.attrs() {
                coordinate.set_attr(key.clone(), value.clone());
            }
        }
        self.insert(coordinate);
        Ok(())
    }

    /// A variable together with the dataset coordinates for each of its dimensions
    pub fn data_array(&self, name: &str) -> ArtmipResult<GriddedField> {
        let mut field = self.get(name)?.clone();
        let dims: Vec<String> = field.dims().to_vec();
        for dim in dims.iter() {
            if field.coord(dim).is_some() || dim == name {
                continue;
            }
            if let Some(coord) = self.coordinate(dim) {
                if Some(coord.len()) == field.len_of(dim) {
                    field = field.assign_coord(dim, coord.to_owned())?;
                }
            }
        }
        Ok(field)
    }

    /// Keep a single time step, retaining the time dimension with length one
    pub fn select_time(&self, index: usize) -> ArtmipResult<Dataset> {
        let variables = self
            .variables
            .iter()
            .map(|(name, field)| -> ArtmipResult<(String, GriddedField)> {
                let selected = if field.has_dim(TIME_DIM) {
                    field.isel_range(TIME_DIM, index..index + 1)?
                } else {
                    field.clone()
                };
                Ok((name.clone(), selected))
            })
            .collect::<ArtmipResult<BTreeMap<_, _>>>()?;

        Ok(Dataset {
            variables,
            attrs: self.attrs.clone(),
        })
    }
}
