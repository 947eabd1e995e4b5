//! Labelled n-dimensional fields
//!
//! A [`GriddedField`] is an `f64` array whose axes are addressed by name rather than
//! by position, in the spirit of a CF-style NetCDF variable. Every operation that
//! combines or reshapes fields works in terms of dimension names, so inputs whose
//! axes arrive in a different order are transposed instead of being misread.
//!
//! Coordinate values are optional per dimension. When two fields are multiplied,
//! coordinates that are present on both operands must agree exactly; this is the
//! alignment check that [`crate::multiply::safe_multiply`] deliberately sidesteps.
//!
//! ```rust
//! use artmip_core::field::GriddedField;
//! use ndarray::Array;
//!
//! let field = GriddedField::new(
//!     "hus",
//!     ["lat", "lev"],
//!     Array::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
//! )
//! .unwrap();
//!
//! let transposed = field.transposed(&["lev", "lat"]).unwrap();
//! assert_eq!(transposed.shape(), &[3, 2]);
//!
//! let column = field.sum_over("lev").unwrap();
//! assert_eq!(column.values().as_slice().unwrap(), &[6.0, 15.0]);
//! ```

use crate::errors::{ArtmipError, ArtmipResult};
use ndarray::{Array, Array1, ArrayD, ArrayView, ArrayViewD, Axis, Dimension, IxDyn, Slice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

pub type FloatValue = f64;

/// Free-form metadata (`long_name`, `units`, ...)
pub type Attributes = BTreeMap<String, String>;

pub const TIME_DIM: &str = "time";
pub const LAT_DIM: &str = "lat";
pub const LON_DIM: &str = "lon";

pub const LONG_NAME_ATTR: &str = "long_name";
pub const UNITS_ATTR: &str = "units";

/// A named, labelled array with optional coordinate values and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GriddedField {
    name: String,
    dims: Vec<String>,
    values: ArrayD<FloatValue>,
    /// Coordinate values keyed by dimension name
    #[serde(default)]
    coords: BTreeMap<String, Array1<FloatValue>>,
    #[serde(default)]
    attrs: Attributes,
}

impl GriddedField {
    /// Create a new field
    ///
    /// The number of dimension names must match the rank of `values` and the
    /// names must be unique.
    pub fn new<S, D>(
        name: impl Into<String>,
        dims: impl IntoIterator<Item = S>,
        values: Array<FloatValue, D>,
    ) -> ArtmipResult<Self>
    where
        S: Into<String>,
        D: Dimension,
    {
        let name = name.into();
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != values.ndim() {
            return Err(ArtmipError::shape_mismatch(
                name,
                format!("{} dimensions", values.ndim()),
                &dims,
            ));
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(ArtmipError::Configuration(format!(
                    "Dimension `{}` appears more than once in `{}`",
                    dim, name
                )));
            }
        }

        Ok(Self {
            name,
            dims,
            values: values.into_dyn(),
            coords: BTreeMap::new(),
            attrs: Attributes::new(),
        })
    }

    /// A zero-dimensional field, e.g. a reference pressure
    pub fn scalar(name: impl Into<String>, value: FloatValue) -> Self {
        Self {
            name: name.into(),
            dims: vec![],
            values: ArrayD::from_elem(IxDyn(&[]), value),
            coords: BTreeMap::new(),
            attrs: Attributes::new(),
        }
    }

    /// A coordinate variable: a one-dimensional field whose only dimension shares its name
    pub fn coordinate(name: impl Into<String>, values: Array1<FloatValue>) -> Self {
        let name = name.into();
        Self {
            dims: vec![name.clone()],
            name,
            values: values.into_dyn(),
            coords: BTreeMap::new(),
            attrs: Attributes::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn values(&self) -> &ArrayD<FloatValue> {
        &self.values
    }

    pub fn into_values(self) -> ArrayD<FloatValue> {
        self.values
    }

    /// Position of a named dimension
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.axis_of(dim).is_some()
    }

    /// Length of a named dimension
    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|axis| self.values.len_of(Axis(axis)))
    }

    /// Test if the field spans exactly the given set of dimensions, in any order
    pub fn spans(&self, dims: &[&str]) -> bool {
        self.dims.len() == dims.len() && dims.iter().all(|d| self.has_dim(d))
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

    pub fn coord(&self, dim: &str) -> Option<&Array1<FloatValue>> {
        self.coords.get(dim)
    }

    pub fn coords(&self) -> &BTreeMap<String, Array1<FloatValue>> {
        &self.coords
    }

    /// Attach coordinate values to a dimension, replacing any existing values
    ///
    /// Only the length is checked; the values themselves are taken on trust.
    pub fn assign_coord(mut self, dim: &str, values: Array1<FloatValue>) -> ArtmipResult<Self> {
        let len = self.len_of(dim).ok_or_else(|| {
            ArtmipError::shape_mismatch(&self.name, format!("dimension `{}`", dim), &self.dims)
        })?;
        if values.len() != len {
            return Err(ArtmipError::shape_mismatch(
                format!("{}.{}", self.name, dim),
                [len],
                [values.len()],
            ));
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    /// The single value held by a field with exactly one element
    pub fn scalar_value(&self) -> ArtmipResult<FloatValue> {
        match self.values.len() {
            1 => Ok(self.values.iter().copied().next().unwrap_or(FloatValue::NAN)),
            _ => Err(ArtmipError::shape_mismatch(
                &self.name,
                "a single value",
                self.shape(),
            )),
        }
    }

    /// Axis permutation that maps this field onto `order`
    fn permutation(&self, order: &[&str]) -> ArtmipResult<Vec<usize>> {
        if order.len() != self.dims.len() {
            return Err(ArtmipError::shape_mismatch(&self.name, order, &self.dims));
        }
        order
            .iter()
            .map(|dim| {
                self.axis_of(dim)
                    .ok_or_else(|| ArtmipError::shape_mismatch(&self.name, order, &self.dims))
            })
            .collect()
    }

    /// Borrow the values with axes arranged in `order`
    ///
    /// `D` fixes the rank of the returned view, e.g. `Ix3` for a (time, lat, lon) field.
    pub fn view_as<D: Dimension>(&self, order: &[&str]) -> ArtmipResult<ArrayView<'_, FloatValue, D>> {
        let perm = self.permutation(order)?;
        self.values
            .view()
            .permuted_axes(perm)
            .into_dimensionality::<D>()
            .map_err(|_| ArtmipError::shape_mismatch(&self.name, order, &self.dims))
    }

    /// A copy of the field with axes arranged in `order`
    pub fn transposed(&self, order: &[&str]) -> ArtmipResult<Self> {
        let perm = self.permutation(order)?;
        let values = self
            .values
            .view()
            .permuted_axes(perm)
            .as_standard_layout()
            .into_owned();

        Ok(Self {
            name: self.name.clone(),
            dims: order.iter().map(|d| d.to_string()).collect(),
            values,
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Sum over a named dimension, dropping it and its coordinate
    ///
    /// Attributes are not carried over since the units change.
    pub fn sum_over(&self, dim: &str) -> ArtmipResult<Self> {
        let axis = self.axis_of(dim).ok_or_else(|| {
            ArtmipError::shape_mismatch(&self.name, format!("dimension `{}`", dim), &self.dims)
        })?;

        let mut dims = self.dims.clone();
        dims.remove(axis);
        let mut coords = self.coords.clone();
        coords.remove(dim);

        Ok(Self {
            name: self.name.clone(),
            dims,
            values: self.values.sum_axis(Axis(axis)),
            coords,
            attrs: Attributes::new(),
        })
    }

    /// Combine two fields over the same set of dimensions elementwise
    ///
    /// `other` is transposed onto this field's axis order. Shapes must then agree,
    /// and any dimension carrying coordinates on both sides must carry identical
    /// values. The result keeps this field's name and axis order, and the union of
    /// both coordinate sets.
    pub fn try_zip_with(
        &self,
        other: &GriddedField,
        f: impl Fn(FloatValue, FloatValue) -> FloatValue,
    ) -> ArtmipResult<Self> {
        let order: Vec<&str> = self.dims.iter().map(String::as_str).collect();
        let perm = other
            .permutation(&order)
            .map_err(|_| ArtmipError::shape_mismatch(&other.name, &self.dims, &other.dims))?;
        let aligned: ArrayViewD<'_, FloatValue> = other.values.view().permuted_axes(perm);

        if aligned.shape() != self.values.shape() {
            return Err(ArtmipError::shape_mismatch(
                &other.name,
                self.values.shape(),
                aligned.shape(),
            ));
        }

        let mut coords = self.coords.clone();
        for (dim, theirs) in other.coords.iter() {
            match self.coords.get(dim) {
                Some(ours) if ours != theirs => {
                    return Err(ArtmipError::CoordinateMismatch { dim: dim.clone() })
                }
                Some(_) => {}
                None => {
                    coords.insert(dim.clone(), theirs.clone());
                }
            }
        }

        let mut values = self.values.clone();
        values.zip_mut_with(&aligned, |a, b| *a = f(*a, *b));

        Ok(Self {
            name: self.name.clone(),
            dims: self.dims.clone(),
            values,
            coords,
            attrs: Attributes::new(),
        })
    }

    /// Elementwise product, aligned as in [`GriddedField::try_zip_with`]
    pub fn try_mul(&self, other: &GriddedField) -> ArtmipResult<Self> {
        self.try_zip_with(other, |a, b| a * b)
    }

    /// Multiply every value by a constant
    pub fn scaled(&self, factor: FloatValue) -> Self {
        self.mapv(|v| v * factor)
    }

    /// Apply `f` to every value, keeping dims and coordinates
    pub fn mapv(&self, f: impl Fn(FloatValue) -> FloatValue) -> Self {
        Self {
            name: self.name.clone(),
            dims: self.dims.clone(),
            values: self.values.mapv(f),
            coords: self.coords.clone(),
            attrs: Attributes::new(),
        }
    }

    /// Reverse the order of the values along a dimension
    ///
    /// Coordinate labels stay where they are; only the data is flipped.
    pub fn reversed_along(&self, dim: &str) -> ArtmipResult<Self> {
        let axis = self.axis_of(dim).ok_or_else(|| {
            ArtmipError::shape_mismatch(&self.name, format!("dimension `{}`", dim), &self.dims)
        })?;
        let mut values = self.values.clone();
        values.invert_axis(Axis(axis));

        Ok(Self {
            values: values.as_standard_layout().into_owned(),
            ..self.clone()
        })
    }

    /// Select a contiguous index range along a dimension, keeping the dimension
    pub fn isel_range(&self, dim: &str, range: Range<usize>) -> ArtmipResult<Self> {
        let axis = self.axis_of(dim).ok_or_else(|| {
            ArtmipError::shape_mismatch(&self.name, format!("dimension `{}`", dim), &self.dims)
        })?;
        let len = self.values.len_of(Axis(axis));
        if range.start >= range.end || range.end > len {
            return Err(ArtmipError::shape_mismatch(
                format!("{}.{}", self.name, dim),
                format!("index range within 0..{}", len),
                range,
            ));
        }

        let slice = Slice::from(range.clone());
        let mut coords = self.coords.clone();
        if let Some(c) = coords.get_mut(dim) {
            *c = c.slice_axis(Axis(0), slice).to_owned();
        }

        Ok(Self {
            name: self.name.clone(),
            dims: self.dims.clone(),
            values: self.values.slice_axis(Axis(axis), slice).to_owned(),
            coords,
            attrs: self.attrs.clone(),
        })
    }
}
