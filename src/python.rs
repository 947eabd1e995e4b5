use artmip_core::dataset::Dataset;
use artmip_core::errors::ArtmipError;
use artmip_core::field::GriddedField;
use artmip_core::registry::ModelKind;
use numpy::{PyArrayDyn, PyReadonlyArrayDyn, ToPyArray};
use pyo3::exceptions::{PyKeyError, PyNotImplementedError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

/// Map the error taxonomy onto the closest builtin Python exceptions
fn to_py_err(err: ArtmipError) -> PyErr {
    match err {
        ArtmipError::Configuration(_) => PyRuntimeError::new_err(err.to_string()),
        ArtmipError::UnsupportedModel(_) => PyNotImplementedError::new_err(err.to_string()),
        ArtmipError::MissingVariable(name) => PyKeyError::new_err(name),
        ArtmipError::ShapeMismatch { .. } | ArtmipError::CoordinateMismatch { .. } => {
            PyValueError::new_err(err.to_string())
        }
    }
}

type PyVariables<'py> = HashMap<String, (Vec<String>, PyReadonlyArrayDyn<'py, f64>)>;
type PyIntegrated<'py> = HashMap<String, (Vec<String>, Bound<'py, PyArrayDyn<f64>>)>;

/// Vertically integrate variables of a dataset.
///
/// `variables` maps each variable name to a `(dims, values)` pair, for example
/// `{"hus": (["time", "lev", "lat", "lon"], hus), "lev": (["lev"], lev), ...}`.
/// `attrs` holds the dataset attributes, including `source_id`.
///
/// Returns every variable in the same `(dims, values)` form, with the selected
/// variables replaced by their column integrals.
///
/// # Example
///
/// ```python
/// from artmip._lib import integrate
///
/// result = integrate(variables, {"source_id": "CESM2"}, names=["hus"])
/// dims, prw = result["hus"]
/// ```
#[pyfunction]
#[pyo3(signature = (variables, attrs, names=None, model=None))]
fn integrate<'py>(
    py: Python<'py>,
    variables: PyVariables<'py>,
    attrs: HashMap<String, String>,
    names: Option<Vec<String>>,
    model: Option<String>,
) -> PyResult<PyIntegrated<'py>> {
    let mut dataset = Dataset::new();
    for (key, value) in attrs {
        dataset.set_attr(key, value);
    }
    for (name, (dims, values)) in variables {
        let field = GriddedField::new(name, dims, values.as_array().to_owned()).map_err(to_py_err)?;
        dataset.insert(field);
    }

    let names: Option<Vec<&str>> = names
        .as_ref()
        .map(|names| names.iter().map(String::as_str).collect());
    let result = artmip_core::integrate::integrate(&dataset, model.as_deref(), names.as_deref())
        .map_err(to_py_err)?;

    Ok(result
        .iter()
        .map(|field| {
            (
                field.name().to_string(),
                (field.dims().to_vec(), field.values().to_pyarray_bound(py)),
            )
        })
        .collect())
}

/// `source_id` of every model that can be integrated
#[pyfunction]
fn supported_models() -> Vec<&'static str> {
    ModelKind::ALL.iter().map(|kind| kind.source_id()).collect()
}

/// Name of the vertical dimension used by a model
#[pyfunction]
fn level_dim(source_id: &str) -> PyResult<&'static str> {
    source_id
        .parse::<ModelKind>()
        .map(ModelKind::level_dim)
        .map_err(to_py_err)
}

#[pymodule]
#[pyo3(name = "_lib")]
fn artmip(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(integrate, m)?)?;
    m.add_function(wrap_pyfunction!(supported_models, m)?)?;
    m.add_function(wrap_pyfunction!(level_dim, m)?)?;
    Ok(())
}
