//! Water vapor and vapor transport integrals for one set of model output
//!
//! The inputs are the specific humidity dataset of a model run and, optionally,
//! the matching eastward and northward wind datasets. The output holds `prw` and,
//! when winds are available, `uhusavi`, `vhusavi` and `windhusavi`, together with
//! the variables of the humidity dataset that were not integrated.

use crate::config::IntegralConfig;
use crate::provenance::ProvenanceInfo;
use artmip_core::assembly::{assemble_vapor_transport, assemble_water_vapor, HUS};
use artmip_core::dataset::Dataset;
use artmip_core::errors::ArtmipResult;
use artmip_core::integrate::integrate;
use artmip_core::multiply::safe_multiply;
use artmip_core::recovery::recover_corrupt_coordinates;
use artmip_core::registry::resolve;
use artmip_core::standard_variables::{OutputVariable, OUTPUT_VARIABLES, VAR_UHUSAVI, VAR_VHUSAVI};
use std::borrow::Cow;

/// Name of the eastward wind variable in CMIP6 output
pub const UA: &str = "ua";
/// Name of the northward wind variable in CMIP6 output
pub const VA: &str = "va";

/// Datasets of one (hus, ua, va) set of files
#[derive(Debug, Clone, Copy)]
pub struct ArtmipInputs<'a> {
    pub hus: &'a Dataset,
    pub ua: Option<&'a Dataset>,
    pub va: Option<&'a Dataset>,
    /// Uncorrupted dataset on the same grid, used to repair BCC-CSM2-MR files
    pub reference: Option<&'a Dataset>,
}

impl<'a> ArtmipInputs<'a> {
    pub fn new(hus: &'a Dataset) -> Self {
        Self {
            hus,
            ua: None,
            va: None,
            reference: None,
        }
    }

    pub fn with_winds(mut self, ua: &'a Dataset, va: &'a Dataset) -> Self {
        self.ua = Some(ua);
        self.va = Some(va);
        self
    }

    pub fn with_reference(mut self, reference: &'a Dataset) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Calculate integrated water vapor and, if possible, integrated vapor transport
///
/// Steps:
/// 1. resolve the model from the humidity dataset
/// 2. keep only the first time step when `config.one_timestep_test` is set
/// 3. recover zeroed coordinates for models known to need it
/// 4. integrate `hus` into `prw`
/// 5. when both winds are given and `config.calculate_transport` is set, integrate
///    `ua * hus` and `va * hus` and add the transport magnitude
/// 6. stamp provenance attributes when `config.stamp_provenance` is set
pub fn calculate_artmip_integrals(
    inputs: &ArtmipInputs<'_>,
    config: &IntegralConfig,
    provenance: Option<&ProvenanceInfo>,
) -> ArtmipResult<Dataset> {
    let fallback = config.fallback_model();
    let (_, kind) = resolve(inputs.hus, fallback)?;
    let label = provenance
        .and_then(|p| p.source_files.first())
        .map(String::as_str)
        .unwrap_or(kind.source_id());

    let mut datasets = vec![inputs.hus];
    match (inputs.ua, inputs.va) {
        (Some(ua), Some(va)) if config.calculate_transport => {
            datasets.push(ua);
            datasets.push(va);
        }
        (Some(_), Some(_)) => log::debug!("Vapor transport disabled by configuration"),
        _ => log::debug!("Winds not supplied for {}; skipping vapor transport", label),
    }

    let mut prepared: Vec<Cow<'_, Dataset>> = if kind.has_corrupt_level_recovery() {
        recover_corrupt_coordinates(&datasets, inputs.reference)?
    } else {
        datasets.into_iter().map(Cow::Borrowed).collect()
    };
    if config.one_timestep_test {
        prepared = prepared
            .into_iter()
            .map(|ds| ds.select_time(0).map(Cow::Owned))
            .collect::<ArtmipResult<_>>()?;
    }

    let hus = &prepared[0];
    log::info!("Calculating IWV on {}", label);
    let mut output = assemble_water_vapor(integrate(hus, fallback, Some(&[HUS]))?)?;

    if let [_, ua, va] = prepared.as_slice() {
        log::info!("Calculating IVT on {}", label);
        let uhusavi = safe_multiply(ua, hus, UA, HUS, fallback)?.with_name(VAR_UHUSAVI.name);
        let vhusavi = safe_multiply(va, hus, VA, HUS, fallback)?.with_name(VAR_VHUSAVI.name);
        output.insert(uhusavi);
        output.insert(vhusavi);

        output = integrate(&output, fallback, Some(&[VAR_UHUSAVI.name, VAR_VHUSAVI.name]))?;
        output = assemble_vapor_transport(output)?;
    }

    if config.stamp_provenance {
        provenance.cloned().unwrap_or_default().stamp(&mut output);
    }
    Ok(output)
}

/// One dataset per output variable present in `output`
///
/// Each holds a single output variable alongside the shared coordinates and
/// auxiliary variables, matching the one-variable-per-file CMIP6 layout.
pub fn split_outputs(output: &Dataset) -> Vec<(&'static OutputVariable, Dataset)> {
    OUTPUT_VARIABLES
        .iter()
        .filter(|var| output.contains(var.name))
        .map(|var| {
            let mut single = output.clone();
            for other in OUTPUT_VARIABLES.iter().filter(|other| other.name != var.name) {
                single.remove(other.name);
            }
            (var, single)
        })
        .collect()
}
