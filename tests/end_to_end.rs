//! Water vapor and vapor transport of a three layer toy atmosphere
//!
//! Surface pressure 101325 Pa, top interface 1000 Pa, and uniform
//! hus = 0.01 kg/kg, ua = 10 m/s, va = 5 m/s.

use approx::assert_relative_eq;
use artmip::provenance::{SOURCE_FILES_ATTR, VERSION_ATTR};
use artmip::{calculate_artmip_integrals, split_outputs, ArtmipInputs, IntegralConfig, ProvenanceInfo};
use artmip_core::dataset::Dataset;
use artmip_core::errors::ArtmipError;
use artmip_core::example_atmosphere::{ExampleAtmosphere, SURFACE_PRESSURE};
use artmip_core::field::{LONG_NAME_ATTR, UNITS_ATTR};
use artmip_core::integrate::STANDARD_GRAVITY;
use artmip_core::registry::ModelKind;
use ndarray::Array1;

const HUS: f64 = 0.01;
const UA: f64 = 10.0;
const VA: f64 = 5.0;
const P_TOP: f64 = 1000.0;

fn toy_datasets(kind: ModelKind) -> (Dataset, Dataset, Dataset) {
    let atmosphere = ExampleAtmosphere::three_level();
    (
        atmosphere.dataset_with(kind, &[("hus", HUS)]).unwrap(),
        atmosphere.dataset_with(kind, &[("ua", UA)]).unwrap(),
        atmosphere.dataset_with(kind, &[("va", VA)]).unwrap(),
    )
}

fn expected_prw() -> f64 {
    HUS * (SURFACE_PRESSURE - P_TOP) / STANDARD_GRAVITY
}

fn assert_all(ds: &Dataset, name: &str, expected: f64) {
    let field = ds.get(name).unwrap();
    assert_eq!(field.ndim(), 3, "{} should be (time, lat, lon)", name);
    for value in field.values().iter() {
        assert_relative_eq!(*value, expected, max_relative = 1e-6);
    }
}

#[test]
fn test_toy_atmosphere() {
    let (hus, ua, va) = toy_datasets(ModelKind::GissE21G);
    let inputs = ArtmipInputs::new(&hus).with_winds(&ua, &va);
    let output = calculate_artmip_integrals(&inputs, &IntegralConfig::default(), None).unwrap();

    let prw = expected_prw();
    assert_all(&output, "prw", prw);
    assert_all(&output, "uhusavi", UA * prw);
    assert_all(&output, "vhusavi", VA * prw);
    assert_all(&output, "windhusavi", (UA * UA + VA * VA).sqrt() * prw);

    let units = [
        ("prw", "kg/m2"),
        ("uhusavi", "kg/m/s"),
        ("vhusavi", "kg/m/s"),
        ("windhusavi", "kg/m/s"),
    ];
    for (name, unit) in units {
        let field = output.get(name).unwrap();
        assert_eq!(field.attr(UNITS_ATTR), Some(unit));
        assert!(field.attr(LONG_NAME_ATTR).is_some());
    }
}

#[test]
fn test_magnitude_matches_components() {
    let (hus, ua, va) = toy_datasets(ModelKind::Cesm2);
    let inputs = ArtmipInputs::new(&hus).with_winds(&ua, &va);
    let output = calculate_artmip_integrals(&inputs, &IntegralConfig::default(), None).unwrap();

    let u = output.get("uhusavi").unwrap().values();
    let v = output.get("vhusavi").unwrap().values();
    let magnitude = output.get("windhusavi").unwrap().values();
    for ((m, u), v) in magnitude.iter().zip(u.iter()).zip(v.iter()) {
        assert_eq!(*m, (u * u + v * v).sqrt());
    }
}

#[test]
fn test_corrupt_bcc_files_recovered() {
    let (hus, ua, va) = toy_datasets(ModelKind::BccCsm2Mr);
    let reference = ExampleAtmosphere::three_level()
        .dataset(ModelKind::BccCsm2Mr)
        .unwrap();

    // The wind file was written with zeroed coordinates
    let mut corrupt_ua = ua.clone();
    for dim in ["lev", "lat", "lon"] {
        let len = ua.coordinate(dim).unwrap().len();
        corrupt_ua.assign_coordinate(dim, Array1::zeros(len)).unwrap();
    }

    let inputs = ArtmipInputs::new(&hus).with_winds(&corrupt_ua, &va);
    assert!(matches!(
        calculate_artmip_integrals(&inputs, &IntegralConfig::default(), None),
        Err(ArtmipError::Configuration(_))
    ));

    let inputs = inputs.with_reference(&reference);
    let output = calculate_artmip_integrals(&inputs, &IntegralConfig::default(), None).unwrap();
    assert_all(&output, "uhusavi", UA * expected_prw());
    assert_eq!(output.coordinate("lev"), reference.coordinate("lev"));
}

#[test]
fn test_provenance_and_split() {
    let (hus, ua, va) = toy_datasets(ModelKind::IpslCm6aLr);
    let inputs = ArtmipInputs::new(&hus).with_winds(&ua, &va);
    let provenance = ProvenanceInfo::new(["hus_IPSL.nc", "ua_IPSL.nc", "va_IPSL.nc"]);
    let output =
        calculate_artmip_integrals(&inputs, &IntegralConfig::default(), Some(&provenance)).unwrap();

    let outputs = split_outputs(&output);
    assert_eq!(outputs.len(), 4);
    for (var, ds) in outputs {
        assert!(ds.contains(var.name));
        assert_eq!(
            ds.attr(SOURCE_FILES_ATTR),
            Some("hus_IPSL.nc ua_IPSL.nc va_IPSL.nc")
        );
        assert!(ds.attr(VERSION_ATTR).is_some());
    }
}

#[test]
fn test_config_from_toml() {
    let (hus, _, _) = toy_datasets(ModelKind::MriEsm20);
    let mut unlabelled = Dataset::new();
    for field in hus.iter() {
        unlabelled.insert(field.clone());
    }

    let config = IntegralConfig::from_toml_str(
        r#"
model = "MRI-ESM2-0"
one_timestep_test = true
"#,
    )
    .unwrap();
    let output = calculate_artmip_integrals(&ArtmipInputs::new(&unlabelled), &config, None).unwrap();
    assert_eq!(output.get("prw").unwrap().len_of("time"), Some(1));
    assert_all(&output, "prw", expected_prw());
}
