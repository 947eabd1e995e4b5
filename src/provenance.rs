//! Provenance attributes recorded on the output datasets

use artmip_core::dataset::Dataset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SOURCE_FILES_ATTR: &str = "artmip_cmip6_source_files";
pub const CALCULATION_DATE_ATTR: &str = "artmip_cmip6_integral_calculation_date";
pub const VERSION_ATTR: &str = "artmip_cmip6_integral_version";
pub const SCRIPT_REPO_ATTR: &str = "artmip_script_repo";
pub const SCRIPT_BRANCH_ATTR: &str = "artmip_script_branch";
pub const SCRIPT_REV_ATTR: &str = "artmip_script_rev";

/// Version control details of the code that produced the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub url: String,
    pub branch: String,
    /// Short commit hash
    pub revision: String,
}

/// Where an output came from
///
/// Supplied by the caller; the library itself never inspects the filesystem or a
/// repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceInfo {
    /// Input files (hus, then ua and va when used)
    pub source_files: Vec<String>,
    #[serde(default)]
    pub repository: Option<RepositoryInfo>,
}

impl ProvenanceInfo {
    pub fn new<S: Into<String>>(source_files: impl IntoIterator<Item = S>) -> Self {
        Self {
            source_files: source_files.into_iter().map(Into::into).collect(),
            repository: None,
        }
    }

    pub fn with_repository(mut self, repository: RepositoryInfo) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Record provenance on `dataset`, dated now
    pub fn stamp(&self, dataset: &mut Dataset) {
        self.stamp_at(dataset, Utc::now());
    }

    /// Record provenance on `dataset` with an explicit calculation time
    pub fn stamp_at(&self, dataset: &mut Dataset, calculated: DateTime<Utc>) {
        if !self.source_files.is_empty() {
            dataset.set_attr(SOURCE_FILES_ATTR, self.source_files.join(" "));
        }
        dataset.set_attr(
            CALCULATION_DATE_ATTR,
            calculated.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        dataset.set_attr(VERSION_ATTR, crate_version());

        if let Some(repository) = &self.repository {
            dataset.set_attr(SCRIPT_REPO_ATTR, repository.url.clone());
            dataset.set_attr(SCRIPT_BRANCH_ATTR, repository.branch.clone());
            dataset.set_attr(SCRIPT_REV_ATTR, repository.revision.clone());
        }
    }
}

/// Name and version of this crate, e.g. `artmip 0.1.0`
pub fn crate_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn calculated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn stamps_sources_and_date() {
        let mut ds = Dataset::new();
        ProvenanceInfo::new(["hus_day.nc", "ua_day.nc", "va_day.nc"]).stamp_at(&mut ds, calculated());

        assert_eq!(ds.attr(SOURCE_FILES_ATTR), Some("hus_day.nc ua_day.nc va_day.nc"));
        assert_eq!(ds.attr(CALCULATION_DATE_ATTR), Some("2020-03-14 15:09:26 UTC"));
        assert_eq!(ds.attr(VERSION_ATTR), Some(crate_version().as_str()));
        assert!(ds.attr(SCRIPT_REPO_ATTR).is_none());
    }

    #[test]
    fn repository_attributes() {
        let mut ds = Dataset::new();
        ProvenanceInfo::new(["hus_day.nc"])
            .with_repository(RepositoryInfo {
                url: "https://example.org/artmip.git".to_string(),
                branch: "main".to_string(),
                revision: "1a2b3c4".to_string(),
            })
            .stamp_at(&mut ds, calculated());

        assert_eq!(ds.attr(SCRIPT_REPO_ATTR), Some("https://example.org/artmip.git"));
        assert_eq!(ds.attr(SCRIPT_BRANCH_ATTR), Some("main"));
        assert_eq!(ds.attr(SCRIPT_REV_ATTR), Some("1a2b3c4"));
    }

    #[test]
    fn no_sources_listed() {
        let mut ds = Dataset::new();
        ProvenanceInfo::default().stamp_at(&mut ds, calculated());
        assert!(ds.attr(SOURCE_FILES_ATTR).is_none());
        assert!(ds.attr(CALCULATION_DATE_ATTR).is_some());
    }

    #[test]
    fn crate_version_names_package() {
        assert!(crate_version().starts_with("artmip "));
    }
}
