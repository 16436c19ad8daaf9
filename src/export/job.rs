//! Export job requests against the `export_microscopy_datasets` service.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::SchemaRevision;

/// Name of the server-side aggregation plug-in.
pub const EXPORT_SERVICE_NAME: &str = "export_microscopy_datasets";

/// How the server delivers the exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Copy into the user's folder on the server.
    Normal,
    /// Copy into the user's HRM source folder.
    Hrm,
    /// Package into a zip archive for browser download.
    Zip,
}

impl ExportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportMode::Normal => "normal",
            ExportMode::Hrm => "hrm",
            ExportMode::Zip => "zip",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(ExportMode::Normal),
            "hrm" => Ok(ExportMode::Hrm),
            "zip" => Ok(ExportMode::Zip),
            other => Err(format!("unknown export mode '{other}'")),
        }
    }
}

/// One export request, covering either a whole experiment (no sample set)
/// or a single sample within it.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// COLLECTION experiment identifier.
    pub experiment_id: String,
    /// MICROSCOPY_EXPERIMENT sample perm id (revisions 3+).
    pub experiment_sample_perm_id: Option<String>,
    /// Sample perm id / identifier; empty exports the whole experiment.
    pub sample: Option<String>,
    pub mode: ExportMode,
}

impl ExportRequest {
    /// Initial parameter map for the aggregation service, in the shape the
    /// given schema revision expects. The viewers always sent the sample key,
    /// with an empty value for whole-experiment exports; that is preserved.
    pub fn parameters(&self, revision: SchemaRevision) -> BTreeMap<String, String> {
        let mut parameters = BTreeMap::new();
        parameters.insert("experimentId".to_string(), self.experiment_id.clone());
        if revision.uses_experiment_sample() {
            parameters.insert(
                "expSamplePermId".to_string(),
                self.experiment_sample_perm_id.clone().unwrap_or_default(),
            );
        }
        parameters.insert(
            revision.sample_parameter_key().to_string(),
            self.sample.clone().unwrap_or_default(),
        );
        parameters.insert("mode".to_string(), self.mode.as_str().to_string());
        parameters
    }
}

/// Parameter map for a status poll: only the job uid.
pub fn poll_parameters(uid: &str) -> BTreeMap<String, String> {
    let mut parameters = BTreeMap::new();
    parameters.insert("uid".to_string(), uid.to_string());
    parameters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: ExportMode) -> ExportRequest {
        ExportRequest {
            experiment_id: "/SPACE/PROJ/COLLECTION_1".to_string(),
            experiment_sample_perm_id: Some("20240101120000000-10".to_string()),
            sample: Some("20240101120000000-11".to_string()),
            mode,
        }
    }

    #[test]
    fn modern_revisions_send_perm_id_keys() {
        let parameters = request(ExportMode::Zip).parameters(SchemaRevision::R4);
        assert_eq!(
            parameters.get("experimentId").map(String::as_str),
            Some("/SPACE/PROJ/COLLECTION_1")
        );
        assert_eq!(
            parameters.get("expSamplePermId").map(String::as_str),
            Some("20240101120000000-10")
        );
        assert_eq!(
            parameters.get("samplePermId").map(String::as_str),
            Some("20240101120000000-11")
        );
        assert_eq!(parameters.get("mode").map(String::as_str), Some("zip"));
        assert!(!parameters.contains_key("sampleId"));
    }

    #[test]
    fn legacy_revisions_send_sample_id_and_no_exp_sample() {
        let parameters = request(ExportMode::Normal).parameters(SchemaRevision::R1);
        assert!(!parameters.contains_key("expSamplePermId"));
        assert!(!parameters.contains_key("samplePermId"));
        assert_eq!(
            parameters.get("sampleId").map(String::as_str),
            Some("20240101120000000-11")
        );
    }

    #[test]
    fn whole_experiment_export_sends_empty_sample_value() {
        let mut whole = request(ExportMode::Hrm);
        whole.sample = None;
        let parameters = whole.parameters(SchemaRevision::R4);
        assert_eq!(parameters.get("samplePermId").map(String::as_str), Some(""));
    }

    #[test]
    fn poll_parameters_carry_only_the_uid() {
        let parameters = poll_parameters("abc-123");
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters.get("uid").map(String::as_str), Some("abc-123"));
    }

    #[test]
    fn mode_round_trips_through_str() {
        for mode in [ExportMode::Normal, ExportMode::Hrm, ExportMode::Zip] {
            assert_eq!(mode.as_str().parse::<ExportMode>().unwrap(), mode);
        }
        assert!("tar".parse::<ExportMode>().is_err());
    }
}
