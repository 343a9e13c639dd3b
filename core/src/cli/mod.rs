pub mod report;

use crate::error::{Result, WadocatError};
use crate::metadata::RawInstanceAttributes;
use crate::pipeline::{RetrieveClient, SuvCalculator};
use crate::types::{PetInstanceMetadata, ScalingFactor};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// Command-line arguments for wadocat
#[derive(Parser, Debug)]
#[command(name = "wadocat")]
#[command(about = "DICOMweb per-frame image identifier and metadata resolution tool")]
#[command(version)]
pub struct Cli {
    /// Path to a DICOMweb series metadata JSON file (one attribute
    /// dictionary per instance)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Study Instance UID of the series
    #[arg(long)]
    pub study_uid: String,

    /// Series Instance UID
    #[arg(long)]
    pub series_uid: String,

    /// Restrict resolution to a single SOP Instance UID
    #[arg(long)]
    pub sop_instance_uid: Option<String>,

    /// WADO-RS root used when building identifiers
    #[arg(long, default_value = "http://localhost/dicomweb")]
    pub wado_rs_root: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Retrieval client reading series metadata from a local JSON file
///
/// Stands in for a network DICOMweb client: the file holds the JSON
/// array a `retrieveSeriesMetadata` call would return.
pub struct FileRetrieveClient {
    path: PathBuf,
}

impl FileRetrieveClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RetrieveClient for FileRetrieveClient {
    fn retrieve_series_metadata(
        &self,
        _study_instance_uid: &str,
        _series_instance_uid: &str,
    ) -> Result<Vec<RawInstanceAttributes>> {
        let payload = fs::read_to_string(&self.path).map_err(|e| {
            WadocatError::Retrieval(format!("cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&payload).map_err(|e| {
            WadocatError::Retrieval(format!("cannot parse {}: {e}", self.path.display()))
        })
    }
}

/// Calculator used when no SUV implementation is wired in
///
/// Always fails, which the pipeline recovers from: PT series resolve
/// their identifiers and calibration normally and report an empty
/// scaling provider.
pub struct UnavailableSuvCalculator;

impl SuvCalculator for UnavailableSuvCalculator {
    fn compute(&self, _instances: &[PetInstanceMetadata]) -> Result<Vec<ScalingFactor>> {
        Err(WadocatError::ScalingComputation(
            "no SUV calculator configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_client_reads_instance_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"00080060": {{"vr": "CS", "Value": ["CT"]}}}}]"#
        )
        .unwrap();

        let client = FileRetrieveClient::new(file.path());
        let instances = client.retrieve_series_metadata("1", "2").unwrap();
        assert_eq!(instances.len(), 1);
        assert!(instances[0].contains_key("00080060"));
    }

    #[test]
    fn test_file_client_missing_file_is_retrieval_error() {
        let client = FileRetrieveClient::new("/nonexistent/series.json");
        let err = client.retrieve_series_metadata("1", "2").unwrap_err();
        assert!(matches!(err, WadocatError::Retrieval(_)));
    }

    #[test]
    fn test_file_client_malformed_json_is_retrieval_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let client = FileRetrieveClient::new(file.path());
        assert!(client.retrieve_series_metadata("1", "2").is_err());
    }

    #[test]
    fn test_unavailable_calculator_always_fails() {
        let err = UnavailableSuvCalculator.compute(&[]).unwrap_err();
        assert!(matches!(err, WadocatError::ScalingComputation(_)));
    }
}
