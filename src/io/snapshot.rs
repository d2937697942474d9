//! Read/write snapshot JSON files.
//!
//! A snapshot is the portable record of one successful fetch:
//! - where it came from and when (`endpoint`, `fetched_at`)
//! - the three typed sequences exactly as committed to the view state

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::VaccinationSource;
use crate::domain::{AgeBucketCount, DailyDosePoint, GenderCount, VaccinationData};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub tool: String,
    pub endpoint: String,
    pub fetched_at: DateTime<Utc>,
    pub daily_doses: Vec<DailyDosePoint>,
    pub age_buckets: Vec<AgeBucketCount>,
    pub gender_counts: Vec<GenderCount>,
}

impl SnapshotFile {
    pub fn new(endpoint: &str, fetched_at: DateTime<Utc>, data: &VaccinationData) -> Self {
        Self {
            tool: "cowin".to_string(),
            endpoint: endpoint.to_string(),
            fetched_at,
            daily_doses: data.daily_doses().to_vec(),
            age_buckets: data.age_buckets().to_vec(),
            gender_counts: data.gender_counts().to_vec(),
        }
    }

    /// Re-validate the stored sequences.
    pub fn into_data(self) -> Result<VaccinationData, AppError> {
        VaccinationData::new(self.daily_doses, self.age_buckets, self.gender_counts)
    }
}

/// Write a snapshot JSON file.
pub fn write_snapshot_json(path: &Path, snapshot: &SnapshotFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create snapshot JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::config(format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

/// Read a snapshot JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<SnapshotFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open snapshot JSON '{}': {e}", path.display())))?;
    let snapshot: SnapshotFile = serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid snapshot JSON: {e}")))?;
    Ok(snapshot)
}

/// Serves a previously exported snapshot through the normal load path.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VaccinationSource for SnapshotSource {
    fn fetch(&self) -> Result<VaccinationData, AppError> {
        read_snapshot_json(&self.path)?.into_data()
    }
}
