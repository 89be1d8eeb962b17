//! Workload loading.
//!
//! Converts JSON workload descriptions into [`Scenario`] objects. Two
//! shapes are accepted:
//!
//! - a bare array of burst schedules: `[[4, 24, 5], [18, 31, 19]]`
//! - an object with named fields:
//!   `{"processes": [{"bursts": [4, 24, 5]}, {"bursts": [18, 31, 19]}]}`
//!
//! Schedules alternate CPU and I/O bursts, starting with CPU. Every
//! process arrives at tick 0.

use std::fmt;

use serde::Deserialize;

use crate::error::SimError;
use crate::scenario::Scenario;
use crate::types::Ticks;

/// Errors from loading a JSON workload.
#[derive(Debug)]
pub enum WorkloadError {
    /// JSON parse error.
    Json(serde_json::Error),
    /// Well-formed JSON describing an invalid process set.
    Invalid(SimError),
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadError::Json(e) => write!(f, "JSON parse error: {e}"),
            WorkloadError::Invalid(e) => write!(f, "invalid workload: {e}"),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkloadError::Json(e) => Some(e),
            WorkloadError::Invalid(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for WorkloadError {
    fn from(e: serde_json::Error) -> Self {
        WorkloadError::Json(e)
    }
}

impl From<SimError> for WorkloadError {
    fn from(e: SimError) -> Self {
        WorkloadError::Invalid(e)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WorkloadFile {
    Bare(Vec<Vec<Ticks>>),
    Named { processes: Vec<ProcessEntry> },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcessEntry {
    bursts: Vec<Ticks>,
}

/// Parse a JSON workload into a validated scenario.
pub fn load_workload(json: &str) -> Result<Scenario, WorkloadError> {
    let schedules: Vec<Vec<Ticks>> = match serde_json::from_str(json)? {
        WorkloadFile::Bare(schedules) => schedules,
        WorkloadFile::Named { processes } => processes.into_iter().map(|p| p.bursts).collect(),
    };
    Ok(Scenario::from_bursts(schedules)?)
}

/// Eight processes mixing short and long CPU bursts with long I/O waits.
pub const SAMPLE_BURSTS: [&[Ticks]; 8] = [
    &[4, 24, 5, 73, 3, 31, 5, 27, 4, 33, 6, 43, 4, 64, 5, 19, 2],
    &[18, 31, 19, 35, 11, 42, 18, 43, 19, 47, 18, 43, 17, 51, 19, 32, 10],
    &[6, 18, 4, 21, 7, 19, 4, 16, 5, 29, 7, 21, 8, 22, 6, 24, 5],
    &[17, 42, 19, 55, 20, 54, 17, 52, 15, 67, 12, 72, 15, 66, 14],
    &[5, 81, 4, 82, 5, 71, 3, 61, 5, 62, 4, 51, 3, 77, 4, 61, 3, 42, 5],
    &[10, 35, 12, 41, 14, 33, 11, 32, 15, 41, 13, 29, 11],
    &[21, 51, 23, 53, 24, 61, 22, 31, 21, 43, 20],
    &[11, 52, 14, 42, 15, 31, 17, 21, 16, 43, 12, 31, 13, 32, 15],
];

/// The built-in sample workload.
pub fn sample_workload() -> Scenario {
    match Scenario::from_bursts(SAMPLE_BURSTS) {
        Ok(s) => s,
        Err(e) => panic!("built-in sample workload is invalid: {e}"),
    }
}
