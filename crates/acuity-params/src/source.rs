//! Boundary to the record-retrieval collaborator.
//!
//! The engine never performs I/O itself; whatever subset of the catalog the
//! collaborator could retrieve arrives as `RawObservations`. Retry,
//! pagination and authentication live on the collaborator's side.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use acuity_common::AcquisitionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Parameter;

/// A raw reading as retrieved or supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedValue {
    Numeric(f64),
    Flag(bool),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    pub parameter: Parameter,
    pub value: ObservedValue,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Whatever subset of the catalog the collaborator could retrieve for one
/// patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawObservations {
    pub patient_id: String,
    pub observations: Vec<RawObservation>,
}

impl RawObservations {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            observations: Vec::new(),
        }
    }

    pub fn with_numeric(mut self, parameter: Parameter, value: f64) -> Self {
        self.observations.push(RawObservation {
            parameter,
            value: ObservedValue::Numeric(value),
            observed_at: None,
        });
        self
    }

    pub fn with_flag(mut self, parameter: Parameter, value: bool) -> Self {
        self.observations.push(RawObservation {
            parameter,
            value: ObservedValue::Flag(value),
            observed_at: None,
        });
        self
    }

    pub fn with_timestamped(
        mut self,
        parameter: Parameter,
        value: ObservedValue,
        observed_at: DateTime<Utc>,
    ) -> Self {
        self.observations.push(RawObservation {
            parameter,
            value,
            observed_at: Some(observed_at),
        });
        self
    }

    /// Latest reading for `p`. Untimestamped readings sort oldest.
    pub fn latest(&self, p: Parameter) -> Option<&RawObservation> {
        self.observations
            .iter()
            .filter(|o| o.parameter == p)
            .max_by_key(|o| o.observed_at)
    }
}

/// Async boundary to the external record system.
///
/// Implementations can be:
/// - an EHR/FHIR retrieval client (production)
/// - a static in-memory store (tests, demos)
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Retrieve whatever subset of the catalog is on record for the patient
    /// as of the given instant.
    async fn fetch_raw_parameters(
        &self,
        patient_id: &str,
        as_of: DateTime<Utc>,
    ) -> Result<RawObservations, AcquisitionError>;
}

// ── Mock implementation for tests and demos ──────────────────────────────────

/// In-memory record source with hardcoded per-patient data.
pub struct MockRecordSource {
    records: HashMap<String, RawObservations>,
    failures: HashMap<String, AcquisitionError>,
    fetches: AtomicUsize,
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            failures: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Register a patient's record, keyed by its patient id.
    pub fn with_patient(mut self, record: RawObservations) -> Self {
        self.records.insert(record.patient_id.clone(), record);
        self
    }

    /// Make fetches for this patient fail with the given error.
    pub fn with_failure(mut self, patient_id: &str, error: AcquisitionError) -> Self {
        self.failures.insert(patient_id.to_string(), error);
        self
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_raw_parameters(
        &self,
        patient_id: &str,
        _as_of: DateTime<Utc>,
    ) -> Result<RawObservations, AcquisitionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.get(patient_id) {
            return Err(err.clone());
        }
        self.records
            .get(patient_id)
            .cloned()
            .ok_or_else(|| AcquisitionError::NotFound {
                patient_id: patient_id.to_string(),
            })
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
