//! Concurrent batch assessment with per-patient isolation.
//!
//! Each patient runs as its own task; one patient's acquisition or
//! resolution failure becomes a structured error entry and never aborts or
//! delays the siblings. Partial results are always returned.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use acuity_common::{EngineError, Result, RiskLevel, ScoreSystem};

use crate::assess::{AssessmentReport, AssessmentRequest, ScoringEngine};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub patient_ids: Vec<String>,
    pub systems: Vec<ScoreSystem>,
    /// Shared assessment instant; defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub include_parameters: bool,
}

impl BatchRequest {
    pub fn new(patient_ids: Vec<String>, systems: Vec<ScoreSystem>) -> Self {
        Self {
            patient_ids,
            systems,
            as_of: None,
            include_parameters: false,
        }
    }
}

/// One failed patient, with a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub patient_id: String,
    pub error: String,
    pub error_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub successes: Vec<AssessmentReport>,
    pub failures: Vec<BatchFailure>,
    pub success_count: usize,
    pub error_count: usize,
    /// Successful patients whose combined verdict is HIGH or CRITICAL.
    pub high_risk_patient_ids: Vec<String>,
}

impl ScoringEngine {
    /// Assess up to the configured limit of patients concurrently.
    ///
    /// `success_count + error_count` always equals the requested count.
    #[instrument(skip(self, request), fields(n_patients = request.patient_ids.len()))]
    pub async fn assess_batch(&self, request: &BatchRequest) -> Result<BatchOutcome> {
        let limit = self.config().batch.max_patients;
        if request.patient_ids.is_empty() {
            return Err(EngineError::Validation(
                "batch requires at least one patient".to_string(),
            ));
        }
        if request.patient_ids.len() > limit {
            return Err(EngineError::Validation(format!(
                "batch limited to {limit} patients, got {}",
                request.patient_ids.len()
            )));
        }
        if request.systems.is_empty() {
            return Err(EngineError::Validation(
                "at least one scoring system must be requested".to_string(),
            ));
        }

        let batch_id = Uuid::new_v4();
        info!(%batch_id, "starting batch assessment");

        let handles: Vec<_> = request
            .patient_ids
            .iter()
            .map(|patient_id| {
                let engine = self.clone();
                let patient_request = AssessmentRequest {
                    patient_id: patient_id.clone(),
                    systems: request.systems.clone(),
                    direct_input: None,
                    fetch_record: true,
                    as_of: request.as_of,
                    include_parameters: request.include_parameters,
                };
                tokio::spawn(async move { engine.assess(&patient_request).await })
            })
            .collect();

        let joined = join_all(handles).await;

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for (patient_id, outcome) in request.patient_ids.iter().zip(joined) {
            match outcome {
                Ok(Ok(report)) => successes.push(report),
                Ok(Err(err)) => {
                    warn!(patient_id = %patient_id, error = %err, "patient assessment failed");
                    failures.push(BatchFailure {
                        patient_id: patient_id.clone(),
                        error_code: err.error_code().to_string(),
                        error: err.to_string(),
                    });
                }
                Err(join_err) => {
                    warn!(patient_id = %patient_id, error = %join_err, "patient task aborted");
                    failures.push(BatchFailure {
                        patient_id: patient_id.clone(),
                        error: join_err.to_string(),
                        error_code: "INTERNAL_ERROR".to_string(),
                    });
                }
            }
        }

        let high_risk_patient_ids = successes
            .iter()
            .filter(|r| r.combined.risk_level >= RiskLevel::High)
            .map(|r| r.patient_id.clone())
            .collect();

        let outcome = BatchOutcome {
            batch_id,
            success_count: successes.len(),
            error_count: failures.len(),
            successes,
            failures,
            high_risk_patient_ids,
        };
        info!(
            %batch_id,
            successes = outcome.success_count,
            errors = outcome.error_count,
            "batch assessment complete"
        );
        Ok(outcome)
    }
}
