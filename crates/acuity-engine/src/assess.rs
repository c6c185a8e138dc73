//! Single-patient assessment pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use acuity_common::{EngineConfig, EngineError, Result, RiskLevel, ScoreSystem};
use acuity_params::{resolve_parameters, DirectInput, ParameterSet, RecordSource};
use acuity_scoring::combined::{self, CombinedAssessment, MergeInputs};
use acuity_scoring::result::SystemScoreResult;
use acuity_scoring::{news2, qsofa, reliability, sofa};

/// What to score for one patient and where the raw values come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub patient_id: String,
    /// Non-empty subset of the three systems.
    pub systems: Vec<ScoreSystem>,
    /// Values supplied with the request; highest resolution priority.
    #[serde(default)]
    pub direct_input: Option<DirectInput>,
    /// Fetch the external record in addition to any direct input.
    #[serde(default = "default_fetch_record")]
    pub fetch_record: bool,
    /// Assessment instant; defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    /// Include the resolved parameter set in the report.
    #[serde(default)]
    pub include_parameters: bool,
}

fn default_fetch_record() -> bool {
    true
}

impl AssessmentRequest {
    /// Record-backed request scoring all three systems.
    pub fn for_record(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            systems: ScoreSystem::ALL.to_vec(),
            direct_input: None,
            fetch_record: true,
            as_of: None,
            include_parameters: false,
        }
    }

    /// Direct-input request; no acquisition call is made.
    pub fn for_direct(patient_id: impl Into<String>, input: DirectInput) -> Self {
        Self {
            patient_id: patient_id.into(),
            systems: ScoreSystem::ALL.to_vec(),
            direct_input: Some(input),
            fetch_record: false,
            as_of: None,
            include_parameters: false,
        }
    }

    pub fn with_systems(mut self, systems: &[ScoreSystem]) -> Self {
        self.systems = systems.to_vec();
        self
    }

    pub fn with_parameters(mut self) -> Self {
        self.include_parameters = true;
        self
    }

    pub fn at(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

/// Everything produced for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub assessment_id: Uuid,
    pub patient_id: String,
    pub assessed_at: DateTime<Utc>,
    pub combined: CombinedAssessment,
    pub sofa: Option<SystemScoreResult>,
    pub qsofa: Option<SystemScoreResult>,
    pub news2: Option<SystemScoreResult>,
    /// Present only when the request asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterSet>,
}

impl AssessmentReport {
    pub fn risk_level(&self) -> RiskLevel {
        self.combined.risk_level
    }
}

/// The scoring engine: one record-source boundary plus configuration.
///
/// Cheap to clone; batch tasks each hold their own handle.
#[derive(Clone)]
pub struct ScoringEngine {
    source: Arc<dyn RecordSource>,
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(source: Arc<dyn RecordSource>, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full single-patient pipeline.
    ///
    /// Acquisition is the only await point; everything downstream is a pure
    /// computation over the resolved set, so identical inputs produce
    /// identical scores.
    #[instrument(skip(self, request), fields(patient_id = %request.patient_id))]
    pub async fn assess(&self, request: &AssessmentRequest) -> Result<AssessmentReport> {
        if request.systems.is_empty() {
            return Err(EngineError::Validation(
                "at least one scoring system must be requested".to_string(),
            ));
        }
        let assessed_at = request.as_of.unwrap_or_else(Utc::now);

        let external = if request.fetch_record {
            Some(
                self.source
                    .fetch_raw_parameters(&request.patient_id, assessed_at)
                    .await?,
            )
        } else {
            None
        };

        let params = resolve_parameters(
            &request.patient_id,
            assessed_at,
            &request.systems,
            request.direct_input.as_ref(),
            external.as_ref(),
        )?;

        let sofa_score = if request.systems.contains(&ScoreSystem::Sofa) {
            Some(sofa::score(&params)?)
        } else {
            None
        };
        let qsofa_score = if request.systems.contains(&ScoreSystem::Qsofa) {
            Some(qsofa::score(&params)?)
        } else {
            None
        };
        let news2_score = if request.systems.contains(&ScoreSystem::News2) {
            Some(news2::score(&params)?)
        } else {
            None
        };

        let combined = combined::merge(
            &MergeInputs {
                sofa: sofa_score.as_ref(),
                qsofa: qsofa_score.as_ref(),
                news2: news2_score.as_ref(),
            },
            self.config.scoring.sofa_moderate_total,
        );

        info!(
            risk_level = combined.risk_level.as_str(),
            sofa_total = sofa_score.as_ref().map(|s| s.total),
            qsofa_total = qsofa_score.as_ref().map(|s| s.total),
            news2_total = news2_score.as_ref().map(|s| s.total),
            "assessment complete"
        );

        Ok(AssessmentReport {
            assessment_id: Uuid::new_v4(),
            patient_id: request.patient_id.clone(),
            assessed_at,
            combined,
            sofa: sofa_score.map(|s| {
                s.into_result()
                    .with_reliability(reliability::assess(&params, ScoreSystem::Sofa))
            }),
            qsofa: qsofa_score.map(|s| {
                s.into_result()
                    .with_reliability(reliability::assess(&params, ScoreSystem::Qsofa))
            }),
            news2: news2_score.map(|s| {
                s.into_result()
                    .with_reliability(reliability::assess(&params, ScoreSystem::News2))
            }),
            parameters: request.include_parameters.then_some(params),
        })
    }
}
