//! Score result model shared by the three calculators.

use acuity_common::ScoreSystem;
use serde::{Deserialize, Serialize};

use crate::news2::EscalationBand;
use crate::reliability::Reliability;
use crate::sofa::MortalityBand;

/// One sub-score with its clinical rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    pub points: u8,
    pub rationale: String,
}

impl ComponentScore {
    pub fn new(name: &str, points: u8, rationale: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            points,
            rationale: rationale.into(),
        }
    }
}

/// Per-system categorical classification of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// SOFA mortality-risk band.
    Mortality(MortalityBand),
    /// qSOFA screen outcome.
    Screen { high_risk: bool },
    /// NEWS2 escalation band.
    Escalation(EscalationBand),
}

/// One scoring system's complete output for a single assessment.
///
/// `total` always equals the sum of the component points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemScoreResult {
    pub system: ScoreSystem,
    pub total: u8,
    pub component_scores: Vec<ComponentScore>,
    pub classification: Classification,
    pub clinical_alerts: Vec<String>,
    /// 0-1 completeness of the inputs this system consumed.
    pub reliability_score: f64,
    /// Names of the fields that fell back to clinical defaults.
    pub missing_parameters: Vec<String>,
}

impl SystemScoreResult {
    pub(crate) fn new(
        system: ScoreSystem,
        total: u8,
        component_scores: Vec<ComponentScore>,
        classification: Classification,
        clinical_alerts: Vec<String>,
    ) -> Self {
        Self {
            system,
            total,
            component_scores,
            classification,
            clinical_alerts,
            reliability_score: 1.0,
            missing_parameters: Vec::new(),
        }
    }

    /// Attach the reliability assessment. Scores are never touched.
    pub fn with_reliability(mut self, reliability: Reliability) -> Self {
        self.reliability_score = reliability.score;
        self.missing_parameters = reliability.missing_parameters;
        self
    }
}
