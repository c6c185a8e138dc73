//! qSOFA rapid bedside screen: three binary criteria, total 0-3.

use acuity_common::{Result, ScoreSystem};
use acuity_params::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::result::{Classification, ComponentScore, SystemScoreResult};

pub const MAX_TOTAL: u8 = 3;

/// Two or more positive criteria flag high risk.
pub const HIGH_RISK_TOTAL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QsofaScore {
    pub total: u8,
    pub criteria: Vec<ComponentScore>,
    pub high_risk: bool,
    pub alerts: Vec<String>,
}

impl QsofaScore {
    pub fn into_result(self) -> SystemScoreResult {
        SystemScoreResult::new(
            ScoreSystem::Qsofa,
            self.total,
            self.criteria,
            Classification::Screen {
                high_risk: self.high_risk,
            },
            self.alerts,
        )
    }
}

/// Score the three screen criteria from an already-resolved parameter set.
pub fn score(params: &ParameterSet) -> Result<QsofaScore> {
    let rr = params.numeric(Parameter::RespiratoryRate)?.value;
    let sbp = params.numeric(Parameter::SystolicBp)?.value;
    let gcs = params.numeric(Parameter::ConsciousnessLevel)?.value;

    let criteria = vec![
        binary(
            "respiratory_rate",
            rr >= 22.0,
            format!("respiratory rate {rr:.0}/min"),
        ),
        binary(
            "systolic_hypotension",
            sbp <= 100.0,
            format!("systolic BP {sbp:.0} mmHg"),
        ),
        // Anything below fully alert counts as altered consciousness.
        binary(
            "altered_consciousness",
            gcs < 15.0,
            format!("GCS {gcs:.0}"),
        ),
    ];

    let total: u8 = criteria.iter().map(|c| c.points).sum();
    let high_risk = total >= HIGH_RISK_TOTAL;

    let alerts = if high_risk {
        vec![format!(
            "qSOFA {total} flags high risk of poor outcome, evaluate for sepsis"
        )]
    } else {
        Vec::new()
    };

    Ok(QsofaScore {
        total,
        criteria,
        high_risk,
        alerts,
    })
}

fn binary(name: &str, positive: bool, rationale: String) -> ComponentScore {
    ComponentScore::new(name, positive as u8, rationale)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_params::{resolve_parameters, DirectInput};
    use chrono::Utc;

    fn scored(rr: f64, sbp: f64, gcs: f64) -> QsofaScore {
        let direct = DirectInput {
            respiratory_rate: Some(rr),
            systolic_bp: Some(sbp),
            consciousness_level: Some(gcs),
            ..Default::default()
        };
        let set =
            resolve_parameters("t", Utc::now(), &[ScoreSystem::Qsofa], Some(&direct), None)
                .unwrap();
        score(&set).unwrap()
    }

    #[test]
    fn test_normal_adult_scores_zero() {
        let s = scored(16.0, 120.0, 15.0);
        assert_eq!(s.total, 0);
        assert!(!s.high_risk);
        assert!(s.alerts.is_empty());
    }

    #[test]
    fn test_criterion_boundaries() {
        assert_eq!(scored(22.0, 120.0, 15.0).total, 1);
        assert_eq!(scored(21.0, 120.0, 15.0).total, 0);
        assert_eq!(scored(16.0, 100.0, 15.0).total, 1);
        assert_eq!(scored(16.0, 101.0, 15.0).total, 0);
        assert_eq!(scored(16.0, 120.0, 14.0).total, 1);
    }

    #[test]
    fn test_high_risk_iff_two_or_more() {
        assert!(!scored(22.0, 120.0, 15.0).high_risk);
        let two = scored(22.0, 95.0, 15.0);
        assert!(two.high_risk);
        assert_eq!(two.alerts.len(), 1);
        let three = scored(28.0, 85.0, 10.0);
        assert_eq!(three.total, MAX_TOTAL);
        assert!(three.high_risk);
    }

    #[test]
    fn test_total_equals_criterion_sum() {
        let s = scored(28.0, 85.0, 10.0);
        assert_eq!(s.total, s.criteria.iter().map(|c| c.points).sum::<u8>());
        assert_eq!(s.criteria.len(), 3);
    }
}
