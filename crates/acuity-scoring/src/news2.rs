//! NEWS2 deterioration score: seven criteria, each 0-3, total 0-20.
//!
//! The threshold tables are non-linear: for several parameters both the
//! very-low and the very-high extreme score the maximum.

use acuity_common::{Result, ScoreSystem};
use acuity_params::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::result::{Classification, ComponentScore, SystemScoreResult};

pub const MAX_TOTAL: u8 = 20;
const CRITERION_MAX: u8 = 3;

const URGENT_TOTAL: u8 = 5;
const EMERGENCY_TOTAL: u8 = 7;

/// Escalation band for the NEWS2 outcome.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EscalationBand {
    RoutineMonitoring,
    UrgentReview,
    EmergencyAssessment,
}

impl EscalationBand {
    /// The single-criterion rule is evaluated independently of the total
    /// and can raise the band even when the total is low.
    pub fn from_parts(total: u8, any_criterion_at_max: bool) -> Self {
        if total >= EMERGENCY_TOTAL {
            EscalationBand::EmergencyAssessment
        } else if total >= URGENT_TOTAL || any_criterion_at_max {
            EscalationBand::UrgentReview
        } else {
            EscalationBand::RoutineMonitoring
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationBand::RoutineMonitoring => "routine_monitoring",
            EscalationBand::UrgentReview => "urgent_review",
            EscalationBand::EmergencyAssessment => "emergency_assessment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News2Score {
    pub total: u8,
    pub components: Vec<ComponentScore>,
    pub band: EscalationBand,
    pub alerts: Vec<String>,
}

impl News2Score {
    pub fn into_result(self) -> SystemScoreResult {
        SystemScoreResult::new(
            ScoreSystem::News2,
            self.total,
            self.components,
            Classification::Escalation(self.band),
            self.alerts,
        )
    }
}

/// Score the seven criteria from an already-resolved parameter set.
pub fn score(params: &ParameterSet) -> Result<News2Score> {
    let rr = params.numeric(Parameter::RespiratoryRate)?.value;
    let spo2 = params.numeric(Parameter::OxygenSaturation)?.value;
    let on_oxygen = params.flag(Parameter::SupplementalOxygen)?.value;
    let temp = params.numeric(Parameter::Temperature)?.value;
    let sbp = params.numeric(Parameter::SystolicBp)?.value;
    let hr = params.numeric(Parameter::HeartRate)?.value;
    let gcs = params.numeric(Parameter::ConsciousnessLevel)?.value;
    let chronic_hypoxia = params
        .flag_opt(Parameter::ChronicHypoxia)
        .map(|f| f.value)
        .unwrap_or(false);

    let components = vec![
        respiratory_rate(rr),
        oxygen_saturation(spo2, chronic_hypoxia, on_oxygen),
        supplemental_oxygen(on_oxygen),
        temperature(temp),
        systolic_bp(sbp),
        heart_rate(hr),
        consciousness(gcs),
    ];

    let total: u8 = components.iter().map(|c| c.points).sum();
    let maxed: Vec<&ComponentScore> = components
        .iter()
        .filter(|c| c.points == CRITERION_MAX)
        .collect();
    let band = EscalationBand::from_parts(total, !maxed.is_empty());

    let mut alerts = Vec::new();
    for c in &maxed {
        alerts.push(format!("{} at maximum individual score", c.name));
    }
    match band {
        EscalationBand::EmergencyAssessment => {
            alerts.push(format!("emergency assessment indicated (NEWS2 total {total})"));
        }
        EscalationBand::UrgentReview => {
            alerts.push("urgent clinical review indicated".to_string());
        }
        EscalationBand::RoutineMonitoring => {}
    }

    Ok(News2Score {
        total,
        components,
        band,
        alerts,
    })
}

// ── Criterion tables ──────────────────────────────────────────────────────────

fn respiratory_rate(rr: f64) -> ComponentScore {
    let points = if rr <= 8.0 {
        3
    } else if rr <= 11.0 {
        1
    } else if rr <= 20.0 {
        0
    } else if rr <= 24.0 {
        2
    } else {
        3
    };
    ComponentScore::new("respiratory_rate", points, format!("rate {rr:.0}/min"))
}

/// Scale 2 applies when the chronic-hypoxia flag is set; its target range
/// sits lower, and saturations driven up by supplemental oxygen score.
fn oxygen_saturation(spo2: f64, chronic_hypoxia: bool, on_oxygen: bool) -> ComponentScore {
    let points = if chronic_hypoxia {
        if spo2 <= 83.0 {
            3
        } else if spo2 <= 85.0 {
            2
        } else if spo2 <= 87.0 {
            1
        } else if spo2 <= 92.0 {
            0
        } else if on_oxygen {
            if spo2 >= 97.0 {
                3
            } else if spo2 >= 95.0 {
                2
            } else {
                1
            }
        } else {
            0
        }
    } else if spo2 <= 91.0 {
        3
    } else if spo2 <= 93.0 {
        2
    } else if spo2 <= 95.0 {
        1
    } else {
        0
    };
    let scale = if chronic_hypoxia { "scale 2" } else { "scale 1" };
    ComponentScore::new(
        "oxygen_saturation",
        points,
        format!("SpO2 {spo2:.0}% on {scale}"),
    )
}

fn supplemental_oxygen(on_oxygen: bool) -> ComponentScore {
    let points = if on_oxygen { 2 } else { 0 };
    let rationale = if on_oxygen { "supplemental oxygen in use" } else { "breathing room air" };
    ComponentScore::new("supplemental_oxygen", points, rationale)
}

fn temperature(temp: f64) -> ComponentScore {
    let points = if temp <= 35.0 {
        3
    } else if temp <= 36.0 {
        1
    } else if temp <= 38.0 {
        0
    } else if temp <= 39.0 {
        1
    } else {
        2
    };
    ComponentScore::new("temperature", points, format!("{temp:.1} C"))
}

fn systolic_bp(sbp: f64) -> ComponentScore {
    let points = if sbp <= 90.0 {
        3
    } else if sbp <= 100.0 {
        2
    } else if sbp <= 110.0 {
        1
    } else if sbp <= 219.0 {
        0
    } else {
        3
    };
    ComponentScore::new("systolic_bp", points, format!("{sbp:.0} mmHg"))
}

fn heart_rate(hr: f64) -> ComponentScore {
    let points = if hr <= 40.0 {
        3
    } else if hr <= 50.0 {
        1
    } else if hr <= 90.0 {
        0
    } else if hr <= 110.0 {
        1
    } else if hr <= 130.0 {
        2
    } else {
        3
    };
    ComponentScore::new("heart_rate", points, format!("{hr:.0}/min"))
}

/// Anything below fully alert scores the maximum.
fn consciousness(gcs: f64) -> ComponentScore {
    let points = if gcs < 15.0 { 3 } else { 0 };
    ComponentScore::new("consciousness", points, format!("GCS {gcs:.0}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_params::{resolve_parameters, DirectInput};
    use chrono::Utc;

    fn scored(direct: DirectInput) -> News2Score {
        let set =
            resolve_parameters("t", Utc::now(), &[ScoreSystem::News2], Some(&direct), None)
                .unwrap();
        score(&set).unwrap()
    }

    #[test]
    fn test_normal_adult_scores_zero() {
        let s = scored(DirectInput {
            respiratory_rate: Some(16.0),
            oxygen_saturation: Some(98.0),
            supplemental_oxygen: Some(false),
            temperature: Some(36.5),
            systolic_bp: Some(120.0),
            heart_rate: Some(70.0),
            consciousness_level: Some(15.0),
            ..Default::default()
        });
        assert_eq!(s.total, 0);
        assert_eq!(s.band, EscalationBand::RoutineMonitoring);
        assert!(s.alerts.is_empty());
    }

    #[test]
    fn test_extremes_score_maximum_on_both_ends() {
        assert_eq!(heart_rate(38.0).points, 3);
        assert_eq!(heart_rate(135.0).points, 3);
        assert_eq!(respiratory_rate(7.0).points, 3);
        assert_eq!(respiratory_rate(26.0).points, 3);
        assert_eq!(systolic_bp(88.0).points, 3);
        assert_eq!(systolic_bp(225.0).points, 3);
    }

    #[test]
    fn test_saturation_scale_switch() {
        // 88% is 3 points on scale 1 but in range on scale 2.
        assert_eq!(oxygen_saturation(88.0, false, false).points, 3);
        assert_eq!(oxygen_saturation(88.0, true, false).points, 0);
        // On scale 2 a high saturation scores only when driven by oxygen.
        assert_eq!(oxygen_saturation(97.0, true, true).points, 3);
        assert_eq!(oxygen_saturation(97.0, true, false).points, 0);
        assert_eq!(oxygen_saturation(83.0, true, false).points, 3);
    }

    #[test]
    fn test_single_criterion_at_max_forces_urgent_review() {
        // Total of 3 would be routine; the lone maxed criterion raises it.
        let s = scored(DirectInput {
            heart_rate: Some(135.0),
            ..Default::default()
        });
        assert_eq!(s.total, 3);
        assert_eq!(s.band, EscalationBand::UrgentReview);
        assert!(s.alerts.iter().any(|a| a.contains("heart_rate")));
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(
            EscalationBand::from_parts(4, false),
            EscalationBand::RoutineMonitoring
        );
        assert_eq!(
            EscalationBand::from_parts(5, false),
            EscalationBand::UrgentReview
        );
        assert_eq!(
            EscalationBand::from_parts(7, false),
            EscalationBand::EmergencyAssessment
        );
    }

    #[test]
    fn test_septic_shock_profile() {
        let s = scored(DirectInput {
            respiratory_rate: Some(28.0),
            oxygen_saturation: Some(88.0),
            supplemental_oxygen: Some(true),
            temperature: Some(38.5),
            systolic_bp: Some(85.0),
            heart_rate: Some(120.0),
            consciousness_level: Some(10.0),
            ..Default::default()
        });
        // 3 + 3 + 2 + 1 + 3 + 2 + 3 against the published chart.
        assert_eq!(s.total, 17);
        assert_eq!(s.band, EscalationBand::EmergencyAssessment);
        assert_eq!(s.total, s.components.iter().map(|c| c.points).sum::<u8>());
    }

    #[test]
    fn test_total_never_exceeds_bound() {
        let s = scored(DirectInput {
            respiratory_rate: Some(35.0),
            oxygen_saturation: Some(80.0),
            supplemental_oxygen: Some(true),
            temperature: Some(34.0),
            systolic_bp: Some(70.0),
            heart_rate: Some(140.0),
            consciousness_level: Some(6.0),
            ..Default::default()
        });
        assert_eq!(s.total, MAX_TOTAL);
    }
}
