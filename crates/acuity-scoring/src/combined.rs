//! Combined risk merger: folds the computed subset of system outputs into
//! one prioritized verdict.
//!
//! The priority cascade is an ordered list of (predicate, floor) pairs. A
//! fired rule floors the verdict; later rules can raise it but never lower
//! it. Rules referencing a system that was not requested are skipped,
//! treated as not-fired rather than as zero.

use acuity_common::RiskLevel;
use serde::{Deserialize, Serialize};

use crate::news2::{EscalationBand, News2Score};
use crate::qsofa::QsofaScore;
use crate::sofa::SofaScore;

/// The subset of system outputs computed for this request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeInputs<'a> {
    pub sofa: Option<&'a SofaScore>,
    pub qsofa: Option<&'a QsofaScore>,
    pub news2: Option<&'a News2Score>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAssessment {
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub contributing_factors: Vec<String>,
    pub requires_immediate_attention: bool,
}

struct Context<'a> {
    inputs: MergeInputs<'a>,
    sofa_moderate_total: u8,
}

struct PriorityRule {
    name: &'static str,
    floor: RiskLevel,
    /// None when a referenced system was not requested.
    fires: fn(&Context) -> Option<bool>,
}

const RULES: [PriorityRule; 4] = [
    PriorityRule {
        name: "rapid screen high risk with deterioration emergency band",
        floor: RiskLevel::Critical,
        fires: |ctx| {
            Some(
                ctx.inputs.qsofa?.high_risk
                    && ctx.inputs.news2?.band == EscalationBand::EmergencyAssessment,
            )
        },
    },
    PriorityRule {
        name: "rapid screen high risk or deterioration emergency band",
        floor: RiskLevel::High,
        fires: |ctx| {
            let screen = ctx.inputs.qsofa.map(|q| q.high_risk);
            let emergency = ctx
                .inputs
                .news2
                .map(|n| n.band == EscalationBand::EmergencyAssessment);
            match (screen, emergency) {
                (None, None) => None,
                _ => Some(screen.unwrap_or(false) || emergency.unwrap_or(false)),
            }
        },
    },
    PriorityRule {
        name: "organ dysfunction total in moderate-or-above band",
        floor: RiskLevel::Moderate,
        fires: |ctx| {
            ctx.inputs
                .sofa
                .map(|s| s.total >= ctx.sofa_moderate_total)
        },
    },
    PriorityRule {
        name: "deterioration urgent review band",
        floor: RiskLevel::Moderate,
        fires: |ctx| {
            ctx.inputs
                .news2
                .map(|n| n.band == EscalationBand::UrgentReview)
        },
    },
];

/// Merge the computed system outputs into one verdict.
pub fn merge(inputs: &MergeInputs, sofa_moderate_total: u8) -> CombinedAssessment {
    let ctx = Context {
        inputs: *inputs,
        sofa_moderate_total,
    };

    let mut contributing_factors = nonzero_factors(inputs);

    let any_nonzero = !contributing_factors.is_empty();
    let mut risk_level = if any_nonzero {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    };

    for rule in &RULES {
        if (rule.fires)(&ctx) == Some(true) {
            risk_level = risk_level.max(rule.floor);
            contributing_factors.push(format!("priority rule fired: {}", rule.name));
        }
    }

    CombinedAssessment {
        risk_level,
        recommendation: recommendation_for(risk_level).to_string(),
        requires_immediate_attention: risk_level.requires_immediate_attention(),
        contributing_factors,
    }
}

/// One line per non-zero component, in SOFA, qSOFA, NEWS2 order.
fn nonzero_factors(inputs: &MergeInputs) -> Vec<String> {
    let mut factors = Vec::new();
    if let Some(sofa) = inputs.sofa {
        for c in sofa.components.iter().filter(|c| c.points > 0) {
            factors.push(format!("SOFA {}: {} ({})", c.name, c.points, c.rationale));
        }
    }
    if let Some(qsofa) = inputs.qsofa {
        for c in qsofa.criteria.iter().filter(|c| c.points > 0) {
            factors.push(format!("qSOFA {}: {} ({})", c.name, c.points, c.rationale));
        }
    }
    if let Some(news2) = inputs.news2 {
        for c in news2.components.iter().filter(|c| c.points > 0) {
            factors.push(format!("NEWS2 {}: {} ({})", c.name, c.points, c.rationale));
        }
    }
    factors
}

pub fn recommendation_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "Immediate clinical evaluation and escalation to critical care",
        RiskLevel::High => "Urgent clinical review and continuous monitoring",
        RiskLevel::Moderate => "Clinical review within the hour and increased monitoring frequency",
        RiskLevel::Low => "Increase observation frequency and reassess",
        RiskLevel::Minimal => "Continue routine monitoring",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news2::EscalationBand;
    use crate::result::ComponentScore;
    use crate::sofa::MortalityBand;

    fn sofa(total: u8) -> SofaScore {
        SofaScore {
            total,
            components: vec![ComponentScore::new(
                "cardiovascular",
                total.min(4),
                "synthetic",
            )],
            band: MortalityBand::from_total(total),
            alerts: vec![],
        }
    }

    fn qsofa(total: u8) -> QsofaScore {
        QsofaScore {
            total,
            criteria: vec![ComponentScore::new("respiratory_rate", total.min(1), "synthetic")],
            high_risk: total >= 2,
            alerts: vec![],
        }
    }

    fn news2(total: u8, band: EscalationBand) -> News2Score {
        News2Score {
            total,
            components: vec![ComponentScore::new("heart_rate", total.min(3), "synthetic")],
            band,
            alerts: vec![],
        }
    }

    #[test]
    fn test_all_quiet_is_minimal() {
        let s = sofa(0);
        let q = qsofa(0);
        let n = news2(0, EscalationBand::RoutineMonitoring);
        let merged = merge(
            &MergeInputs {
                sofa: Some(&s),
                qsofa: Some(&q),
                news2: Some(&n),
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::Minimal);
        assert!(!merged.requires_immediate_attention);
        assert!(merged.contributing_factors.is_empty());
        assert_eq!(merged.recommendation, "Continue routine monitoring");
    }

    #[test]
    fn test_any_nonzero_component_floors_low() {
        let s = sofa(1);
        let merged = merge(
            &MergeInputs {
                sofa: Some(&s),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::Low);
        assert_eq!(merged.contributing_factors.len(), 1);
    }

    #[test]
    fn test_screen_and_emergency_is_critical() {
        let q = qsofa(3);
        let n = news2(9, EscalationBand::EmergencyAssessment);
        let merged = merge(
            &MergeInputs {
                qsofa: Some(&q),
                news2: Some(&n),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::Critical);
        assert!(merged.requires_immediate_attention);
        // Both the AND rule and the OR rule fired.
        assert!(merged
            .contributing_factors
            .iter()
            .filter(|f| f.starts_with("priority rule fired"))
            .count()
            >= 2);
    }

    #[test]
    fn test_screen_alone_is_high() {
        let q = qsofa(2);
        let merged = merge(
            &MergeInputs {
                qsofa: Some(&q),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_emergency_band_alone_is_high() {
        let n = news2(8, EscalationBand::EmergencyAssessment);
        let merged = merge(
            &MergeInputs {
                news2: Some(&n),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_sofa_cutoff_is_configurable() {
        let s = sofa(7);
        let inputs = MergeInputs {
            sofa: Some(&s),
            ..Default::default()
        };
        assert_eq!(merge(&inputs, 7).risk_level, RiskLevel::Moderate);
        assert_eq!(merge(&inputs, 8).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_urgent_review_floors_moderate() {
        let n = news2(5, EscalationBand::UrgentReview);
        let merged = merge(
            &MergeInputs {
                news2: Some(&n),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_unrequested_systems_skip_their_rules() {
        // SOFA alone: the screen/emergency rules cannot fire, only rule 3.
        let s = sofa(16);
        let merged = merge(
            &MergeInputs {
                sofa: Some(&s),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_later_rule_never_lowers_the_floor() {
        // Screen high risk (HIGH) plus urgent review (MODERATE): the later,
        // lower rule still fires but the verdict stays HIGH.
        let q = qsofa(2);
        let n = news2(5, EscalationBand::UrgentReview);
        let merged = merge(
            &MergeInputs {
                qsofa: Some(&q),
                news2: Some(&n),
                ..Default::default()
            },
            7,
        );
        assert_eq!(merged.risk_level, RiskLevel::High);
        assert!(merged
            .contributing_factors
            .iter()
            .any(|f| f.contains("urgent review")));
    }

    #[test]
    fn test_recommendation_tracks_level() {
        for (level, phrase) in [
            (RiskLevel::Critical, "escalation"),
            (RiskLevel::Minimal, "routine"),
        ] {
            assert!(recommendation_for(level).to_lowercase().contains(phrase));
        }
    }

    #[test]
    fn test_factor_ordering_follows_calculator_order() {
        let s = sofa(2);
        let q = qsofa(1);
        let n = news2(2, EscalationBand::RoutineMonitoring);
        let merged = merge(
            &MergeInputs {
                sofa: Some(&s),
                qsofa: Some(&q),
                news2: Some(&n),
            },
            7,
        );
        let lines = &merged.contributing_factors;
        assert!(lines[0].starts_with("SOFA"));
        assert!(lines[1].starts_with("qSOFA"));
        assert!(lines[2].starts_with("NEWS2"));
    }
}
