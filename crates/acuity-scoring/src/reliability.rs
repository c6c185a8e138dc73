//! Reliability quantification: how much of a system's input was actually
//! measured rather than filled from the clinical default table.

use acuity_common::ScoreSystem;
use acuity_params::{base_parameters, ParameterSet, ValueSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reliability {
    /// 1.0 when every required field was supplied, falling linearly as
    /// fields default, clamped to [0, 1].
    pub score: f64,
    /// Names of the required fields that fell back to defaults.
    pub missing_parameters: Vec<String>,
}

/// Quantify input completeness for one system. Reads provenance tags only;
/// never mutates the set or the scores.
pub fn assess(params: &ParameterSet, system: ScoreSystem) -> Reliability {
    let required = base_parameters(system);
    let missing_parameters: Vec<String> = required
        .iter()
        .filter(|p| params.source_of(**p) == Some(ValueSource::Default))
        .map(|p| p.as_str().to_string())
        .collect();

    let score = 1.0 - missing_parameters.len() as f64 / required.len() as f64;
    Reliability {
        score: score.clamp(0.0, 1.0),
        missing_parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acuity_params::{resolve_parameters, DirectInput};
    use chrono::Utc;

    fn qsofa_reliability(direct: DirectInput) -> Reliability {
        let set =
            resolve_parameters("t", Utc::now(), &[ScoreSystem::Qsofa], Some(&direct), None)
                .unwrap();
        assess(&set, ScoreSystem::Qsofa)
    }

    #[test]
    fn test_fully_supplied_input_scores_one() {
        let r = qsofa_reliability(DirectInput {
            respiratory_rate: Some(18.0),
            systolic_bp: Some(118.0),
            consciousness_level: Some(15.0),
            ..Default::default()
        });
        assert_eq!(r.score, 1.0);
        assert!(r.missing_parameters.is_empty());
    }

    #[test]
    fn test_score_decreases_with_each_default() {
        let two_supplied = qsofa_reliability(DirectInput {
            respiratory_rate: Some(18.0),
            systolic_bp: Some(118.0),
            ..Default::default()
        });
        let one_supplied = qsofa_reliability(DirectInput {
            respiratory_rate: Some(18.0),
            ..Default::default()
        });
        let none_supplied = qsofa_reliability(DirectInput::default());

        assert!((two_supplied.score - 2.0 / 3.0).abs() < 1e-9);
        assert!((one_supplied.score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(none_supplied.score, 0.0);
        assert!(two_supplied.score > one_supplied.score);
        assert!(one_supplied.score > none_supplied.score);
    }

    #[test]
    fn test_missing_parameters_name_the_defaulted_fields() {
        let r = qsofa_reliability(DirectInput {
            systolic_bp: Some(118.0),
            ..Default::default()
        });
        assert_eq!(
            r.missing_parameters,
            vec!["respiratory_rate".to_string(), "consciousness_level".to_string()]
        );
    }

    #[test]
    fn test_systems_are_assessed_independently() {
        let direct = DirectInput {
            heart_rate: Some(90.0),
            systolic_bp: Some(110.0),
            ..Default::default()
        };
        let set = resolve_parameters(
            "t",
            Utc::now(),
            &ScoreSystem::ALL,
            Some(&direct),
            None,
        )
        .unwrap();

        let sofa = assess(&set, ScoreSystem::Sofa);
        let news2 = assess(&set, ScoreSystem::News2);

        // SBP counts for SOFA; heart rate only for NEWS2.
        assert!((sofa.score - 1.0 / 14.0).abs() < 1e-9);
        assert!((news2.score - 2.0 / 7.0).abs() < 1e-9);
    }
}
