//! Fixed catalog of clinical parameters and per-system membership tables.

use acuity_common::ScoreSystem;
use serde::{Deserialize, Serialize};

/// Every clinical field any calculator can consult.
///
/// Units: rates per minute, temperature in Celsius, saturations in percent,
/// pressures in mmHg, platelets in 10^3/uL, bilirubin and creatinine in
/// mg/dL, urine output in mL/day, vasopressor doses in ug/kg/min,
/// consciousness level as Glasgow Coma Scale 3-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    RespiratoryRate,
    HeartRate,
    Temperature,
    OxygenSaturation,
    SupplementalOxygen,
    SystolicBp,
    DiastolicBp,
    MeanArterialPressure,
    ConsciousnessLevel,
    Pao2,
    Fio2,
    OxygenationRatio,
    MechanicalVentilation,
    ChronicHypoxia,
    PlateletCount,
    Bilirubin,
    Creatinine,
    UrineOutput,
    DopamineDose,
    DobutamineDose,
    NorepinephrineDose,
    EpinephrineDose,
}

/// Whether a parameter carries a number or a yes/no flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Numeric,
    Flag,
}

impl Parameter {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Parameter::SupplementalOxygen
            | Parameter::MechanicalVentilation
            | Parameter::ChronicHypoxia => ParameterKind::Flag,
            _ => ParameterKind::Numeric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::RespiratoryRate => "respiratory_rate",
            Parameter::HeartRate => "heart_rate",
            Parameter::Temperature => "temperature",
            Parameter::OxygenSaturation => "oxygen_saturation",
            Parameter::SupplementalOxygen => "supplemental_oxygen",
            Parameter::SystolicBp => "systolic_bp",
            Parameter::DiastolicBp => "diastolic_bp",
            Parameter::MeanArterialPressure => "mean_arterial_pressure",
            Parameter::ConsciousnessLevel => "consciousness_level",
            Parameter::Pao2 => "pao2",
            Parameter::Fio2 => "fio2",
            Parameter::OxygenationRatio => "oxygenation_ratio",
            Parameter::MechanicalVentilation => "mechanical_ventilation",
            Parameter::ChronicHypoxia => "chronic_hypoxia",
            Parameter::PlateletCount => "platelet_count",
            Parameter::Bilirubin => "bilirubin",
            Parameter::Creatinine => "creatinine",
            Parameter::UrineOutput => "urine_output",
            Parameter::DopamineDose => "dopamine_dose",
            Parameter::DobutamineDose => "dobutamine_dose",
            Parameter::NorepinephrineDose => "norepinephrine_dose",
            Parameter::EpinephrineDose => "epinephrine_dose",
        }
    }
}

// ── Membership tables ─────────────────────────────────────────────────────────

const SOFA_BASE: [Parameter; 14] = [
    Parameter::OxygenSaturation,
    Parameter::SupplementalOxygen,
    Parameter::MechanicalVentilation,
    Parameter::SystolicBp,
    Parameter::DiastolicBp,
    Parameter::PlateletCount,
    Parameter::Bilirubin,
    Parameter::ConsciousnessLevel,
    Parameter::Creatinine,
    Parameter::UrineOutput,
    Parameter::DopamineDose,
    Parameter::DobutamineDose,
    Parameter::NorepinephrineDose,
    Parameter::EpinephrineDose,
];

const QSOFA_BASE: [Parameter; 3] = [
    Parameter::RespiratoryRate,
    Parameter::SystolicBp,
    Parameter::ConsciousnessLevel,
];

const NEWS2_BASE: [Parameter; 7] = [
    Parameter::RespiratoryRate,
    Parameter::OxygenSaturation,
    Parameter::SupplementalOxygen,
    Parameter::Temperature,
    Parameter::SystolicBp,
    Parameter::HeartRate,
    Parameter::ConsciousnessLevel,
];

const SOFA_AUX: [Parameter; 2] = [Parameter::Pao2, Parameter::Fio2];
const NEWS2_AUX: [Parameter; 1] = [Parameter::ChronicHypoxia];

/// Acquirable fields a system consumes. Also the reliability denominator.
/// Derived fields (mean arterial pressure, oxygenation ratio) are computed
/// from these and are not listed.
pub fn base_parameters(system: ScoreSystem) -> &'static [Parameter] {
    match system {
        ScoreSystem::Sofa => &SOFA_BASE,
        ScoreSystem::Qsofa => &QSOFA_BASE,
        ScoreSystem::News2 => &NEWS2_BASE,
    }
}

/// Optional refinements and modifiers a system consults beyond its base
/// fields: measured PaO2/FiO2 override the saturation-based estimate, the
/// chronic-hypoxia flag switches the saturation scale. Not counted toward
/// reliability.
pub fn auxiliary_parameters(system: ScoreSystem) -> &'static [Parameter] {
    match system {
        ScoreSystem::Sofa => &SOFA_AUX,
        ScoreSystem::Qsofa => &[],
        ScoreSystem::News2 => &NEWS2_AUX,
    }
}

/// Union of every parameter the requested systems need, each exactly once.
pub fn required_union(systems: &[ScoreSystem]) -> Vec<Parameter> {
    let mut union = Vec::new();
    for system in systems {
        for p in base_parameters(*system)
            .iter()
            .chain(auxiliary_parameters(*system))
        {
            if !union.contains(p) {
                union.push(*p);
            }
        }
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_has_no_duplicates() {
        let union = required_union(&ScoreSystem::ALL);
        for (i, p) in union.iter().enumerate() {
            assert!(!union[i + 1..].contains(p), "{} appears twice", p.as_str());
        }
    }

    #[test]
    fn test_shared_fields_appear_once() {
        // Systolic BP and consciousness level are consumed by all three systems.
        let union = required_union(&ScoreSystem::ALL);
        assert_eq!(
            union.iter().filter(|p| **p == Parameter::SystolicBp).count(),
            1
        );
        assert_eq!(
            union
                .iter()
                .filter(|p| **p == Parameter::ConsciousnessLevel)
                .count(),
            1
        );
    }

    #[test]
    fn test_qsofa_uses_three_fields() {
        assert_eq!(base_parameters(ScoreSystem::Qsofa).len(), 3);
    }

    #[test]
    fn test_single_system_union_is_smaller() {
        let qsofa_only = required_union(&[ScoreSystem::Qsofa]);
        let all = required_union(&ScoreSystem::ALL);
        assert_eq!(qsofa_only.len(), 3);
        assert!(qsofa_only.len() < all.len());
    }
}
