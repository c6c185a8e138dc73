//! Clinical default table: normal-adult fallback values, consulted when a
//! field is neither supplied directly nor retrievable from the record.

use crate::catalog::Parameter;

/// Fallback value for a numeric parameter.
///
/// PaO2 and FiO2 deliberately carry no default: when absent they are
/// estimated from the oxygen saturation and the supplemental-oxygen flag
/// during resolution. Derived fields are never defaulted.
pub fn numeric_default(p: Parameter) -> Option<f64> {
    match p {
        Parameter::RespiratoryRate => Some(16.0),
        Parameter::HeartRate => Some(75.0),
        Parameter::Temperature => Some(36.8),
        Parameter::OxygenSaturation => Some(97.0),
        Parameter::SystolicBp => Some(120.0),
        Parameter::DiastolicBp => Some(80.0),
        Parameter::ConsciousnessLevel => Some(15.0),
        Parameter::PlateletCount => Some(250.0),
        Parameter::Bilirubin => Some(0.8),
        Parameter::Creatinine => Some(0.9),
        Parameter::UrineOutput => Some(1500.0),
        Parameter::DopamineDose
        | Parameter::DobutamineDose
        | Parameter::NorepinephrineDose
        | Parameter::EpinephrineDose => Some(0.0),
        Parameter::Pao2
        | Parameter::Fio2
        | Parameter::MeanArterialPressure
        | Parameter::OxygenationRatio => None,
        Parameter::SupplementalOxygen
        | Parameter::MechanicalVentilation
        | Parameter::ChronicHypoxia => None,
    }
}

/// Fallback value for a flag parameter.
pub fn flag_default(p: Parameter) -> Option<bool> {
    match p {
        Parameter::SupplementalOxygen
        | Parameter::MechanicalVentilation
        | Parameter::ChronicHypoxia => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{base_parameters, ParameterKind};
    use acuity_common::ScoreSystem;

    #[test]
    fn test_every_base_parameter_has_a_default() {
        // The resolution invariant depends on this: any field a calculator
        // consults must resolve even when nothing was supplied.
        for system in ScoreSystem::ALL {
            for p in base_parameters(system) {
                match p.kind() {
                    ParameterKind::Numeric => {
                        assert!(numeric_default(*p).is_some(), "{} lacks default", p.as_str())
                    }
                    ParameterKind::Flag => {
                        assert!(flag_default(*p).is_some(), "{} lacks default", p.as_str())
                    }
                }
            }
        }
    }

    #[test]
    fn test_defaults_describe_a_normal_adult() {
        assert_eq!(numeric_default(Parameter::ConsciousnessLevel), Some(15.0));
        assert_eq!(numeric_default(Parameter::NorepinephrineDose), Some(0.0));
        assert_eq!(flag_default(Parameter::SupplementalOxygen), Some(false));
    }
}
