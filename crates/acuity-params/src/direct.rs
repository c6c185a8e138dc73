//! Direct-input payload: field values supplied with the request in native
//! units. Range and presence validation happens upstream of the engine.

use serde::{Deserialize, Serialize};

use crate::catalog::Parameter;
use crate::source::ObservedValue;

/// Values handed over directly by the caller. Takes priority over both the
/// external record and the clinical defaults during resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectInput {
    pub respiratory_rate: Option<f64>,
    pub heart_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub mean_arterial_pressure: Option<f64>,
    pub consciousness_level: Option<f64>,
    pub pao2: Option<f64>,
    pub fio2: Option<f64>,
    pub oxygenation_ratio: Option<f64>,
    pub platelet_count: Option<f64>,
    pub bilirubin: Option<f64>,
    pub creatinine: Option<f64>,
    pub urine_output: Option<f64>,
    pub dopamine_dose: Option<f64>,
    pub dobutamine_dose: Option<f64>,
    pub norepinephrine_dose: Option<f64>,
    pub epinephrine_dose: Option<f64>,
    pub supplemental_oxygen: Option<bool>,
    pub mechanical_ventilation: Option<bool>,
    pub chronic_hypoxia: Option<bool>,
}

impl DirectInput {
    /// Supplied value for `p`, if any.
    pub(crate) fn observed(&self, p: Parameter) -> Option<ObservedValue> {
        match p {
            Parameter::RespiratoryRate => self.respiratory_rate.map(ObservedValue::Numeric),
            Parameter::HeartRate => self.heart_rate.map(ObservedValue::Numeric),
            Parameter::Temperature => self.temperature.map(ObservedValue::Numeric),
            Parameter::OxygenSaturation => self.oxygen_saturation.map(ObservedValue::Numeric),
            Parameter::SystolicBp => self.systolic_bp.map(ObservedValue::Numeric),
            Parameter::DiastolicBp => self.diastolic_bp.map(ObservedValue::Numeric),
            Parameter::MeanArterialPressure => {
                self.mean_arterial_pressure.map(ObservedValue::Numeric)
            }
            Parameter::ConsciousnessLevel => self.consciousness_level.map(ObservedValue::Numeric),
            Parameter::Pao2 => self.pao2.map(ObservedValue::Numeric),
            Parameter::Fio2 => self.fio2.map(ObservedValue::Numeric),
            Parameter::OxygenationRatio => self.oxygenation_ratio.map(ObservedValue::Numeric),
            Parameter::PlateletCount => self.platelet_count.map(ObservedValue::Numeric),
            Parameter::Bilirubin => self.bilirubin.map(ObservedValue::Numeric),
            Parameter::Creatinine => self.creatinine.map(ObservedValue::Numeric),
            Parameter::UrineOutput => self.urine_output.map(ObservedValue::Numeric),
            Parameter::DopamineDose => self.dopamine_dose.map(ObservedValue::Numeric),
            Parameter::DobutamineDose => self.dobutamine_dose.map(ObservedValue::Numeric),
            Parameter::NorepinephrineDose => self.norepinephrine_dose.map(ObservedValue::Numeric),
            Parameter::EpinephrineDose => self.epinephrine_dose.map(ObservedValue::Numeric),
            Parameter::SupplementalOxygen => self.supplemental_oxygen.map(ObservedValue::Flag),
            Parameter::MechanicalVentilation => {
                self.mechanical_ventilation.map(ObservedValue::Flag)
            }
            Parameter::ChronicHypoxia => self.chronic_hypoxia.map(ObservedValue::Flag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_maps_fields() {
        let input = DirectInput {
            heart_rate: Some(72.0),
            supplemental_oxygen: Some(true),
            ..Default::default()
        };
        assert_eq!(
            input.observed(Parameter::HeartRate),
            Some(ObservedValue::Numeric(72.0))
        );
        assert_eq!(
            input.observed(Parameter::SupplementalOxygen),
            Some(ObservedValue::Flag(true))
        );
        assert_eq!(input.observed(Parameter::Bilirubin), None);
    }
}
