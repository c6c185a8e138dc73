//! Provenance-tagged parameter bundle shared by all calculators.

use acuity_common::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Parameter;

/// Where a resolved value came from. Ordered weakest to strongest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Clinical default table filled the gap.
    Default,
    /// Retrieved from the external record system.
    External,
    /// Supplied directly with the request.
    Direct,
}

impl ValueSource {
    /// A value derived from several inputs carries the weakest source.
    pub fn weakest(self, other: ValueSource) -> ValueSource {
        self.min(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub value: f64,
    pub source: ValueSource,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFlag {
    pub value: bool,
    pub source: ValueSource,
    pub observed_at: Option<DateTime<Utc>>,
}

/// One patient's resolved clinical picture at one assessment instant.
///
/// Built once by the resolver, read-only afterwards; calculators never
/// write back into it. Fields no requested calculator consults stay unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub patient_id: String,
    pub assessed_at: DateTime<Utc>,

    respiratory_rate: Option<ResolvedValue>,
    heart_rate: Option<ResolvedValue>,
    temperature: Option<ResolvedValue>,
    oxygen_saturation: Option<ResolvedValue>,
    systolic_bp: Option<ResolvedValue>,
    diastolic_bp: Option<ResolvedValue>,
    mean_arterial_pressure: Option<ResolvedValue>,
    consciousness_level: Option<ResolvedValue>,
    pao2: Option<ResolvedValue>,
    fio2: Option<ResolvedValue>,
    oxygenation_ratio: Option<ResolvedValue>,
    platelet_count: Option<ResolvedValue>,
    bilirubin: Option<ResolvedValue>,
    creatinine: Option<ResolvedValue>,
    urine_output: Option<ResolvedValue>,
    dopamine_dose: Option<ResolvedValue>,
    dobutamine_dose: Option<ResolvedValue>,
    norepinephrine_dose: Option<ResolvedValue>,
    epinephrine_dose: Option<ResolvedValue>,

    supplemental_oxygen: Option<ResolvedFlag>,
    mechanical_ventilation: Option<ResolvedFlag>,
    chronic_hypoxia: Option<ResolvedFlag>,
}

impl ParameterSet {
    pub(crate) fn empty(patient_id: &str, assessed_at: DateTime<Utc>) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            assessed_at,
            respiratory_rate: None,
            heart_rate: None,
            temperature: None,
            oxygen_saturation: None,
            systolic_bp: None,
            diastolic_bp: None,
            mean_arterial_pressure: None,
            consciousness_level: None,
            pao2: None,
            fio2: None,
            oxygenation_ratio: None,
            platelet_count: None,
            bilirubin: None,
            creatinine: None,
            urine_output: None,
            dopamine_dose: None,
            dobutamine_dose: None,
            norepinephrine_dose: None,
            epinephrine_dose: None,
            supplemental_oxygen: None,
            mechanical_ventilation: None,
            chronic_hypoxia: None,
        }
    }

    /// Numeric value for `p`; a consulted-but-unresolved field is an error.
    pub fn numeric(&self, p: Parameter) -> Result<ResolvedValue> {
        self.numeric_opt(p)
            .ok_or(EngineError::ParameterResolution { field: p.as_str() })
    }

    pub fn numeric_opt(&self, p: Parameter) -> Option<ResolvedValue> {
        match p {
            Parameter::RespiratoryRate => self.respiratory_rate,
            Parameter::HeartRate => self.heart_rate,
            Parameter::Temperature => self.temperature,
            Parameter::OxygenSaturation => self.oxygen_saturation,
            Parameter::SystolicBp => self.systolic_bp,
            Parameter::DiastolicBp => self.diastolic_bp,
            Parameter::MeanArterialPressure => self.mean_arterial_pressure,
            Parameter::ConsciousnessLevel => self.consciousness_level,
            Parameter::Pao2 => self.pao2,
            Parameter::Fio2 => self.fio2,
            Parameter::OxygenationRatio => self.oxygenation_ratio,
            Parameter::PlateletCount => self.platelet_count,
            Parameter::Bilirubin => self.bilirubin,
            Parameter::Creatinine => self.creatinine,
            Parameter::UrineOutput => self.urine_output,
            Parameter::DopamineDose => self.dopamine_dose,
            Parameter::DobutamineDose => self.dobutamine_dose,
            Parameter::NorepinephrineDose => self.norepinephrine_dose,
            Parameter::EpinephrineDose => self.epinephrine_dose,
            Parameter::SupplementalOxygen
            | Parameter::MechanicalVentilation
            | Parameter::ChronicHypoxia => None,
        }
    }

    /// Flag value for `p`; a consulted-but-unresolved field is an error.
    pub fn flag(&self, p: Parameter) -> Result<ResolvedFlag> {
        self.flag_opt(p)
            .ok_or(EngineError::ParameterResolution { field: p.as_str() })
    }

    pub fn flag_opt(&self, p: Parameter) -> Option<ResolvedFlag> {
        match p {
            Parameter::SupplementalOxygen => self.supplemental_oxygen,
            Parameter::MechanicalVentilation => self.mechanical_ventilation,
            Parameter::ChronicHypoxia => self.chronic_hypoxia,
            _ => None,
        }
    }

    /// Provenance of `p`, whichever shape it has.
    pub fn source_of(&self, p: Parameter) -> Option<ValueSource> {
        self.numeric_opt(p)
            .map(|v| v.source)
            .or_else(|| self.flag_opt(p).map(|f| f.source))
    }

    pub(crate) fn put_numeric(&mut self, p: Parameter, v: ResolvedValue) {
        let slot = match p {
            Parameter::RespiratoryRate => &mut self.respiratory_rate,
            Parameter::HeartRate => &mut self.heart_rate,
            Parameter::Temperature => &mut self.temperature,
            Parameter::OxygenSaturation => &mut self.oxygen_saturation,
            Parameter::SystolicBp => &mut self.systolic_bp,
            Parameter::DiastolicBp => &mut self.diastolic_bp,
            Parameter::MeanArterialPressure => &mut self.mean_arterial_pressure,
            Parameter::ConsciousnessLevel => &mut self.consciousness_level,
            Parameter::Pao2 => &mut self.pao2,
            Parameter::Fio2 => &mut self.fio2,
            Parameter::OxygenationRatio => &mut self.oxygenation_ratio,
            Parameter::PlateletCount => &mut self.platelet_count,
            Parameter::Bilirubin => &mut self.bilirubin,
            Parameter::Creatinine => &mut self.creatinine,
            Parameter::UrineOutput => &mut self.urine_output,
            Parameter::DopamineDose => &mut self.dopamine_dose,
            Parameter::DobutamineDose => &mut self.dobutamine_dose,
            Parameter::NorepinephrineDose => &mut self.norepinephrine_dose,
            Parameter::EpinephrineDose => &mut self.epinephrine_dose,
            Parameter::SupplementalOxygen
            | Parameter::MechanicalVentilation
            | Parameter::ChronicHypoxia => return,
        };
        *slot = Some(v);
    }

    pub(crate) fn put_flag(&mut self, p: Parameter, f: ResolvedFlag) {
        let slot = match p {
            Parameter::SupplementalOxygen => &mut self.supplemental_oxygen,
            Parameter::MechanicalVentilation => &mut self.mechanical_ventilation,
            Parameter::ChronicHypoxia => &mut self.chronic_hypoxia,
            _ => return,
        };
        *slot = Some(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: f64, source: ValueSource) -> ResolvedValue {
        ResolvedValue {
            value: v,
            source,
            observed_at: None,
        }
    }

    #[test]
    fn test_put_and_read_back() {
        let mut set = ParameterSet::empty("p-1", Utc::now());
        set.put_numeric(Parameter::HeartRate, value(88.0, ValueSource::External));
        let hr = set.numeric(Parameter::HeartRate).unwrap();
        assert_eq!(hr.value, 88.0);
        assert_eq!(hr.source, ValueSource::External);
    }

    #[test]
    fn test_unresolved_field_is_an_error() {
        let set = ParameterSet::empty("p-1", Utc::now());
        let err = set.numeric(Parameter::Bilirubin).unwrap_err();
        assert_eq!(err.error_code(), "PARAMETER_UNRESOLVED");
        assert!(err.to_string().contains("bilirubin"));
    }

    #[test]
    fn test_source_of_covers_both_shapes() {
        let mut set = ParameterSet::empty("p-1", Utc::now());
        set.put_numeric(Parameter::Creatinine, value(1.1, ValueSource::Direct));
        set.put_flag(
            Parameter::SupplementalOxygen,
            ResolvedFlag {
                value: true,
                source: ValueSource::Default,
                observed_at: None,
            },
        );
        assert_eq!(set.source_of(Parameter::Creatinine), Some(ValueSource::Direct));
        assert_eq!(
            set.source_of(Parameter::SupplementalOxygen),
            Some(ValueSource::Default)
        );
        assert_eq!(set.source_of(Parameter::HeartRate), None);
    }

    #[test]
    fn test_weakest_source_ranking() {
        assert_eq!(
            ValueSource::Direct.weakest(ValueSource::Default),
            ValueSource::Default
        );
        assert_eq!(
            ValueSource::Direct.weakest(ValueSource::External),
            ValueSource::External
        );
    }
}
