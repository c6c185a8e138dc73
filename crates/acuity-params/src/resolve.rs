//! Parameter reuse coordinator.
//!
//! Builds one `ParameterSet` per assessment: the union of the fields the
//! requested systems need, each resolved at most once with priority
//! direct input, then external observation, then clinical default.
//! Derived fields (mean arterial pressure, oxygenation ratio) are computed
//! once and cached in the set.

use acuity_common::{EngineError, Result, ScoreSystem};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::catalog::{required_union, Parameter, ParameterKind};
use crate::defaults;
use crate::direct::DirectInput;
use crate::set::{ParameterSet, ResolvedFlag, ResolvedValue, ValueSource};
use crate::source::{ObservedValue, RawObservations};

/// Assumed inspired-oxygen fraction for unquantified supplemental oxygen,
/// treated as a mid-range mask concentration.
const ASSUMED_SUPPLEMENTAL_FIO2: f64 = 0.60;
const ROOM_AIR_FIO2: f64 = 0.21;

/// Resolve every field the requested systems need into one shared set.
///
/// No field is resolved twice regardless of how many systems consume it,
/// so every calculator sees the identical value and provenance.
pub fn resolve_parameters(
    patient_id: &str,
    assessed_at: DateTime<Utc>,
    systems: &[ScoreSystem],
    direct: Option<&DirectInput>,
    external: Option<&RawObservations>,
) -> Result<ParameterSet> {
    let mut set = ParameterSet::empty(patient_id, assessed_at);

    for p in required_union(systems) {
        resolve_field(&mut set, p, direct, external)?;
    }

    if systems.contains(&ScoreSystem::Sofa) {
        derive_mean_arterial_pressure(&mut set, direct, external)?;
        derive_oxygenation_ratio(&mut set, direct, external)?;
    }

    Ok(set)
}

fn resolve_field(
    set: &mut ParameterSet,
    p: Parameter,
    direct: Option<&DirectInput>,
    external: Option<&RawObservations>,
) -> Result<()> {
    match p.kind() {
        ParameterKind::Numeric => {
            if resolve_explicit_numeric(set, p, direct, external) {
                return Ok(());
            }
            match defaults::numeric_default(p) {
                Some(value) => {
                    debug!(parameter = p.as_str(), value, "falling back to clinical default");
                    set.put_numeric(
                        p,
                        ResolvedValue {
                            value,
                            source: ValueSource::Default,
                            observed_at: None,
                        },
                    );
                    Ok(())
                }
                // PaO2/FiO2 have no default on purpose: the derivation pass
                // estimates them when a system needs the oxygenation ratio.
                None if matches!(p, Parameter::Pao2 | Parameter::Fio2) => Ok(()),
                None => Err(EngineError::ParameterResolution { field: p.as_str() }),
            }
        }
        ParameterKind::Flag => {
            if resolve_explicit_flag(set, p, direct, external) {
                return Ok(());
            }
            match defaults::flag_default(p) {
                Some(value) => {
                    set.put_flag(
                        p,
                        ResolvedFlag {
                            value,
                            source: ValueSource::Default,
                            observed_at: None,
                        },
                    );
                    Ok(())
                }
                None => Err(EngineError::ParameterResolution { field: p.as_str() }),
            }
        }
    }
}

/// Direct input beats the external record. Returns whether `p` was set.
fn resolve_explicit_numeric(
    set: &mut ParameterSet,
    p: Parameter,
    direct: Option<&DirectInput>,
    external: Option<&RawObservations>,
) -> bool {
    if let Some(ObservedValue::Numeric(value)) = direct.and_then(|d| d.observed(p)) {
        set.put_numeric(
            p,
            ResolvedValue {
                value,
                source: ValueSource::Direct,
                observed_at: None,
            },
        );
        return true;
    }
    if let Some(obs) = external.and_then(|e| e.latest(p)) {
        if let ObservedValue::Numeric(value) = obs.value {
            set.put_numeric(
                p,
                ResolvedValue {
                    value,
                    source: ValueSource::External,
                    observed_at: obs.observed_at,
                },
            );
            return true;
        }
    }
    false
}

fn resolve_explicit_flag(
    set: &mut ParameterSet,
    p: Parameter,
    direct: Option<&DirectInput>,
    external: Option<&RawObservations>,
) -> bool {
    if let Some(ObservedValue::Flag(value)) = direct.and_then(|d| d.observed(p)) {
        set.put_flag(
            p,
            ResolvedFlag {
                value,
                source: ValueSource::Direct,
                observed_at: None,
            },
        );
        return true;
    }
    if let Some(obs) = external.and_then(|e| e.latest(p)) {
        if let ObservedValue::Flag(value) = obs.value {
            set.put_flag(
                p,
                ResolvedFlag {
                    value,
                    source: ValueSource::External,
                    observed_at: obs.observed_at,
                },
            );
            return true;
        }
    }
    false
}

// ── Derived fields ────────────────────────────────────────────────────────────

/// MAP = (SBP + 2 * DBP) / 3 when not supplied outright.
fn derive_mean_arterial_pressure(
    set: &mut ParameterSet,
    direct: Option<&DirectInput>,
    external: Option<&RawObservations>,
) -> Result<()> {
    if resolve_explicit_numeric(set, Parameter::MeanArterialPressure, direct, external) {
        return Ok(());
    }
    let sbp = set.numeric(Parameter::SystolicBp)?;
    let dbp = set.numeric(Parameter::DiastolicBp)?;
    set.put_numeric(
        Parameter::MeanArterialPressure,
        ResolvedValue {
            value: (sbp.value + 2.0 * dbp.value) / 3.0,
            source: sbp.source.weakest(dbp.source),
            observed_at: None,
        },
    );
    Ok(())
}

/// PaO2/FiO2, estimating either side when it was not measured.
fn derive_oxygenation_ratio(
    set: &mut ParameterSet,
    direct: Option<&DirectInput>,
    external: Option<&RawObservations>,
) -> Result<()> {
    if resolve_explicit_numeric(set, Parameter::OxygenationRatio, direct, external) {
        return Ok(());
    }

    let pao2 = match set.numeric_opt(Parameter::Pao2) {
        Some(measured) => measured,
        None => {
            let spo2 = set.numeric(Parameter::OxygenSaturation)?;
            let estimated = ResolvedValue {
                value: estimate_pao2(spo2.value),
                source: spo2.source,
                observed_at: None,
            };
            set.put_numeric(Parameter::Pao2, estimated);
            estimated
        }
    };

    let fio2 = match set.numeric_opt(Parameter::Fio2) {
        Some(measured) => measured,
        None => {
            let oxygen = set.flag(Parameter::SupplementalOxygen)?;
            let assumed = ResolvedValue {
                value: if oxygen.value {
                    ASSUMED_SUPPLEMENTAL_FIO2
                } else {
                    ROOM_AIR_FIO2
                },
                source: oxygen.source,
                observed_at: None,
            };
            set.put_numeric(Parameter::Fio2, assumed);
            assumed
        }
    };

    // An inspired fraction below room air is not physical.
    let fraction = fio2.value.max(ROOM_AIR_FIO2);
    set.put_numeric(
        Parameter::OxygenationRatio,
        ResolvedValue {
            value: pao2.value / fraction,
            source: pao2.source.weakest(fio2.source),
            observed_at: None,
        },
    );
    Ok(())
}

/// Fixed step estimate of arterial oxygen tension from pulse oximetry.
fn estimate_pao2(spo2: f64) -> f64 {
    if spo2 >= 97.0 {
        100.0
    } else if spo2 >= 95.0 {
        80.0
    } else if spo2 >= 93.0 {
        70.0
    } else if spo2 >= 90.0 {
        60.0
    } else if spo2 >= 88.0 {
        55.0
    } else if spo2 >= 85.0 {
        50.0
    } else if spo2 >= 80.0 {
        44.0
    } else {
        40.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
