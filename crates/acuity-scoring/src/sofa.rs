//! SOFA organ dysfunction score: six organ systems, each 0-4, total 0-24.

use acuity_common::{Result, ScoreSystem};
use acuity_params::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::result::{Classification, ComponentScore, SystemScoreResult};

pub const MAX_TOTAL: u8 = 24;
const SUBSCORE_MAX: u8 = 4;

/// Mortality-risk band for the SOFA total, per the published lookup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MortalityBand {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl MortalityBand {
    pub fn from_total(total: u8) -> Self {
        match total {
            0..=6 => MortalityBand::Low,
            7..=9 => MortalityBand::Moderate,
            10..=12 => MortalityBand::High,
            _ => MortalityBand::VeryHigh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MortalityBand::Low => "low",
            MortalityBand::Moderate => "moderate",
            MortalityBand::High => "high",
            MortalityBand::VeryHigh => "very_high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofaScore {
    pub total: u8,
    pub components: Vec<ComponentScore>,
    pub band: MortalityBand,
    pub alerts: Vec<String>,
}

impl SofaScore {
    pub fn into_result(self) -> SystemScoreResult {
        SystemScoreResult::new(
            ScoreSystem::Sofa,
            self.total,
            self.components,
            Classification::Mortality(self.band),
            self.alerts,
        )
    }
}

/// Score the six organ systems from an already-resolved parameter set.
pub fn score(params: &ParameterSet) -> Result<SofaScore> {
    let components = vec![
        respiratory(params)?,
        coagulation(params)?,
        hepatic(params)?,
        cardiovascular(params)?,
        neurological(params)?,
        renal(params)?,
    ];
    let total: u8 = components.iter().map(|c| c.points).sum();
    let band = MortalityBand::from_total(total);

    let mut alerts = Vec::new();
    for c in &components {
        if c.points == SUBSCORE_MAX {
            alerts.push(format!("{} subscore at maximum", c.name));
        }
    }
    if band >= MortalityBand::Moderate {
        alerts.push(format!(
            "SOFA total {} in {} mortality band",
            total,
            band.as_str()
        ));
    }

    Ok(SofaScore {
        total,
        components,
        band,
        alerts,
    })
}

// ── Organ sub-scores ──────────────────────────────────────────────────────────

/// Oxygenation ratio, adjusted for respiratory support. The 3-4 bands
/// require support (mechanical ventilation or supplemental oxygen).
fn respiratory(params: &ParameterSet) -> Result<ComponentScore> {
    let ratio = params.numeric(Parameter::OxygenationRatio)?.value;
    let ventilated = params.flag(Parameter::MechanicalVentilation)?.value;
    let on_oxygen = params.flag(Parameter::SupplementalOxygen)?.value;
    let supported = ventilated || on_oxygen;

    let points = if ratio < 100.0 && supported {
        4
    } else if ratio < 200.0 && supported {
        3
    } else if ratio < 300.0 {
        2
    } else if ratio < 400.0 {
        1
    } else {
        0
    };
    let rationale = format!(
        "PaO2/FiO2 {:.0}{}",
        ratio,
        if supported { " with respiratory support" } else { "" }
    );
    Ok(ComponentScore::new("respiratory", points, rationale))
}

fn coagulation(params: &ParameterSet) -> Result<ComponentScore> {
    let platelets = params.numeric(Parameter::PlateletCount)?.value;
    let points = if platelets < 20.0 {
        4
    } else if platelets < 50.0 {
        3
    } else if platelets < 100.0 {
        2
    } else if platelets < 150.0 {
        1
    } else {
        0
    };
    Ok(ComponentScore::new(
        "coagulation",
        points,
        format!("platelets {platelets:.0} x10^3/uL"),
    ))
}

fn hepatic(params: &ParameterSet) -> Result<ComponentScore> {
    let bilirubin = params.numeric(Parameter::Bilirubin)?.value;
    let points = if bilirubin >= 12.0 {
        4
    } else if bilirubin >= 6.0 {
        3
    } else if bilirubin >= 2.0 {
        2
    } else if bilirubin >= 1.2 {
        1
    } else {
        0
    };
    Ok(ComponentScore::new(
        "hepatic",
        points,
        format!("bilirubin {bilirubin:.1} mg/dL"),
    ))
}

const VASOPRESSORS: [(Parameter, &str); 4] = [
    (Parameter::DopamineDose, "dopamine"),
    (Parameter::DobutamineDose, "dobutamine"),
    (Parameter::NorepinephrineDose, "norepinephrine"),
    (Parameter::EpinephrineDose, "epinephrine"),
];

/// Agent-specific dose tiers. Doses in ug/kg/min.
fn vasopressor_points(agent: Parameter, dose: f64) -> u8 {
    if dose <= 0.0 {
        return 0;
    }
    match agent {
        Parameter::DopamineDose => {
            if dose > 15.0 {
                4
            } else if dose > 5.0 {
                3
            } else {
                2
            }
        }
        Parameter::DobutamineDose => 2,
        Parameter::NorepinephrineDose | Parameter::EpinephrineDose => {
            if dose > 0.1 {
                4
            } else {
                3
            }
        }
        _ => 0,
    }
}

/// Vasopressor presence dominates a merely-low pressure. With several
/// agents running, the single highest-scoring agent counts, never a sum.
fn cardiovascular(params: &ParameterSet) -> Result<ComponentScore> {
    let map = params.numeric(Parameter::MeanArterialPressure)?.value;

    let mut best: Option<(u8, String)> = None;
    for (agent, name) in VASOPRESSORS {
        let dose = params.numeric(agent)?.value;
        let points = vasopressor_points(agent, dose);
        if points == 0 {
            continue;
        }
        if best.as_ref().map_or(true, |(top, _)| points > *top) {
            best = Some((points, format!("{name} at {dose} ug/kg/min")));
        }
    }

    if let Some((points, rationale)) = best {
        return Ok(ComponentScore::new("cardiovascular", points, rationale));
    }

    let points = if map < 70.0 { 1 } else { 0 };
    Ok(ComponentScore::new(
        "cardiovascular",
        points,
        format!("MAP {map:.0} mmHg"),
    ))
}

fn neurological(params: &ParameterSet) -> Result<ComponentScore> {
    let gcs = params.numeric(Parameter::ConsciousnessLevel)?.value;
    let points = if gcs < 6.0 {
        4
    } else if gcs < 10.0 {
        3
    } else if gcs < 13.0 {
        2
    } else if gcs < 15.0 {
        1
    } else {
        0
    };
    Ok(ComponentScore::new(
        "neurological",
        points,
        format!("GCS {gcs:.0}"),
    ))
}

/// Creatinine or low urine output, whichever scores higher.
fn renal(params: &ParameterSet) -> Result<ComponentScore> {
    let creatinine = params.numeric(Parameter::Creatinine)?.value;
    let urine = params.numeric(Parameter::UrineOutput)?.value;

    let creatinine_points = if creatinine >= 5.0 {
        4
    } else if creatinine >= 3.5 {
        3
    } else if creatinine >= 2.0 {
        2
    } else if creatinine >= 1.2 {
        1
    } else {
        0
    };
    let urine_points = if urine < 200.0 {
        4
    } else if urine < 500.0 {
        3
    } else {
        0
    };

    let (points, rationale) = if urine_points > creatinine_points {
        (urine_points, format!("urine output {urine:.0} mL/day"))
    } else {
        (creatinine_points, format!("creatinine {creatinine:.1} mg/dL"))
    };
    Ok(ComponentScore::new("renal", points, rationale))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
