//! End-to-end demo against an in-memory record source.
//!
//! Run with: cargo run -p acuity-engine --example assess_demo

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use acuity_common::{EngineConfig, ScoreSystem};
use acuity_engine::{AssessmentRequest, BatchRequest, ScoringEngine};
use acuity_params::{MockRecordSource, Parameter, RawObservations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let septic = RawObservations::new("ward-7-bed-3")
        .with_numeric(Parameter::RespiratoryRate, 28.0)
        .with_numeric(Parameter::SystolicBp, 85.0)
        .with_numeric(Parameter::ConsciousnessLevel, 10.0)
        .with_numeric(Parameter::HeartRate, 120.0)
        .with_numeric(Parameter::Temperature, 38.5)
        .with_numeric(Parameter::OxygenSaturation, 88.0)
        .with_flag(Parameter::SupplementalOxygen, true)
        .with_numeric(Parameter::NorepinephrineDose, 0.2)
        .with_numeric(Parameter::PlateletCount, 90.0)
        .with_numeric(Parameter::Bilirubin, 2.5)
        .with_numeric(Parameter::Creatinine, 2.5);

    let stable = RawObservations::new("ward-7-bed-4")
        .with_numeric(Parameter::RespiratoryRate, 16.0)
        .with_numeric(Parameter::SystolicBp, 122.0)
        .with_numeric(Parameter::HeartRate, 74.0)
        .with_numeric(Parameter::Temperature, 36.7)
        .with_numeric(Parameter::OxygenSaturation, 97.0)
        .with_numeric(Parameter::ConsciousnessLevel, 15.0);

    let source = Arc::new(
        MockRecordSource::new()
            .with_patient(septic)
            .with_patient(stable),
    );
    let engine = ScoringEngine::new(source, EngineConfig::default());

    info!("scoring single patient");
    let report = engine
        .assess(&AssessmentRequest::for_record("ward-7-bed-3"))
        .await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("scoring ward batch");
    let outcome = engine
        .assess_batch(&BatchRequest::new(
            vec![
                "ward-7-bed-3".to_string(),
                "ward-7-bed-4".to_string(),
                "ward-7-bed-5".to_string(),
            ],
            ScoreSystem::ALL.to_vec(),
        ))
        .await?;

    info!(
        successes = outcome.success_count,
        errors = outcome.error_count,
        high_risk = ?outcome.high_risk_patient_ids,
        "batch finished"
    );
    for failure in &outcome.failures {
        info!(patient = %failure.patient_id, code = %failure.error_code, "failed entry");
    }

    Ok(())
}
