//! acuity-engine — Assessment entry points and batch orchestration.
//!
//! Wires acquisition (the only suspension point), parameter resolution,
//! the three pure calculators, reliability assessment, and the combined
//! merger into `assess` and `assess_batch`.

pub mod assess;
pub mod batch;

// Re-export commonly used types
pub use assess::{AssessmentReport, AssessmentRequest, ScoringEngine};
pub use batch::{BatchFailure, BatchOutcome, BatchRequest};
