//! acuity-scoring — The three pure score calculators, reliability
//! assessment, and the combined risk merger.
//!
//! Every function here is deterministic and synchronous over an
//! already-resolved `ParameterSet`; acquisition happens upstream.

pub mod combined;
pub mod news2;
pub mod qsofa;
pub mod reliability;
pub mod result;
pub mod sofa;

// Re-export commonly used types
pub use combined::{merge, CombinedAssessment, MergeInputs};
pub use reliability::Reliability;
pub use result::{Classification, ComponentScore, SystemScoreResult};
