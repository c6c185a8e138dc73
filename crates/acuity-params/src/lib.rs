//! acuity-params — Parameter catalog, clinical defaults, provenance-tagged
//! parameter sets, and the reuse coordinator shared by the scoring systems.

pub mod catalog;
pub mod defaults;
pub mod direct;
pub mod resolve;
pub mod set;
pub mod source;

// Re-export commonly used types
pub use catalog::{auxiliary_parameters, base_parameters, required_union, Parameter, ParameterKind};
pub use direct::DirectInput;
pub use resolve::resolve_parameters;
pub use set::{ParameterSet, ResolvedFlag, ResolvedValue, ValueSource};
pub use source::{MockRecordSource, ObservedValue, RawObservation, RawObservations, RecordSource};
