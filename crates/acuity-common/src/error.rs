use thiserror::Error;

/// Failure reported by the record-retrieval collaborator.
///
/// Recoverable at the batch level: the affected patient is marked failed
/// and the remaining patients proceed.
#[derive(Debug, Clone, Error)]
pub enum AcquisitionError {
    #[error("patient not found: {patient_id}")]
    NotFound { patient_id: String },

    #[error("transient upstream failure: {0}")]
    Transient(String),

    #[error("upstream rate limit exceeded: {0}")]
    RateLimited(String),
}

impl AcquisitionError {
    /// Stable code surfaced in batch failure entries.
    pub fn error_code(&self) -> &'static str {
        match self {
            AcquisitionError::NotFound { .. } => "PATIENT_NOT_FOUND",
            AcquisitionError::Transient(_) => "UPSTREAM_TRANSIENT",
            AcquisitionError::RateLimited(_) => "UPSTREAM_RATE_LIMITED",
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// A field consulted by a requested calculator had neither a supplied
    /// value nor a clinical default. Fatal for the single assessment only.
    #[error("parameter could not be resolved: {field}")]
    ParameterResolution { field: &'static str },

    #[error("acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("invalid request: {0}")]
    Validation(String),
}

impl EngineError {
    /// Stable code surfaced in batch failure entries.
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::ParameterResolution { .. } => "PARAMETER_UNRESOLVED",
            EngineError::Acquisition(e) => e.error_code(),
            EngineError::Validation(_) => "INVALID_REQUEST",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let not_found = AcquisitionError::NotFound {
            patient_id: "p-1".to_string(),
        };
        assert_eq!(not_found.error_code(), "PATIENT_NOT_FOUND");
        assert_eq!(
            AcquisitionError::Transient("timeout".into()).error_code(),
            "UPSTREAM_TRANSIENT"
        );
        assert_eq!(
            AcquisitionError::RateLimited("429".into()).error_code(),
            "UPSTREAM_RATE_LIMITED"
        );

        let engine_err: EngineError = not_found.into();
        assert_eq!(engine_err.error_code(), "PATIENT_NOT_FOUND");
        assert_eq!(
            EngineError::ParameterResolution { field: "bilirubin" }.error_code(),
            "PARAMETER_UNRESOLVED"
        );
        assert_eq!(
            EngineError::Validation("empty batch".into()).error_code(),
            "INVALID_REQUEST"
        );
    }

    #[test]
    fn test_display_names_field() {
        let err = EngineError::ParameterResolution { field: "creatinine" };
        assert!(err.to_string().contains("creatinine"));
    }
}
