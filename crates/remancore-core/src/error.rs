//! Error taxonomy for starting a diagnosis.
//!
//! Only `start()` can fail. The classifier and scoring engine are total over
//! their inputs, and an unknown category is substituted rather than rejected.

/// Errors produced when a diagnosis cannot be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("a diagnosis is already running (job {job_id})")]
    AlreadyRunning { job_id: uuid::Uuid },
}

impl DiagnosisError {
    /// Short machine-readable name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            DiagnosisError::InvalidInput(_) => "invalid_input",
            DiagnosisError::AlreadyRunning { .. } => "already_running",
        }
    }
}

/// Result type for RemanCore diagnosis operations.
pub type Result<T> = std::result::Result<T, DiagnosisError>;
