//! RemanCore Core Library
//!
//! Domain logic for diagnosing returned cores (turbochargers, alternators,
//! ECU modules, starter motors, transmissions):
//! - Category registry of per-category life and warranty specs
//! - Defect classification behind the [`DefectClassifier`] seam
//! - Scoring of predicted life, warranty tier and accept/reject status
//! - Immutable diagnostic reports

pub mod classifier;
pub mod defect;
pub mod error;
pub mod metrics;
pub mod obs;
pub mod registry;
pub mod report;
pub mod scoring;
pub mod telemetry;

pub use classifier::{
    Classification, DefectClassifier, FallbackPolicy, SignatureClassifier, SignatureRule,
    SIGNATURE_RULES, UNKNOWN_WEAR_NAME,
};
pub use defect::{DefectRecord, Severity};
pub use error::{DiagnosisError, Result};
pub use registry::{lookup, CategorySpec, CoreCategory};
pub use report::DiagnosticReport;
pub use scoring::{score, total_penalty, ReportStatus, Score};

pub use metrics::METRICS;
pub use obs::{
    emit_diagnosis_cancelled, emit_diagnosis_completed, emit_diagnosis_rejected,
    emit_diagnosis_started, emit_stage_advanced, emit_stale_callback, job_span, JobSpan,
};
pub use telemetry::init_tracing;

/// RemanCore version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
