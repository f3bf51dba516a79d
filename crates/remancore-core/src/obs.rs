//! Structured lifecycle events for diagnosis jobs.
//!
//! Every emitter logs a single event with an `event` field naming the
//! transition, so job lifecycles can be reconstructed from JSON logs.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DiagnosisError;
use crate::report::DiagnosticReport;

/// RAII guard that enters a job-scoped span.
pub struct JobSpan {
    _span: tracing::span::EnteredSpan,
}

impl JobSpan {
    pub fn enter(job_id: Uuid, generation: u64) -> Self {
        Self {
            _span: job_span(job_id, generation).entered(),
        }
    }
}

/// The span used for everything a job does, including its spawned stage task.
pub fn job_span(job_id: Uuid, generation: u64) -> tracing::Span {
    tracing::info_span!("remancore.job", job_id = %job_id, generation = generation)
}

pub fn emit_diagnosis_started(job_id: Uuid, generation: u64, category: &str) {
    info!(
        event = "diagnosis.started",
        job_id = %job_id,
        generation = generation,
        category = %category,
    );
}

pub fn emit_stage_advanced(generation: u64, stage_index: usize, label: &str, percent: f64) {
    info!(
        event = "diagnosis.stage_advanced",
        generation = generation,
        stage_index = stage_index,
        stage = %label,
        percent = percent,
    );
}

pub fn emit_diagnosis_completed(generation: u64, report: &DiagnosticReport) {
    info!(
        event = "diagnosis.completed",
        generation = generation,
        report_id = %report.id,
        status = %report.status,
        predicted_life_years = report.predicted_life_years,
        warranty_months = report.warranty_months,
        defects = report.defects.len(),
    );
}

pub fn emit_diagnosis_cancelled(job_id: Uuid, generation: u64, stage_index: usize) {
    info!(
        event = "diagnosis.cancelled",
        job_id = %job_id,
        generation = generation,
        stage_index = stage_index,
    );
}

/// A deferred callback woke up after its job was superseded.
pub fn emit_stale_callback(captured: u64, live: u64) {
    debug!(
        event = "diagnosis.stale_callback",
        captured_generation = captured,
        live_generation = live,
    );
}

pub fn emit_diagnosis_rejected(error: &DiagnosisError) {
    warn!(event = "diagnosis.rejected", kind = error.kind(), error = %error);
}
