//! Diagnostic pipeline orchestration.
//!
//! A started job runs as one spawned task that sleeps between stages. Every
//! time the task wakes it re-checks, under the session lock, that the session
//! generation it captured at start is still live; a cancelled or superseded
//! job's task therefore can never emit an event or touch the session again.
//! Events are sent while holding the same lock, so per session they arrive in
//! the order the state changed.

use std::sync::Arc;
use std::time::Duration;

use remancore_core::{
    emit_diagnosis_cancelled, emit_diagnosis_completed, emit_diagnosis_rejected,
    emit_diagnosis_started, emit_stage_advanced, emit_stale_callback, job_span, lookup, score,
    Classification, DefectClassifier, DiagnosisError, DiagnosticReport, JobSpan, ReportStatus,
    SignatureClassifier, METRICS,
};
use tokio::sync::mpsc;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::event::PipelineEvent;
use crate::job::AnalysisJob;
use crate::session::{CaptureMode, InspectionSession, SessionState};
use crate::stage::{progress_percent, stages};

/// Receiving half of a pipeline's event stream.
pub type EventReceiver = mpsc::UnboundedReceiver<PipelineEvent>;

/// Diagnostic pipeline orchestrator.
#[derive(Clone)]
pub struct DiagnosticPipeline {
    config: PipelineConfig,
    classifier: Arc<dyn DefectClassifier>,
    events: mpsc::UnboundedSender<PipelineEvent>,
}

impl DiagnosticPipeline {
    /// Create a pipeline backed by the signature classifier.
    pub fn new(config: PipelineConfig) -> (Self, EventReceiver) {
        let classifier = Arc::new(SignatureClassifier::new(config.fallback));
        Self::with_classifier(config, classifier)
    }

    /// Create a pipeline backed by a custom classifier.
    pub fn with_classifier(
        config: PipelineConfig,
        classifier: Arc<dyn DefectClassifier>,
    ) -> (Self, EventReceiver) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                config,
                classifier,
                events,
            },
            rx,
        )
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Start diagnosing `image_ref` as a core of `category`.
    ///
    /// Fails with [`DiagnosisError::AlreadyRunning`] while the session has a
    /// running job, and with [`DiagnosisError::InvalidInput`] when the image
    /// reference is absent or blank. Neither failure changes the session.
    ///
    /// A finished job and its report are superseded by the new job.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(
        &self,
        session: &InspectionSession,
        image_ref: Option<&str>,
        category: &str,
    ) -> remancore_core::Result<Uuid> {
        let mut state = session.lock();

        if let Some(running) = state.running_job() {
            let err = DiagnosisError::AlreadyRunning { job_id: running.id };
            emit_diagnosis_rejected(&err);
            return Err(err);
        }

        let image_ref = match image_ref {
            Some(image) if !image.trim().is_empty() => image.to_string(),
            _ => {
                let err = DiagnosisError::InvalidInput("image reference is missing".to_string());
                emit_diagnosis_rejected(&err);
                return Err(err);
            }
        };

        state.generation += 1;
        let generation = state.generation;
        if let Some(previous) = state.task.take() {
            previous.abort();
        }

        let mut job = AnalysisJob::new(image_ref, category.to_string(), stages(), generation);
        job.begin();
        let job_id = job.id;
        let ctx = JobContext {
            session: session.clone(),
            events: self.events.clone(),
            classifier: Arc::clone(&self.classifier),
            stage_delay: self.config.stage_delay(),
            finalize_delay: self.config.finalize_delay(),
            generation,
            job_id,
            image_ref: job.image_ref.clone(),
            category: job.category.clone(),
            stages: job.stages.clone(),
        };

        state.report = None;
        state.job = Some(job);

        {
            let _span = JobSpan::enter(job_id, generation);
            METRICS.inc_started();
            emit_diagnosis_started(job_id, generation, category);
            send(&self.events, PipelineEvent::Started { generation, job_id });
        }

        let span = job_span(job_id, generation);
        state.task = Some(tokio::spawn(ctx.drive().instrument(span)));

        Ok(job_id)
    }

    /// Cancel the session's running job, if any.
    ///
    /// Returns whether a job was cancelled. The job's pending stage and
    /// finalization work becomes a no-op and no report is produced for it.
    pub fn cancel(&self, session: &InspectionSession) -> bool {
        let mut state = session.lock();
        self.cancel_locked(&mut state)
    }

    /// Cancel any running job and clear the session back to an empty upload
    /// station. The selected category is kept.
    pub fn reset(&self, session: &InspectionSession) {
        let mut state = session.lock();
        self.cancel_locked(&mut state);
        state.job = None;
        state.report = None;
        state.image = None;
        state.mode = CaptureMode::Upload;
        debug!(generation = state.generation, "session reset");
    }

    pub(crate) fn cancel_locked(&self, state: &mut SessionState) -> bool {
        let Some(job) = state.job.as_mut() else {
            return false;
        };
        if !job.cancel() {
            return false;
        }

        let (job_id, generation, stage_index) = (job.id, job.generation, job.stage_index);
        state.generation += 1;
        if let Some(task) = state.task.take() {
            task.abort();
        }

        METRICS.inc_cancelled();
        emit_diagnosis_cancelled(job_id, generation, stage_index);
        send(&self.events, PipelineEvent::Cancelled { generation, job_id });
        true
    }
}

fn send(events: &mpsc::UnboundedSender<PipelineEvent>, event: PipelineEvent) {
    if events.send(event).is_err() {
        debug!("event receiver dropped");
    }
}

/// Everything a job's stage task needs, captured at start.
struct JobContext {
    session: InspectionSession,
    events: mpsc::UnboundedSender<PipelineEvent>,
    classifier: Arc<dyn DefectClassifier>,
    stage_delay: Duration,
    finalize_delay: Duration,
    generation: u64,
    job_id: Uuid,
    image_ref: String,
    category: String,
    stages: Vec<String>,
}

impl JobContext {
    async fn drive(self) {
        for index in 0..self.stages.len() {
            tokio::time::sleep(self.stage_delay).await;
            if !self.advance(index) {
                return;
            }
        }

        tokio::time::sleep(self.finalize_delay).await;
        if !self.is_live() {
            return;
        }

        let classification = self.classifier.classify(&self.image_ref, &self.category).await;
        self.finish(classification);
    }

    fn is_live(&self) -> bool {
        let state = self.session.lock();
        self.check_live(&state)
    }

    fn check_live(&self, state: &SessionState) -> bool {
        if state.is_live(self.generation) {
            return true;
        }
        METRICS.inc_stale_callbacks();
        emit_stale_callback(self.generation, state.generation);
        false
    }

    /// Record completion of stage `index` and emit its progress event.
    fn advance(&self, index: usize) -> bool {
        let mut state = self.session.lock();
        if !self.check_live(&state) {
            return false;
        }
        let advanced = state.job.as_mut().is_some_and(|job| job.advance(index));
        if !advanced {
            return false;
        }

        let label = self.stages[index].clone();
        let percent = progress_percent(index, self.stages.len());
        emit_stage_advanced(self.generation, index, &label, percent);
        send(
            &self.events,
            PipelineEvent::Progress {
                generation: self.generation,
                job_id: self.job_id,
                stage_index: index,
                stage_label: label,
                percent,
            },
        );
        true
    }

    /// Score, compose and publish the report.
    fn finish(&self, classification: Classification) -> bool {
        let mut state = self.session.lock();
        if !self.check_live(&state) {
            return false;
        }
        let completed = state.job.as_mut().is_some_and(|job| job.complete());
        if !completed {
            return false;
        }

        let spec = lookup(&self.category);
        let scored = score(&spec, &classification.defects, classification.critical);
        let report = DiagnosticReport::compose(self.job_id, &self.category, classification, scored);

        state.report = Some(report.clone());
        state.task = None;

        METRICS.inc_completed();
        if report.status == ReportStatus::Salvage {
            METRICS.inc_salvaged();
        }
        emit_diagnosis_completed(self.generation, &report);
        send(
            &self.events,
            PipelineEvent::Completed {
                generation: self.generation,
                job_id: self.job_id,
                report,
            },
        );
        true
    }
}
