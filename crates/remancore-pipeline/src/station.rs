//! Inspection station: the single controller of one session.
//!
//! Mirrors what an operator does at the bench: pick or capture an image,
//! choose the core category, run a diagnosis, and move on to the next unit.

use remancore_core::DiagnosticReport;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::pipeline::{DiagnosticPipeline, EventReceiver};
use crate::session::{CaptureMode, InspectionSession, SessionSnapshot};

pub struct InspectionStation {
    session: InspectionSession,
    pipeline: DiagnosticPipeline,
}

impl InspectionStation {
    pub fn new(config: PipelineConfig) -> (Self, EventReceiver) {
        let (pipeline, rx) = DiagnosticPipeline::new(config);
        (Self::with_pipeline(pipeline), rx)
    }

    pub fn with_pipeline(pipeline: DiagnosticPipeline) -> Self {
        Self {
            session: InspectionSession::new(),
            pipeline,
        }
    }

    pub fn session(&self) -> &InspectionSession {
        &self.session
    }

    pub fn state(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn report(&self) -> Option<DiagnosticReport> {
        self.session.report()
    }

    /// Switch image source. Drops the loaded image and any result, cancelling
    /// a running diagnosis.
    pub fn set_mode(&self, mode: CaptureMode) {
        let mut state = self.session.lock();
        self.pipeline.cancel_locked(&mut state);
        state.clear_result();
        state.image = None;
        state.mode = mode;
    }

    /// Choose the category used by the next diagnosis.
    pub fn set_category(&self, category: &str) {
        self.session.lock().category = category.to_string();
    }

    /// Pick a sample image along with its known category.
    pub fn select_sample(&self, image_ref: &str, category: &str) {
        self.load(image_ref, Some(category));
    }

    /// Load a captured or uploaded image, keeping the selected category.
    pub fn load_image(&self, image_ref: &str) {
        self.load(image_ref, None);
    }

    fn load(&self, image_ref: &str, category: Option<&str>) {
        let mut state = self.session.lock();
        self.pipeline.cancel_locked(&mut state);
        state.clear_result();
        state.image = Some(image_ref.to_string());
        if let Some(category) = category {
            state.category = category.to_string();
        }
        state.mode = CaptureMode::Preview;
    }

    /// Diagnose the loaded image as the selected category.
    pub fn run_diagnosis(&self) -> remancore_core::Result<Uuid> {
        let (image, category) = {
            let state = self.session.lock();
            (state.image.clone(), state.category.clone())
        };
        self.pipeline.start(&self.session, image.as_deref(), &category)
    }

    pub fn cancel(&self) -> bool {
        self.pipeline.cancel(&self.session)
    }

    /// Process the next unit: cancel, clear image and report, back to upload.
    pub fn reset(&self) {
        self.pipeline.reset(&self.session);
    }
}
