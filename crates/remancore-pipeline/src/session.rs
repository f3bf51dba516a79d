//! Inspection session state.
//!
//! One [`InspectionSession`] holds everything a single inspection station
//! knows: what the operator is looking at, the current job, and the last
//! report. The handle is cheap to clone so the running job's stage task can
//! hold one; the lock is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remancore_core::{CoreCategory, DiagnosticReport};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::job::AnalysisJob;

/// Where the station is taking its image from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// File upload or sample gallery.
    #[default]
    Upload,

    /// Live camera.
    Camera,

    /// An image is loaded and ready to diagnose.
    Preview,
}

#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) mode: CaptureMode,
    pub(crate) image: Option<String>,
    pub(crate) category: String,
    pub(crate) job: Option<AnalysisJob>,
    pub(crate) report: Option<DiagnosticReport>,
    pub(crate) generation: u64,
    pub(crate) task: Option<JoinHandle<()>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: CaptureMode::default(),
            image: None,
            category: CoreCategory::DEFAULT.label().to_string(),
            job: None,
            report: None,
            generation: 0,
            task: None,
        }
    }
}

impl SessionState {
    /// Whether a callback captured at `generation` may still act.
    pub(crate) fn is_live(&self, generation: u64) -> bool {
        self.generation == generation && self.job.as_ref().is_some_and(|j| j.is_running())
    }

    pub(crate) fn running_job(&self) -> Option<&AnalysisJob> {
        self.job.as_ref().filter(|j| j.is_running())
    }

    /// Drop the retained report and any finished job.
    pub(crate) fn clear_result(&mut self) {
        self.report = None;
        if self.job.as_ref().is_some_and(|j| !j.is_running()) {
            self.job = None;
        }
    }
}

/// Point-in-time copy of a session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
    pub mode: CaptureMode,
    pub image: Option<String>,
    pub category: String,
    pub job: Option<AnalysisJob>,
    pub report: Option<DiagnosticReport>,
    pub generation: u64,
}

/// Shared handle to one inspection session.
#[derive(Debug, Clone, Default)]
pub struct InspectionSession {
    inner: Arc<Mutex<SessionState>>,
}

impl InspectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// State is consistent between lock acquisitions, so a poisoned lock is
    /// still safe to use.
    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            mode: state.mode,
            image: state.image.clone(),
            category: state.category.clone(),
            job: state.job.clone(),
            report: state.report.clone(),
            generation: state.generation,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.lock().mode
    }

    pub fn image(&self) -> Option<String> {
        self.lock().image.clone()
    }

    pub fn category(&self) -> String {
        self.lock().category.clone()
    }

    pub fn job(&self) -> Option<AnalysisJob> {
        self.lock().job.clone()
    }

    pub fn report(&self) -> Option<DiagnosticReport> {
        self.lock().report.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_running(&self) -> bool {
        self.lock().running_job().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobState;
    use crate::stage::stages;

    #[test]
    fn test_new_session_defaults() {
        let session = InspectionSession::new();
        let snap = session.snapshot();
        assert_eq!(snap.mode, CaptureMode::Upload);
        assert_eq!(snap.category, "Turbocharger");
        assert!(snap.image.is_none());
        assert!(snap.job.is_none());
        assert!(snap.report.is_none());
        assert_eq!(snap.generation, 0);
        assert!(!session.is_running());
    }

    #[test]
    fn test_clones_share_state() {
        let a = InspectionSession::new();
        let b = a.clone();
        a.lock().image = Some("/asset/ecu_mod.jpg".to_string());
        assert_eq!(b.image().as_deref(), Some("/asset/ecu_mod.jpg"));
    }

    #[test]
    fn test_liveness_requires_matching_generation_and_running_job() {
        let session = InspectionSession::new();
        let mut state = session.lock();
        state.generation = 3;
        assert!(!state.is_live(3), "no job");

        let mut job = AnalysisJob::new("x".into(), "Turbocharger".into(), stages(), 3);
        job.begin();
        state.job = Some(job);
        assert!(state.is_live(3));
        assert!(!state.is_live(2));

        if let Some(job) = state.job.as_mut() {
            job.cancel();
        }
        assert!(!state.is_live(3));
    }

    #[test]
    fn test_clear_result_keeps_running_job() {
        let session = InspectionSession::new();
        let mut state = session.lock();
        let mut job = AnalysisJob::new("x".into(), "Turbocharger".into(), stages(), 1);
        job.begin();
        state.job = Some(job);
        state.clear_result();
        assert_eq!(state.job.as_ref().map(|j| j.state), Some(JobState::Running));

        if let Some(job) = state.job.as_mut() {
            job.cancel();
        }
        state.clear_result();
        assert!(state.job.is_none());
    }
}
