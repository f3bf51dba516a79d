//! Analysis job model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stage::progress_percent;

/// Lifecycle state of an analysis job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// One diagnosis of one image, from start to completion or cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisJob {
    pub id: Uuid,

    pub image_ref: String,

    /// Category label as supplied by the caller.
    pub category: String,

    /// Number of stages completed so far.
    pub stage_index: usize,

    pub stages: Vec<String>,

    pub state: JobState,

    /// Session generation this job was started under.
    pub generation: u64,
}

impl AnalysisJob {
    pub fn new(image_ref: String, category: String, stages: Vec<String>, generation: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_ref,
            category,
            stage_index: 0,
            stages,
            state: JobState::Idle,
            generation,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == JobState::Running
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Completed | JobState::Cancelled)
    }

    /// Idle -> Running.
    pub fn begin(&mut self) -> bool {
        self.transition(JobState::Idle, JobState::Running)
    }

    /// Record that the stage at `index` has finished.
    pub fn advance(&mut self, index: usize) -> bool {
        if !self.is_running() || index != self.stage_index || index >= self.stages.len() {
            return false;
        }
        self.stage_index = index + 1;
        true
    }

    /// Running -> Completed. Only once every stage has finished.
    pub fn complete(&mut self) -> bool {
        if self.stage_index != self.stages.len() {
            return false;
        }
        self.transition(JobState::Running, JobState::Completed)
    }

    /// Running -> Cancelled.
    pub fn cancel(&mut self) -> bool {
        self.transition(JobState::Running, JobState::Cancelled)
    }

    pub fn percent(&self) -> f64 {
        match self.stage_index {
            0 => 0.0,
            n => progress_percent(n - 1, self.stages.len()),
        }
    }

    fn transition(&mut self, from: JobState, to: JobState) -> bool {
        if self.state != from {
            return false;
        }
        self.state = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::stages;

    fn job() -> AnalysisJob {
        AnalysisJob::new("/asset/turbocharger.jpg".into(), "Turbocharger".into(), stages(), 1)
    }

    #[test]
    fn test_new_job_is_idle() {
        let job = job();
        assert_eq!(job.state, JobState::Idle);
        assert_eq!(job.stage_index, 0);
        assert_eq!(job.percent(), 0.0);
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut job = job();
        assert!(job.begin());
        assert!(!job.begin());
        assert!(!job.complete(), "cannot complete before all stages");

        for i in 0..7 {
            assert!(job.advance(i));
        }
        assert_eq!(job.stage_index, 7);
        assert_eq!(job.percent(), 100.0);
        assert!(!job.advance(7));

        assert!(job.complete());
        assert!(job.is_terminal());
        assert!(!job.cancel());
    }

    #[test]
    fn test_stages_advance_in_order_only() {
        let mut job = job();
        assert!(!job.advance(0), "idle jobs do not advance");
        job.begin();
        assert!(!job.advance(1));
        assert!(job.advance(0));
        assert!(!job.advance(0));
        assert!(job.advance(1));
    }

    #[test]
    fn test_cancel_freezes_progress() {
        let mut job = job();
        job.begin();
        job.advance(0);
        job.advance(1);
        assert!(job.cancel());
        assert_eq!(job.state, JobState::Cancelled);
        assert!(!job.advance(2));
        assert!(!job.complete());
        assert_eq!(job.stage_index, 2);
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&JobState::Cancelled).expect("serialize");
        assert_eq!(json, "\"CANCELLED\"");
    }
}
