//! Events delivered to the caller while a job runs.

use remancore_core::DiagnosticReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A progress or terminal event, tagged with the id and session generation
/// of the job that produced it. Generations are per session, so consumers
/// sharing one pipeline across sessions attribute events by `job_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A job was accepted; progress restarts from zero.
    Started { generation: u64, job_id: Uuid },

    /// A stage finished.
    Progress {
        generation: u64,
        job_id: Uuid,
        stage_index: usize,
        stage_label: String,
        percent: f64,
    },

    /// The job completed with a report.
    Completed {
        generation: u64,
        job_id: Uuid,
        report: DiagnosticReport,
    },

    /// The job was cancelled; no report will follow.
    Cancelled { generation: u64, job_id: Uuid },
}

impl PipelineEvent {
    pub fn generation(&self) -> u64 {
        match self {
            PipelineEvent::Started { generation, .. }
            | PipelineEvent::Progress { generation, .. }
            | PipelineEvent::Completed { generation, .. }
            | PipelineEvent::Cancelled { generation, .. } => *generation,
        }
    }

    pub fn job_id(&self) -> Uuid {
        match self {
            PipelineEvent::Started { job_id, .. }
            | PipelineEvent::Progress { job_id, .. }
            | PipelineEvent::Completed { job_id, .. }
            | PipelineEvent::Cancelled { job_id, .. } => *job_id,
        }
    }

    /// Whether this is the last event of its job.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineEvent::Completed { .. } | PipelineEvent::Cancelled { .. }
        )
    }

    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            PipelineEvent::Completed { report, .. } => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_json_tag() {
        let job_id = Uuid::new_v4();
        let event = PipelineEvent::Progress {
            generation: 2,
            job_id,
            stage_index: 0,
            stage_label: "Segmenting Image Regions".to_string(),
            percent: 50.0,
        };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["type"], "progress");
        assert_eq!(value["generation"], 2);
        assert_eq!(value["job_id"], job_id.to_string());
        assert_eq!(event.job_id(), job_id);
        assert!(!event.is_terminal());
        assert!(event.report().is_none());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let event = PipelineEvent::Cancelled {
            generation: 5,
            job_id: Uuid::new_v4(),
        };
        assert!(event.is_terminal());
        assert_eq!(event.generation(), 5);
    }
}
