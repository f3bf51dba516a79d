//! RemanCore Pipeline - staged diagnosis of inspected cores
//!
//! Provides the diagnostic pipeline orchestrator that:
//! - Narrates a fixed sequence of analysis stages with progress events
//! - Classifies and scores the unit once all stages have run
//! - Supports cancellation, with stale work discarded by generation token
//! - Keeps all state in an explicit per-station session

pub mod config;
pub mod event;
pub mod job;
pub mod pipeline;
pub mod session;
pub mod stage;
pub mod station;

// Re-export key types
pub use config::{ConfigError, PipelineConfig};
pub use event::PipelineEvent;
pub use job::{AnalysisJob, JobState};
pub use pipeline::{DiagnosticPipeline, EventReceiver};
pub use session::{CaptureMode, InspectionSession, SessionSnapshot};
pub use stage::{stages, DiagnosticStage};
pub use station::InspectionStation;
