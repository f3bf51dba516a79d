//! Diagnostic stage narration.
//!
//! Stages only drive progress reporting; they never influence the computed
//! report.

use serde::{Deserialize, Serialize};

/// The fixed diagnostic stages, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStage {
    InitializeNetwork,
    SegmentRegions,
    AnalyzeTexture,
    DetectAnomalies,
    CompareTolerance,
    CalculateFatigue,
    FinalizeScore,
}

impl DiagnosticStage {
    pub const ALL: [DiagnosticStage; 7] = [
        DiagnosticStage::InitializeNetwork,
        DiagnosticStage::SegmentRegions,
        DiagnosticStage::AnalyzeTexture,
        DiagnosticStage::DetectAnomalies,
        DiagnosticStage::CompareTolerance,
        DiagnosticStage::CalculateFatigue,
        DiagnosticStage::FinalizeScore,
    ];

    /// Get the stage's progress label.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticStage::InitializeNetwork => "Initializing Neural Network (v4.2)",
            DiagnosticStage::SegmentRegions => "Segmenting Image Regions",
            DiagnosticStage::AnalyzeTexture => "Analyzing Surface Texture",
            DiagnosticStage::DetectAnomalies => "Detecting Structural Anomalies",
            DiagnosticStage::CompareTolerance => "Comparing against OEM Tolerance",
            DiagnosticStage::CalculateFatigue => "Calculating Fatigue & Stress",
            DiagnosticStage::FinalizeScore => "Finalizing Predictive Score",
        }
    }
}

/// Ordered stage labels. Identical on every call.
pub fn stages() -> Vec<String> {
    DiagnosticStage::ALL
        .iter()
        .map(|s| s.label().to_string())
        .collect()
}

/// Completion percentage after finishing the stage at `index`.
pub fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (index + 1) as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_stages_in_order() {
        let labels = stages();
        assert_eq!(labels.len(), 7);
        assert!(labels[0].starts_with("Initializing Neural Network"));
        assert_eq!(labels[1], "Segmenting Image Regions");
        assert_eq!(labels[6], "Finalizing Predictive Score");
    }

    #[test]
    fn test_stages_are_stable() {
        assert_eq!(stages(), stages());
    }

    #[test]
    fn test_progress_percent() {
        assert!((progress_percent(0, 7) - 100.0 / 7.0).abs() < 1e-9);
        assert_eq!(progress_percent(6, 7), 100.0);
        assert_eq!(progress_percent(0, 0), 100.0);
    }
}
