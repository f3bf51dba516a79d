//! Diagnostic report composition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::Classification;
use crate::defect::DefectRecord;
use crate::scoring::{self, ReportStatus, Score};

/// Final, immutable result of one completed diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    /// Unique identifier for this report.
    pub id: Uuid,

    /// Job that produced this report.
    pub job_id: Uuid,

    /// When the report was composed.
    pub timestamp: DateTime<Utc>,

    /// Category label as supplied by the caller.
    pub category: String,

    /// Detected defects. Contains the "None" sentinel when nothing was found.
    pub defects: Vec<DefectRecord>,

    pub predicted_life_years: f64,

    pub warranty_months: u32,

    pub confidence_percent: f64,

    pub status: ReportStatus,
}

impl DiagnosticReport {
    /// Assemble a report from classifier and scoring output.
    pub fn compose(
        job_id: Uuid,
        category: impl Into<String>,
        classification: Classification,
        score: Score,
    ) -> Self {
        let mut defects = classification.defects;
        if defects.is_empty() {
            defects.push(DefectRecord::none());
        }

        Self {
            id: Uuid::new_v4(),
            job_id,
            timestamp: Utc::now(),
            category: category.into(),
            defects,
            predicted_life_years: score.predicted_life_years,
            warranty_months: score.warranty_months,
            confidence_percent: score.confidence_percent,
            status: score.status,
        }
    }

    pub fn total_penalty(&self) -> f64 {
        scoring::total_penalty(&self.defects)
    }

    /// Whether only the "None" sentinel was recorded.
    pub fn is_clean(&self) -> bool {
        self.defects.iter().all(|d| d.is_none())
    }

    /// The score fields alone, for comparing two reports of the same input.
    pub fn score(&self) -> Score {
        Score {
            predicted_life_years: self.predicted_life_years,
            warranty_months: self.warranty_months,
            status: self.status,
            confidence_percent: self.confidence_percent,
        }
    }
}
