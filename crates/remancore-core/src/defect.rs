//! Defect records produced by classification.

use serde::{Deserialize, Serialize};

/// How serious a detected defect is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected anomaly and its effect on remaining service life.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefectRecord {
    /// Human-readable defect name.
    pub name: String,

    pub severity: Severity,

    /// Years of service life lost to this defect. Never negative.
    pub life_penalty_years: f64,
}

impl DefectRecord {
    /// Name of the sentinel record reported when nothing is detected.
    pub const NONE_NAME: &'static str = "None";

    pub fn new(name: impl Into<String>, severity: Severity, life_penalty_years: f64) -> Self {
        Self {
            name: name.into(),
            severity,
            life_penalty_years: life_penalty_years.max(0.0),
        }
    }

    /// The "nothing detected" sentinel.
    pub fn none() -> Self {
        Self::new(Self::NONE_NAME, Severity::None, 0.0)
    }

    pub fn is_none(&self) -> bool {
        self.severity == Severity::None && self.name == Self::NONE_NAME
    }
}
