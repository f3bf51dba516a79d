//! Scoring engine: turns a classification into a life estimate and verdict.

use serde::{Deserialize, Serialize};

use crate::defect::DefectRecord;
use crate::registry::CategorySpec;

/// Below this fraction of max life the unit is salvaged.
pub const SALVAGE_LIFE_RATIO: f64 = 0.3;

/// Below this fraction of max life only the reduced warranty is offered.
pub const FULL_WARRANTY_LIFE_RATIO: f64 = 0.7;

pub const REDUCED_WARRANTY_MONTHS: u32 = 6;

/// Placeholder confidence figures until a real model reports its own.
pub const CRITICAL_CONFIDENCE_PERCENT: f64 = 99.8;
pub const NOMINAL_CONFIDENCE_PERCENT: f64 = 96.5;

/// Accept/reject decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    /// Fit for remanufacture.
    Pass,

    /// Unfit for remanufacture; recycle.
    Salvage,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pass => "Pass",
            ReportStatus::Salvage => "Salvage",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            ReportStatus::Pass => "ACCEPTED",
            ReportStatus::Salvage => "REJECTED",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            ReportStatus::Pass => "Condition Meets Reman Standards",
            ReportStatus::Salvage => "Critical Defects Detected - Recycle",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`score`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub predicted_life_years: f64,
    pub warranty_months: u32,
    pub status: ReportStatus,
    pub confidence_percent: f64,
}

/// Sum of life penalties across all defects.
pub fn total_penalty(defects: &[DefectRecord]) -> f64 {
    defects.iter().map(|d| d.life_penalty_years).sum()
}

/// Round half away from zero to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Score a classified unit against its category spec.
///
/// - Predicted life is max life minus total penalty, floored at zero and
///   rounded to a tenth of a year.
/// - Critical units and units under 30% of max life are salvaged with no
///   warranty.
/// - Passing units under 70% of max life get the reduced warranty, others the
///   category's base warranty.
pub fn score(spec: &CategorySpec, defects: &[DefectRecord], critical: bool) -> Score {
    let predicted_life_years = round_tenth((spec.max_life_years - total_penalty(defects)).max(0.0));

    let status = if critical || predicted_life_years < spec.max_life_years * SALVAGE_LIFE_RATIO {
        ReportStatus::Salvage
    } else {
        ReportStatus::Pass
    };

    let warranty_months = match status {
        ReportStatus::Salvage => 0,
        ReportStatus::Pass if predicted_life_years < spec.max_life_years * FULL_WARRANTY_LIFE_RATIO => {
            REDUCED_WARRANTY_MONTHS
        }
        ReportStatus::Pass => spec.warranty_base_months,
    };

    let confidence_percent = if critical {
        CRITICAL_CONFIDENCE_PERCENT
    } else {
        NOMINAL_CONFIDENCE_PERCENT
    };

    Score {
        predicted_life_years,
        warranty_months,
        status,
        confidence_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defect::Severity;
    use crate::registry::{lookup, CoreCategory};

    #[test]
    fn test_critical_starter_motor_is_salvaged() {
        let defects = vec![
            DefectRecord::new("Housing Crack (Critical)", Severity::High, 6.0),
            DefectRecord::new("Mounting Flange Damage", Severity::High, 2.0),
        ];
        let s = score(&lookup("Starter Motor"), &defects, true);
        assert_eq!(s.predicted_life_years, 0.0);
        assert_eq!(s.status, ReportStatus::Salvage);
        assert_eq!(s.warranty_months, 0);
        assert_eq!(s.confidence_percent, 99.8);
    }

    #[test]
    fn test_clean_turbo_gets_full_warranty() {
        let s = score(&lookup("Turbocharger"), &[DefectRecord::none()], false);
        assert_eq!(s.predicted_life_years, 5.0);
        assert_eq!(s.status, ReportStatus::Pass);
        assert_eq!(s.warranty_months, 24);
        assert_eq!(s.confidence_percent, 96.5);
    }

    #[test]
    fn test_worn_alternator_gets_reduced_warranty() {
        let defects = vec![
            DefectRecord::new("Carbon Brush Wear", Severity::Medium, 2.5),
            DefectRecord::new("Surface Oxidation", Severity::Low, 0.5),
        ];
        assert_eq!(total_penalty(&defects), 3.0);
        let s = score(&lookup("Alternator"), &defects, false);
        assert_eq!(s.predicted_life_years, 4.0);
        assert_eq!(s.status, ReportStatus::Pass);
        assert_eq!(s.warranty_months, 6);
    }

    #[test]
    fn test_low_life_salvaged_without_critical_flag() {
        // 5.0 - 4.0 = 1.0 < 1.5
        let defects = vec![DefectRecord::new("Deep Pitting", Severity::High, 4.0)];
        let s = score(&CoreCategory::Turbocharger.spec(), &defects, false);
        assert_eq!(s.status, ReportStatus::Salvage);
        assert_eq!(s.warranty_months, 0);
        assert_eq!(s.confidence_percent, 96.5);
    }

    #[test]
    fn test_threshold_boundaries() {
        let spec = CategorySpec {
            max_life_years: 10.0,
            warranty_base_months: 48,
        };

        // Exactly 30% of max life is not salvaged.
        let s = score(&spec, &[DefectRecord::new("Wear", Severity::Medium, 7.0)], false);
        assert_eq!(s.predicted_life_years, 3.0);
        assert_eq!(s.status, ReportStatus::Pass);
        assert_eq!(s.warranty_months, 6);

        let s = score(&spec, &[DefectRecord::new("Wear", Severity::Low, 3.1)], false);
        assert_eq!(s.predicted_life_years, 6.9);
        assert_eq!(s.warranty_months, 6);

        let s = score(&spec, &[DefectRecord::new("Wear", Severity::Low, 2.9)], false);
        assert_eq!(s.predicted_life_years, 7.1);
        assert_eq!(s.warranty_months, 48);
    }

    #[test]
    fn test_predicted_life_rounding_and_floor() {
        let spec = CategorySpec {
            max_life_years: 5.0,
            warranty_base_months: 24,
        };
        let s = score(&spec, &[DefectRecord::new("Wear", Severity::Low, 0.26)], false);
        assert_eq!(s.predicted_life_years, 4.7);

        let s = score(&spec, &[DefectRecord::new("Wear", Severity::High, 9.0)], false);
        assert_eq!(s.predicted_life_years, 0.0);
    }

    #[test]
    fn test_unknown_wear_on_turbo() {
        let defects = vec![DefectRecord::new("Unknown Surface Wear", Severity::Medium, 2.0)];
        let s = score(&lookup("Turbocharger"), &defects, false);
        assert_eq!(s.predicted_life_years, 3.0);
        assert_eq!(s.status, ReportStatus::Pass);
        assert_eq!(s.warranty_months, 6);
    }

    #[test]
    fn test_status_presentation() {
        assert_eq!(ReportStatus::Pass.verdict(), "ACCEPTED");
        assert_eq!(ReportStatus::Salvage.verdict(), "REJECTED");
        assert!(ReportStatus::Salvage.headline().contains("Recycle"));
    }
}
