//! Category registry: physical specs for each known core category.

use serde::{Deserialize, Serialize};

/// Per-category physical spec used by the scoring engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CategorySpec {
    /// Service life of a defect-free remanufactured unit, in years.
    pub max_life_years: f64,

    /// Warranty offered on a unit with no significant life reduction.
    pub warranty_base_months: u32,
}

/// Known core categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CoreCategory {
    Turbocharger,
    Alternator,
    #[serde(rename = "ECU Module")]
    EcuModule,
    #[serde(rename = "Starter Motor")]
    StarterMotor,
    Transmission,
}

impl CoreCategory {
    /// All categories, in the order an operator picks them.
    pub const ALL: [CoreCategory; 5] = [
        CoreCategory::Turbocharger,
        CoreCategory::Alternator,
        CoreCategory::EcuModule,
        CoreCategory::StarterMotor,
        CoreCategory::Transmission,
    ];

    /// Category substituted for unrecognized labels.
    pub const DEFAULT: CoreCategory = CoreCategory::Turbocharger;

    /// Display label, as carried in reports.
    pub fn label(&self) -> &'static str {
        match self {
            CoreCategory::Turbocharger => "Turbocharger",
            CoreCategory::Alternator => "Alternator",
            CoreCategory::EcuModule => "ECU Module",
            CoreCategory::StarterMotor => "Starter Motor",
            CoreCategory::Transmission => "Transmission",
        }
    }

    /// Exact label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn spec(&self) -> CategorySpec {
        let (max_life_years, warranty_base_months) = match self {
            CoreCategory::Turbocharger => (5.0, 24),
            CoreCategory::Alternator => (7.0, 36),
            CoreCategory::EcuModule => (10.0, 48),
            CoreCategory::StarterMotor => (6.0, 24),
            CoreCategory::Transmission => (12.0, 60),
        };
        CategorySpec {
            max_life_years,
            warranty_base_months,
        }
    }
}

impl std::fmt::Display for CoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Look up the spec for a category label.
///
/// Unknown labels are not an error: they resolve to the Turbocharger spec.
pub fn lookup(category: &str) -> CategorySpec {
    match CoreCategory::from_label(category) {
        Some(known) => known.spec(),
        None => {
            tracing::debug!(category = %category, "unknown category, using default spec");
            CoreCategory::DEFAULT.spec()
        }
    }
}
