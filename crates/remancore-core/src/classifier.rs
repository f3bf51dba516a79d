//! Defect classification.
//!
//! [`DefectClassifier`] is the seam a real vision model plugs into. Today's
//! implementation, [`SignatureClassifier`], matches keywords in the image
//! reference against a priority-ordered rule table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::defect::{DefectRecord, Severity};

/// Outcome of classifying one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Detected defects, in detection order. Never empty.
    pub defects: Vec<DefectRecord>,

    /// Whether any detected defect disqualifies the unit outright.
    pub critical: bool,
}

impl Classification {
    /// Nothing detected: the sentinel record, not critical.
    pub fn clean() -> Self {
        Self {
            defects: vec![DefectRecord::none()],
            critical: false,
        }
    }
}

/// Trait for defect classifier backends (signature stub, model-backed, etc.).
#[async_trait]
pub trait DefectClassifier: Send + Sync {
    /// Classify an image of a core of the given category.
    async fn classify(&self, image_ref: &str, category: &str) -> Classification;
}

// ---------------------------------------------------------------------------
// Signature rule table
// ---------------------------------------------------------------------------

/// One row of the signature table: if any keyword occurs in the lowercased
/// image reference, the listed defects are reported.
#[derive(Debug, Clone, Copy)]
pub struct SignatureRule {
    pub keywords: &'static [&'static str],
    pub defects: &'static [(&'static str, Severity, f64)],
    pub critical: bool,
}

impl SignatureRule {
    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }

    fn classification(&self) -> Classification {
        Classification {
            defects: self
                .defects
                .iter()
                .map(|(name, severity, penalty)| DefectRecord::new(*name, *severity, *penalty))
                .collect(),
            critical: self.critical,
        }
    }
}

const CLEAN: &[(&str, Severity, f64)] = &[(DefectRecord::NONE_NAME, Severity::None, 0.0)];

/// First match wins.
pub const SIGNATURE_RULES: &[SignatureRule] = &[
    SignatureRule {
        keywords: &["startermotor"],
        defects: &[
            ("Housing Crack (Critical)", Severity::High, 6.0),
            ("Mounting Flange Damage", Severity::High, 2.0),
        ],
        critical: true,
    },
    SignatureRule {
        keywords: &["transmission"],
        defects: &[
            ("Gear Teeth Shear", Severity::High, 8.0),
            ("Metal Contamination", Severity::Medium, 3.0),
        ],
        critical: true,
    },
    SignatureRule {
        keywords: &["heavyduty", "alternator"],
        defects: &[
            ("Carbon Brush Wear", Severity::Medium, 2.5),
            ("Surface Oxidation", Severity::Low, 0.5),
        ],
        critical: false,
    },
    SignatureRule {
        keywords: &["turbo"],
        defects: CLEAN,
        critical: false,
    },
    SignatureRule {
        keywords: &["ecu"],
        defects: CLEAN,
        critical: false,
    },
];

/// Name reported by the fallback when it decides the surface is worn.
pub const UNKNOWN_WEAR_NAME: &str = "Unknown Surface Wear";

/// What to report for an image no signature matches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Report "Unknown Surface Wear" or nothing with equal probability.
    #[default]
    CoinFlip,

    /// Always report the "None" sentinel.
    AlwaysClean,

    /// Always report "Unknown Surface Wear".
    AlwaysWorn,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::CoinFlip => "coin_flip",
            FallbackPolicy::AlwaysClean => "always_clean",
            FallbackPolicy::AlwaysWorn => "always_worn",
        }
    }

    fn classification(&self) -> Classification {
        let worn = match self {
            FallbackPolicy::CoinFlip => coin_flip(),
            FallbackPolicy::AlwaysClean => false,
            FallbackPolicy::AlwaysWorn => true,
        };

        if worn {
            Classification {
                defects: vec![DefectRecord::new(UNKNOWN_WEAR_NAME, Severity::Medium, 2.0)],
                critical: false,
            }
        } else {
            Classification::clean()
        }
    }
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coin_flip" => Ok(FallbackPolicy::CoinFlip),
            "always_clean" => Ok(FallbackPolicy::AlwaysClean),
            "always_worn" => Ok(FallbackPolicy::AlwaysWorn),
            other => Err(format!("unknown fallback policy: {other}")),
        }
    }
}

fn coin_flip() -> bool {
    rand::random::<bool>()
}

/// Keyword-signature classifier standing in for a real vision model.
///
/// The category is accepted for contract compatibility but does not influence
/// rule selection.
#[derive(Debug, Clone, Default)]
pub struct SignatureClassifier {
    fallback: FallbackPolicy,
}

impl SignatureClassifier {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Synchronous core of [`DefectClassifier::classify`].
    pub fn classify_now(&self, image_ref: &str, category: &str) -> Classification {
        let normalized = image_ref.to_lowercase();

        match SIGNATURE_RULES.iter().position(|r| r.matches(&normalized)) {
            Some(index) => {
                tracing::debug!(rule = index, category = %category, "signature matched");
                SIGNATURE_RULES[index].classification()
            }
            None => {
                tracing::debug!(
                    fallback = self.fallback.as_str(),
                    category = %category,
                    "no signature matched"
                );
                self.fallback.classification()
            }
        }
    }
}

#[async_trait]
impl DefectClassifier for SignatureClassifier {
    async fn classify(&self, image_ref: &str, category: &str) -> Classification {
        self.classify_now(image_ref, category)
    }
}
