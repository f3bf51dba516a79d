//! End-to-end checks of classification, scoring and report composition.

use remancore_core::{
    lookup, score, CoreCategory, DefectClassifier, DefectRecord, DiagnosticReport,
    FallbackPolicy, ReportStatus, Severity, SignatureClassifier, UNKNOWN_WEAR_NAME,
};
use uuid::Uuid;

async fn diagnose(classifier: &dyn DefectClassifier, image: &str, category: &str) -> DiagnosticReport {
    let classification = classifier.classify(image, category).await;
    let s = score(&lookup(category), &classification.defects, classification.critical);
    DiagnosticReport::compose(Uuid::new_v4(), category, classification, s)
}

#[tokio::test]
async fn test_sample_gallery_outcomes() {
    let classifier = SignatureClassifier::default();

    let turbo = diagnose(&classifier, "/asset/turbocharger.jpg", "Turbocharger").await;
    assert_eq!(turbo.defects, vec![DefectRecord::none()]);
    assert_eq!(turbo.predicted_life_years, 5.0);
    assert_eq!(turbo.status, ReportStatus::Pass);
    assert_eq!(turbo.warranty_months, 24);
    assert_eq!(turbo.confidence_percent, 96.5);

    let alternator = diagnose(&classifier, "/asset/heavyduty.jpg", "Alternator").await;
    assert_eq!(alternator.predicted_life_years, 4.0);
    assert_eq!(alternator.status, ReportStatus::Pass);
    assert_eq!(alternator.warranty_months, 6);

    let ecu = diagnose(&classifier, "/asset/ecu_mod.jpg", "ECU Module").await;
    assert_eq!(ecu.predicted_life_years, 10.0);
    assert_eq!(ecu.warranty_months, 48);

    let starter = diagnose(&classifier, "/asset/StarterMotor.jpg", "Starter Motor").await;
    assert_eq!(
        starter.defects,
        vec![
            DefectRecord::new("Housing Crack (Critical)", Severity::High, 6.0),
            DefectRecord::new("Mounting Flange Damage", Severity::High, 2.0),
        ]
    );
    assert_eq!(starter.predicted_life_years, 0.0);
    assert_eq!(starter.status, ReportStatus::Salvage);
    assert_eq!(starter.warranty_months, 0);
    assert_eq!(starter.confidence_percent, 99.8);

    let transmission = diagnose(&classifier, "/asset/transmission.jpg", "Transmission").await;
    assert_eq!(transmission.predicted_life_years, 1.0);
    assert_eq!(transmission.status, ReportStatus::Salvage);
    assert_eq!(transmission.warranty_months, 0);
}

#[tokio::test]
async fn test_warranty_is_one_of_three_tiers() {
    let classifier = SignatureClassifier::new(FallbackPolicy::AlwaysWorn);
    let images = [
        "turbo.jpg",
        "heavyduty.jpg",
        "ecu.jpg",
        "startermotor.jpg",
        "transmission.jpg",
        "capture-0001",
    ];

    for category in CoreCategory::ALL {
        let base = category.spec().warranty_base_months;
        for image in images {
            let report = diagnose(&classifier, image, category.label()).await;
            assert!(
                [0, 6, base].contains(&report.warranty_months),
                "{image} as {category}: {} months",
                report.warranty_months
            );
            assert!(report.predicted_life_years >= 0.0);
            assert!(!report.defects.is_empty());
            if report.status == ReportStatus::Salvage {
                assert_eq!(report.warranty_months, 0);
            }
        }
    }
}

#[tokio::test]
async fn test_recognized_inputs_are_deterministic() {
    let classifier = SignatureClassifier::default();
    for (image, category) in [
        ("/asset/turbocharger.jpg", "Turbocharger"),
        ("/asset/heavyduty.jpg", "Alternator"),
        ("/asset/transmission.jpg", "Transmission"),
    ] {
        let first = diagnose(&classifier, image, category).await;
        for _ in 0..10 {
            let again = diagnose(&classifier, image, category).await;
            assert_eq!(again.defects, first.defects);
            assert_eq!(again.score(), first.score());
            assert_eq!(again.category, first.category);
        }
    }
}

#[tokio::test]
async fn test_unmatched_image_splits_evenly() {
    let classifier = SignatureClassifier::default();
    let trials = 2000;
    let mut worn = 0;
    for _ in 0..trials {
        let report = diagnose(&classifier, "data:image/png;base64,iVBORw0KGgo", "Turbocharger").await;
        if report.defects[0].name == UNKNOWN_WEAR_NAME {
            assert_eq!(report.predicted_life_years, 3.0);
            worn += 1;
        } else {
            assert!(report.is_clean());
        }
        assert_eq!(report.status, ReportStatus::Pass);
    }
    assert!((850..=1150).contains(&worn), "worn = {worn}");
}
