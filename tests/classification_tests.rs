//! End-to-end classification scenarios.

use ferro_acmg::annotation::{
    AnnotationBundle, ExonicView, FamilyStudies, PopulationRecord, RegionMembership,
    TranscriptView,
};
use ferro_acmg::multifactorial::{combine, LikelihoodRatio, LikelihoodSource, MultifactorialConfig};
use ferro_acmg::variant::Consequence;
use ferro_acmg::{
    Classification, Classifier, Criterion, RuleConfiguration, Strength, Variant,
};
use rstest::rstest;

fn brca1_variant(consequences: Vec<Consequence>) -> Variant {
    Variant {
        chrom: "17".to_string(),
        start: 43_094_464,
        end: 43_094_464,
        reference: "G".to_string(),
        alternate: "A".to_string(),
        gene: "BRCA1".to_string(),
        transcript: Some("NM_007294.4".to_string()),
        consequences,
        hgvs_c: Some("c.1066C>T".to_string()),
        hgvs_p: Some("p.Gln356Ter".to_string()),
        exon: Some(10),
        intron: None,
    }
}

fn population(popmax: f64) -> PopulationRecord {
    PopulationRecord {
        popmax_frequency: Some(popmax),
        popmax_population: Some("nfe".to_string()),
        ..PopulationRecord::default()
    }
}

/// A nonsense variant in BRCA1 exon 10, NMD-positive, in a disease-relevant
/// region, absent from population databases: PVS1 very strong plus PM2, no
/// benign evidence, classifies pathogenic.
#[test]
fn nonsense_brca1_variant_is_pathogenic() {
    let classifier = Classifier::new(RuleConfiguration::default_acmg()).unwrap();
    let variant = brca1_variant(vec![Consequence::StopGained]);
    let bundle = AnnotationBundle {
        population: Some(population(0.0)),
        transcripts: vec![TranscriptView::Exonic(ExonicView {
            transcript_id: "NM_007294.4".to_string(),
            nmd_predicted: true,
            truncated_region_disease_relevant: true,
            protein_length_change: 0.81,
            ptc_position: Some(356),
        })],
        ..AnnotationBundle::default()
    };

    let result = classifier.classify(&variant, &bundle);

    let pvs1 = result
        .evidence
        .iter()
        .find(|e| e.criterion == Criterion::Pvs1)
        .expect("PVS1 triggers");
    assert_eq!(pvs1.strength, Strength::VeryStrong);
    let pm2 = result
        .evidence
        .iter()
        .find(|e| e.criterion == Criterion::Pm2)
        .expect("PM2 triggers");
    assert_eq!(pm2.strength, Strength::Moderate);
    assert!(result
        .evidence
        .iter()
        .all(|e| e.direction == ferro_acmg::Direction::Pathogenic));
    assert!(result.points >= 10);
    assert_eq!(result.classification, Classification::Pathogenic);
    assert!(result.failures.is_empty());
}

/// A common missense variant above the BA1 cutoff is benign regardless of
/// co-occurring moderate pathogenic evidence.
#[test]
fn ba1_standalone_overrides_pathogenic_evidence() {
    let classifier = Classifier::new(RuleConfiguration::default_acmg()).unwrap();
    let variant = brca1_variant(vec![Consequence::MissenseVariant]);
    let bundle = AnnotationBundle {
        population: Some(population(0.08)),
        regions: RegionMembership {
            in_hotspot: Some(true),
            ..RegionMembership::default()
        },
        ..AnnotationBundle::default()
    };

    let result = classifier.classify(&variant, &bundle);

    // PM1 moderate pathogenic evidence is present...
    assert!(result
        .evidence
        .iter()
        .any(|e| e.criterion == Criterion::Pm1 && e.strength == Strength::Moderate));
    // ...but the stand-alone benign criterion decides the category.
    assert_eq!(result.standalone, Some(Criterion::Ba1));
    assert_eq!(result.classification, Classification::Benign);
    // The full evidence set is still reported for audit.
    assert!(result.evidence.iter().any(|e| e.criterion == Criterion::Ba1));
}

/// Three independent likelihood ratios against a prior of 0.1 combine
/// deterministically in odds form.
#[test]
fn multifactorial_combination_matches_hand_computation() {
    let config = MultifactorialConfig {
        prior: 0.1,
        ..MultifactorialConfig::default()
    };
    let ratios = [
        LikelihoodRatio::new(LikelihoodSource::Segregation, 2.0),
        LikelihoodRatio::new(LikelihoodSource::CoOccurrence, 3.5),
        LikelihoodRatio::new(LikelihoodSource::CaseControl, 0.8),
    ];
    let posterior = combine(&ratios, &config).unwrap();

    let expected_odds = (0.1 / 0.9) * 2.0 * 3.5 * 0.8;
    let expected = expected_odds / (1.0 + expected_odds);
    assert!((posterior.probability - expected).abs() < 1e-12);
    assert_eq!(posterior.classification, Classification::Uncertain);

    let again = combine(&ratios, &config).unwrap();
    assert_eq!(posterior, again);
}

/// The engine attaches the posterior when the bundle carries enough
/// independent ratios and silently falls back otherwise.
#[test]
fn multifactorial_path_is_attached_from_bundle() {
    let classifier = Classifier::new(RuleConfiguration::default_acmg()).unwrap();
    let variant = brca1_variant(vec![Consequence::MissenseVariant]);
    let bundle = AnnotationBundle {
        population: Some(population(0.0)),
        family_studies: Some(FamilyStudies {
            co_segregation: Some(18.7),
            co_occurrence: Some(4.0),
            ..FamilyStudies::default()
        }),
        ..AnnotationBundle::default()
    };
    let result = classifier.classify(&variant, &bundle);
    let posterior = result.posterior.expect("two ratios suffice");
    assert_eq!(
        posterior.sources,
        vec![
            LikelihoodSource::Segregation,
            LikelihoodSource::CoOccurrence
        ]
    );
    // PP1 also thresholds the segregation likelihood on the discrete path.
    assert!(result
        .evidence
        .iter()
        .any(|e| e.criterion == Criterion::Pp1 && e.strength == Strength::Strong));
}

#[rstest]
#[case(10, Classification::Pathogenic)]
#[case(9, Classification::LikelyPathogenic)]
#[case(6, Classification::LikelyPathogenic)]
#[case(5, Classification::Uncertain)]
#[case(0, Classification::Uncertain)]
#[case(-1, Classification::LikelyBenign)]
#[case(-6, Classification::LikelyBenign)]
#[case(-7, Classification::Benign)]
fn point_band_boundaries(#[case] points: i32, #[case] expected: Classification) {
    assert_eq!(ferro_acmg::aggregate::classify_points(points), expected);
}

/// Gene-specific evaluator bindings change behavior only for their gene.
#[test]
fn gene_override_selects_gene_specific_evaluator() {
    let mut plan = ferro_acmg::CriterionPlan::new("pvs1_brca1");
    plan.last_pathogenic_ptc
        .insert("NM_007294.4".to_string(), 1855);
    let config =
        RuleConfiguration::default_acmg().with_gene_override("BRCA1", Criterion::Pvs1, plan);
    let classifier = Classifier::new(config).unwrap();

    let variant = brca1_variant(vec![Consequence::StopGained]);
    let bundle = AnnotationBundle {
        population: Some(population(0.0)),
        transcripts: vec![TranscriptView::Exonic(ExonicView {
            transcript_id: "NM_007294.4".to_string(),
            nmd_predicted: false,
            truncated_region_disease_relevant: false,
            protein_length_change: 0.05,
            // Upstream of the configured last pathogenic truncation, so the
            // gene-specific table promotes the result to very strong.
            ptc_position: Some(356),
        })],
        ..AnnotationBundle::default()
    };
    let result = classifier.classify(&variant, &bundle);
    let pvs1 = result
        .evidence
        .iter()
        .find(|e| e.criterion == Criterion::Pvs1)
        .unwrap();
    assert_eq!(pvs1.strength, Strength::VeryStrong);

    // The generic evaluator would have graded this escape-NMD truncation
    // moderate.
    let generic = Classifier::new(RuleConfiguration::default_acmg()).unwrap();
    let result = generic.classify(&variant, &bundle);
    let pvs1 = result
        .evidence
        .iter()
        .find(|e| e.criterion == Criterion::Pvs1)
        .unwrap();
    assert_eq!(pvs1.strength, Strength::Moderate);
}

/// An unresolvable evaluator binding fails at classifier construction, not
/// at evaluation time.
#[test]
fn unknown_evaluator_fails_fast() {
    let mut config = RuleConfiguration::default_acmg();
    config
        .criteria
        .insert(Criterion::Pm1, ferro_acmg::CriterionPlan::new("pm1_unknown"));
    let err = Classifier::new(config).unwrap_err();
    assert!(matches!(err, ferro_acmg::AcmgError::Configuration { .. }));
}

/// Serialization carries criterion codes and category labels.
#[test]
fn result_serializes_with_published_vocabulary() {
    let classifier = Classifier::new(RuleConfiguration::default_acmg()).unwrap();
    let variant = brca1_variant(vec![Consequence::MissenseVariant]);
    let result = classifier.classify(
        &variant,
        &AnnotationBundle {
            population: Some(population(0.08)),
            ..AnnotationBundle::default()
        },
    );
    let json = result.to_json().unwrap();
    assert!(json.contains("\"BA1\""));
    assert!(json.contains("stand_alone"));
    assert!(json.contains("Benign"));
}
