//! The annotation bundle: a read-only view of a variant's precomputed
//! scientific attributes.
//!
//! Every field is optional. Absence means "no evidence available", never an
//! absent value: evaluators asked about a missing field return NotApplicable
//! unless the criterion is configured to require it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Population-frequency record (gnomAD-shaped).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationRecord {
    /// Highest allele frequency across filtered subpopulations.
    pub popmax_frequency: Option<f64>,
    /// Name of the subpopulation carrying the popmax frequency.
    pub popmax_population: Option<String>,
    /// Allele count in the popmax subpopulation.
    pub popmax_allele_count: Option<u64>,
    /// Overall allele frequency.
    pub overall_frequency: Option<f64>,
    /// Per-subpopulation frequency breakdown.
    pub subpopulations: BTreeMap<String, f64>,
}

/// Allele count observed in a cohort of healthy individuals
/// (FLOSSIES-shaped), consumed by BS2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthyCohort {
    /// Cohort name, used in rationales.
    pub name: String,
    /// Times the variant was observed in the cohort.
    pub count: u64,
}

/// Somatic hotspot recurrence (Cancer Hotspots-shaped), consumed by the
/// PM1 defined-regions variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomaticHotspot {
    /// Times the exact residue change was observed somatically.
    pub count: u64,
}

/// Named in-silico predictor scores (missense and splicing predictors share
/// the map; thresholds select by predictor name).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionScores(pub BTreeMap<String, f64>);

impl PredictionScores {
    /// Look up a predictor score by name.
    pub fn get(&self, predictor: &str) -> Option<f64> {
        self.0.get(predictor).copied()
    }

    /// Insert a score (builder-style, for tests and external assemblers).
    pub fn with(mut self, predictor: impl Into<String>, score: f64) -> Self {
        self.0.insert(predictor.into(), score);
        self
    }
}

/// Aggregate significance of a set of matching ClinVar records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinvarSignificance {
    Benign,
    LikelyBenign,
    Uncertain,
    LikelyPathogenic,
    Pathogenic,
}

/// ClinVar records matching the variant under one match class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinvarMatch {
    /// Highest aggregate significance among the matching records.
    pub significance: ClinvarSignificance,
    /// Matching ClinVar accessions, for rationales.
    pub accessions: Vec<String>,
}

impl ClinvarMatch {
    /// Whether the match set is pathogenic or likely pathogenic.
    pub fn is_pathogenic(&self) -> bool {
        matches!(
            self.significance,
            ClinvarSignificance::Pathogenic | ClinvarSignificance::LikelyPathogenic
        )
    }

    /// Whether the match set is pathogenic (likely pathogenic excluded).
    pub fn is_pathogenic_strict(&self) -> bool {
        self.significance == ClinvarSignificance::Pathogenic
    }

    /// Comma-joined accession list for rationales.
    pub fn accession_list(&self) -> String {
        self.accessions.join(", ")
    }
}

/// ClinVar-derived comparisons against previously classified variants,
/// keyed by match class. Produced by the external ClinVar lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinvarMatches {
    /// Records producing the exact same amino-acid change.
    pub same_aa_change: Option<ClinvarMatch>,
    /// Records producing a different amino-acid change at the same residue.
    pub different_aa_change: Option<ClinvarMatch>,
    /// Records at the same nucleotide position.
    pub same_nucleotide: Option<ClinvarMatch>,
    /// Records with the same predicted splice effect.
    pub same_splice_effect: Option<ClinvarMatch>,
    /// Truncating records in the same exon (PM5 PTC variant).
    pub truncation_in_exon: Option<ClinvarMatch>,
}

/// Genomic-region memberships computed upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionMembership {
    /// Inside a configured mutational hotspot interval.
    pub in_hotspot: Option<bool>,
    /// Inside a configured coldspot interval.
    pub in_coldspot: Option<bool>,
    /// Inside a critical / disease-relevant protein domain.
    pub in_critical_region: Option<bool>,
    /// Inside a repetitive region without known function.
    pub in_repetitive_region: Option<bool>,
    /// Inside a deep-intronic region with known function.
    pub in_functional_intronic_region: Option<bool>,
}

/// Transcript-level view of an exonic variant producing a premature
/// termination codon (nonsense/frameshift).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExonicView {
    /// Transcript accession this view was computed on.
    pub transcript_id: String,
    /// Nonsense-mediated decay predicted for the altered transcript.
    pub nmd_predicted: bool,
    /// The truncated region overlaps a disease-relevant domain.
    pub truncated_region_disease_relevant: bool,
    /// Fraction of protein length removed (0.0-1.0).
    pub protein_length_change: f64,
    /// Protein position of the premature termination codon.
    pub ptc_position: Option<u64>,
}

/// Transcript-level view of a canonical splice-site variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntronicView {
    /// Transcript accession this view was computed on.
    pub transcript_id: String,
    /// Exon skipping predicted.
    pub exons_skipped: bool,
    /// Nonsense-mediated decay predicted for the altered transcript.
    pub nmd_predicted: bool,
    /// The skipped/truncated region overlaps a disease-relevant domain.
    pub truncated_region_disease_relevant: bool,
    /// Reading frame preserved by the predicted altered splicing.
    pub reading_frame_preserved: bool,
    /// Fraction of protein length removed (0.0-1.0).
    pub protein_length_change: f64,
}

/// Transcript-level view of a start-loss variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartLossView {
    /// Transcript accession this view was computed on.
    pub transcript_id: String,
    /// A downstream in-frame alternative start codon exists.
    pub alternative_start_codon: bool,
    /// The region lost up to the alternative start is disease relevant.
    pub truncated_region_disease_relevant: bool,
}

/// One annotated transcript view; the PVS1 family walks all views and keeps
/// the strongest triggered result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptView {
    Exonic(ExonicView),
    Intronic(IntronicView),
    StartLoss(StartLossView),
}

impl TranscriptView {
    /// Transcript accession of the view.
    pub fn transcript_id(&self) -> &str {
        match self {
            TranscriptView::Exonic(v) => &v.transcript_id,
            TranscriptView::Intronic(v) => &v.transcript_id,
            TranscriptView::StartLoss(v) => &v.transcript_id,
        }
    }
}

/// Readout of a well-established functional assay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssayResult {
    /// The assay shows a damaging effect.
    pub damaging: bool,
    /// The assay shows no damaging effect.
    pub normal: bool,
}

impl AssayResult {
    /// A damaging readout.
    pub fn damaging() -> Self {
        AssayResult {
            damaging: true,
            normal: false,
        }
    }

    /// A normal (benign-supporting) readout.
    pub fn normal() -> Self {
        AssayResult {
            damaging: false,
            normal: true,
        }
    }
}

/// Independently derived likelihood data from family and case-control
/// studies, consumed by PP1/BS4 and the multifactorial combiner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyStudies {
    /// Co-segregation likelihood ratio.
    pub co_segregation: Option<f64>,
    /// Co-occurrence (in trans with pathogenic variants) likelihood ratio.
    pub co_occurrence: Option<f64>,
    /// Case-control frequency likelihood ratio.
    pub case_control: Option<f64>,
    /// Functional-assay odds of pathogenicity.
    pub functional: Option<f64>,
    /// Study-specific prior probability of pathogenicity, overriding the
    /// configured default when present.
    pub prior: Option<f64>,
}

/// Intronic position of the variant relative to the nearest exon boundaries,
/// in HGVS offset convention (positive downstream of a donor, negative
/// upstream of an acceptor). Consumed by the BP7 deep-intronic variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntronOffsets {
    /// Offset of the variant start.
    pub start: i64,
    /// Offset of the variant end.
    pub end: i64,
}

/// Normalized read-only view of a variant's precomputed annotations.
///
/// Produced by external annotation pipelines; consumed by every rule
/// evaluator. All fields are optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationBundle {
    /// Population frequencies.
    pub population: Option<PopulationRecord>,
    /// Healthy-individual cohort counts.
    pub healthy_cohort: Option<HealthyCohort>,
    /// Somatic hotspot recurrence.
    pub somatic_hotspot: Option<SomaticHotspot>,
    /// In-silico predictor scores.
    pub predictions: PredictionScores,
    /// ClinVar comparisons.
    pub clinvar: Option<ClinvarMatches>,
    /// Region memberships.
    pub regions: RegionMembership,
    /// Annotated transcript views for the loss-of-function path.
    pub transcripts: Vec<TranscriptView>,
    /// Protein-level functional assay readout.
    pub protein_assay: Option<AssayResult>,
    /// Splicing (RNA) assay readout.
    pub splice_assay: Option<AssayResult>,
    /// Family and case-control study data.
    pub family_studies: Option<FamilyStudies>,
    /// Intronic offsets for deep-intronic checks.
    pub intron_offsets: Option<IntronOffsets>,
}
