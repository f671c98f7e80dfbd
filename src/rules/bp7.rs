//! BP7: synonymous (or deep intronic) variant with no predicted splice
//! impact.
//!
//! The deep-intronic variants extend applicability to intronic positions
//! outside the splice-relevant windows, with gene-specific offsets, and
//! exclude known-functional deep-intronic regions. A performed RNA assay
//! showing no splice effect upgrades the result to strong.

use crate::annotation::AnnotationBundle;
use crate::config::{defaults, CriterionPlan};
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::{Consequence, Variant};
use crate::Result;

/// Gene-specific deep-intronic window. Positions past `donor_offset` (after
/// a donor) or before `acceptor_offset` (before an acceptor) count as deep
/// intronic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepIntronicWindow {
    /// Minimum positive offset downstream of a donor site.
    pub donor_offset: i64,
    /// Maximum negative offset upstream of an acceptor site.
    pub acceptor_offset: i64,
    /// Whether the boundary offsets themselves count as deep intronic.
    pub inclusive: bool,
}

impl DeepIntronicWindow {
    /// ENIGMA window: +7 / -21, boundaries included.
    pub fn enigma() -> Self {
        DeepIntronicWindow {
            donor_offset: 7,
            acceptor_offset: -21,
            inclusive: true,
        }
    }

    /// ATM window: +7 / -40, boundaries excluded.
    pub fn atm() -> Self {
        DeepIntronicWindow {
            donor_offset: 7,
            acceptor_offset: -40,
            inclusive: false,
        }
    }

    /// PALB2 window, per the ENIGMA recommendation.
    pub fn palb2() -> Self {
        DeepIntronicWindow::enigma()
    }

    /// Whether both offsets fall in the deep-intronic range.
    pub fn contains(&self, start: i64, end: i64) -> bool {
        let past_donor = if self.inclusive {
            start >= self.donor_offset && end >= self.donor_offset
        } else {
            start > self.donor_offset && end > self.donor_offset
        };
        let before_acceptor = if self.inclusive {
            start <= self.acceptor_offset && end <= self.acceptor_offset
        } else {
            start < self.acceptor_offset && end < self.acceptor_offset
        };
        past_donor || before_acceptor
    }
}

/// BP7 evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Bp7 {
    /// Deep-intronic extension, when configured for the gene.
    pub deep_intronic: Option<DeepIntronicWindow>,
    /// Let a performed RNA assay decide at strong strength.
    pub use_rna_assay: bool,
}

impl Bp7 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        let synonymous = variant.has_consequence(Consequence::SynonymousVariant);
        let intronic = variant.has_consequence(Consequence::IntronVariant);
        match self.deep_intronic {
            Some(_) => synonymous || intronic,
            None => synonymous,
        }
    }

    pub fn evaluate(
        &self,
        variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        if !self.applicable(variant) {
            return Err(crate::error::AcmgError::UnsupportedVariantType {
                criterion: Criterion::Bp7.code().to_string(),
                found: variant.consequence_terms(),
            });
        }

        if self.use_rna_assay {
            if let Some(assay) = &bundle.splice_assay {
                return if assay.normal {
                    Ok(Outcome::triggered(
                        Criterion::Bp7,
                        RuleTag::Splicing,
                        Strength::Strong,
                        "RNA assay shows no effect on splicing",
                    ))
                } else {
                    Ok(Outcome::not_triggered(
                        Criterion::Bp7,
                        "RNA assay does not rule out a splicing effect",
                    ))
                };
            }
        }

        let threshold = match &plan.splicing_scores {
            Some(t) => t,
            None => defaults::splicing_benign(),
        };
        let score = match bundle.predictions.get(&threshold.score) {
            Some(s) => s,
            None => {
                return missing_field(Criterion::Bp7, &format!("{} score", threshold.score), plan)
            }
        };
        if !threshold.is_met(score) {
            return Ok(Outcome::not_triggered(
                Criterion::Bp7,
                format!(
                    "{} score {score} does not rule out a splicing effect (cutoff {})",
                    threshold.score,
                    threshold.first_cutoff()
                ),
            ));
        }

        if variant.has_consequence(Consequence::SynonymousVariant) {
            return Ok(Outcome::triggered(
                Criterion::Bp7,
                RuleTag::Splicing,
                Strength::Supporting,
                format!(
                    "synonymous variant with no predicted splice effect ({} score {score})",
                    threshold.score
                ),
            ));
        }

        // Intronic path: only deep-intronic positions qualify, and known
        // functional deep-intronic regions are excluded.
        let Some(window) = self.deep_intronic else {
            return Ok(Outcome::not_applicable(
                Criterion::Bp7,
                "no deep-intronic window configured for this gene",
            ));
        };
        if bundle.regions.in_functional_intronic_region == Some(true) {
            return Ok(Outcome::not_triggered(
                Criterion::Bp7,
                "variant lies in a deep-intronic region with known function",
            ));
        }
        let offsets = match bundle.intron_offsets {
            Some(o) => o,
            None => return missing_field(Criterion::Bp7, "intron offsets", plan),
        };
        if window.contains(offsets.start, offsets.end) {
            Ok(Outcome::triggered(
                Criterion::Bp7,
                RuleTag::Splicing,
                Strength::Supporting,
                format!(
                    "deep intronic variant (offsets {}/{}) with no predicted splice effect",
                    offsets.start, offsets.end
                ),
            ))
        } else {
            Ok(Outcome::not_triggered(
                Criterion::Bp7,
                format!(
                    "intronic offsets {}/{} are within the splice-relevant window",
                    offsets.start, offsets.end
                ),
            ))
        }
    }
}
