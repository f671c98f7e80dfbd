//! PM5: a different change at the same residue (or a different truncation in
//! the same exon) previously classified as pathogenic.

use crate::annotation::AnnotationBundle;
use crate::config::CriterionPlan;
use crate::error::AcmgError;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::{Consequence, Variant};
use crate::Result;

/// PM5 evaluator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pm5Mode {
    /// Different amino-acid change at the same residue, pathogenic or
    /// likely pathogenic.
    Protein,
    /// Different amino-acid change at the same residue; likely pathogenic
    /// records do not count.
    ProteinPathogenicOnly,
    /// Splice variant with the same predicted effect known pathogenic.
    Splicing,
    /// Different truncating variant in the same exon known pathogenic.
    Ptc,
}

/// PM5 evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Pm5 {
    pub mode: Pm5Mode,
}

impl Pm5 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        match self.mode {
            Pm5Mode::Protein | Pm5Mode::ProteinPathogenicOnly => {
                variant.has_consequence(Consequence::MissenseVariant)
            }
            Pm5Mode::Splicing => variant.any_consequence(|c| {
                c.is_canonical_splice() || matches!(c, Consequence::SpliceRegionVariant)
            }),
            Pm5Mode::Ptc => variant.any_consequence(|c| {
                matches!(
                    c,
                    Consequence::StopGained | Consequence::FrameshiftVariant
                )
            }),
        }
    }

    pub fn evaluate(
        &self,
        variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        if !self.applicable(variant) {
            return Err(AcmgError::UnsupportedVariantType {
                criterion: Criterion::Pm5.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        let clinvar = match &bundle.clinvar {
            Some(c) => c,
            None => return missing_field(Criterion::Pm5, "ClinVar comparison", plan),
        };

        let (matches, tag, subject) = match self.mode {
            Pm5Mode::Protein | Pm5Mode::ProteinPathogenicOnly => (
                clinvar.different_aa_change.as_ref(),
                RuleTag::Protein,
                "a different amino-acid change at the same residue",
            ),
            Pm5Mode::Splicing => (
                clinvar.same_splice_effect.as_ref(),
                RuleTag::Splicing,
                "a splice variant with the same predicted effect",
            ),
            Pm5Mode::Ptc => (
                clinvar.truncation_in_exon.as_ref(),
                RuleTag::Protein,
                "a different truncating variant in the same exon",
            ),
        };

        let pathogenic_match = matches.filter(|m| match self.mode {
            Pm5Mode::ProteinPathogenicOnly => m.is_pathogenic_strict(),
            _ => m.is_pathogenic(),
        });
        match pathogenic_match {
            Some(m) => Ok(Outcome::triggered(
                Criterion::Pm5,
                tag,
                Strength::Moderate,
                format!(
                    "{subject} is classified pathogenic: {}",
                    m.accession_list()
                ),
            )),
            None => Ok(Outcome::not_triggered(
                Criterion::Pm5,
                format!("no pathogenic record for {subject}"),
            )),
        }
    }
}
