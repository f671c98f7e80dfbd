//! PS1: same amino-acid change (or same splice effect) previously
//! classified as pathogenic.

use crate::annotation::{AnnotationBundle, ClinvarMatch};
use crate::config::CriterionPlan;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::{Consequence, Variant};
use crate::Result;

/// PS1 evaluator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ps1Mode {
    /// Exact amino-acid change known pathogenic.
    Protein,
    /// Protein path, additionally requiring no predicted splice effect
    /// (ENIGMA: the amino-acid reasoning is only valid when the nucleotide
    /// change does not act through splicing).
    ProteinEnigma,
    /// Splice variant at the same nucleotide / with the same predicted
    /// splice effect known pathogenic.
    Splicing,
}

/// PS1 evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Ps1 {
    pub mode: Ps1Mode,
}

impl Ps1 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        match self.mode {
            Ps1Mode::Protein | Ps1Mode::ProteinEnigma => {
                variant.has_consequence(Consequence::MissenseVariant)
            }
            Ps1Mode::Splicing => variant.any_consequence(|c| {
                c.is_canonical_splice() || matches!(c, Consequence::SpliceRegionVariant)
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
            return Err(crate::error::AcmgError::UnsupportedVariantType {
                criterion: Criterion::Ps1.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        let clinvar = match &bundle.clinvar {
            Some(c) => c,
            None => return missing_field(Criterion::Ps1, "ClinVar comparison", plan),
        };

        match self.mode {
            Ps1Mode::Protein => Ok(assess_protein(clinvar.same_aa_change.as_ref())),
            Ps1Mode::ProteinEnigma => {
                // The same-amino-acid argument only holds when the variant is
                // not predicted to act through splicing.
                if let Some(threshold) = &plan.splicing_scores {
                    if let Some(score) = bundle.predictions.get(&threshold.score) {
                        if !threshold.is_met(score) {
                            return Ok(Outcome::not_triggered(
                                Criterion::Ps1,
                                format!(
                                    "{} score {score} predicts a splice effect; same amino-acid reasoning not applied",
                                    threshold.score
                                ),
                            ));
                        }
                    }
                }
                Ok(assess_protein(clinvar.same_aa_change.as_ref()))
            }
            Ps1Mode::Splicing => {
                let matches = clinvar
                    .same_splice_effect
                    .as_ref()
                    .or(clinvar.same_nucleotide.as_ref());
                match matches {
                    Some(m) if m.is_pathogenic() => Ok(Outcome::triggered(
                        Criterion::Ps1,
                        RuleTag::Splicing,
                        Strength::Strong,
                        format!(
                            "splice variants at the same position are classified pathogenic: {}",
                            m.accession_list()
                        ),
                    )),
                    _ => Ok(Outcome::not_triggered(
                        Criterion::Ps1,
                        "no pathogenic splice variant known at this position",
                    )),
                }
            }
        }
    }
}

fn assess_protein(same_aa: Option<&ClinvarMatch>) -> Outcome {
    match same_aa {
        Some(m) if m.is_pathogenic() => Outcome::triggered(
            Criterion::Ps1,
            RuleTag::Protein,
            Strength::Strong,
            format!(
                "the same amino-acid change is classified pathogenic: {}",
                m.accession_list()
            ),
        ),
        _ => Outcome::not_triggered(
            Criterion::Ps1,
            "no pathogenic record with the same amino-acid change",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ClinvarMatches, ClinvarSignificance, PredictionScores};
    use crate::error::AcmgError;
    use crate::rules::thresholds::{CutoffDirection, Threshold};

    fn missense_variant() -> Variant {
        Variant {
            chrom: "17".to_string(),
            start: 43_071_077,
            end: 43_071_077,
            reference: "T".to_string(),
            alternate: "C".to_string(),
            gene: "BRCA1".to_string(),
            transcript: Some("NM_007294.4".to_string()),
            consequences: vec![Consequence::MissenseVariant],
            hgvs_c: Some("c.5123C>A".to_string()),
            hgvs_p: Some("p.Ala1708Glu".to_string()),
            exon: Some(18),
            intron: None,
        }
    }

    fn pathogenic_match() -> ClinvarMatch {
        ClinvarMatch {
            significance: ClinvarSignificance::Pathogenic,
            accessions: vec!["VCV000055407".to_string()],
        }
    }

    #[test]
    fn test_same_aa_pathogenic_triggers_strong() {
        let bundle = AnnotationBundle {
            clinvar: Some(ClinvarMatches {
                same_aa_change: Some(pathogenic_match()),
                ..ClinvarMatches::default()
            }),
            ..AnnotationBundle::default()
        };
        let evaluator = Ps1 {
            mode: Ps1Mode::Protein,
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &bundle, &CriterionPlan::new("ps1_protein"))
            .unwrap();
        let evidence = outcome.evidence().unwrap();
        assert_eq!(evidence.strength, Strength::Strong);
        assert!(evidence.rationale.contains("VCV000055407"));
    }

    #[test]
    fn test_uncertain_match_does_not_trigger() {
        let bundle = AnnotationBundle {
            clinvar: Some(ClinvarMatches {
                same_aa_change: Some(ClinvarMatch {
                    significance: ClinvarSignificance::Uncertain,
                    accessions: vec!["VCV000000001".to_string()],
                }),
                ..ClinvarMatches::default()
            }),
            ..AnnotationBundle::default()
        };
        let evaluator = Ps1 {
            mode: Ps1Mode::Protein,
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &bundle, &CriterionPlan::new("ps1_protein"))
            .unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_missing_clinvar_is_not_applicable() {
        let evaluator = Ps1 {
            mode: Ps1Mode::Protein,
        };
        let outcome = evaluator
            .evaluate(
                &missense_variant(),
                &AnnotationBundle::default(),
                &CriterionPlan::new("ps1_protein"),
            )
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));
    }

    #[test]
    fn test_enigma_mode_blocks_on_predicted_splice_effect() {
        let plan = CriterionPlan {
            splicing_scores: Some(Threshold::single(
                "spliceai",
                CutoffDirection::Less,
                0.1,
                Strength::Supporting,
            )),
            ..CriterionPlan::new("ps1_protein_enigma")
        };
        let bundle = AnnotationBundle {
            clinvar: Some(ClinvarMatches {
                same_aa_change: Some(pathogenic_match()),
                ..ClinvarMatches::default()
            }),
            predictions: PredictionScores::default().with("spliceai", 0.8),
            ..AnnotationBundle::default()
        };
        let evaluator = Ps1 {
            mode: Ps1Mode::ProteinEnigma,
        };
        let outcome = evaluator.evaluate(&missense_variant(), &bundle, &plan).unwrap();
        assert!(outcome.evidence().is_none());

        // Below the splice cutoff the protein path applies.
        let bundle = AnnotationBundle {
            predictions: PredictionScores::default().with("spliceai", 0.01),
            ..bundle
        };
        let outcome = evaluator.evaluate(&missense_variant(), &bundle, &plan).unwrap();
        assert!(outcome.evidence().is_some());
    }

    #[test]
    fn test_splicing_mode() {
        let mut variant = missense_variant();
        variant.consequences = vec![Consequence::SpliceDonorVariant];
        let bundle = AnnotationBundle {
            clinvar: Some(ClinvarMatches {
                same_nucleotide: Some(pathogenic_match()),
                ..ClinvarMatches::default()
            }),
            ..AnnotationBundle::default()
        };
        let evaluator = Ps1 {
            mode: Ps1Mode::Splicing,
        };
        let outcome = evaluator
            .evaluate(&variant, &bundle, &CriterionPlan::new("ps1_splicing"))
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().tag, RuleTag::Splicing);
    }

    #[test]
    fn test_wrong_consequence_is_unsupported() {
        let mut variant = missense_variant();
        variant.consequences = vec![Consequence::SynonymousVariant];
        let evaluator = Ps1 {
            mode: Ps1Mode::Protein,
        };
        let err = evaluator
            .evaluate(
                &variant,
                &AnnotationBundle::default(),
                &CriterionPlan::new("ps1_protein"),
            )
            .unwrap_err();
        assert!(matches!(err, AcmgError::UnsupportedVariantType { .. }));
    }
}
