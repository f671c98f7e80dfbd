//! PP3 / BP4: in-silico prediction criteria.
//!
//! Single-threshold variants compare one predictor against one cutoff;
//! multi-strength variants map score bands to supporting/moderate/strong;
//! the combined variant evaluates the missense and splicing predictors
//! together with an explicit, configurable precedence when they disagree.

use crate::annotation::AnnotationBundle;
use crate::config::{CriterionPlan, PredictorPrecedence};
use crate::error::AcmgError;
use crate::rules::thresholds::Threshold;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::{Consequence, Variant};
use crate::Result;

/// Which prediction path(s) an in-silico evaluator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InSilicoMode {
    /// Missense predictor only.
    Protein,
    /// Splicing predictor only.
    Splicing,
    /// Both predictors, with configured precedence on disagreement.
    Combined,
}

/// Result of one prediction path.
enum PathResult {
    Triggered(Strength, String),
    NotTriggered(String),
    NoScore(String),
}

fn assess_path(threshold: &Threshold, bundle: &AnnotationBundle, label: &str) -> PathResult {
    let score = match bundle.predictions.get(&threshold.score) {
        Some(s) => s,
        None => return PathResult::NoScore(threshold.score.clone()),
    };
    match threshold.strength_for(score) {
        Some(strength) => PathResult::Triggered(
            strength,
            format!(
                "{} score {score} meets the {label} cutoff {} with {strength} strength",
                threshold.score,
                threshold.first_cutoff()
            ),
        ),
        None => PathResult::NotTriggered(format!(
            "{} score {score} does not meet the {label} cutoff {}",
            threshold.score,
            threshold.first_cutoff()
        )),
    }
}

fn threshold_or_config_err<'a>(
    criterion: Criterion,
    threshold: Option<&'a Threshold>,
    field: &str,
) -> Result<&'a Threshold> {
    threshold.ok_or_else(|| {
        AcmgError::config(format!(
            "{} requires a {field} threshold in its plan",
            criterion.code()
        ))
    })
}

/// Shared PP3/BP4 engine; the two criteria differ only in criterion code,
/// direction label and which plan thresholds feed the protein path.
fn evaluate_insilico(
    criterion: Criterion,
    mode: InSilicoMode,
    protein_threshold: Option<&Threshold>,
    splicing_threshold: Option<&Threshold>,
    bundle: &AnnotationBundle,
    plan: &CriterionPlan,
    label: &str,
) -> Result<Outcome> {
    match mode {
        InSilicoMode::Protein => {
            let threshold = threshold_or_config_err(criterion, protein_threshold, "protein")?;
            match assess_path(threshold, bundle, label) {
                PathResult::Triggered(strength, rationale) => {
                    Ok(Outcome::triggered(criterion, RuleTag::Protein, strength, rationale))
                }
                PathResult::NotTriggered(rationale) => {
                    Ok(Outcome::not_triggered(criterion, rationale))
                }
                PathResult::NoScore(score) => {
                    missing_field(criterion, &format!("{score} score"), plan)
                }
            }
        }
        InSilicoMode::Splicing => {
            let threshold = threshold_or_config_err(criterion, splicing_threshold, "splicing")?;
            match assess_path(threshold, bundle, label) {
                PathResult::Triggered(strength, rationale) => {
                    Ok(Outcome::triggered(criterion, RuleTag::Splicing, strength, rationale))
                }
                PathResult::NotTriggered(rationale) => {
                    Ok(Outcome::not_triggered(criterion, rationale))
                }
                PathResult::NoScore(score) => {
                    missing_field(criterion, &format!("{score} score"), plan)
                }
            }
        }
        InSilicoMode::Combined => {
            let protein = protein_threshold.map(|t| assess_path(t, bundle, label));
            let splicing = splicing_threshold.map(|t| assess_path(t, bundle, label));
            let precedence = plan.precedence.unwrap_or_default();

            // Paths with no score available fall out of the comparison.
            let protein = protein.filter(|p| !matches!(p, PathResult::NoScore(_)));
            let splicing = splicing.filter(|p| !matches!(p, PathResult::NoScore(_)));

            match (protein, splicing) {
                (None, None) => missing_field(criterion, "prediction scores", plan),
                (Some(p), None) => Ok(path_outcome(criterion, RuleTag::Protein, p)),
                (None, Some(s)) => Ok(path_outcome(criterion, RuleTag::Splicing, s)),
                (Some(p), Some(s)) => {
                    let agree = matches!(&p, PathResult::Triggered(..))
                        == matches!(&s, PathResult::Triggered(..));
                    let (winner, tag) = match precedence {
                        PredictorPrecedence::Splicing => (s, RuleTag::Splicing),
                        PredictorPrecedence::Protein => (p, RuleTag::Protein),
                    };
                    let mut outcome = path_outcome(criterion, tag, winner);
                    if !agree {
                        // Disagreement is resolved by configuration, never
                        // silently; the rationale records it.
                        let note = format!(
                            " (missense and splicing predictors disagree; {} precedence configured)",
                            match precedence {
                                PredictorPrecedence::Splicing => "splicing",
                                PredictorPrecedence::Protein => "protein",
                            }
                        );
                        outcome = match outcome {
                            Outcome::Triggered(mut e) => {
                                e.rationale.push_str(&note);
                                Outcome::Triggered(e)
                            }
                            Outcome::NotTriggered { criterion, mut rationale } => {
                                rationale.push_str(&note);
                                Outcome::NotTriggered { criterion, rationale }
                            }
                            other => other,
                        };
                    }
                    Ok(outcome)
                }
            }
        }
    }
}

fn path_outcome(criterion: Criterion, tag: RuleTag, path: PathResult) -> Outcome {
    match path {
        PathResult::Triggered(strength, rationale) => {
            Outcome::triggered(criterion, tag, strength, rationale)
        }
        PathResult::NotTriggered(rationale) => Outcome::not_triggered(criterion, rationale),
        PathResult::NoScore(score) => {
            Outcome::not_applicable(criterion, format!("no {score} score available"))
        }
    }
}

/// PP3: in-silico evidence for a deleterious effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Pp3 {
    pub mode: InSilicoMode,
}

impl Pp3 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        match self.mode {
            InSilicoMode::Protein => variant.any_consequence(|c| {
                matches!(c, Consequence::MissenseVariant) || c.is_inframe_indel()
            }),
            _ => true,
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
                criterion: Criterion::Pp3.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        evaluate_insilico(
            Criterion::Pp3,
            self.mode,
            plan.pathogenic_scores.as_ref(),
            plan.splicing_scores.as_ref(),
            bundle,
            plan,
            "pathogenic",
        )
    }
}

/// BP4: in-silico evidence for no deleterious effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Bp4 {
    pub mode: InSilicoMode,
}

impl Bp4 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        match self.mode {
            InSilicoMode::Protein => variant.any_consequence(|c| {
                matches!(c, Consequence::MissenseVariant) || c.is_inframe_indel()
            }),
            _ => true,
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
                criterion: Criterion::Bp4.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        evaluate_insilico(
            Criterion::Bp4,
            self.mode,
            plan.benign_scores.as_ref(),
            plan.splicing_scores.as_ref(),
            bundle,
            plan,
            "benign",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::PredictionScores;
    use crate::rules::thresholds::CutoffDirection;

    fn missense_variant() -> Variant {
        Variant {
            chrom: "2".to_string(),
            start: 214_767_531,
            end: 214_767_531,
            reference: "G".to_string(),
            alternate: "A".to_string(),
            gene: "BARD1".to_string(),
            transcript: Some("NM_000465.4".to_string()),
            consequences: vec![Consequence::MissenseVariant],
            hgvs_c: None,
            hgvs_p: None,
            exon: Some(4),
            intron: None,
        }
    }

    fn scores(revel: Option<f64>, spliceai: Option<f64>) -> AnnotationBundle {
        let mut predictions = PredictionScores::default();
        if let Some(r) = revel {
            predictions = predictions.with("revel", r);
        }
        if let Some(s) = spliceai {
            predictions = predictions.with("spliceai", s);
        }
        AnnotationBundle {
            predictions,
            ..AnnotationBundle::default()
        }
    }

    fn pp3_plan() -> CriterionPlan {
        CriterionPlan {
            pathogenic_scores: Some(Threshold::single(
                "revel",
                CutoffDirection::GreaterOrEqual,
                0.7,
                Strength::Supporting,
            )),
            splicing_scores: Some(Threshold::single(
                "spliceai",
                CutoffDirection::GreaterOrEqual,
                0.2,
                Strength::Supporting,
            )),
            ..CriterionPlan::new("pp3_protein")
        }
    }

    #[test]
    fn test_protein_mode_single_cutoff() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Protein,
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.85), None), &pp3_plan())
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);

        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.3), None), &pp3_plan())
            .unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_multi_strength_bands() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Protein,
        };
        let plan = CriterionPlan {
            pathogenic_scores: Some(Threshold::banded(
                "revel",
                CutoffDirection::GreaterOrEqual,
                vec![
                    (0.644, Strength::Supporting),
                    (0.773, Strength::Moderate),
                    (0.932, Strength::Strong),
                ],
            )),
            ..CriterionPlan::new("pp3_mult_strength")
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.95), None), &plan)
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Strong);

        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.7), None), &plan)
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);
    }

    #[test]
    fn test_missing_score_is_not_applicable() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Protein,
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(None, None), &pp3_plan())
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));
    }

    #[test]
    fn test_missing_threshold_is_config_error() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Protein,
        };
        let err = evaluator
            .evaluate(
                &missense_variant(),
                &scores(Some(0.9), None),
                &CriterionPlan::new("pp3_protein"),
            )
            .unwrap_err();
        assert!(matches!(err, AcmgError::Configuration { .. }));
    }

    #[test]
    fn test_combined_splicing_precedence_on_disagreement() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Combined,
        };
        // Missense says pathogenic, splicing says nothing: splicing wins by
        // default, so PP3 does not trigger.
        let outcome = evaluator
            .evaluate(
                &missense_variant(),
                &scores(Some(0.9), Some(0.01)),
                &pp3_plan(),
            )
            .unwrap();
        assert!(outcome.evidence().is_none());
        match outcome {
            Outcome::NotTriggered { rationale, .. } => {
                assert!(rationale.contains("disagree"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        // With protein precedence configured the missense result stands.
        let plan = CriterionPlan {
            precedence: Some(PredictorPrecedence::Protein),
            ..pp3_plan()
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.9), Some(0.01)), &plan)
            .unwrap();
        let evidence = outcome.evidence().unwrap();
        assert_eq!(evidence.tag, RuleTag::Protein);
        assert!(evidence.rationale.contains("disagree"));
    }

    #[test]
    fn test_combined_falls_back_to_available_path() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Combined,
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.9), None), &pp3_plan())
            .unwrap();
        let evidence = outcome.evidence().unwrap();
        assert_eq!(evidence.tag, RuleTag::Protein);
    }

    #[test]
    fn test_bp4_benign_direction() {
        let evaluator = Bp4 {
            mode: InSilicoMode::Protein,
        };
        let plan = CriterionPlan {
            benign_scores: Some(Threshold::single(
                "revel",
                CutoffDirection::LessOrEqual,
                0.25,
                Strength::Supporting,
            )),
            ..CriterionPlan::new("bp4_protein")
        };
        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.1), None), &plan)
            .unwrap();
        let evidence = outcome.evidence().unwrap();
        assert_eq!(evidence.direction, crate::rules::Direction::Benign);
        assert_eq!(evidence.strength, Strength::Supporting);

        let outcome = evaluator
            .evaluate(&missense_variant(), &scores(Some(0.5), None), &plan)
            .unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_pp3_protein_unsupported_for_nonsense() {
        let evaluator = Pp3 {
            mode: InSilicoMode::Protein,
        };
        let mut variant = missense_variant();
        variant.consequences = vec![Consequence::StopGained];
        let err = evaluator
            .evaluate(&variant, &scores(Some(0.9), None), &pp3_plan())
            .unwrap_err();
        assert!(matches!(err, AcmgError::UnsupportedVariantType { .. }));
    }
}
