//! PP1 / BS4: co-segregation with disease in affected family members.
//!
//! Both criteria threshold an externally derived co-segregation likelihood
//! ratio into strength bands; they never compute the ratio themselves.

use crate::annotation::AnnotationBundle;
use crate::config::{defaults, CriterionPlan};
use crate::rules::thresholds::Threshold;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag};
use crate::variant::Variant;
use crate::Result;

fn evaluate_segregation(
    criterion: Criterion,
    threshold: &Threshold,
    bundle: &AnnotationBundle,
    plan: &CriterionPlan,
) -> Result<Outcome> {
    let likelihood = bundle
        .family_studies
        .as_ref()
        .and_then(|s| s.co_segregation);
    let likelihood = match likelihood {
        Some(l) => l,
        None => return missing_field(criterion, "co-segregation likelihood", plan),
    };
    match threshold.strength_for(likelihood) {
        Some(strength) => Ok(Outcome::triggered(
            criterion,
            RuleTag::General,
            strength,
            format!(
                "co-segregation likelihood {likelihood} meets the {strength} cutoff"
            ),
        )),
        None => Ok(Outcome::not_triggered(
            criterion,
            format!(
                "co-segregation likelihood {likelihood} meets no cutoff (first cutoff {})",
                threshold.first_cutoff()
            ),
        )),
    }
}

/// PP1: co-segregation supports pathogenicity.
#[derive(Debug, Clone, PartialEq)]
pub struct Pp1;

impl Pp1 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let threshold = plan
            .segregation
            .as_ref()
            .unwrap_or_else(|| defaults::segregation_pathogenic());
        evaluate_segregation(Criterion::Pp1, threshold, bundle, plan)
    }
}

/// BS4: lack of segregation supports a benign interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bs4;

impl Bs4 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let threshold = plan
            .segregation
            .as_ref()
            .unwrap_or_else(|| defaults::segregation_benign());
        evaluate_segregation(Criterion::Bs4, threshold, bundle, plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::FamilyStudies;
    use crate::rules::{Direction, Strength};
    use crate::variant::Consequence;

    fn variant() -> Variant {
        Variant {
            chrom: "11".to_string(),
            start: 108_259_000,
            end: 108_259_000,
            reference: "T".to_string(),
            alternate: "G".to_string(),
            gene: "ATM".to_string(),
            transcript: Some("NM_000051.4".to_string()),
            consequences: vec![Consequence::MissenseVariant],
            hgvs_c: None,
            hgvs_p: None,
            exon: Some(37),
            intron: None,
        }
    }

    fn bundle(co_segregation: Option<f64>) -> AnnotationBundle {
        AnnotationBundle {
            family_studies: Some(FamilyStudies {
                co_segregation,
                ..FamilyStudies::default()
            }),
            ..AnnotationBundle::default()
        }
    }

    #[test]
    fn test_pp1_strength_bands() {
        let plan = CriterionPlan::new("pp1");
        let evaluator = Pp1;

        let outcome = evaluator.evaluate(&variant(), &bundle(Some(3.0)), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);

        let outcome = evaluator.evaluate(&variant(), &bundle(Some(5.0)), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Moderate);

        let outcome = evaluator
            .evaluate(&variant(), &bundle(Some(20.0)), &plan)
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Strong);

        let outcome = evaluator.evaluate(&variant(), &bundle(Some(1.0)), &plan).unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_bs4_benign_bands() {
        let plan = CriterionPlan::new("bs4");
        let evaluator = Bs4;

        let outcome = evaluator.evaluate(&variant(), &bundle(Some(0.3)), &plan).unwrap();
        let evidence = outcome.evidence().unwrap();
        assert_eq!(evidence.direction, Direction::Benign);
        assert_eq!(evidence.strength, Strength::Supporting);

        let outcome = evaluator
            .evaluate(&variant(), &bundle(Some(0.01)), &plan)
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Strong);

        let outcome = evaluator.evaluate(&variant(), &bundle(Some(1.5)), &plan).unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_missing_data_is_not_applicable_never_default_strength() {
        let evaluator = Pp1;
        let outcome = evaluator
            .evaluate(
                &variant(),
                &AnnotationBundle::default(),
                &CriterionPlan::new("pp1"),
            )
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));

        let outcome = evaluator
            .evaluate(&variant(), &bundle(None), &CriterionPlan::new("pp1"))
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));
    }
}
