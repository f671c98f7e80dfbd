//! Protein-impact criteria: PM4, BP3 and PP2.

use crate::annotation::AnnotationBundle;
use crate::config::{CriterionPlan, RuleConfiguration};
use crate::error::AcmgError;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::{Consequence, Variant};
use crate::Result;

/// PM4: protein length change from a stop-loss or in-frame indel outside a
/// repetitive region.
#[derive(Debug, Clone, PartialEq)]
pub struct Pm4 {
    /// Restrict to stop-loss variants.
    pub stoploss_only: bool,
}

impl Pm4 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        if self.stoploss_only {
            variant.has_consequence(Consequence::StopLost)
        } else {
            variant.any_consequence(|c| c.changes_protein_length())
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
                criterion: Criterion::Pm4.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        if variant.has_consequence(Consequence::StopLost) {
            return Ok(Outcome::triggered(
                Criterion::Pm4,
                RuleTag::Protein,
                Strength::Moderate,
                "stop-loss extends the protein",
            ));
        }
        match bundle.regions.in_repetitive_region {
            None => missing_field(Criterion::Pm4, "repetitive-region membership", plan),
            Some(true) => Ok(Outcome::not_triggered(
                Criterion::Pm4,
                "in-frame indel lies in a repetitive region without known function",
            )),
            Some(false) => Ok(Outcome::triggered(
                Criterion::Pm4,
                RuleTag::Protein,
                Strength::Moderate,
                "in-frame indel changes protein length outside a repetitive region",
            )),
        }
    }
}

/// BP3: in-frame indel in a repetitive region without known function.
#[derive(Debug, Clone, PartialEq)]
pub struct Bp3;

impl Bp3 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        variant.any_consequence(|c| c.is_inframe_indel())
    }

    pub fn evaluate(
        &self,
        variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        if !self.applicable(variant) {
            return Err(AcmgError::UnsupportedVariantType {
                criterion: Criterion::Bp3.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        match bundle.regions.in_repetitive_region {
            None => missing_field(Criterion::Bp3, "repetitive-region membership", plan),
            Some(false) => Ok(Outcome::not_triggered(
                Criterion::Bp3,
                "in-frame indel is not in a repetitive region",
            )),
            Some(true) => {
                if bundle.regions.in_critical_region == Some(true) {
                    Ok(Outcome::not_triggered(
                        Criterion::Bp3,
                        "repetitive region overlaps a critical functional domain",
                    ))
                } else {
                    Ok(Outcome::triggered(
                        Criterion::Bp3,
                        RuleTag::Protein,
                        Strength::Supporting,
                        "in-frame indel lies in a repetitive region without known function",
                    ))
                }
            }
        }
    }
}

/// PP2: missense variant in a gene with a low rate of benign missense
/// variation where missense is a common disease mechanism.
///
/// Gene applicability comes from the configuration's constrained-gene set,
/// not from the bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Pp2;

impl Pp2 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        variant.has_consequence(Consequence::MissenseVariant)
    }

    pub fn evaluate(
        &self,
        variant: &Variant,
        config: &RuleConfiguration,
    ) -> Result<Outcome> {
        if !self.applicable(variant) {
            return Err(AcmgError::UnsupportedVariantType {
                criterion: Criterion::Pp2.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        if config.is_missense_constrained(&variant.gene) {
            Ok(Outcome::triggered(
                Criterion::Pp2,
                RuleTag::Protein,
                Strength::Supporting,
                format!(
                    "missense variant in {}, where missense is an established disease mechanism",
                    variant.gene
                ),
            ))
        } else {
            Ok(Outcome::not_triggered(
                Criterion::Pp2,
                format!("missense is not an established mechanism for {}", variant.gene),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RegionMembership;

    fn variant_with(consequences: Vec<Consequence>, reference: &str, alternate: &str) -> Variant {
        Variant {
            chrom: "10".to_string(),
            start: 87_957_915,
            end: 87_957_917,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            gene: "PTEN".to_string(),
            transcript: Some("NM_000314.8".to_string()),
            consequences,
            hgvs_c: None,
            hgvs_p: None,
            exon: Some(7),
            intron: None,
        }
    }

    fn regions(repetitive: Option<bool>, critical: Option<bool>) -> AnnotationBundle {
        AnnotationBundle {
            regions: RegionMembership {
                in_repetitive_region: repetitive,
                in_critical_region: critical,
                ..RegionMembership::default()
            },
            ..AnnotationBundle::default()
        }
    }

    #[test]
    fn test_pm4_inframe_outside_repeat_triggers() {
        let evaluator = Pm4 {
            stoploss_only: false,
        };
        let v = variant_with(vec![Consequence::InframeDeletion], "AGT", "A");
        let outcome = evaluator
            .evaluate(&v, &regions(Some(false), None), &CriterionPlan::new("pm4"))
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Moderate);

        let outcome = evaluator
            .evaluate(&v, &regions(Some(true), None), &CriterionPlan::new("pm4"))
            .unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_pm4_stoploss_skips_region_check() {
        let evaluator = Pm4 {
            stoploss_only: true,
        };
        let v = variant_with(vec![Consequence::StopLost], "T", "C");
        let outcome = evaluator
            .evaluate(&v, &regions(None, None), &CriterionPlan::new("pm4_stoploss"))
            .unwrap();
        assert!(outcome.evidence().is_some());
    }

    #[test]
    fn test_pm4_stoploss_only_rejects_inframe() {
        let evaluator = Pm4 {
            stoploss_only: true,
        };
        let v = variant_with(vec![Consequence::InframeDeletion], "AGT", "A");
        let err = evaluator
            .evaluate(&v, &regions(Some(false), None), &CriterionPlan::new("pm4_stoploss"))
            .unwrap_err();
        assert!(matches!(err, AcmgError::UnsupportedVariantType { .. }));
    }

    #[test]
    fn test_bp3_requires_repeat_without_critical_overlap() {
        let evaluator = Bp3;
        let v = variant_with(vec![Consequence::InframeDeletion], "AGT", "A");

        let outcome = evaluator
            .evaluate(&v, &regions(Some(true), Some(false)), &CriterionPlan::new("bp3"))
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);

        let outcome = evaluator
            .evaluate(&v, &regions(Some(true), Some(true)), &CriterionPlan::new("bp3"))
            .unwrap();
        assert!(outcome.evidence().is_none());

        let outcome = evaluator
            .evaluate(&v, &regions(None, None), &CriterionPlan::new("bp3"))
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));
    }

    #[test]
    fn test_pp2_uses_constrained_gene_set() {
        let evaluator = Pp2;
        let v = variant_with(vec![Consequence::MissenseVariant], "C", "T");

        let mut config = RuleConfiguration::default_acmg();
        config
            .missense_constrained_genes
            .insert("PTEN".to_string());
        let outcome = evaluator.evaluate(&v, &config).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);

        let config = RuleConfiguration::default_acmg();
        let outcome = evaluator.evaluate(&v, &config).unwrap();
        assert!(outcome.evidence().is_none());
    }
}
