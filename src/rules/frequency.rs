//! Population-frequency criteria: BA1, BS1, BS2 and PM2.
//!
//! Pure threshold comparisons against the popmax frequency or allele count.
//! BA1 is the stand-alone benign criterion; its override semantics live in
//! the aggregator, not here.

use crate::annotation::AnnotationBundle;
use crate::config::{defaults, CriterionPlan};
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::Variant;
use crate::Result;

/// Whether a frequency criterion compares against the popmax frequency or
/// an absolute allele count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyBasis {
    Frequency,
    AbsoluteCount,
}

/// BA1: frequency too high for a pathogenic allele; stand-alone benign.
#[derive(Debug, Clone, PartialEq)]
pub struct Ba1 {
    pub basis: FrequencyBasis,
}

impl Ba1 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let population = match &bundle.population {
            Some(p) => p,
            None => return missing_field(Criterion::Ba1, "population frequency", plan),
        };
        match self.basis {
            FrequencyBasis::Frequency => {
                let cutoff = plan.frequency_cutoff.unwrap_or(defaults::BA1_FREQUENCY);
                let frequency = match population.popmax_frequency {
                    Some(f) => f,
                    None => return missing_field(Criterion::Ba1, "popmax frequency", plan),
                };
                let subpopulation = population
                    .popmax_population
                    .as_deref()
                    .unwrap_or("unknown");
                if frequency > cutoff {
                    Ok(Outcome::triggered(
                        Criterion::Ba1,
                        RuleTag::General,
                        Strength::StandAlone,
                        format!(
                            "popmax frequency {frequency} in subpopulation {subpopulation} exceeds {cutoff}"
                        ),
                    ))
                } else {
                    Ok(Outcome::not_triggered(
                        Criterion::Ba1,
                        format!(
                            "popmax frequency {frequency} in subpopulation {subpopulation} does not exceed {cutoff}"
                        ),
                    ))
                }
            }
            FrequencyBasis::AbsoluteCount => {
                let cutoff = plan.count_cutoff.unwrap_or(defaults::ABSOLUTE_ALLELE_COUNT);
                let count = match population.popmax_allele_count {
                    Some(c) => c,
                    None => return missing_field(Criterion::Ba1, "popmax allele count", plan),
                };
                if count >= cutoff {
                    Ok(Outcome::triggered(
                        Criterion::Ba1,
                        RuleTag::General,
                        Strength::StandAlone,
                        format!("popmax allele count {count} meets cutoff {cutoff}"),
                    ))
                } else {
                    Ok(Outcome::not_triggered(
                        Criterion::Ba1,
                        format!("popmax allele count {count} below cutoff {cutoff}"),
                    ))
                }
            }
        }
    }
}

/// BS1: frequency higher than expected for the disease.
#[derive(Debug, Clone, PartialEq)]
pub struct Bs1 {
    pub basis: FrequencyBasis,
    /// Two-tier variant: a second, lower cutoff yields supporting strength.
    pub two_tier: bool,
}

impl Bs1 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let population = match &bundle.population {
            Some(p) => p,
            None => return missing_field(Criterion::Bs1, "population frequency", plan),
        };
        if self.basis == FrequencyBasis::AbsoluteCount {
            let cutoff = plan.count_cutoff.unwrap_or(defaults::ABSOLUTE_ALLELE_COUNT);
            let count = match population.popmax_allele_count {
                Some(c) => c,
                None => return missing_field(Criterion::Bs1, "popmax allele count", plan),
            };
            return if count >= cutoff {
                Ok(Outcome::triggered(
                    Criterion::Bs1,
                    RuleTag::General,
                    Strength::Strong,
                    format!("popmax allele count {count} meets cutoff {cutoff}"),
                ))
            } else {
                Ok(Outcome::not_triggered(
                    Criterion::Bs1,
                    format!("popmax allele count {count} below cutoff {cutoff}"),
                ))
            };
        }

        let cutoff = plan.frequency_cutoff.unwrap_or(defaults::BS1_FREQUENCY);
        let frequency = match population.popmax_frequency {
            Some(f) => f,
            None => return missing_field(Criterion::Bs1, "popmax frequency", plan),
        };
        if frequency > cutoff {
            Ok(Outcome::triggered(
                Criterion::Bs1,
                RuleTag::General,
                Strength::Strong,
                format!("popmax frequency {frequency} exceeds {cutoff}"),
            ))
        } else if self.two_tier {
            match plan.supporting_frequency_cutoff {
                Some(supporting) if frequency > supporting => Ok(Outcome::triggered(
                    Criterion::Bs1,
                    RuleTag::General,
                    Strength::Supporting,
                    format!(
                        "popmax frequency {frequency} exceeds the supporting cutoff {supporting}"
                    ),
                )),
                _ => Ok(Outcome::not_triggered(
                    Criterion::Bs1,
                    format!("popmax frequency {frequency} does not exceed {cutoff}"),
                )),
            }
        } else {
            Ok(Outcome::not_triggered(
                Criterion::Bs1,
                format!("popmax frequency {frequency} does not exceed {cutoff}"),
            ))
        }
    }
}

/// BS2: observed in healthy individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Bs2 {
    /// Two-tier variant: a second, lower count yields supporting strength.
    pub two_tier: bool,
}

impl Bs2 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let cohort = match &bundle.healthy_cohort {
            Some(c) => c,
            None => return missing_field(Criterion::Bs2, "healthy-individual count", plan),
        };
        let cutoff = plan.count_cutoff.unwrap_or(defaults::BS2_COUNT);
        if cohort.count >= cutoff {
            return Ok(Outcome::triggered(
                Criterion::Bs2,
                RuleTag::General,
                Strength::Strong,
                format!(
                    "observed {} times in {} (cutoff {cutoff})",
                    cohort.count, cohort.name
                ),
            ));
        }
        if self.two_tier {
            let supporting = plan
                .supporting_count_cutoff
                .unwrap_or(defaults::BS2_SUPPORTING_COUNT);
            if cohort.count >= supporting {
                return Ok(Outcome::triggered(
                    Criterion::Bs2,
                    RuleTag::General,
                    Strength::Supporting,
                    format!(
                        "observed {} times in {}, meeting the supporting cutoff {supporting}",
                        cohort.count, cohort.name
                    ),
                ));
            }
        }
        Ok(Outcome::not_triggered(
            Criterion::Bs2,
            format!(
                "observed {} times in {} (cutoff {cutoff})",
                cohort.count, cohort.name
            ),
        ))
    }
}

/// PM2 evaluator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pm2Mode {
    /// Published moderate strength.
    Moderate,
    /// Downgraded to supporting, per current recommendations.
    Supporting,
    /// Supporting strength, not applied to insertions/deletions (population
    /// callers undercall indels).
    NoIndel,
}

/// PM2: absent from (or below expectation in) population controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Pm2 {
    pub mode: Pm2Mode,
}

impl Pm2 {
    pub fn applicable(&self, variant: &Variant) -> bool {
        match self.mode {
            Pm2Mode::NoIndel => !variant.is_indel(),
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
            return Ok(Outcome::not_applicable(
                Criterion::Pm2,
                "not applied to insertions/deletions",
            ));
        }
        let population = match &bundle.population {
            Some(p) => p,
            None => return missing_field(Criterion::Pm2, "population frequency", plan),
        };
        let frequency = match population.popmax_frequency {
            Some(f) => f,
            None => return missing_field(Criterion::Pm2, "popmax frequency", plan),
        };
        let cutoff = plan.frequency_cutoff.unwrap_or(defaults::PM2_FREQUENCY);
        let strength = match self.mode {
            Pm2Mode::Moderate => Strength::Moderate,
            Pm2Mode::Supporting | Pm2Mode::NoIndel => Strength::Supporting,
        };
        if frequency > cutoff {
            Ok(Outcome::not_triggered(
                Criterion::Pm2,
                format!("popmax frequency {frequency} exceeds {cutoff}"),
            ))
        } else {
            Ok(Outcome::triggered(
                Criterion::Pm2,
                RuleTag::General,
                strength,
                format!("popmax frequency {frequency} at or below {cutoff}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{HealthyCohort, PopulationRecord};
    use crate::error::AcmgError;
    use crate::variant::Consequence;

    fn variant() -> Variant {
        Variant {
            chrom: "13".to_string(),
            start: 32_340_301,
            end: 32_340_301,
            reference: "A".to_string(),
            alternate: "G".to_string(),
            gene: "BRCA2".to_string(),
            transcript: Some("NM_000059.4".to_string()),
            consequences: vec![Consequence::MissenseVariant],
            hgvs_c: None,
            hgvs_p: None,
            exon: Some(11),
            intron: None,
        }
    }

    fn population(frequency: f64) -> AnnotationBundle {
        AnnotationBundle {
            population: Some(PopulationRecord {
                popmax_frequency: Some(frequency),
                popmax_population: Some("nfe".to_string()),
                popmax_allele_count: Some(12),
                ..PopulationRecord::default()
            }),
            ..AnnotationBundle::default()
        }
    }

    #[test]
    fn test_ba1_stand_alone_above_cutoff() {
        let evaluator = Ba1 {
            basis: FrequencyBasis::Frequency,
        };
        let plan = CriterionPlan::new("ba1").with_frequency_cutoff(0.05);
        let outcome = evaluator.evaluate(&variant(), &population(0.08), &plan).unwrap();
        let evidence = outcome.evidence().unwrap();
        assert_eq!(evidence.strength, Strength::StandAlone);

        // Exactly at the cutoff does not trigger (strict comparison).
        let outcome = evaluator.evaluate(&variant(), &population(0.05), &plan).unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_ba1_absolute_mode() {
        let evaluator = Ba1 {
            basis: FrequencyBasis::AbsoluteCount,
        };
        let plan = CriterionPlan::new("ba1_absolute").with_count_cutoff(10);
        let outcome = evaluator.evaluate(&variant(), &population(0.0), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::StandAlone);
    }

    #[test]
    fn test_ba1_missing_population_errors_when_required() {
        let evaluator = Ba1 {
            basis: FrequencyBasis::Frequency,
        };
        let plan = CriterionPlan::new("ba1").with_required_annotation();
        let err = evaluator
            .evaluate(&variant(), &AnnotationBundle::default(), &plan)
            .unwrap_err();
        assert!(matches!(err, AcmgError::MissingAnnotation { .. }));
    }

    #[test]
    fn test_bs1_strong_and_supporting_tiers() {
        let evaluator = Bs1 {
            basis: FrequencyBasis::Frequency,
            two_tier: true,
        };
        let mut plan = CriterionPlan::new("bs1_supporting").with_frequency_cutoff(0.01);
        plan.supporting_frequency_cutoff = Some(0.001);

        let outcome = evaluator.evaluate(&variant(), &population(0.02), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Strong);

        let outcome = evaluator.evaluate(&variant(), &population(0.005), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);

        let outcome = evaluator
            .evaluate(&variant(), &population(0.0001), &plan)
            .unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_bs2_count_tiers() {
        let bundle = |count| AnnotationBundle {
            healthy_cohort: Some(HealthyCohort {
                name: "FLOSSIES".to_string(),
                count,
            }),
            ..AnnotationBundle::default()
        };
        let evaluator = Bs2 { two_tier: true };
        let mut plan = CriterionPlan::new("bs2_supporting").with_count_cutoff(10);
        plan.supporting_count_cutoff = Some(5);

        let outcome = evaluator.evaluate(&variant(), &bundle(11), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Strong);

        let outcome = evaluator.evaluate(&variant(), &bundle(6), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);

        let outcome = evaluator.evaluate(&variant(), &bundle(2), &plan).unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_pm2_triggers_at_or_below_cutoff() {
        let evaluator = Pm2 {
            mode: Pm2Mode::Moderate,
        };
        let plan = CriterionPlan::new("pm2").with_frequency_cutoff(1e-5);

        let outcome = evaluator.evaluate(&variant(), &population(0.0), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Moderate);

        let outcome = evaluator.evaluate(&variant(), &population(1e-4), &plan).unwrap();
        assert!(outcome.evidence().is_none());
    }

    #[test]
    fn test_pm2_supporting_mode() {
        let evaluator = Pm2 {
            mode: Pm2Mode::Supporting,
        };
        let plan = CriterionPlan::new("pm2_supporting").with_frequency_cutoff(1e-5);
        let outcome = evaluator.evaluate(&variant(), &population(0.0), &plan).unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Supporting);
    }

    #[test]
    fn test_pm2_no_indel_skips_indels() {
        let evaluator = Pm2 {
            mode: Pm2Mode::NoIndel,
        };
        let mut v = variant();
        v.reference = "AT".to_string();
        v.consequences = vec![Consequence::FrameshiftVariant];
        let outcome = evaluator
            .evaluate(
                &v,
                &population(0.0),
                &CriterionPlan::new("pm2_no_indel"),
            )
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));
    }
}
