//! PM1: mutational hotspot or critical, well-established functional domain.

use crate::annotation::AnnotationBundle;
use crate::config::{defaults, CriterionPlan};
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::Variant;
use crate::Result;

/// PM1 evaluator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pm1Mode {
    /// Configured hotspot / critical-region intervals only.
    Hotspot,
    /// Hotspot intervals, or a minimum recurrence in a somatic hotspot
    /// catalog.
    DefinedRegions,
}

/// PM1 evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Pm1 {
    pub mode: Pm1Mode,
}

impl Pm1 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let in_hotspot = bundle.regions.in_hotspot;
        let in_critical = bundle.regions.in_critical_region;

        if in_hotspot == Some(true) || in_critical == Some(true) {
            let region = if in_hotspot == Some(true) {
                "a mutational hotspot"
            } else {
                "a critical functional domain"
            };
            return Ok(Outcome::triggered(
                Criterion::Pm1,
                RuleTag::General,
                Strength::Moderate,
                format!("variant lies in {region}"),
            ));
        }

        if self.mode == Pm1Mode::DefinedRegions {
            let cutoff = plan.count_cutoff.unwrap_or(defaults::PM1_SOMATIC_COUNT);
            match &bundle.somatic_hotspot {
                Some(hotspot) if hotspot.count >= cutoff => {
                    return Ok(Outcome::triggered(
                        Criterion::Pm1,
                        RuleTag::General,
                        Strength::Moderate,
                        format!(
                            "residue recurrently mutated in somatic hotspot catalog ({} observations, cutoff {cutoff})",
                            hotspot.count
                        ),
                    ));
                }
                Some(hotspot) => {
                    return Ok(Outcome::not_triggered(
                        Criterion::Pm1,
                        format!(
                            "not in a defined hotspot; somatic recurrence of {} below cutoff {cutoff}",
                            hotspot.count
                        ),
                    ));
                }
                None => {}
            }
        }

        if in_hotspot.is_none() && in_critical.is_none() {
            return missing_field(Criterion::Pm1, "region membership", plan);
        }
        Ok(Outcome::not_triggered(
            Criterion::Pm1,
            "variant is not in a mutational hotspot or critical domain",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{RegionMembership, SomaticHotspot};
    use crate::variant::Consequence;

    fn variant() -> Variant {
        Variant {
            chrom: "17".to_string(),
            start: 7_675_088,
            end: 7_675_088,
            reference: "C".to_string(),
            alternate: "T".to_string(),
            gene: "TP53".to_string(),
            transcript: Some("NM_000546.6".to_string()),
            consequences: vec![Consequence::MissenseVariant],
            hgvs_c: None,
            hgvs_p: Some("p.Arg175His".to_string()),
            exon: Some(5),
            intron: None,
        }
    }

    fn bundle(hotspot: Option<bool>, critical: Option<bool>) -> AnnotationBundle {
        AnnotationBundle {
            regions: RegionMembership {
                in_hotspot: hotspot,
                in_critical_region: critical,
                ..RegionMembership::default()
            },
            ..AnnotationBundle::default()
        }
    }

    #[test]
    fn test_hotspot_triggers_moderate() {
        let evaluator = Pm1 {
            mode: Pm1Mode::Hotspot,
        };
        let outcome = evaluator
            .evaluate(
                &variant(),
                &bundle(Some(true), Some(false)),
                &CriterionPlan::new("pm1"),
            )
            .unwrap();
        assert_eq!(outcome.evidence().unwrap().strength, Strength::Moderate);
    }

    #[test]
    fn test_outside_regions_does_not_trigger() {
        let evaluator = Pm1 {
            mode: Pm1Mode::Hotspot,
        };
        let outcome = evaluator
            .evaluate(
                &variant(),
                &bundle(Some(false), Some(false)),
                &CriterionPlan::new("pm1"),
            )
            .unwrap();
        assert!(outcome.evidence().is_none());
        assert!(matches!(outcome, Outcome::NotTriggered { .. }));
    }

    #[test]
    fn test_missing_regions_is_not_applicable() {
        let evaluator = Pm1 {
            mode: Pm1Mode::Hotspot,
        };
        let outcome = evaluator
            .evaluate(&variant(), &bundle(None, None), &CriterionPlan::new("pm1"))
            .unwrap();
        assert!(matches!(outcome, Outcome::NotApplicable { .. }));
    }

    #[test]
    fn test_defined_regions_somatic_count() {
        let evaluator = Pm1 {
            mode: Pm1Mode::DefinedRegions,
        };
        let plan = CriterionPlan::new("pm1_defined_regions").with_count_cutoff(10);
        let mut b = bundle(Some(false), Some(false));
        b.somatic_hotspot = Some(SomaticHotspot { count: 24 });
        let outcome = evaluator.evaluate(&variant(), &b, &plan).unwrap();
        assert!(outcome.evidence().is_some());

        b.somatic_hotspot = Some(SomaticHotspot { count: 3 });
        let outcome = evaluator.evaluate(&variant(), &b, &plan).unwrap();
        assert!(outcome.evidence().is_none());
    }
}
