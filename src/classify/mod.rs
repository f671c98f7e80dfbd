//! Classification orchestration.
//!
//! A [`Classifier`] binds a resolved rule configuration to its registry and
//! runs every configured criterion over a variant, collecting triggered
//! evidence, silent non-results and per-criterion failures into one
//! [`ClassificationResult`]. Evaluation is pure: identical inputs yield an
//! identical result.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::aggregate::{build_result, ClassificationResult, CriterionFailure};
use crate::annotation::AnnotationBundle;
use crate::config::RuleConfiguration;
use crate::error::AcmgError;
use crate::multifactorial::{combine, LikelihoodRatio, LikelihoodSource, Posterior};
use crate::registry::RuleRegistry;
use crate::rules::{Criterion, Outcome, Strength};
use crate::variant::Variant;
use crate::Result;

/// Rule engine for one resolved configuration.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: RuleConfiguration,
    registry: RuleRegistry,
}

impl Classifier {
    /// Build a classifier, resolving the registry eagerly so configuration
    /// errors surface before any variant is evaluated.
    pub fn new(config: RuleConfiguration) -> Result<Classifier> {
        let registry = RuleRegistry::from_config(&config)?;
        Ok(Classifier { config, registry })
    }

    /// The configuration this classifier runs.
    pub fn config(&self) -> &RuleConfiguration {
        &self.config
    }

    /// The resolved registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Classify one variant against its annotation bundle.
    ///
    /// Per-criterion failures never abort the run; they are reported in the
    /// result's `failures` list and the remaining evidence is aggregated.
    pub fn classify(&self, variant: &Variant, bundle: &AnnotationBundle) -> ClassificationResult {
        let mut outcomes = Vec::new();
        let mut failures = Vec::new();

        for criterion in self.criteria_for(&variant.gene) {
            // Both lookups are total for criteria drawn from the
            // configuration the registry was built from.
            let Some(plan) = self.config.plan(criterion, &variant.gene) else {
                continue;
            };
            let Some(evaluator) = self.registry.resolve(criterion, &variant.gene) else {
                continue;
            };

            if !evaluator.applicable(variant) {
                outcomes.push(Outcome::not_applicable(
                    criterion,
                    format!(
                        "{} does not apply to variant types {}",
                        criterion.code(),
                        variant.consequence_terms()
                    ),
                ));
                continue;
            }

            match evaluator.evaluate(variant, bundle, plan, &self.config) {
                Ok(outcome) => {
                    debug!(
                        "{}: {} -> {:?}",
                        variant.label(),
                        criterion.code(),
                        outcome.evidence().map(|e| e.strength)
                    );
                    outcomes.push(apply_strength_override(outcome, plan.strength_override));
                }
                Err(err) => {
                    warn!("{}: {} failed: {err}", variant.label(), criterion.code());
                    failures.push(CriterionFailure {
                        criterion,
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let posterior = self.multifactorial_posterior(variant, bundle);
        build_result(
            variant.label(),
            variant.gene.clone(),
            outcomes,
            failures,
            posterior,
        )
    }

    /// Classify a batch of variants sequentially.
    pub fn classify_batch(
        &self,
        items: &[(Variant, AnnotationBundle)],
    ) -> Vec<ClassificationResult> {
        items
            .iter()
            .map(|(variant, bundle)| self.classify(variant, bundle))
            .collect()
    }

    /// The deterministic criterion evaluation order for a gene: the baseline
    /// criterion set plus any gene-specific additions, in criterion order.
    fn criteria_for(&self, gene: &str) -> Vec<Criterion> {
        let mut criteria: BTreeSet<Criterion> = self.config.criteria.keys().copied().collect();
        if let Some(plans) = self.config.gene_overrides.get(gene) {
            criteria.extend(plans.keys().copied());
        }
        criteria.into_iter().collect()
    }

    /// Run the multifactorial path when the bundle carries enough
    /// independent ratios. An insufficient set is the documented signal to
    /// rely on the discrete aggregation alone.
    fn multifactorial_posterior(
        &self,
        variant: &Variant,
        bundle: &AnnotationBundle,
    ) -> Option<Posterior> {
        let studies = bundle.family_studies.as_ref()?;
        let mut ratios = Vec::new();
        if let Some(value) = studies.co_segregation {
            ratios.push(LikelihoodRatio::new(LikelihoodSource::Segregation, value));
        }
        if let Some(value) = studies.co_occurrence {
            ratios.push(LikelihoodRatio::new(LikelihoodSource::CoOccurrence, value));
        }
        if let Some(value) = studies.case_control {
            ratios.push(LikelihoodRatio::new(LikelihoodSource::CaseControl, value));
        }
        if let Some(value) = studies.functional {
            ratios.push(LikelihoodRatio::new(
                LikelihoodSource::FunctionalAssay,
                value,
            ));
        }

        let mut multifactorial = self.config.multifactorial;
        if let Some(prior) = studies.prior {
            multifactorial.prior = prior;
        }
        match combine(&ratios, &multifactorial) {
            Ok(posterior) => Some(posterior),
            Err(AcmgError::InsufficientEvidence { .. }) => None,
            Err(err) => {
                warn!(
                    "{}: multifactorial combination failed: {err}",
                    variant.label()
                );
                None
            }
        }
    }
}

/// Apply a configured strength override to a triggered outcome. Overrides
/// never promote evidence to stand-alone; the override semantics of BA1 are
/// reserved for the published criterion.
fn apply_strength_override(outcome: Outcome, strength_override: Option<Strength>) -> Outcome {
    let Some(strength) = strength_override else {
        return outcome;
    };
    if strength == Strength::StandAlone {
        return outcome;
    }
    match outcome {
        Outcome::Triggered(mut evidence) => {
            if evidence.strength != Strength::StandAlone {
                evidence.strength = strength;
            }
            Outcome::Triggered(evidence)
        }
        other => other,
    }
}
