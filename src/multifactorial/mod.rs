//! Multifactorial likelihood combination.
//!
//! Alternate/supplementary quantitative path: multiply independently derived
//! likelihood ratios (segregation, co-occurrence, case-control, functional)
//! with a prior probability of pathogenicity and map the posterior to the
//! five-category scale. The combiner does not compute the ratios; it only
//! multiplies validated ones supplied by upstream collaborators.

use serde::{Deserialize, Serialize};

use crate::aggregate::Classification;
use crate::error::AcmgError;
use crate::Result;

/// Source of one independently derived likelihood ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodSource {
    /// Co-segregation with disease in families.
    Segregation,
    /// Co-occurrence in trans with known pathogenic variants.
    CoOccurrence,
    /// Case-control frequency comparison.
    CaseControl,
    /// Calibrated functional-assay odds.
    FunctionalAssay,
}

impl LikelihoodSource {
    /// Source label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            LikelihoodSource::Segregation => "segregation",
            LikelihoodSource::CoOccurrence => "co_occurrence",
            LikelihoodSource::CaseControl => "case_control",
            LikelihoodSource::FunctionalAssay => "functional_assay",
        }
    }
}

/// One labeled likelihood ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodRatio {
    /// Evidence source the ratio was derived from.
    pub source: LikelihoodSource,
    /// Odds of pathogenicity; >1 argues pathogenic, <1 benign.
    pub value: f64,
}

impl LikelihoodRatio {
    /// Construct a labeled ratio.
    pub fn new(source: LikelihoodSource, value: f64) -> Self {
        LikelihoodRatio { source, value }
    }
}

/// Posterior-probability cutoffs for the five categories.
///
/// A posterior maps to the first band it clears: above `pathogenic` is
/// Pathogenic, at or above `likely_pathogenic` Likely pathogenic, at or
/// above `uncertain` Uncertain, at or above `likely_benign` Likely benign,
/// and below that Benign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityBands {
    pub pathogenic: f64,
    pub likely_pathogenic: f64,
    pub uncertain: f64,
    pub likely_benign: f64,
}

impl Default for ProbabilityBands {
    fn default() -> Self {
        ProbabilityBands {
            pathogenic: 0.99,
            likely_pathogenic: 0.95,
            uncertain: 0.05,
            likely_benign: 0.001,
        }
    }
}

impl ProbabilityBands {
    /// Map a posterior probability to its category.
    pub fn classify(&self, posterior: f64) -> Classification {
        if posterior > self.pathogenic {
            Classification::Pathogenic
        } else if posterior >= self.likely_pathogenic {
            Classification::LikelyPathogenic
        } else if posterior >= self.uncertain {
            Classification::Uncertain
        } else if posterior >= self.likely_benign {
            Classification::LikelyBenign
        } else {
            Classification::Benign
        }
    }
}

/// Settings for the multifactorial combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultifactorialConfig {
    /// Prior probability of pathogenicity.
    pub prior: f64,
    /// Minimum number of independent ratios required.
    pub min_ratios: usize,
    /// Posterior-probability band cutoffs.
    pub bands: ProbabilityBands,
}

impl Default for MultifactorialConfig {
    fn default() -> Self {
        MultifactorialConfig {
            prior: 0.1,
            min_ratios: 2,
            bands: ProbabilityBands::default(),
        }
    }
}

/// Result of the multifactorial combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    /// Posterior probability of pathogenicity.
    pub probability: f64,
    /// Product of the contributing likelihood ratios.
    pub combined_ratio: f64,
    /// Prior used for the combination.
    pub prior: f64,
    /// Category the posterior maps to.
    pub classification: Classification,
    /// Sources that contributed, in input order.
    pub sources: Vec<LikelihoodSource>,
}

/// Combine independent likelihood ratios into a posterior probability.
///
/// Bayes update in odds form: posterior odds are the prior odds multiplied
/// by the product of all ratios. Fails with `InsufficientEvidence` when
/// fewer than `config.min_ratios` ratios are supplied, signaling the caller
/// to fall back to the discrete evidence aggregator; fails with
/// `Configuration` on a non-finite or non-positive ratio or prior, which is
/// a contract violation by the upstream supplier.
pub fn combine(ratios: &[LikelihoodRatio], config: &MultifactorialConfig) -> Result<Posterior> {
    if ratios.len() < config.min_ratios {
        return Err(AcmgError::InsufficientEvidence {
            available: ratios.len(),
            required: config.min_ratios,
        });
    }
    if !(config.prior > 0.0 && config.prior < 1.0) {
        return Err(AcmgError::config(format!(
            "prior probability must be in (0, 1), got {}",
            config.prior
        )));
    }
    for ratio in ratios {
        if !ratio.value.is_finite() || ratio.value <= 0.0 {
            return Err(AcmgError::config(format!(
                "likelihood ratio from {} must be finite and positive, got {}",
                ratio.source.as_str(),
                ratio.value
            )));
        }
    }

    let combined_ratio: f64 = ratios.iter().map(|r| r.value).product();
    let prior_odds = config.prior / (1.0 - config.prior);
    let posterior_odds = prior_odds * combined_ratio;
    let probability = posterior_odds / (1.0 + posterior_odds);

    Ok(Posterior {
        probability,
        combined_ratio,
        prior: config.prior,
        classification: config.bands.classify(probability),
        sources: ratios.iter().map(|r| r.source).collect(),
    })
}
