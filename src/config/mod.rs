//! Resolved rule configuration.
//!
//! The engine consumes configuration that has already been loaded and
//! validated by an external caller (file formats and lookup of gene-specific
//! documents are out of scope). The types here are the resolved form: which
//! evaluator variant runs for each criterion, the numeric thresholds it
//! uses, and per-gene overrides. Everything is read-only during a
//! classification run.

pub mod defaults;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::multifactorial::MultifactorialConfig;
use crate::rules::thresholds::Threshold;
use crate::rules::{Criterion, Strength};

/// Which predictor wins when the missense and splicing predictors disagree
/// in the combined PP3/BP4 variants.
///
/// Splicing is the default: a predicted splice effect reflects a concrete
/// transcript-level mechanism, while missense scores aggregate weaker
/// correlates. The choice is configurable rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorPrecedence {
    #[default]
    Splicing,
    Protein,
}

/// Per-criterion, resolved evaluation plan.
///
/// `evaluator` names the evaluator variant (e.g. `pvs1_brca1`,
/// `pp3_mult_strength`); unknown names fail registry construction. Numeric
/// fields are optional; evaluators fall back to the published defaults in
/// [`defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionPlan {
    /// Evaluator variant name.
    pub evaluator: String,
    /// Strength override applied to a triggered result (e.g. downgrading
    /// PM1 to supporting for a gene). Never upgrades to stand-alone.
    pub strength_override: Option<Strength>,
    /// Treat a missing annotation field as an error instead of
    /// NotApplicable.
    pub require_annotation: bool,
    /// Allele-frequency cutoff (BA1/BS1/PM2).
    pub frequency_cutoff: Option<f64>,
    /// Absolute-count cutoff (absolute modes of BA1/BS1, BS2, PM1
    /// defined-regions).
    pub count_cutoff: Option<u64>,
    /// Second-tier frequency cutoff for two-tier variants.
    pub supporting_frequency_cutoff: Option<f64>,
    /// Second-tier count cutoff for two-tier variants.
    pub supporting_count_cutoff: Option<u64>,
    /// Pathogenicity-predictor threshold (protein path).
    pub pathogenic_scores: Option<Threshold>,
    /// Benign-predictor threshold (protein path).
    pub benign_scores: Option<Threshold>,
    /// Splicing-predictor threshold; direction depends on the criterion
    /// (pathogenic for PP3, benign for BP4/BP7).
    pub splicing_scores: Option<Threshold>,
    /// Co-segregation likelihood threshold (PP1/BS4).
    pub segregation: Option<Threshold>,
    /// Predictor precedence for combined in-silico variants.
    pub precedence: Option<PredictorPrecedence>,
    /// Protein-length-change fraction above which a non-NMD truncation is
    /// strong rather than moderate evidence (PVS1).
    pub protein_length_change_cutoff: Option<f64>,
    /// Protein position of the last known pathogenic truncation, per
    /// transcript (gene-specific PVS1 variants).
    pub last_pathogenic_ptc: BTreeMap<String, u64>,
}

impl Default for CriterionPlan {
    fn default() -> Self {
        CriterionPlan {
            evaluator: String::new(),
            strength_override: None,
            require_annotation: false,
            frequency_cutoff: None,
            count_cutoff: None,
            supporting_frequency_cutoff: None,
            supporting_count_cutoff: None,
            pathogenic_scores: None,
            benign_scores: None,
            splicing_scores: None,
            segregation: None,
            precedence: None,
            protein_length_change_cutoff: None,
            last_pathogenic_ptc: BTreeMap::new(),
        }
    }
}

impl CriterionPlan {
    /// Plan running the named evaluator with otherwise default settings.
    pub fn new(evaluator: impl Into<String>) -> Self {
        CriterionPlan {
            evaluator: evaluator.into(),
            ..CriterionPlan::default()
        }
    }

    /// Builder: set the frequency cutoff.
    pub fn with_frequency_cutoff(mut self, cutoff: f64) -> Self {
        self.frequency_cutoff = Some(cutoff);
        self
    }

    /// Builder: set the absolute-count cutoff.
    pub fn with_count_cutoff(mut self, cutoff: u64) -> Self {
        self.count_cutoff = Some(cutoff);
        self
    }

    /// Builder: require the criterion's annotation field.
    pub fn with_required_annotation(mut self) -> Self {
        self.require_annotation = true;
        self
    }

    /// Builder: set the strength override.
    pub fn with_strength_override(mut self, strength: Strength) -> Self {
        self.strength_override = Some(strength);
        self
    }
}

/// Resolved, per-gene and per-criterion rule configuration.
///
/// Read-only during a classification run; externally supplied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfiguration {
    /// Baseline plan per criterion; criteria absent from the map do not run.
    pub criteria: BTreeMap<Criterion, CriterionPlan>,
    /// Per-gene plan overrides, keyed by uppercase gene symbol.
    pub gene_overrides: BTreeMap<String, BTreeMap<Criterion, CriterionPlan>>,
    /// Genes where missense is an established disease mechanism (PP2).
    pub missense_constrained_genes: BTreeSet<String>,
    /// Multifactorial combination settings.
    pub multifactorial: MultifactorialConfig,
}

impl RuleConfiguration {
    /// The published baseline configuration: every criterion family enabled
    /// with its generic evaluator and default thresholds.
    pub fn default_acmg() -> Self {
        let mut criteria = BTreeMap::new();
        criteria.insert(Criterion::Pvs1, CriterionPlan::new("pvs1"));
        criteria.insert(Criterion::Ps1, CriterionPlan::new("ps1_protein"));
        criteria.insert(Criterion::Ps3, CriterionPlan::new("ps3"));
        criteria.insert(Criterion::Pm1, CriterionPlan::new("pm1"));
        criteria.insert(
            Criterion::Pm2,
            CriterionPlan::new("pm2")
                .with_frequency_cutoff(defaults::PM2_FREQUENCY)
                .with_required_annotation(),
        );
        criteria.insert(Criterion::Pm4, CriterionPlan::new("pm4"));
        criteria.insert(Criterion::Pm5, CriterionPlan::new("pm5_protein"));
        criteria.insert(
            Criterion::Pp1,
            CriterionPlan {
                segregation: Some(defaults::segregation_pathogenic().clone()),
                ..CriterionPlan::new("pp1")
            },
        );
        criteria.insert(Criterion::Pp2, CriterionPlan::new("pp2"));
        criteria.insert(
            Criterion::Pp3,
            CriterionPlan {
                pathogenic_scores: Some(defaults::missense_pathogenic().clone()),
                splicing_scores: Some(defaults::splicing_pathogenic().clone()),
                ..CriterionPlan::new("pp3_protein")
            },
        );
        criteria.insert(
            Criterion::Ba1,
            CriterionPlan::new("ba1")
                .with_frequency_cutoff(defaults::BA1_FREQUENCY)
                .with_required_annotation(),
        );
        criteria.insert(
            Criterion::Bs1,
            CriterionPlan::new("bs1")
                .with_frequency_cutoff(defaults::BS1_FREQUENCY)
                .with_required_annotation(),
        );
        criteria.insert(
            Criterion::Bs2,
            CriterionPlan::new("bs2").with_count_cutoff(defaults::BS2_COUNT),
        );
        criteria.insert(Criterion::Bs3, CriterionPlan::new("bs3"));
        criteria.insert(
            Criterion::Bs4,
            CriterionPlan {
                segregation: Some(defaults::segregation_benign().clone()),
                ..CriterionPlan::new("bs4")
            },
        );
        criteria.insert(Criterion::Bp3, CriterionPlan::new("bp3"));
        criteria.insert(
            Criterion::Bp4,
            CriterionPlan {
                benign_scores: Some(defaults::missense_benign().clone()),
                splicing_scores: Some(defaults::splicing_benign().clone()),
                ..CriterionPlan::new("bp4_protein")
            },
        );
        criteria.insert(
            Criterion::Bp7,
            CriterionPlan {
                splicing_scores: Some(defaults::splicing_benign().clone()),
                ..CriterionPlan::new("bp7")
            },
        );

        RuleConfiguration {
            criteria,
            gene_overrides: BTreeMap::new(),
            missense_constrained_genes: BTreeSet::new(),
            multifactorial: MultifactorialConfig::default(),
        }
    }

    /// Resolve the plan for a criterion and gene: the gene override when one
    /// is configured, the baseline plan otherwise.
    pub fn plan(&self, criterion: Criterion, gene: &str) -> Option<&CriterionPlan> {
        self.gene_overrides
            .get(gene)
            .and_then(|plans| plans.get(&criterion))
            .or_else(|| self.criteria.get(&criterion))
    }

    /// Builder: bind a gene-specific plan for one criterion.
    pub fn with_gene_override(
        mut self,
        gene: impl Into<String>,
        criterion: Criterion,
        plan: CriterionPlan,
    ) -> Self {
        self.gene_overrides
            .entry(gene.into().to_uppercase())
            .or_default()
            .insert(criterion, plan);
        self
    }

    /// Whether missense is an established mechanism for the gene (PP2).
    pub fn is_missense_constrained(&self, gene: &str) -> bool {
        self.missense_constrained_genes.contains(gene)
    }
}
