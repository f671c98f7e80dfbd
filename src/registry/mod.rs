//! Rule registry: eager, validated resolution of evaluator-variant names to
//! typed evaluators.
//!
//! Evaluator selection is configuration-driven, but resolution happens once
//! at registry construction so unresolvable bindings fail fast rather than
//! at evaluation time. The resolved table is immutable and safely shared
//! across concurrent evaluations.

use std::collections::BTreeMap;

use log::debug;

use crate::annotation::AnnotationBundle;
use crate::config::{CriterionPlan, RuleConfiguration};
use crate::error::AcmgError;
use crate::rules::bp7::{Bp7, DeepIntronicWindow};
use crate::rules::frequency::{Ba1, Bs1, Bs2, FrequencyBasis, Pm2, Pm2Mode};
use crate::rules::functional::{AssayScope, Bs3, Ps3};
use crate::rules::insilico::{Bp4, InSilicoMode, Pp3};
use crate::rules::pm1::{Pm1, Pm1Mode};
use crate::rules::pm5::{Pm5, Pm5Mode};
use crate::rules::protein_impact::{Bp3, Pm4, Pp2};
use crate::rules::ps1::{Ps1, Ps1Mode};
use crate::rules::pvs1::{Pvs1, Pvs1Params};
use crate::rules::segregation::{Bs4, Pp1};
use crate::rules::{Criterion, Outcome};
use crate::variant::Variant;
use crate::Result;

/// Evaluator-variant names accepted in configuration.
pub const EVALUATOR_NAMES: &[&str] = &[
    "pvs1",
    "pvs1_atm",
    "pvs1_brca1",
    "pvs1_brca2",
    "pvs1_cdh1",
    "pvs1_palb2",
    "pvs1_pten",
    "ps1_protein",
    "ps1_protein_enigma",
    "ps1_splicing",
    "ps3",
    "ps3_only_splice",
    "ps3_prot_splice",
    "pm1",
    "pm1_defined_regions",
    "pm2",
    "pm2_supporting",
    "pm2_no_indel",
    "pm4",
    "pm4_stoploss",
    "pm5_protein",
    "pm5_protein_pathogenic",
    "pm5_splicing",
    "pm5_ptc",
    "pp1",
    "pp2",
    "pp3_protein",
    "pp3_splicing",
    "pp3_mult_strength",
    "ba1",
    "ba1_absolute",
    "bs1",
    "bs1_absolute",
    "bs1_supporting",
    "bs2",
    "bs2_supporting",
    "bs3",
    "bs3_only_splice",
    "bs3_prot_splice",
    "bs4",
    "bp3",
    "bp4_protein",
    "bp4_splicing",
    "bp4_mult_strength",
    "bp7",
    "bp7_deep_intronic_enigma",
    "bp7_deep_intronic_atm",
    "bp7_deep_intronic_palb2",
];

/// A concrete rule evaluator, resolved from its configuration name.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluator {
    Pvs1(Pvs1),
    Ps1(Ps1),
    Ps3(Ps3),
    Pm1(Pm1),
    Pm2(Pm2),
    Pm4(Pm4),
    Pm5(Pm5),
    Pp1(Pp1),
    Pp2(Pp2),
    Pp3(Pp3),
    Ba1(Ba1),
    Bs1(Bs1),
    Bs2(Bs2),
    Bs3(Bs3),
    Bs4(Bs4),
    Bp3(Bp3),
    Bp4(Bp4),
    Bp7(Bp7),
}

impl Evaluator {
    /// Resolve an evaluator-variant name to its typed evaluator.
    pub fn from_name(name: &str) -> Option<Evaluator> {
        let evaluator = match name {
            "pvs1" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::generic(),
            }),
            "pvs1_atm" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::atm(),
            }),
            "pvs1_brca1" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::brca1(),
            }),
            "pvs1_brca2" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::brca2(),
            }),
            "pvs1_cdh1" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::cdh1(),
            }),
            "pvs1_palb2" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::palb2(),
            }),
            "pvs1_pten" => Evaluator::Pvs1(Pvs1 {
                params: Pvs1Params::pten(),
            }),
            "ps1_protein" => Evaluator::Ps1(Ps1 {
                mode: Ps1Mode::Protein,
            }),
            "ps1_protein_enigma" => Evaluator::Ps1(Ps1 {
                mode: Ps1Mode::ProteinEnigma,
            }),
            "ps1_splicing" => Evaluator::Ps1(Ps1 {
                mode: Ps1Mode::Splicing,
            }),
            "ps3" => Evaluator::Ps3(Ps3 {
                scope: AssayScope::Protein,
            }),
            "ps3_only_splice" => Evaluator::Ps3(Ps3 {
                scope: AssayScope::Splicing,
            }),
            "ps3_prot_splice" => Evaluator::Ps3(Ps3 {
                scope: AssayScope::Both,
            }),
            "pm1" => Evaluator::Pm1(Pm1 {
                mode: Pm1Mode::Hotspot,
            }),
            "pm1_defined_regions" => Evaluator::Pm1(Pm1 {
                mode: Pm1Mode::DefinedRegions,
            }),
            "pm2" => Evaluator::Pm2(Pm2 {
                mode: Pm2Mode::Moderate,
            }),
            "pm2_supporting" => Evaluator::Pm2(Pm2 {
                mode: Pm2Mode::Supporting,
            }),
            "pm2_no_indel" => Evaluator::Pm2(Pm2 {
                mode: Pm2Mode::NoIndel,
            }),
            "pm4" => Evaluator::Pm4(Pm4 {
                stoploss_only: false,
            }),
            "pm4_stoploss" => Evaluator::Pm4(Pm4 {
                stoploss_only: true,
            }),
            "pm5_protein" => Evaluator::Pm5(Pm5 {
                mode: Pm5Mode::Protein,
            }),
            "pm5_protein_pathogenic" => Evaluator::Pm5(Pm5 {
                mode: Pm5Mode::ProteinPathogenicOnly,
            }),
            "pm5_splicing" => Evaluator::Pm5(Pm5 {
                mode: Pm5Mode::Splicing,
            }),
            "pm5_ptc" => Evaluator::Pm5(Pm5 { mode: Pm5Mode::Ptc }),
            "pp1" => Evaluator::Pp1(Pp1),
            "pp2" => Evaluator::Pp2(Pp2),
            "pp3_protein" => Evaluator::Pp3(Pp3 {
                mode: InSilicoMode::Protein,
            }),
            "pp3_splicing" => Evaluator::Pp3(Pp3 {
                mode: InSilicoMode::Splicing,
            }),
            "pp3_mult_strength" => Evaluator::Pp3(Pp3 {
                mode: InSilicoMode::Combined,
            }),
            "ba1" => Evaluator::Ba1(Ba1 {
                basis: FrequencyBasis::Frequency,
            }),
            "ba1_absolute" => Evaluator::Ba1(Ba1 {
                basis: FrequencyBasis::AbsoluteCount,
            }),
            "bs1" => Evaluator::Bs1(Bs1 {
                basis: FrequencyBasis::Frequency,
                two_tier: false,
            }),
            "bs1_absolute" => Evaluator::Bs1(Bs1 {
                basis: FrequencyBasis::AbsoluteCount,
                two_tier: false,
            }),
            "bs1_supporting" => Evaluator::Bs1(Bs1 {
                basis: FrequencyBasis::Frequency,
                two_tier: true,
            }),
            "bs2" => Evaluator::Bs2(Bs2 { two_tier: false }),
            "bs2_supporting" => Evaluator::Bs2(Bs2 { two_tier: true }),
            "bs3" => Evaluator::Bs3(Bs3 {
                scope: AssayScope::Protein,
            }),
            "bs3_only_splice" => Evaluator::Bs3(Bs3 {
                scope: AssayScope::Splicing,
            }),
            "bs3_prot_splice" => Evaluator::Bs3(Bs3 {
                scope: AssayScope::Both,
            }),
            "bs4" => Evaluator::Bs4(Bs4),
            "bp3" => Evaluator::Bp3(Bp3),
            "bp4_protein" => Evaluator::Bp4(Bp4 {
                mode: InSilicoMode::Protein,
            }),
            "bp4_splicing" => Evaluator::Bp4(Bp4 {
                mode: InSilicoMode::Splicing,
            }),
            "bp4_mult_strength" => Evaluator::Bp4(Bp4 {
                mode: InSilicoMode::Combined,
            }),
            "bp7" => Evaluator::Bp7(Bp7 {
                deep_intronic: None,
                use_rna_assay: false,
            }),
            "bp7_deep_intronic_enigma" => Evaluator::Bp7(Bp7 {
                deep_intronic: Some(DeepIntronicWindow::enigma()),
                use_rna_assay: true,
            }),
            "bp7_deep_intronic_atm" => Evaluator::Bp7(Bp7 {
                deep_intronic: Some(DeepIntronicWindow::atm()),
                use_rna_assay: true,
            }),
            "bp7_deep_intronic_palb2" => Evaluator::Bp7(Bp7 {
                deep_intronic: Some(DeepIntronicWindow::palb2()),
                use_rna_assay: true,
            }),
            _ => return None,
        };
        Some(evaluator)
    }

    /// The criterion family this evaluator implements.
    pub fn criterion(&self) -> Criterion {
        match self {
            Evaluator::Pvs1(_) => Criterion::Pvs1,
            Evaluator::Ps1(_) => Criterion::Ps1,
            Evaluator::Ps3(_) => Criterion::Ps3,
            Evaluator::Pm1(_) => Criterion::Pm1,
            Evaluator::Pm2(_) => Criterion::Pm2,
            Evaluator::Pm4(_) => Criterion::Pm4,
            Evaluator::Pm5(_) => Criterion::Pm5,
            Evaluator::Pp1(_) => Criterion::Pp1,
            Evaluator::Pp2(_) => Criterion::Pp2,
            Evaluator::Pp3(_) => Criterion::Pp3,
            Evaluator::Ba1(_) => Criterion::Ba1,
            Evaluator::Bs1(_) => Criterion::Bs1,
            Evaluator::Bs2(_) => Criterion::Bs2,
            Evaluator::Bs3(_) => Criterion::Bs3,
            Evaluator::Bs4(_) => Criterion::Bs4,
            Evaluator::Bp3(_) => Criterion::Bp3,
            Evaluator::Bp4(_) => Criterion::Bp4,
            Evaluator::Bp7(_) => Criterion::Bp7,
        }
    }

    /// Whether the evaluator's preconditions on the variant's consequence
    /// types hold. Callers check this before [`Evaluator::evaluate`];
    /// evaluating an inapplicable variant is an `UnsupportedVariantType`
    /// error.
    pub fn applicable(&self, variant: &Variant) -> bool {
        match self {
            Evaluator::Pvs1(e) => e.applicable(variant),
            Evaluator::Ps1(e) => e.applicable(variant),
            Evaluator::Ps3(e) => e.applicable(variant),
            Evaluator::Pm1(e) => e.applicable(variant),
            Evaluator::Pm2(e) => e.applicable(variant),
            Evaluator::Pm4(e) => e.applicable(variant),
            Evaluator::Pm5(e) => e.applicable(variant),
            Evaluator::Pp1(e) => e.applicable(variant),
            Evaluator::Pp2(e) => e.applicable(variant),
            Evaluator::Pp3(e) => e.applicable(variant),
            Evaluator::Ba1(e) => e.applicable(variant),
            Evaluator::Bs1(e) => e.applicable(variant),
            Evaluator::Bs2(e) => e.applicable(variant),
            Evaluator::Bs3(e) => e.applicable(variant),
            Evaluator::Bs4(e) => e.applicable(variant),
            Evaluator::Bp3(e) => e.applicable(variant),
            Evaluator::Bp4(e) => e.applicable(variant),
            Evaluator::Bp7(e) => e.applicable(variant),
        }
    }

    /// Run the evaluator.
    pub fn evaluate(
        &self,
        variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
        config: &RuleConfiguration,
    ) -> Result<Outcome> {
        match self {
            Evaluator::Pvs1(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Ps1(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Ps3(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Pm1(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Pm2(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Pm4(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Pm5(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Pp1(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Pp2(e) => e.evaluate(variant, config),
            Evaluator::Pp3(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Ba1(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bs1(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bs2(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bs3(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bs4(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bp3(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bp4(e) => e.evaluate(variant, bundle, plan),
            Evaluator::Bp7(e) => e.evaluate(variant, bundle, plan),
        }
    }
}

/// Resolved (criterion, gene) -> evaluator table.
///
/// Built once per rule configuration, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRegistry {
    table: BTreeMap<(Criterion, Option<String>), Evaluator>,
}

impl RuleRegistry {
    /// Build the registry, resolving every evaluator-variant name in the
    /// configuration. Fails with a configuration error on the first
    /// unresolvable binding.
    pub fn from_config(config: &RuleConfiguration) -> Result<RuleRegistry> {
        let mut table = BTreeMap::new();
        for (criterion, plan) in &config.criteria {
            let evaluator = resolve_name(*criterion, plan)?;
            debug!("registry: {} -> {}", criterion.code(), plan.evaluator);
            table.insert((*criterion, None), evaluator);
        }
        for (gene, plans) in &config.gene_overrides {
            for (criterion, plan) in plans {
                let evaluator = resolve_name(*criterion, plan)?;
                debug!(
                    "registry: {}/{} -> {}",
                    criterion.code(),
                    gene,
                    plan.evaluator
                );
                table.insert((*criterion, Some(gene.clone())), evaluator);
            }
        }
        Ok(RuleRegistry { table })
    }

    /// Return the single applicable evaluator for a criterion and gene: the
    /// gene-specific binding when one is configured, the generic one
    /// otherwise.
    pub fn resolve(&self, criterion: Criterion, gene: &str) -> Option<&Evaluator> {
        self.table
            .get(&(criterion, Some(gene.to_string())))
            .or_else(|| self.table.get(&(criterion, None)))
    }

    /// Number of resolved bindings.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn resolve_name(criterion: Criterion, plan: &CriterionPlan) -> Result<Evaluator> {
    let evaluator = Evaluator::from_name(&plan.evaluator).ok_or_else(|| {
        AcmgError::config(format!(
            "'{}' is not a known evaluator; valid evaluators are: {}",
            plan.evaluator,
            EVALUATOR_NAMES.join(", ")
        ))
    })?;
    if evaluator.criterion() != criterion {
        return Err(AcmgError::config(format!(
            "evaluator '{}' implements {} but is bound to {}",
            plan.evaluator,
            evaluator.criterion().code(),
            criterion.code()
        )));
    }
    Ok(evaluator)
}
