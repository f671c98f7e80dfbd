//! PS3 / BS3: well-established functional assays.
//!
//! The evaluators consume externally supplied assay readouts; absence of an
//! assay yields NotApplicable, never a default strength.

use crate::annotation::{AnnotationBundle, AssayResult};
use crate::config::CriterionPlan;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::Variant;
use crate::Result;

/// Which assay layer(s) an evaluator consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssayScope {
    /// Protein-level assay only.
    Protein,
    /// Splicing (RNA) assay only.
    Splicing,
    /// Either assay; the protein readout is consulted first.
    Both,
}

fn collect<'a>(
    scope: AssayScope,
    bundle: &'a AnnotationBundle,
) -> Vec<(&'a AssayResult, RuleTag)> {
    let mut assays = Vec::new();
    if matches!(scope, AssayScope::Protein | AssayScope::Both) {
        if let Some(a) = &bundle.protein_assay {
            assays.push((a, RuleTag::Protein));
        }
    }
    if matches!(scope, AssayScope::Splicing | AssayScope::Both) {
        if let Some(a) = &bundle.splice_assay {
            assays.push((a, RuleTag::Splicing));
        }
    }
    assays
}

/// PS3: functional studies show a damaging effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Ps3 {
    pub scope: AssayScope,
}

impl Ps3 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let assays = collect(self.scope, bundle);
        if assays.is_empty() {
            return missing_field(Criterion::Ps3, "functional assay", plan);
        }
        for (assay, tag) in &assays {
            if assay.damaging {
                return Ok(Outcome::triggered(
                    Criterion::Ps3,
                    *tag,
                    Strength::Strong,
                    "functional assay shows a damaging effect",
                ));
            }
        }
        Ok(Outcome::not_triggered(
            Criterion::Ps3,
            "no performed assay shows a damaging effect",
        ))
    }
}

/// BS3: functional studies show no damaging effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Bs3 {
    pub scope: AssayScope,
}

impl Bs3 {
    pub fn applicable(&self, _variant: &Variant) -> bool {
        true
    }

    pub fn evaluate(
        &self,
        _variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        let assays = collect(self.scope, bundle);
        if assays.is_empty() {
            return missing_field(Criterion::Bs3, "functional assay", plan);
        }
        // Every performed assay must be normal; a single damaging readout
        // defeats the benign argument.
        if assays.iter().all(|(a, _)| a.normal && !a.damaging) {
            let tag = assays[0].1;
            Ok(Outcome::triggered(
                Criterion::Bs3,
                tag,
                Strength::Strong,
                "functional assays show no damaging effect",
            ))
        } else {
            Ok(Outcome::not_triggered(
                Criterion::Bs3,
                "at least one assay shows a damaging or inconclusive readout",
            ))
        }
    }
}
