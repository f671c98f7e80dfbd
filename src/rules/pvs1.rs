//! PVS1: null variant in a gene where loss of function is a known disease
//! mechanism.
//!
//! The decision trees are walked per annotated transcript view (exonic
//! premature-termination, canonical splice, start loss) and the strongest
//! triggered result is kept. Gene-specific behavior is parameterized, not
//! subclassed: a last-known-pathogenic-truncation table (from
//! configuration) and a small set of flags.

use crate::annotation::{
    AnnotationBundle, ExonicView, IntronicView, StartLossView, TranscriptView,
};
use crate::config::{defaults, CriterionPlan};
use crate::error::AcmgError;
use crate::rules::{missing_field, Criterion, Outcome, RuleTag, Strength};
use crate::variant::Variant;
use crate::Result;

/// One per-transcript assessment before summarization.
#[derive(Debug, Clone)]
struct Assessment {
    triggered: bool,
    strength: Strength,
    tag: RuleTag,
    rationale: String,
}

/// Gene-specific PVS1 behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pvs1Params {
    /// Let a performed splicing assay decide the splice path outright.
    pub use_splice_assay: bool,
    /// Start-loss variants are automatically very strong for this gene.
    pub start_loss_automatic_very_strong: bool,
}

impl Pvs1Params {
    /// Generic behavior.
    pub fn generic() -> Self {
        Pvs1Params::default()
    }

    /// BRCA1 VCEP behavior: assay-first splice path.
    pub fn brca1() -> Self {
        Pvs1Params {
            use_splice_assay: true,
            ..Pvs1Params::default()
        }
    }

    /// BRCA2 VCEP behavior: assay-first splice path.
    pub fn brca2() -> Self {
        Pvs1Params {
            use_splice_assay: true,
            ..Pvs1Params::default()
        }
    }

    /// ATM behavior.
    pub fn atm() -> Self {
        Pvs1Params::default()
    }

    /// CDH1 behavior.
    pub fn cdh1() -> Self {
        Pvs1Params::default()
    }

    /// PALB2 behavior.
    pub fn palb2() -> Self {
        Pvs1Params::default()
    }

    /// PTEN VCEP behavior: start loss is automatically very strong.
    pub fn pten() -> Self {
        Pvs1Params {
            start_loss_automatic_very_strong: true,
            ..Pvs1Params::default()
        }
    }
}

/// PVS1 evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Pvs1 {
    pub params: Pvs1Params,
}

impl Pvs1 {
    /// Applicable only to consequence types predicted to truncate or abolish
    /// the transcript.
    pub fn applicable(&self, variant: &Variant) -> bool {
        variant.any_consequence(|c| c.is_loss_of_function())
    }

    pub fn evaluate(
        &self,
        variant: &Variant,
        bundle: &AnnotationBundle,
        plan: &CriterionPlan,
    ) -> Result<Outcome> {
        if !self.applicable(variant) {
            return Err(AcmgError::UnsupportedVariantType {
                criterion: Criterion::Pvs1.code().to_string(),
                found: variant.consequence_terms(),
            });
        }
        if bundle.transcripts.is_empty() {
            return missing_field(Criterion::Pvs1, "annotated transcript view", plan);
        }
        let length_cutoff = plan
            .protein_length_change_cutoff
            .unwrap_or(defaults::PVS1_LENGTH_CHANGE);

        let mut assessed = Vec::with_capacity(bundle.transcripts.len());
        for view in &bundle.transcripts {
            let assessment = match view {
                TranscriptView::Exonic(v) => Self::assess_exonic(v, plan, length_cutoff),
                TranscriptView::Intronic(v) => {
                    match self.assess_splice_assay(bundle) {
                        Some(a) => a,
                        None => Self::assess_intronic(v, length_cutoff),
                    }
                }
                TranscriptView::StartLoss(v) => self.assess_start_loss(v),
            };
            assessed.push(assessment);
        }
        Ok(summarise(assessed))
    }

    /// When configured, a performed splicing assay decides the splice path.
    fn assess_splice_assay(&self, bundle: &AnnotationBundle) -> Option<Assessment> {
        if !self.params.use_splice_assay {
            return None;
        }
        let assay = bundle.splice_assay.as_ref()?;
        if assay.damaging {
            Some(Assessment {
                triggered: true,
                strength: Strength::VeryStrong,
                tag: RuleTag::Splicing,
                rationale: "splicing assay shows a detrimental effect on splicing".to_string(),
            })
        } else {
            Some(Assessment {
                triggered: false,
                strength: Strength::VeryStrong,
                tag: RuleTag::Splicing,
                rationale: "splicing assay shows no detrimental effect on splicing".to_string(),
            })
        }
    }

    fn assess_exonic(view: &ExonicView, plan: &CriterionPlan, length_cutoff: f64) -> Assessment {
        // Gene-specific truncation table: positions at or upstream of the
        // last known pathogenic truncation are very strong, downstream
        // positions do not trigger.
        if let (Some(limit), Some(ptc)) = (
            plan.last_pathogenic_ptc.get(&view.transcript_id),
            view.ptc_position,
        ) {
            return if ptc <= *limit {
                Assessment {
                    triggered: true,
                    strength: Strength::VeryStrong,
                    tag: RuleTag::Protein,
                    rationale: format!(
                        "premature termination at p.{ptc} in {}, upstream of the last known pathogenic truncation (p.{limit})",
                        view.transcript_id
                    ),
                }
            } else {
                Assessment {
                    triggered: false,
                    strength: Strength::VeryStrong,
                    tag: RuleTag::Protein,
                    rationale: format!(
                        "premature termination at p.{ptc} in {}, downstream of the last known pathogenic truncation (p.{limit})",
                        view.transcript_id
                    ),
                }
            };
        }

        if view.nmd_predicted {
            if view.truncated_region_disease_relevant {
                Assessment {
                    triggered: true,
                    strength: Strength::VeryStrong,
                    tag: RuleTag::Protein,
                    rationale: format!(
                        "transcript {} is predicted to undergo NMD and the truncated region is disease relevant",
                        view.transcript_id
                    ),
                }
            } else {
                Assessment {
                    triggered: false,
                    strength: Strength::VeryStrong,
                    tag: RuleTag::Protein,
                    rationale: format!(
                        "transcript {} is predicted to undergo NMD but the truncated region is not disease relevant",
                        view.transcript_id
                    ),
                }
            }
        } else if view.truncated_region_disease_relevant {
            Assessment {
                triggered: true,
                strength: Strength::Strong,
                tag: RuleTag::Protein,
                rationale: format!(
                    "transcript {} escapes NMD; the truncated region is disease relevant",
                    view.transcript_id
                ),
            }
        } else {
            let strength = if view.protein_length_change > length_cutoff {
                Strength::Strong
            } else {
                Strength::Moderate
            };
            Assessment {
                triggered: true,
                strength,
                tag: RuleTag::Protein,
                rationale: format!(
                    "transcript {} escapes NMD; protein length change of {:.3} observed",
                    view.transcript_id, view.protein_length_change
                ),
            }
        }
    }

    fn assess_intronic(view: &IntronicView, length_cutoff: f64) -> Assessment {
        if view.nmd_predicted {
            if view.truncated_region_disease_relevant {
                Assessment {
                    triggered: true,
                    strength: Strength::VeryStrong,
                    tag: RuleTag::Splicing,
                    rationale: format!(
                        "transcript {} undergoes NMD and the skipped exon is disease relevant",
                        view.transcript_id
                    ),
                }
            } else {
                Assessment {
                    triggered: false,
                    strength: Strength::VeryStrong,
                    tag: RuleTag::Splicing,
                    rationale: format!(
                        "transcript {} undergoes NMD but the skipped exon is not disease relevant",
                        view.transcript_id
                    ),
                }
            }
        } else if view.exons_skipped {
            if view.truncated_region_disease_relevant {
                Assessment {
                    triggered: true,
                    strength: Strength::Strong,
                    tag: RuleTag::Splicing,
                    rationale: format!(
                        "transcript {} escapes NMD; the skipped exon is disease relevant",
                        view.transcript_id
                    ),
                }
            } else {
                let strength = if view.protein_length_change > length_cutoff {
                    Strength::Strong
                } else {
                    Strength::Moderate
                };
                let frame = if view.reading_frame_preserved {
                    "preserved"
                } else {
                    "disrupted"
                };
                Assessment {
                    triggered: true,
                    strength,
                    tag: RuleTag::Splicing,
                    rationale: format!(
                        "transcript {} escapes NMD with reading frame {frame}; protein length change of {:.3} observed",
                        view.transcript_id, view.protein_length_change
                    ),
                }
            }
        } else {
            Assessment {
                triggered: false,
                strength: Strength::VeryStrong,
                tag: RuleTag::Splicing,
                rationale: format!(
                    "transcript {} meets no loss-of-function splicing pathway",
                    view.transcript_id
                ),
            }
        }
    }

    fn assess_start_loss(&self, view: &StartLossView) -> Assessment {
        if self.params.start_loss_automatic_very_strong {
            return Assessment {
                triggered: true,
                strength: Strength::VeryStrong,
                tag: RuleTag::Protein,
                rationale: format!(
                    "start loss in {} is automatically very strong for this gene",
                    view.transcript_id
                ),
            };
        }
        if !view.alternative_start_codon {
            Assessment {
                triggered: true,
                strength: Strength::Moderate,
                tag: RuleTag::Protein,
                rationale: format!(
                    "no alternative start codon detected in transcript {}",
                    view.transcript_id
                ),
            }
        } else if view.truncated_region_disease_relevant {
            Assessment {
                triggered: true,
                strength: Strength::Moderate,
                tag: RuleTag::Protein,
                rationale: format!(
                    "alternative start codon in {} excludes a disease relevant protein region",
                    view.transcript_id
                ),
            }
        } else {
            Assessment {
                triggered: true,
                strength: Strength::Supporting,
                tag: RuleTag::Protein,
                rationale: format!(
                    "alternative start codon observed in {}; no pathogenic variant between the start codons",
                    view.transcript_id
                ),
            }
        }
    }
}

/// Keep the strongest triggered per-transcript result; when nothing
/// triggered, report all rationales.
fn summarise(assessed: Vec<Assessment>) -> Outcome {
    let best = assessed
        .iter()
        .filter(|a| a.triggered)
        .max_by_key(|a| a.strength);
    match best {
        Some(a) => Outcome::triggered(Criterion::Pvs1, a.tag, a.strength, a.rationale.clone()),
        None => {
            let rationale = assessed
                .iter()
                .map(|a| a.rationale.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            Outcome::not_triggered(Criterion::Pvs1, rationale)
        }
    }
}
