//! Evidence model and the rule evaluator families.
//!
//! Each criterion family lives in its own submodule and exposes a pure
//! evaluator: `(Variant, AnnotationBundle, CriterionPlan) -> Outcome`.
//! Evaluators never mutate their inputs; a triggered evaluation produces
//! exactly one [`Evidence`] item.

pub mod bp7;
pub mod frequency;
pub mod functional;
pub mod insilico;
pub mod pm1;
pub mod pm5;
pub mod protein_impact;
pub mod ps1;
pub mod pvs1;
pub mod segregation;
pub mod thresholds;

use serde::{Deserialize, Serialize};

use crate::config::CriterionPlan;
use crate::error::AcmgError;
use crate::Result;

/// ACMG/AMP criterion code. Declaration order is the canonical reporting
/// order (pathogenic criteria by strength, then benign).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Criterion {
    Pvs1,
    Ps1,
    Ps3,
    Pm1,
    Pm2,
    Pm4,
    Pm5,
    Pp1,
    Pp2,
    Pp3,
    Ba1,
    Bs1,
    Bs2,
    Bs3,
    Bs4,
    Bp3,
    Bp4,
    Bp7,
}

impl Criterion {
    /// All criterion families known to the engine.
    pub const ALL: [Criterion; 18] = [
        Criterion::Pvs1,
        Criterion::Ps1,
        Criterion::Ps3,
        Criterion::Pm1,
        Criterion::Pm2,
        Criterion::Pm4,
        Criterion::Pm5,
        Criterion::Pp1,
        Criterion::Pp2,
        Criterion::Pp3,
        Criterion::Ba1,
        Criterion::Bs1,
        Criterion::Bs2,
        Criterion::Bs3,
        Criterion::Bs4,
        Criterion::Bp3,
        Criterion::Bp4,
        Criterion::Bp7,
    ];

    /// The criterion code as published (e.g. `PVS1`).
    pub fn code(&self) -> &'static str {
        match self {
            Criterion::Pvs1 => "PVS1",
            Criterion::Ps1 => "PS1",
            Criterion::Ps3 => "PS3",
            Criterion::Pm1 => "PM1",
            Criterion::Pm2 => "PM2",
            Criterion::Pm4 => "PM4",
            Criterion::Pm5 => "PM5",
            Criterion::Pp1 => "PP1",
            Criterion::Pp2 => "PP2",
            Criterion::Pp3 => "PP3",
            Criterion::Ba1 => "BA1",
            Criterion::Bs1 => "BS1",
            Criterion::Bs2 => "BS2",
            Criterion::Bs3 => "BS3",
            Criterion::Bs4 => "BS4",
            Criterion::Bp3 => "BP3",
            Criterion::Bp4 => "BP4",
            Criterion::Bp7 => "BP7",
        }
    }

    /// Parse a criterion code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Criterion> {
        Criterion::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Evidence direction this criterion argues for.
    pub fn direction(&self) -> Direction {
        match self {
            Criterion::Pvs1
            | Criterion::Ps1
            | Criterion::Ps3
            | Criterion::Pm1
            | Criterion::Pm2
            | Criterion::Pm4
            | Criterion::Pm5
            | Criterion::Pp1
            | Criterion::Pp2
            | Criterion::Pp3 => Direction::Pathogenic,
            Criterion::Ba1
            | Criterion::Bs1
            | Criterion::Bs2
            | Criterion::Bs3
            | Criterion::Bs4
            | Criterion::Bp3
            | Criterion::Bp4
            | Criterion::Bp7 => Direction::Benign,
        }
    }

    /// Default evidence strength assigned by the published framework.
    pub fn default_strength(&self) -> Strength {
        match self {
            Criterion::Pvs1 => Strength::VeryStrong,
            Criterion::Ps1 | Criterion::Ps3 => Strength::Strong,
            Criterion::Pm1
            | Criterion::Pm2
            | Criterion::Pm4
            | Criterion::Pm5 => Strength::Moderate,
            Criterion::Pp1 | Criterion::Pp2 | Criterion::Pp3 => Strength::Supporting,
            Criterion::Ba1 => Strength::StandAlone,
            Criterion::Bs1 | Criterion::Bs2 | Criterion::Bs3 | Criterion::Bs4 => Strength::Strong,
            Criterion::Bp3 | Criterion::Bp4 | Criterion::Bp7 => Strength::Supporting,
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Direction of a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Pathogenic,
    Benign,
}

impl Direction {
    /// Human-readable direction label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Pathogenic => "pathogenic",
            Direction::Benign => "benign",
        }
    }
}

/// Graded confidence of a triggered criterion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Supporting,
    Moderate,
    Strong,
    VeryStrong,
    StandAlone,
}

impl Strength {
    /// Strength label as published.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::StandAlone => "stand_alone",
            Strength::VeryStrong => "very_strong",
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Supporting => "supporting",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evidence layer a result was derived on. Several criteria evaluate both a
/// protein-level and a splicing-level path; the tag records which one fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTag {
    General,
    Protein,
    Splicing,
}

/// One triggered evidence item. Created by exactly one evaluator invocation;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Criterion that triggered.
    pub criterion: Criterion,
    /// Evidence layer the result was derived on.
    pub tag: RuleTag,
    /// Direction of the evidence.
    pub direction: Direction,
    /// Strength level assigned by the evaluator.
    pub strength: Strength,
    /// Which thresholds/values triggered it, for auditability.
    pub rationale: String,
}

/// Outcome of one evaluator invocation.
///
/// `NotTriggered` records a criterion that was evaluated against real data
/// and did not meet its condition; `NotApplicable` records a criterion whose
/// preconditions (consequence type, available annotations) were not met.
/// Both are normal, silent outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Triggered(Evidence),
    NotTriggered { criterion: Criterion, rationale: String },
    NotApplicable { criterion: Criterion, reason: String },
}

impl Outcome {
    /// Build a triggered outcome with the criterion's direction.
    pub fn triggered(
        criterion: Criterion,
        tag: RuleTag,
        strength: Strength,
        rationale: impl Into<String>,
    ) -> Outcome {
        Outcome::Triggered(Evidence {
            criterion,
            tag,
            direction: criterion.direction(),
            strength,
            rationale: rationale.into(),
        })
    }

    /// Build a not-triggered outcome.
    pub fn not_triggered(criterion: Criterion, rationale: impl Into<String>) -> Outcome {
        Outcome::NotTriggered {
            criterion,
            rationale: rationale.into(),
        }
    }

    /// Build a not-applicable outcome.
    pub fn not_applicable(criterion: Criterion, reason: impl Into<String>) -> Outcome {
        Outcome::NotApplicable {
            criterion,
            reason: reason.into(),
        }
    }

    /// The criterion this outcome belongs to.
    pub fn criterion(&self) -> Criterion {
        match self {
            Outcome::Triggered(e) => e.criterion,
            Outcome::NotTriggered { criterion, .. } => *criterion,
            Outcome::NotApplicable { criterion, .. } => *criterion,
        }
    }

    /// The evidence item, if the criterion triggered.
    pub fn evidence(&self) -> Option<&Evidence> {
        match self {
            Outcome::Triggered(e) => Some(e),
            _ => None,
        }
    }
}

/// Missing-annotation policy shared by all evaluators: NotApplicable by
/// default, a `MissingAnnotation` error when the criterion's plan requires
/// the field.
pub(crate) fn missing_field(
    criterion: Criterion,
    field: &str,
    plan: &CriterionPlan,
) -> Result<Outcome> {
    if plan.require_annotation {
        Err(AcmgError::MissingAnnotation {
            criterion: criterion.code().to_string(),
            field: field.to_string(),
        })
    } else {
        Ok(Outcome::not_applicable(
            criterion,
            format!("no {field} annotation available"),
        ))
    }
}
