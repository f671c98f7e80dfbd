//! Evidence aggregation: points table, stand-alone override, band mapping.
//!
//! The point values and band boundaries encode a published Bayesian
//! framework; they are fixed, tested constants, not derived at runtime.
//! Aggregation is deterministic and order-independent (summation is
//! commutative) and never mutates its input evidence set.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::multifactorial::Posterior;
use crate::rules::{Criterion, Direction, Evidence, Outcome, Strength};

/// Final clinical significance category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Pathogenic")]
    Pathogenic,
    #[serde(rename = "Likely pathogenic")]
    LikelyPathogenic,
    #[serde(rename = "Uncertain significance")]
    Uncertain,
    #[serde(rename = "Likely benign")]
    LikelyBenign,
    #[serde(rename = "Benign")]
    Benign,
}

impl Classification {
    /// The category label as reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Pathogenic => "Pathogenic",
            Classification::LikelyPathogenic => "Likely pathogenic",
            Classification::Uncertain => "Uncertain significance",
            Classification::LikelyBenign => "Likely benign",
            Classification::Benign => "Benign",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signed point value of one evidence item.
///
/// Stand-alone and very-strong are 8 points, strong 4, moderate 2,
/// supporting 1; benign evidence is negative.
pub fn points_for(direction: Direction, strength: Strength) -> i32 {
    let magnitude = match strength {
        Strength::StandAlone | Strength::VeryStrong => 8,
        Strength::Strong => 4,
        Strength::Moderate => 2,
        Strength::Supporting => 1,
    };
    match direction {
        Direction::Pathogenic => magnitude,
        Direction::Benign => -magnitude,
    }
}

/// Map a point total to its category band.
///
/// Band boundaries are exact: 10 is Pathogenic, 9 and 6 Likely pathogenic,
/// 5 and 0 Uncertain, -1 and -6 Likely benign, -7 Benign.
pub fn classify_points(total: i32) -> Classification {
    match total {
        t if t >= 10 => Classification::Pathogenic,
        6..=9 => Classification::LikelyPathogenic,
        0..=5 => Classification::Uncertain,
        -6..=-1 => Classification::LikelyBenign,
        _ => Classification::Benign,
    }
}

/// A criterion whose evaluation failed; the remaining evidence set is still
/// aggregated and reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionFailure {
    /// Criterion that failed.
    pub criterion: Criterion,
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

/// A criterion that ran but produced no evidence, kept for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionNote {
    /// Criterion the note belongs to.
    pub criterion: Criterion,
    /// Whether the criterion was evaluated and unmet, or not applicable.
    pub applicable: bool,
    /// Evaluator rationale.
    pub detail: String,
}

/// The full, reproducible result of classifying one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Variant display label.
    pub variant: String,
    /// Gene symbol the configuration was resolved against.
    pub gene: String,
    /// Triggered evidence, ordered by criterion code.
    pub evidence: Vec<Evidence>,
    /// Criteria that ran without producing evidence.
    pub notes: Vec<CriterionNote>,
    /// Criteria whose evaluation failed.
    pub failures: Vec<CriterionFailure>,
    /// Aggregate point total (computed even when an override applies).
    pub points: i32,
    /// Stand-alone criterion that short-circuited aggregation, if any.
    pub standalone: Option<Criterion>,
    /// Final category.
    pub classification: Classification,
    /// Multifactorial posterior, when the quantitative path ran.
    pub posterior: Option<Posterior>,
}

impl ClassificationResult {
    /// Serialize the result to a JSON document.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Combine an evidence set into a point total and category.
///
/// The stand-alone override applies first: any stand-alone evidence decides
/// the category immediately (Benign for benign stand-alone, Pathogenic for
/// pathogenic stand-alone). The point total is computed regardless so the
/// result remains auditable.
pub fn aggregate(evidence: &[Evidence]) -> (i32, Option<Criterion>, Classification) {
    let points: i32 = evidence
        .iter()
        .map(|e| points_for(e.direction, e.strength))
        .sum();

    // Benign stand-alone takes precedence over pathogenic stand-alone, and
    // ties break on criterion code, so the pick is order-independent.
    let standalone = evidence
        .iter()
        .filter(|e| e.strength == Strength::StandAlone)
        .min_by_key(|e| (e.direction == Direction::Pathogenic, e.criterion))
        .map(|e| (e.criterion, e.direction));

    let classification = match standalone {
        Some((_, Direction::Benign)) => Classification::Benign,
        Some((_, Direction::Pathogenic)) => Classification::Pathogenic,
        None => classify_points(points),
    };

    (points, standalone.map(|(c, _)| c), classification)
}

/// Assemble a [`ClassificationResult`] from per-criterion outcomes and
/// failures. Evidence is reported in criterion order regardless of
/// evaluation order.
pub fn build_result(
    variant_label: String,
    gene: String,
    outcomes: Vec<Outcome>,
    failures: Vec<CriterionFailure>,
    posterior: Option<Posterior>,
) -> ClassificationResult {
    let mut evidence = Vec::new();
    let mut notes = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Triggered(e) => evidence.push(e),
            Outcome::NotTriggered { criterion, rationale } => notes.push(CriterionNote {
                criterion,
                applicable: true,
                detail: rationale,
            }),
            Outcome::NotApplicable { criterion, reason } => notes.push(CriterionNote {
                criterion,
                applicable: false,
                detail: reason,
            }),
        }
    }
    evidence.sort_by_key(|e| e.criterion);
    notes.sort_by_key(|n| n.criterion);

    let (points, standalone, classification) = aggregate(&evidence);

    ClassificationResult {
        variant: variant_label,
        gene,
        evidence,
        notes,
        failures,
        points,
        standalone,
        classification,
        posterior,
    }
}
