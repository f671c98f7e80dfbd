//! Ordered numeric thresholds with strength bands.
//!
//! A [`Threshold`] carries one or more cutoffs for a named score, ordered
//! from least to most extreme, each paired with the evidence strength it
//! unlocks. Single-cutoff criteria use a one-element threshold.

use serde::{Deserialize, Serialize};

use crate::rules::Strength;

/// Comparison direction for a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffDirection {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl CutoffDirection {
    /// Whether `value` satisfies `cutoff` under this direction.
    pub fn met(&self, value: f64, cutoff: f64) -> bool {
        match self {
            CutoffDirection::Greater => value > cutoff,
            CutoffDirection::GreaterOrEqual => value >= cutoff,
            CutoffDirection::Less => value < cutoff,
            CutoffDirection::LessOrEqual => value <= cutoff,
        }
    }
}

/// Ordered cutoffs for one named score, with the strengths they unlock.
///
/// `cutoffs[i]` met implies `cutoffs[..i]` met (callers supply them ordered
/// from least to most extreme); the strength of a result is
/// `strengths[met - 1]` where `met` is the number of cutoffs satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Score name this threshold applies to (key into the prediction map).
    pub score: String,
    /// Comparison direction.
    pub direction: CutoffDirection,
    /// Cutoff values, least to most extreme.
    pub cutoffs: Vec<f64>,
    /// Strength unlocked by each cutoff, parallel to `cutoffs`.
    pub strengths: Vec<Strength>,
}

impl Threshold {
    /// Single-cutoff threshold.
    pub fn single(
        score: impl Into<String>,
        direction: CutoffDirection,
        cutoff: f64,
        strength: Strength,
    ) -> Threshold {
        Threshold {
            score: score.into(),
            direction,
            cutoffs: vec![cutoff],
            strengths: vec![strength],
        }
    }

    /// Banded threshold; `cutoffs` and `strengths` must be parallel.
    pub fn banded(
        score: impl Into<String>,
        direction: CutoffDirection,
        bands: Vec<(f64, Strength)>,
    ) -> Threshold {
        let (cutoffs, strengths) = bands.into_iter().unzip();
        Threshold {
            score: score.into(),
            direction,
            cutoffs,
            strengths,
        }
    }

    /// Number of cutoffs satisfied by `value`.
    pub fn met_count(&self, value: f64) -> usize {
        self.cutoffs
            .iter()
            .filter(|cutoff| self.direction.met(value, **cutoff))
            .count()
    }

    /// Strength unlocked by `value`, or `None` when no cutoff is met.
    pub fn strength_for(&self, value: f64) -> Option<Strength> {
        match self.met_count(value) {
            0 => None,
            met => self.strengths.get(met - 1).copied(),
        }
    }

    /// Whether `value` meets at least the first cutoff.
    pub fn is_met(&self, value: f64) -> bool {
        self.met_count(value) > 0
    }

    /// The least extreme cutoff, used in rationales.
    pub fn first_cutoff(&self) -> f64 {
        self.cutoffs.first().copied().unwrap_or(f64::NAN)
    }
}
