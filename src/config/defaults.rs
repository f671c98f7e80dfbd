//! Published default thresholds.
//!
//! These are the baseline values from the ACMG/AMP framework and the ClinGen
//! calibration papers; gene-specific documents override them through
//! [`crate::config::RuleConfiguration`].

use once_cell::sync::Lazy;

use crate::rules::thresholds::{CutoffDirection, Threshold};
use crate::rules::Strength;

/// BA1: popmax allele frequency above which a variant is stand-alone benign.
pub const BA1_FREQUENCY: f64 = 0.05;

/// BS1: popmax allele frequency above the maximum credible for the disease.
pub const BS1_FREQUENCY: f64 = 0.01;

/// PM2: popmax allele frequency at or below which a variant counts as
/// absent from controls.
pub const PM2_FREQUENCY: f64 = 1e-5;

/// BS2: observations in healthy individuals for strong benign evidence.
pub const BS2_COUNT: u64 = 10;

/// BS2 two-tier variant: observations for supporting benign evidence.
pub const BS2_SUPPORTING_COUNT: u64 = 5;

/// BA1/BS1 absolute modes: popmax allele count standing in for frequency.
pub const ABSOLUTE_ALLELE_COUNT: u64 = 10;

/// PM1 defined-regions variant: somatic hotspot recurrence count.
pub const PM1_SOMATIC_COUNT: u64 = 10;

/// PVS1: protein-length-change fraction separating strong from moderate for
/// truncations escaping NMD.
pub const PVS1_LENGTH_CHANGE: f64 = 0.1;

/// Missense pathogenicity predictor (REVEL), supporting at the published
/// single cutoff.
pub fn missense_pathogenic() -> &'static Threshold {
    static T: Lazy<Threshold> = Lazy::new(|| {
        Threshold::single(
            "revel",
            CutoffDirection::GreaterOrEqual,
            0.7,
            Strength::Supporting,
        )
    });
    &T
}

/// Missense benign predictor (REVEL), supporting below the published cutoff.
pub fn missense_benign() -> &'static Threshold {
    static T: Lazy<Threshold> = Lazy::new(|| {
        Threshold::single(
            "revel",
            CutoffDirection::LessOrEqual,
            0.25,
            Strength::Supporting,
        )
    });
    &T
}

/// Splicing predictor (SpliceAI), pathogenic direction.
pub fn splicing_pathogenic() -> &'static Threshold {
    static T: Lazy<Threshold> = Lazy::new(|| {
        Threshold::single(
            "spliceai",
            CutoffDirection::GreaterOrEqual,
            0.2,
            Strength::Supporting,
        )
    });
    &T
}

/// Splicing predictor (SpliceAI), benign direction (no predicted effect).
pub fn splicing_benign() -> &'static Threshold {
    static T: Lazy<Threshold> =
        Lazy::new(|| Threshold::single("spliceai", CutoffDirection::Less, 0.1, Strength::Supporting));
    &T
}

/// Co-segregation likelihood bands, pathogenic direction.
pub fn segregation_pathogenic() -> &'static Threshold {
    static T: Lazy<Threshold> = Lazy::new(|| {
        Threshold::banded(
            "cosegregation",
            CutoffDirection::GreaterOrEqual,
            vec![
                (2.08, Strength::Supporting),
                (4.33, Strength::Moderate),
                (18.7, Strength::Strong),
                (350.0, Strength::VeryStrong),
            ],
        )
    });
    &T
}

/// Co-segregation likelihood bands, benign direction.
pub fn segregation_benign() -> &'static Threshold {
    static T: Lazy<Threshold> = Lazy::new(|| {
        Threshold::banded(
            "cosegregation",
            CutoffDirection::LessOrEqual,
            vec![
                (0.48, Strength::Supporting),
                (0.23, Strength::Moderate),
                (0.053, Strength::Strong),
            ],
        )
    });
    &T
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_constants() {
        assert!(BA1_FREQUENCY > BS1_FREQUENCY);
        assert!(BS1_FREQUENCY > PM2_FREQUENCY);
    }

    #[test]
    fn test_segregation_bands_are_parallel() {
        let t = segregation_pathogenic();
        assert_eq!(t.cutoffs.len(), t.strengths.len());
        assert_eq!(t.strength_for(5.0), Some(Strength::Moderate));
        assert_eq!(t.strength_for(400.0), Some(Strength::VeryStrong));

        let t = segregation_benign();
        assert_eq!(t.cutoffs.len(), t.strengths.len());
        assert_eq!(t.strength_for(0.3), Some(Strength::Supporting));
        assert_eq!(t.strength_for(0.01), Some(Strength::Strong));
    }

    #[test]
    fn test_splicing_defaults_do_not_overlap() {
        assert!(splicing_benign().first_cutoff() < splicing_pathogenic().first_cutoff());
    }
}
