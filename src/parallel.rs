//! Parallel classification support.
//!
//! Classifying a batch of variants is embarrassingly parallel: evaluators
//! are pure, and the registry and configuration are immutable for the
//! duration of a run. Enable with the `parallel` feature.

use rayon::prelude::*;

use crate::aggregate::ClassificationResult;
use crate::annotation::AnnotationBundle;
use crate::classify::Classifier;
use crate::variant::Variant;

/// Classify multiple variants in parallel.
///
/// Returns one result per input pair. Order is preserved.
pub fn classify_parallel(
    classifier: &Classifier,
    items: &[(Variant, AnnotationBundle)],
) -> Vec<ClassificationResult> {
    items
        .par_iter()
        .map(|(variant, bundle)| classifier.classify(variant, bundle))
        .collect()
}
