//! ferro-acmg: ACMG/AMP variant classification engine
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Classifies germline variants in hereditary-cancer genes under the
//! ACMG/AMP evidence framework: a resolved rule configuration selects one
//! evaluator per criterion (with gene-specific variants), the evaluators run
//! independently over a variant's annotation bundle, and the triggered
//! evidence is combined into a final category by a points-based aggregation
//! with stand-alone override semantics. A multifactorial likelihood path
//! supplements the discrete criteria when independent quantitative evidence
//! is available.
//!
//! # Example
//!
//! ```
//! use ferro_acmg::{AnnotationBundle, Classifier, RuleConfiguration, Variant};
//! use ferro_acmg::annotation::PopulationRecord;
//! use ferro_acmg::variant::Consequence;
//!
//! let classifier = Classifier::new(RuleConfiguration::default_acmg()).unwrap();
//!
//! let variant = Variant {
//!     chrom: "17".to_string(),
//!     start: 43_045_711,
//!     end: 43_045_711,
//!     reference: "C".to_string(),
//!     alternate: "T".to_string(),
//!     gene: "BRCA1".to_string(),
//!     transcript: Some("NM_007294.4".to_string()),
//!     consequences: vec![Consequence::MissenseVariant],
//!     hgvs_c: None,
//!     hgvs_p: None,
//!     exon: Some(10),
//!     intron: None,
//! };
//! let bundle = AnnotationBundle {
//!     population: Some(PopulationRecord {
//!         popmax_frequency: Some(0.08),
//!         ..PopulationRecord::default()
//!     }),
//!     ..AnnotationBundle::default()
//! };
//!
//! let result = classifier.classify(&variant, &bundle);
//! assert_eq!(result.classification.as_str(), "Benign");
//! ```

pub mod aggregate;
pub mod annotation;
pub mod classify;
pub mod config;
pub mod error;
pub mod multifactorial;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod registry;
pub mod rules;
pub mod variant;

// Re-export commonly used types
pub use aggregate::{Classification, ClassificationResult};
pub use annotation::AnnotationBundle;
pub use classify::Classifier;
pub use config::{CriterionPlan, RuleConfiguration};
pub use error::AcmgError;
pub use multifactorial::{combine, LikelihoodRatio, LikelihoodSource, Posterior};
pub use registry::{Evaluator, RuleRegistry};
pub use rules::{Criterion, Direction, Evidence, Outcome, Strength};
pub use variant::Variant;

/// Result type alias for ferro-acmg operations
pub type Result<T> = std::result::Result<T, AcmgError>;
