//! Variant record and consequence vocabulary.
//!
//! A [`Variant`] is the normalized, immutable product of the external
//! annotation pipeline: genomic coordinates, gene, transcript, consequence
//! types and HGVS notations. It carries no evidence by itself; all scientific
//! attributes live in the [`crate::annotation::AnnotationBundle`].

use serde::{Deserialize, Serialize};

/// Sequence Ontology consequence term, restricted to the terms the rule
/// engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    /// Introduces a premature stop codon.
    StopGained,
    /// Insertion/deletion causing frameshift.
    FrameshiftVariant,
    /// Within 2bp of splice acceptor site (AG).
    SpliceAcceptorVariant,
    /// Within 2bp of splice donor site (GT).
    SpliceDonorVariant,
    /// Within the extended splice region (3-8bp).
    SpliceRegionVariant,
    /// Deletion of one or more complete exons.
    ExonLossVariant,
    /// Amino acid substitution.
    MissenseVariant,
    /// In-frame insertion of amino acids.
    InframeInsertion,
    /// In-frame deletion of amino acids.
    InframeDeletion,
    /// Stop codon changed to amino acid.
    StopLost,
    /// Start codon changed.
    StartLost,
    /// Silent change (codon change, same amino acid).
    SynonymousVariant,
    /// Variant in intron, outside splice regions.
    IntronVariant,
    /// Variant in 5' UTR.
    FivePrimeUtrVariant,
    /// Variant in 3' UTR.
    ThreePrimeUtrVariant,
}

impl Consequence {
    /// Get the Sequence Ontology term.
    pub fn so_term(&self) -> &'static str {
        match self {
            Consequence::StopGained => "stop_gained",
            Consequence::FrameshiftVariant => "frameshift_variant",
            Consequence::SpliceAcceptorVariant => "splice_acceptor_variant",
            Consequence::SpliceDonorVariant => "splice_donor_variant",
            Consequence::SpliceRegionVariant => "splice_region_variant",
            Consequence::ExonLossVariant => "exon_loss_variant",
            Consequence::MissenseVariant => "missense_variant",
            Consequence::InframeInsertion => "inframe_insertion",
            Consequence::InframeDeletion => "inframe_deletion",
            Consequence::StopLost => "stop_lost",
            Consequence::StartLost => "start_lost",
            Consequence::SynonymousVariant => "synonymous_variant",
            Consequence::IntronVariant => "intron_variant",
            Consequence::FivePrimeUtrVariant => "5_prime_UTR_variant",
            Consequence::ThreePrimeUtrVariant => "3_prime_UTR_variant",
        }
    }

    /// Whether this consequence is predicted to truncate or abolish the
    /// transcript product (the PVS1 candidate set).
    pub fn is_loss_of_function(&self) -> bool {
        matches!(
            self,
            Consequence::StopGained
                | Consequence::FrameshiftVariant
                | Consequence::SpliceAcceptorVariant
                | Consequence::SpliceDonorVariant
                | Consequence::ExonLossVariant
                | Consequence::StartLost
        )
    }

    /// Whether this consequence disrupts a canonical (+/- 1-2) splice site.
    pub fn is_canonical_splice(&self) -> bool {
        matches!(
            self,
            Consequence::SpliceAcceptorVariant | Consequence::SpliceDonorVariant
        )
    }

    /// Whether this consequence is an in-frame insertion or deletion.
    pub fn is_inframe_indel(&self) -> bool {
        matches!(
            self,
            Consequence::InframeInsertion | Consequence::InframeDeletion
        )
    }

    /// Whether this consequence changes protein length without shifting the
    /// reading frame (the PM4 candidate set).
    pub fn changes_protein_length(&self) -> bool {
        self.is_inframe_indel() || matches!(self, Consequence::StopLost)
    }
}

impl std::fmt::Display for Consequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.so_term())
    }
}

/// A normalized variant record.
///
/// Immutable once constructed; created by the external annotation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Chromosome name (without "chr" prefix).
    pub chrom: String,
    /// 1-based genomic start position.
    pub start: u64,
    /// 1-based genomic end position (inclusive).
    pub end: u64,
    /// Reference allele.
    pub reference: String,
    /// Alternate allele.
    pub alternate: String,
    /// HGNC gene symbol, uppercase.
    pub gene: String,
    /// Primary transcript accession, if resolved.
    pub transcript: Option<String>,
    /// Consequence types on the primary transcript. A variant can carry more
    /// than one (e.g. missense + splice region).
    pub consequences: Vec<Consequence>,
    /// HGVS coding notation (c.), if available.
    pub hgvs_c: Option<String>,
    /// HGVS protein notation (p.), if available.
    pub hgvs_p: Option<String>,
    /// 1-based exon index on the primary transcript.
    pub exon: Option<u32>,
    /// 1-based intron index on the primary transcript.
    pub intron: Option<u32>,
}

impl Variant {
    /// Compact display label, e.g. `17:43045711-43045711C>T`.
    pub fn label(&self) -> String {
        format!(
            "{}:{}-{}{}>{}",
            self.chrom, self.start, self.end, self.reference, self.alternate
        )
    }

    /// Whether any consequence matches the given predicate.
    pub fn any_consequence(&self, pred: impl Fn(&Consequence) -> bool) -> bool {
        self.consequences.iter().any(|c| pred(c))
    }

    /// Whether the variant carries the given consequence.
    pub fn has_consequence(&self, consequence: Consequence) -> bool {
        self.consequences.contains(&consequence)
    }

    /// Whether reference/alternate alleles describe an insertion or deletion.
    pub fn is_indel(&self) -> bool {
        self.reference.len() != self.alternate.len()
    }

    /// Comma-joined SO terms, used in applicability messages.
    pub fn consequence_terms(&self) -> String {
        self.consequences
            .iter()
            .map(|c| c.so_term())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
