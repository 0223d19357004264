//! Constrained three-way alignment between a reference sequence, an
//! uncorrected long read, and the corrected read produced from it, for
//! benchmarking long-read error-correction tools.
//!
//! Case on the corrected read is the contract: lowercase bases were left
//! untouched by the corrector and must stay synchronized with the
//! uncorrected read, uppercase bases were rewritten and are aligned
//! against the reference like an ordinary edit script. The aligner
//! classifies every corrected position accordingly and returns three
//! equal-length gapped tracks plus the minimum edit cost; see
//! [`aligner`] for the recurrence and [`stats`] for the per-segment
//! error counts computed from the result.
pub mod aligner;
pub mod cost;
pub mod error;
pub mod fasta;
pub mod gen_seq;
pub mod matrix;
pub mod stats;

pub use aligner::{align_cancellable, AlignConfig, Alignment, Op, Variant};
pub use error::AlignError;

use rayon::prelude::*;

/// Align a whole corrected read against its uncorrected read and the
/// reference, with default tunables.
pub fn align(
    reference: &[u8],
    uncorrected: &[u8],
    corrected: &[u8],
) -> Result<Alignment, AlignError> {
    aligner::align(
        reference,
        uncorrected,
        corrected,
        Variant::Untrimmed,
        &AlignConfig::default(),
    )
}

/// Align a fragment-split corrected read (space-delimited) against the
/// reference, trimming each fragment's final base for free.
pub fn align_trimmed(
    reference: &[u8],
    uncorrected: &[u8],
    corrected: &[u8],
) -> Result<Alignment, AlignError> {
    aligner::align(
        reference,
        uncorrected,
        corrected,
        Variant::Trimmed,
        &AlignConfig::default(),
    )
}

/// Align many triples in parallel. Each triple owns its own matrix, so the
/// only coupling is the thread pool; failures stay with their triple.
pub fn align_batch<T: std::borrow::Borrow<[u8]> + Sync>(
    triples: &[(T, T, T)],
    variant: Variant,
    config: &AlignConfig,
) -> Vec<Result<Alignment, AlignError>> {
    triples
        .par_iter()
        .map(|(reference, uncorrected, corrected)| {
            aligner::align(
                reference.borrow(),
                uncorrected.borrow(),
                corrected.borrow(),
                variant,
                config,
            )
        })
        .collect()
}
