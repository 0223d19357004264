use thiserror::Error;

/// Failure of a single alignment computation.
///
/// Every variant is local to one (reference, uncorrected, corrected) triple.
/// A batch caller can drop the failed triple and keep processing the rest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// The DP matrix did not fit in memory. Inputs should be length-filtered
    /// upstream; there is no point retrying.
    #[error("could not allocate a {rows} x {columns} DP matrix")]
    Allocation { rows: usize, columns: usize },
    /// Backtracking found no admissible move matching the stored cost. This
    /// means the forward and backward recurrences disagree and the alignment
    /// must be discarded, not patched up.
    #[error("no admissible move matches the stored cost at cell ({row}, {column})")]
    RecurrenceViolation { row: usize, column: usize },
    /// A character outside the expected alphabet.
    #[error("illegal base {base:?} at position {position}")]
    IllegalBase { base: char, position: usize },
    /// The reference and uncorrected tracks arrive as an aligned pair and
    /// must have the same length.
    #[error("reference/uncorrected pair length mismatch ({reference} vs {uncorrected})")]
    PairLengthMismatch { reference: usize, uncorrected: usize },
    /// The caller raised the cancellation flag during the matrix fill.
    #[error("alignment cancelled")]
    Cancelled,
}
