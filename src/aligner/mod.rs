//! Constrained three-way alignment of a reference, an uncorrected long
//! read, and the corrected read produced from it.
//!
//! The reference and uncorrected tracks arrive as an already-aligned pair
//! (equal length, `-` allowed) and always advance together; the DP decides
//! only how the gap-free corrected read is threaded through them. Case on
//! the corrected read drives the recurrence: lowercase runs were left
//! untouched by the corrector and must stay synchronized with the
//! uncorrected read, uppercase bases are aligned like an ordinary edit
//! script against the reference.
mod engine;

use crate::cost::{self, GAP};
use crate::error::AlignError;
use engine::Engine;
use std::sync::atomic::AtomicBool;

/// Fragment delimiter inside a raw corrected read. Stripped before any
/// index is computed.
pub const DELIMITER: u8 = b' ';

/// Which structural rules the engine applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Whole corrected read against the uncorrected read. Lowercase runs
    /// must match the uncorrected track base for base.
    Untrimmed,
    /// Corrected read pre-split into fragments against the reference. The
    /// final base of every fragment may be deleted against any remaining
    /// reference at zero cost.
    Trimmed,
}

/// Edit operation on the corrected read against the comparison track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Consume one column of the reference/uncorrected pair, gap on the
    /// corrected track.
    Del,
    /// Consume one corrected base, gap on the other two tracks.
    Ins,
    /// Consume both.
    Mat,
}

/// Tunables for one alignment computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignConfig {
    pub mismatch_penalty: u32,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            mismatch_penalty: cost::MISMATCH_PENALTY,
        }
    }
}

/// A finished three-way alignment: three equal-length gapped tracks, the
/// minimum accumulated cost, and the per-column decision trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// The bottom-right matrix cell.
    pub dist: u32,
    /// One operation per aligned column, left to right.
    pub ops: Vec<Op>,
    pub reference: Vec<u8>,
    pub uncorrected: Vec<u8>,
    pub corrected: Vec<u8>,
}

impl Alignment {
    /// The compact two-track view: every column where both the corrected
    /// and reference tracks are gaps is dropped. Idempotent.
    pub fn compact(&self) -> (Vec<u8>, Vec<u8>) {
        compact_pair(&self.corrected, &self.reference)
    }
}

/// Drop the columns where both tracks are gap markers; such columns exist
/// only to keep the uncorrected track synchronized. Order and content of
/// the retained characters are untouched.
pub fn compact_pair(corrected: &[u8], reference: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut cr = Vec::with_capacity(corrected.len());
    let mut rf = Vec::with_capacity(reference.len());
    for (&c, &r) in corrected.iter().zip(reference.iter()) {
        if c != GAP || r != GAP {
            cr.push(c);
            rf.push(r);
        }
    }
    (cr, rf)
}

/// Expand an op sequence into the three gapped tracks.
pub fn recover(
    reference: &[u8],
    uncorrected: &[u8],
    corrected: &[u8],
    ops: &[Op],
) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let (mut i, mut j) = (0, 0);
    let (mut rf, mut ur, mut cr) = (vec![], vec![], vec![]);
    for &op in ops {
        match op {
            Op::Del => {
                rf.push(reference[j]);
                ur.push(uncorrected[j]);
                cr.push(GAP);
                j += 1;
            }
            Op::Ins => {
                rf.push(GAP);
                ur.push(GAP);
                cr.push(corrected[i]);
                i += 1;
            }
            Op::Mat => {
                rf.push(reference[j]);
                ur.push(uncorrected[j]);
                cr.push(corrected[i]);
                i += 1;
                j += 1;
            }
        }
    }
    assert_eq!(i, corrected.len());
    assert_eq!(j, reference.len());
    (rf, ur, cr)
}

/// Remove fragment delimiters from a raw corrected read and record the
/// index of every fragment's final base in the stripped sequence.
fn strip_delimiter(raw: &[u8]) -> (Vec<u8>, Vec<usize>) {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut boundaries = vec![];
    for fragment in raw.split(|&x| x == DELIMITER).filter(|f| !f.is_empty()) {
        cleaned.extend_from_slice(fragment);
        boundaries.push(cleaned.len() - 1);
    }
    (cleaned, boundaries)
}

/// Align one triple. See [`align_cancellable`] for the cancellable form.
pub fn align(
    reference: &[u8],
    uncorrected: &[u8],
    corrected: &[u8],
    variant: Variant,
    config: &AlignConfig,
) -> Result<Alignment, AlignError> {
    run(reference, uncorrected, corrected, variant, config, None)
}

/// Align one triple, polling `cancel` once per matrix row. A raised flag
/// yields [`AlignError::Cancelled`]; useful for very long reads, where the
/// fill is the only multi-second phase.
pub fn align_cancellable(
    reference: &[u8],
    uncorrected: &[u8],
    corrected: &[u8],
    variant: Variant,
    config: &AlignConfig,
    cancel: &AtomicBool,
) -> Result<Alignment, AlignError> {
    run(reference, uncorrected, corrected, variant, config, Some(cancel))
}

fn run(
    reference: &[u8],
    uncorrected: &[u8],
    corrected_raw: &[u8],
    variant: Variant,
    config: &AlignConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Alignment, AlignError> {
    cost::check_track(reference)?;
    cost::check_track(uncorrected)?;
    if reference.len() != uncorrected.len() {
        return Err(AlignError::PairLengthMismatch {
            reference: reference.len(),
            uncorrected: uncorrected.len(),
        });
    }
    let (corrected, boundaries) = strip_delimiter(corrected_raw);
    cost::check_read(&corrected)?;
    let engine = Engine::new(
        reference,
        uncorrected,
        &corrected,
        &boundaries,
        variant,
        config.mismatch_penalty,
    );
    let table = engine.fill(cancel)?;
    let dist = match table.corner().finite() {
        Some(dist) => dist,
        None => {
            return Err(AlignError::RecurrenceViolation {
                row: table.rows() - 1,
                column: table.columns() - 1,
            })
        }
    };
    let ops = engine.backtrack(&table)?;
    // The table dominates memory; release it before building the tracks.
    drop(table);
    let (reference, uncorrected, corrected) = recover(reference, uncorrected, &corrected, &ops);
    Ok(Alignment {
        dist,
        ops,
        reference,
        uncorrected,
        corrected,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn untrimmed(reference: &[u8], uncorrected: &[u8], corrected: &[u8]) -> Alignment {
        align(
            reference,
            uncorrected,
            corrected,
            Variant::Untrimmed,
            &AlignConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn fully_uncorrected_matching_read() {
        let aln = untrimmed(b"ACGT", b"ACGT", b"acgt");
        assert_eq!(aln.dist, 0);
        assert_eq!(aln.reference, b"ACGT");
        assert_eq!(aln.uncorrected, b"ACGT");
        assert_eq!(aln.corrected, b"acgt");
    }

    #[test]
    fn fully_corrected_identical_read() {
        let aln = untrimmed(b"ACGT", b"ACGT", b"ACGT");
        assert_eq!(aln.dist, 0);
        assert_eq!(aln.corrected, b"ACGT");
    }

    #[test]
    fn corrector_fixed_a_trailing_error() {
        // The uncorrected read ends in A where the reference has T; the
        // corrector rewrote it. The final column consumes both characters
        // at zero cost because the corrected base matches the reference.
        let aln = untrimmed(b"ACGT", b"ACGA", b"ACGT");
        assert_eq!(aln.dist, 0);
        assert_eq!(aln.ops, vec![Op::Mat; 4]);
        assert_eq!(aln.uncorrected, b"ACGA");
    }

    #[test]
    fn trimmed_variant_skips_between_fragments() {
        let aln = align(
            b"ACTTGT",
            b"ACTTGT",
            b"AC GT",
            Variant::Trimmed,
            &AlignConfig::default(),
        )
        .unwrap();
        assert_eq!(aln.dist, 0);
        assert_eq!(aln.corrected, b"AC--GT");
        assert_eq!(aln.reference, b"ACTTGT");
    }

    #[test]
    fn untrimmed_strips_the_delimiter_too() {
        let aln = untrimmed(b"ACGT", b"ACGT", b"AC GT");
        assert_eq!(aln.dist, 0);
        assert_eq!(aln.corrected, b"ACGT");
    }

    #[test]
    fn tracks_share_one_length_and_round_trip() {
        let aln = untrimmed(b"ACG-T", b"ACGAT", b"acgAT");
        assert_eq!(aln.reference.len(), aln.uncorrected.len());
        assert_eq!(aln.reference.len(), aln.corrected.len());
        let gapless: Vec<u8> = aln
            .corrected
            .iter()
            .copied()
            .filter(|&x| x != GAP)
            .collect();
        assert_eq!(gapless, b"acgAT");
    }

    #[test]
    fn compact_removes_dead_columns_and_is_idempotent() {
        let corrected = b"AC--GT".to_vec();
        let reference = b"AC-TGT".to_vec();
        let (cr, rf) = compact_pair(&corrected, &reference);
        assert_eq!(cr, b"AC-GT");
        assert_eq!(rf, b"ACTGT");
        let (cr2, rf2) = compact_pair(&cr, &rf);
        assert_eq!(cr2, cr);
        assert_eq!(rf2, rf);
    }

    #[test]
    fn mismatch_penalty_is_monotone() {
        let mut last = 0;
        for penalty in 1..6 {
            let config = AlignConfig {
                mismatch_penalty: penalty,
            };
            let aln = align(b"ACGTACGT", b"ACGAACGT", b"ACTTACGT", Variant::Untrimmed, &config)
                .unwrap();
            assert!(aln.dist >= last, "{} < {}", aln.dist, last);
            last = aln.dist;
        }
    }

    #[test]
    fn illegal_bases_fail_fast() {
        let err = untrimmed_err(b"ACQT", b"ACGT", b"ACGT");
        assert_eq!(
            err,
            AlignError::IllegalBase {
                base: 'Q',
                position: 2
            }
        );
        let err = untrimmed_err(b"ACGT", b"ACGT", b"AC.T");
        assert!(matches!(err, AlignError::IllegalBase { .. }));
    }

    #[test]
    fn pair_length_mismatch_is_rejected() {
        let err = untrimmed_err(b"ACGT", b"ACG", b"ACGT");
        assert_eq!(
            err,
            AlignError::PairLengthMismatch {
                reference: 4,
                uncorrected: 3
            }
        );
    }

    fn untrimmed_err(reference: &[u8], uncorrected: &[u8], corrected: &[u8]) -> AlignError {
        align(
            reference,
            uncorrected,
            corrected,
            Variant::Untrimmed,
            &AlignConfig::default(),
        )
        .unwrap_err()
    }

    #[test]
    fn empty_corrected_read_is_all_deletions() {
        let aln = untrimmed(b"ACG", b"ACG", b"");
        assert_eq!(aln.corrected, b"---");
        assert_eq!(aln.ops, vec![Op::Del; 3]);
        assert_eq!(aln.dist, 3);
    }

    #[test]
    fn empty_pair_is_all_insertions() {
        let aln = untrimmed(b"", b"", b"ACG");
        assert_eq!(aln.reference, b"---");
        assert_eq!(aln.ops, vec![Op::Ins; 3]);
        assert_eq!(aln.dist, 3);
    }

    #[test]
    fn strip_delimiter_records_fragment_ends() {
        let (cleaned, boundaries) = strip_delimiter(b"AC GT  A");
        assert_eq!(cleaned, b"ACGTA");
        assert_eq!(boundaries, vec![1, 3, 4]);
        let (cleaned, boundaries) = strip_delimiter(b"ACGT");
        assert_eq!(cleaned, b"ACGT");
        assert_eq!(boundaries, vec![3]);
        let (cleaned, boundaries) = strip_delimiter(b"");
        assert!(cleaned.is_empty());
        assert!(boundaries.is_empty());
    }
}
