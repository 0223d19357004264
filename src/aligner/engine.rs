//! The DP fill and the backtracking walk, shared by both variants.
//!
//! Historically this algorithm existed as two hand-synchronized copies of
//! the recurrence, one in the fill and one in the traceback, and the two
//! drifted apart. Here a single [`Engine::moves`] derives the admissible
//! move costs for a cell; the fill takes their minimum and the backtracking
//! matches them against the stored value, so the passes cannot disagree.
use super::{Op, Variant};
use crate::cost::{base_cost, Cost, GAP};
use crate::error::AlignError;
use crate::matrix::DpTable;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) struct Engine<'a> {
    reference: &'a [u8],
    uncorrected: &'a [u8],
    /// Gap-free corrected read, delimiter already stripped.
    corrected: &'a [u8],
    /// Ascending indices of each fragment's final base in `corrected`.
    /// Empty unless the variant is `Trimmed`.
    boundaries: &'a [usize],
    variant: Variant,
    penalty: u32,
}

/// Candidate costs of the three moves entering one interior cell.
/// A move the recurrence forbids is `Unreachable`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Moves {
    pub del: Cost,
    pub ins: Cost,
    pub sub: Cost,
}

impl Moves {
    fn best(&self) -> Cost {
        self.del.min(self.ins).min(self.sub)
    }
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        reference: &'a [u8],
        uncorrected: &'a [u8],
        corrected: &'a [u8],
        boundaries: &'a [usize],
        variant: Variant,
        penalty: u32,
    ) -> Self {
        Self {
            reference,
            uncorrected,
            corrected,
            boundaries,
            variant,
            penalty,
        }
    }

    /// The sequence the corrected read is played against, one column per
    /// character: the uncorrected read for the untrimmed variant, the
    /// reference for the trimmed one.
    fn comparison(&self) -> &[u8] {
        match self.variant {
            Variant::Untrimmed => self.uncorrected,
            Variant::Trimmed => self.reference,
        }
    }

    fn is_fragment_end(&self, c_index: usize) -> bool {
        self.boundaries.binary_search(&c_index).is_ok()
    }

    /// A lowercase base closing an uncorrected run: the read ends here or
    /// the next base is uppercase.
    fn is_ending_lowercase(&self, c_index: usize) -> bool {
        self.corrected[c_index].is_ascii_lowercase()
            && self
                .corrected
                .get(c_index + 1)
                .map_or(true, |next| next.is_ascii_uppercase())
    }

    /// Admissible move costs entering cell `(i, j)`, `i >= 1`, `j >= 1`.
    pub(crate) fn moves(&self, table: &DpTable, i: usize, j: usize) -> Moves {
        let c = self.corrected[i - 1];
        let r = self.reference[j - 1];
        let up = table.get(i - 1, j);
        let left = table.get(i, j - 1);
        let diag = table.get(i - 1, j - 1);
        match self.variant {
            Variant::Untrimmed => {
                let u = self.uncorrected[j - 1];
                if self.is_ending_lowercase(i - 1) {
                    // The uncorrected run may stop here or run on: consume
                    // both characters if they agree, or charge a deletion
                    // against the uncorrected read.
                    let sub = if u.eq_ignore_ascii_case(&c) {
                        diag.add(base_cost(r, c, self.penalty))
                    } else {
                        Cost::Unreachable
                    };
                    Moves {
                        del: left.add(base_cost(r, GAP, self.penalty)),
                        ins: Cost::Unreachable,
                        sub,
                    }
                } else if c.is_ascii_lowercase() {
                    // Interior of an uncorrected run: it must track the
                    // uncorrected read base for base. A gap column on the
                    // uncorrected track is consumed for free; anything else
                    // would desynchronize the run and is forbidden.
                    if u.eq_ignore_ascii_case(&c) {
                        Moves {
                            del: Cost::Unreachable,
                            ins: Cost::Unreachable,
                            sub: diag.add(base_cost(r, c, self.penalty)),
                        }
                    } else if u == GAP {
                        Moves {
                            del: left,
                            ins: Cost::Unreachable,
                            sub: Cost::Unreachable,
                        }
                    } else {
                        Moves {
                            del: Cost::Unreachable,
                            ins: Cost::Unreachable,
                            sub: Cost::Unreachable,
                        }
                    }
                } else {
                    // Corrected territory, the usual edit-distance step.
                    Moves {
                        del: left.add(base_cost(r, GAP, self.penalty)),
                        ins: up.add(base_cost(GAP, c, self.penalty)),
                        sub: diag.add(base_cost(r, c, self.penalty)),
                    }
                }
            }
            Variant::Trimmed => {
                // A fragment's final base may be trimmed against any
                // remaining reference for free; fragments rarely extend to
                // the end of their mapped region.
                let del_step = if self.is_fragment_end(i - 1) {
                    0
                } else {
                    base_cost(r, GAP, self.penalty)
                };
                Moves {
                    del: left.add(del_step),
                    ins: up.add(base_cost(GAP, c, self.penalty)),
                    sub: diag.add(base_cost(r, c, self.penalty)),
                }
            }
        }
    }

    /// Fill the whole table. `cancel` is polled once per row; a raised flag
    /// aborts with [`AlignError::Cancelled`].
    pub(crate) fn fill(&self, cancel: Option<&AtomicBool>) -> Result<DpTable, AlignError> {
        let rows = self.corrected.len() + 1;
        let columns = self.comparison().len() + 1;
        let mut table = DpTable::new(rows, columns)?;
        for i in 0..rows {
            table.set(i, 0, Cost::Finite(i as u32));
        }
        for j in 1..columns {
            let boundary = match self.variant {
                // Pure deletions of the uncorrected read.
                Variant::Untrimmed => j as u32,
                // Fragments may start anywhere on the reference.
                Variant::Trimmed => 0,
            };
            table.set(0, j, Cost::Finite(boundary));
        }
        for i in 1..rows {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(AlignError::Cancelled);
                }
            }
            for j in 1..columns {
                let best = self.moves(&table, i, j).best();
                table.set(i, j, best);
            }
        }
        Ok(table)
    }

    /// Walk from the bottom-right corner back to the origin, re-deriving the
    /// admissible moves at every cell and taking the one that explains the
    /// stored cost. Ties break deletion, insertion, substitution, the same
    /// preference the fill encodes through `min`.
    pub(crate) fn backtrack(&self, table: &DpTable) -> Result<Vec<Op>, AlignError> {
        let (mut i, mut j) = (table.rows() - 1, table.columns() - 1);
        let mut ops = Vec::with_capacity(i + j);
        while i > 0 || j > 0 {
            let op = if i == 0 {
                Op::Del
            } else if j == 0 {
                Op::Ins
            } else {
                let stored = match table.get(i, j).finite() {
                    Some(stored) => Cost::Finite(stored),
                    None => return Err(AlignError::RecurrenceViolation { row: i, column: j }),
                };
                let moves = self.moves(table, i, j);
                if moves.del == stored {
                    Op::Del
                } else if moves.ins == stored {
                    Op::Ins
                } else if moves.sub == stored {
                    Op::Mat
                } else {
                    return Err(AlignError::RecurrenceViolation { row: i, column: j });
                }
            };
            log::trace!("cell ({}, {}) -> {:?}", i, j, op);
            match op {
                Op::Del => j -= 1,
                Op::Ins => i -= 1,
                Op::Mat => {
                    i -= 1;
                    j -= 1;
                }
            }
            ops.push(op);
        }
        ops.reverse();
        Ok(ops)
    }
}
