//! Cost model shared by both alignment variants.
//!
//! Case carries meaning on the corrected read: lowercase marks a position
//! the corrector left alone, uppercase a position it touched. An untouched
//! position is never charged, whatever it faces, because its agreement with
//! the uncorrected read is enforced structurally by the recurrence.
use crate::error::AlignError;

/// The gap marker used on every aligned track.
pub const GAP: u8 = b'-';

/// Default penalty for a corrected base that disagrees with the reference.
/// Twice the implicit indel cost, so mismatches are discouraged relative to
/// gaps. Tunable through [`crate::AlignConfig`].
pub const MISMATCH_PENALTY: u32 = 2;

/// An accumulated path cost. `Unreachable` marks cells the recurrence
/// forbids; adding to it keeps it unreachable, so a forbidden prefix can
/// never win a `min` against a legal one. This replaces the usual
/// max-int sentinel, which overflows the moment a step cost is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cost {
    Finite(u32),
    Unreachable,
}

impl Cost {
    /// Add a step cost, saturating at `Unreachable`.
    pub fn add(self, step: u32) -> Self {
        match self {
            Cost::Finite(acc) => Cost::Finite(acc + step),
            Cost::Unreachable => Cost::Unreachable,
        }
    }
    pub fn finite(self) -> Option<u32> {
        match self {
            Cost::Finite(acc) => Some(acc),
            Cost::Unreachable => None,
        }
    }
}

/// Cost of writing `corrected_base` over `reference_base` in one column.
///
/// Zero when the corrected base is lowercase (left uncorrected) or when it
/// equals the uppercased reference base; `penalty` otherwise. Either input
/// may be [`GAP`]. Pure; safe to call from any thread.
pub fn base_cost(reference_base: u8, corrected_base: u8, penalty: u32) -> u32 {
    if corrected_base.is_ascii_lowercase() {
        0
    } else if reference_base.to_ascii_uppercase() == corrected_base {
        0
    } else {
        penalty
    }
}

fn is_base(x: u8) -> bool {
    matches!(x.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N')
}

/// Validate an aligned track: bases of either case, or gap markers.
pub fn check_track(seq: &[u8]) -> Result<(), AlignError> {
    match seq.iter().position(|&x| x != GAP && !is_base(x)) {
        None => Ok(()),
        Some(position) => Err(AlignError::IllegalBase {
            base: seq[position] as char,
            position,
        }),
    }
}

/// Validate a gap-free read: bases of either case only.
pub fn check_read(seq: &[u8]) -> Result<(), AlignError> {
    match seq.iter().position(|&x| !is_base(x)) {
        None => Ok(()),
        Some(position) => Err(AlignError::IllegalBase {
            base: seq[position] as char,
            position,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn lowercase_is_free() {
        for &r in b"ACGTN-" {
            assert_eq!(base_cost(r, b'a', MISMATCH_PENALTY), 0);
            assert_eq!(base_cost(r, b't', MISMATCH_PENALTY), 0);
        }
    }
    #[test]
    fn uppercase_match_is_free() {
        assert_eq!(base_cost(b'A', b'A', MISMATCH_PENALTY), 0);
        assert_eq!(base_cost(b'a', b'A', MISMATCH_PENALTY), 0);
        assert_eq!(base_cost(GAP, GAP, MISMATCH_PENALTY), 0);
    }
    #[test]
    fn mismatch_is_charged() {
        assert_eq!(base_cost(b'A', b'C', MISMATCH_PENALTY), 2);
        assert_eq!(base_cost(b'A', GAP, MISMATCH_PENALTY), 2);
        assert_eq!(base_cost(GAP, b'C', 7), 7);
    }
    #[test]
    fn unreachable_dominates() {
        assert!(Cost::Finite(u32::MAX) < Cost::Unreachable);
        assert_eq!(Cost::Unreachable.add(10), Cost::Unreachable);
        assert_eq!(Cost::Finite(3).add(2), Cost::Finite(5));
        assert_eq!(Cost::Unreachable.finite(), None);
    }
    #[test]
    fn alphabet_is_enforced() {
        assert!(check_track(b"ACGTNacgtn-").is_ok());
        assert!(check_read(b"ACGTNacgtn").is_ok());
        let err = check_track(b"ACXGT").unwrap_err();
        assert_eq!(
            err,
            AlignError::IllegalBase {
                base: 'X',
                position: 2
            }
        );
        assert!(check_read(b"ACG-T").is_err());
    }
}
