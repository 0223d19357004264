//! Per-segment error statistics over a finished three-way alignment.
//!
//! Downstream benchmarking wants to know how a corrector behaved inside
//! the regions it actually touched. A corrected segment is a maximal run
//! of aligned columns whose corrected-track character is uppercase; gap
//! columns inherit the state of the preceding base. For every segment the
//! matching slices of all three tracks are extracted and each column is
//! classified as match, substitution, insertion, or deletion against the
//! reference.
use serde::{Deserialize, Serialize};

use crate::cost::GAP;

/// Aligned slices of the three tracks covering one corrected segment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorrespondingSegments {
    pub corrected: Vec<u8>,
    pub uncorrected: Vec<u8>,
    pub reference: Vec<u8>,
}

/// Column classes of one read track against the reference track.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCounts {
    pub substitutions: u64,
    pub insertions: u64,
    pub deletions: u64,
}

impl ErrorCounts {
    pub fn total(&self) -> u64 {
        self.substitutions + self.insertions + self.deletions
    }
}

/// Error counts of the corrected and uncorrected reads over one segment,
/// the per-segment numbers a benchmark report aggregates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub corrected: ErrorCounts,
    pub uncorrected: ErrorCounts,
}

/// Classify every column of `read` against `reference`. Both tracks must
/// come from one alignment (equal length). Case is ignored.
pub fn error_counts(reference: &[u8], read: &[u8]) -> ErrorCounts {
    assert_eq!(reference.len(), read.len());
    let mut counts = ErrorCounts::default();
    for (&r, &x) in reference.iter().zip(read.iter()) {
        match (r == GAP, x == GAP) {
            (false, false) if !r.eq_ignore_ascii_case(&x) => counts.substitutions += 1,
            (true, false) => counts.insertions += 1,
            (false, true) => counts.deletions += 1,
            _ => {}
        }
    }
    counts
}

/// Extract the corrected segments of an aligned triple with the matching
/// spans of the other two tracks.
pub fn corresponding_segments(
    corrected: &[u8],
    uncorrected: &[u8],
    reference: &[u8],
) -> Vec<CorrespondingSegments> {
    assert_eq!(corrected.len(), uncorrected.len());
    assert_eq!(corrected.len(), reference.len());
    let mut segments = vec![];
    let mut current: Option<CorrespondingSegments> = None;
    let mut inside = false;
    for (k, &c) in corrected.iter().enumerate() {
        if c != GAP {
            inside = c.is_ascii_uppercase();
        }
        if inside {
            let segment = current.get_or_insert_with(Default::default);
            segment.corrected.push(c);
            segment.uncorrected.push(uncorrected[k]);
            segment.reference.push(reference[k]);
        } else if let Some(segment) = current.take() {
            segments.push(segment);
        }
    }
    segments.extend(current);
    segments
}

/// Error counts of both reads over one corrected segment.
pub fn segment_report(segment: &CorrespondingSegments) -> SegmentReport {
    SegmentReport {
        corrected: error_counts(&segment.reference, &segment.corrected),
        uncorrected: error_counts(&segment.reference, &segment.uncorrected),
    }
}
