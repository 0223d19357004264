//! Simulated data for tests and benchmarks: random templates, sequencing
//! noise, and a toy corrector that case-marks its output the way real
//! hybrid correction tools do. Not intended for real applications.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cost::GAP;

#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub sub: f64,
    pub del: f64,
    pub ins: f64,
}

impl Profile {
    pub fn norm(&self) -> Self {
        let sum = self.sub + self.del + self.ins;
        Self {
            sub: self.sub / sum,
            del: self.del / sum,
            ins: self.ins / sum,
        }
    }
}

/// Error profile in the ballpark of raw long reads.
pub const PROFILE: Profile = Profile {
    sub: 0.04,
    del: 0.04,
    ins: 0.07,
};

pub fn generate_seq<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    let bases = b"ACGT";
    (0..len).filter_map(|_| bases.choose(rng)).copied().collect()
}

fn substituted<R: Rng>(rng: &mut R, base: u8) -> u8 {
    let others: Vec<u8> = b"ACGT".iter().filter(|&&x| x != base).copied().collect();
    *others.choose(rng).unwrap()
}

/// Corrupt a template with the given error profile, as a sequencer would.
pub fn introduce_randomness<R: Rng>(seq: &[u8], rng: &mut R, p: &Profile) -> Vec<u8> {
    let mut res = Vec::with_capacity(seq.len() * 11 / 10);
    let mut remaining = seq.iter().copied().rev().collect::<Vec<_>>();
    while let Some(&base) = remaining.last() {
        let roll: f64 = rng.gen();
        if roll < p.sub {
            remaining.pop();
            res.push(substituted(rng, base));
        } else if roll < p.sub + p.del {
            remaining.pop();
        } else if roll < p.sub + p.del + p.ins {
            res.push(*b"ACGT".choose(rng).unwrap());
        } else {
            remaining.pop();
            res.push(base);
        }
    }
    res
}

/// Globally align a read against its template with unit costs and return
/// the gapped pair, the shape the three-way aligner expects its
/// reference/uncorrected input in.
pub fn gapped_pair(template: &[u8], read: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut dp = vec![vec![0u32; read.len() + 1]; template.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i as u32;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j as u32;
    }
    for (i, &t) in template.iter().enumerate().map(|(i, t)| (i + 1, t)) {
        for (j, &x) in read.iter().enumerate().map(|(j, x)| (j + 1, x)) {
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + (t != x) as u32);
        }
    }
    let (mut i, mut j) = (template.len(), read.len());
    let (mut tmp, mut rd) = (vec![], vec![]);
    while i > 0 || j > 0 {
        if i > 0 && dp[i][j] == dp[i - 1][j] + 1 {
            tmp.push(template[i - 1]);
            rd.push(GAP);
            i -= 1;
        } else if j > 0 && dp[i][j] == dp[i][j - 1] + 1 {
            tmp.push(GAP);
            rd.push(read[j - 1]);
            j -= 1;
        } else {
            tmp.push(template[i - 1]);
            rd.push(read[j - 1]);
            i -= 1;
            j -= 1;
        }
    }
    tmp.reverse();
    rd.reverse();
    (tmp, rd)
}

/// A toy corrector over an aligned (reference, uncorrected) pair: spans are
/// either rewritten from the reference (uppercase output) or passed through
/// from the uncorrected read (lowercase output). `toggle` is the per-column
/// probability of switching between the two states; state changes only on
/// columns where both tracks hold a base, which keeps span edges clean.
pub fn simulate_correction<R: Rng>(
    reference: &[u8],
    uncorrected: &[u8],
    rng: &mut R,
    toggle: f64,
) -> Vec<u8> {
    assert_eq!(reference.len(), uncorrected.len());
    let mut corrected = Vec::with_capacity(reference.len());
    let mut rewriting = rng.gen_bool(0.5);
    for (&r, &u) in reference.iter().zip(uncorrected.iter()) {
        if r != GAP && u != GAP && rng.gen_bool(toggle) {
            rewriting = !rewriting;
        }
        if rewriting {
            if r != GAP {
                corrected.push(r.to_ascii_uppercase());
            }
        } else if u != GAP {
            corrected.push(u.to_ascii_lowercase());
        }
    }
    corrected
}
