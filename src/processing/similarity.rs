//! Syntactic text similarity used for the semantic score
//!
//! The default measure is a Ratcliff/Obershelp matching-blocks ratio over
//! Unicode scalar values: `2 * M / (|a| + |b|)` where `M` is the total size of
//! the matching blocks found by recursively taking the longest common block
//! and repeating on both sides of it. Cost is quadratic in the worst case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sequences shorter than this never have popular elements discarded
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityAlgorithm {
    /// Ratcliff/Obershelp matching blocks
    #[default]
    SequenceMatcher,
    /// Complement of the normalized Levenshtein distance
    Levenshtein,
}

impl SimilarityAlgorithm {
    /// Similarity in `[0, 1]`; two empty texts are identical
    pub fn ratio(&self, a: &str, b: &str, autojunk: bool) -> f64 {
        match self {
            SimilarityAlgorithm::SequenceMatcher => SequenceMatcher::with_autojunk(a, b, autojunk).ratio(),
            SimilarityAlgorithm::Levenshtein => strsim::normalized_levenshtein(a, b),
        }
    }
}

impl std::fmt::Display for SimilarityAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityAlgorithm::SequenceMatcher => write!(f, "sequence_matcher"),
            SimilarityAlgorithm::Levenshtein => write!(f, "levenshtein"),
        }
    }
}

/// A block where `a[a..a+size] == b[b..b+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Matching-blocks comparison of two character sequences.
///
/// Ties between equally long blocks resolve to the block starting earliest in
/// `a`, then earliest in `b`. With autojunk enabled and `b` at least 200
/// characters long, characters occurring more than `len(b) / 100 + 1` times in
/// `b` cannot seed a block, though they can still extend one. This makes the
/// ratio slightly asymmetric for long inputs.
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        Self::with_autojunk(a, b, true)
    }

    pub fn with_autojunk(a: &str, b: &str, autojunk: bool) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block in `a[alo..ahi]` x `b[blo..bhi]`
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the block ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Grow through characters excluded from the index
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        MatchBlock {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// Non-overlapping matching blocks in ascending order
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            if alo < block.a && blo < block.b {
                pending.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                pending.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
            blocks.push(block);
        }

        blocks.sort();
        blocks
    }

    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}
