//! Ratcliff/Obershelp sequence similarity over characters.
//!
//! Reproduces the matching-block search of Python's `difflib.SequenceMatcher`
//! (no junk predicate, optional "popular element" pruning) so scores line up
//! with reference runs produced by that implementation.

use std::collections::{HashMap, HashSet};

/// Sequences shorter than this never have popular elements pruned.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of `size` equal elements starting at `a[a_start]` and `b[b_start]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each element in `b`, popular elements excluded.
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
        for (j, &elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        let n = b.len();
        if autojunk && n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > ntest)
                .map(|(&elt, _)| elt)
                .collect();
            for elt in popular {
                b2j.remove(&elt);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`, earliest in
    /// `a` (then in `b`) on ties. A block of size 0 means no match.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (&self.a, &self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, elt) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(elt) {
                for &j in positions {
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
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // popular elements can still extend a block seeded elsewhere
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// Non-overlapping matching blocks in ascending order, adjacent blocks
    /// merged, terminated by a zero-size sentinel at `(len(a), len(b))`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Match {
            a_start: la,
            b_start: lb,
            size: 0,
        });
        merged
    }

    /// `2 * M / (len(a) + len(b))`, or 1.0 when both sequences are empty.
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        let length = self.a.len() + self.b.len();
        if length == 0 {
            return 1.0;
        }
        2.0 * matches as f64 / length as f64
    }
}

/// Character-level similarity of `a` to `b` with popular-element pruning.
pub fn similarity(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

pub fn similarity_with(a: &str, b: &str, autojunk: bool) -> f64 {
    SequenceMatcher::with_autojunk(a, b, autojunk).ratio()
}
