//! Ratio-based sequence similarity (longest matching blocks).
//!
//! Ratcliff/Obershelp gestalt matching as done by the classic
//! `SequenceMatcher` (no junk predicate, with the `autojunk` heuristic), and
//! `get_close_matches` on top of it.
//! Strings are compared per Unicode scalar value.

use rustc_hash::{FxHashMap, FxHashSet};

/// Ratio a fuzzy match must reach to be accepted.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Sequences at least this long get popular characters dropped from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Compares a changing `a` against a fixed `b`; the index over `b` is built once.
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: FxHashMap<char, Vec<usize>>,
    full_b_count: Option<FxHashMap<char, usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let mut matcher = Self {
            a: Vec::new(),
            b: Vec::new(),
            b2j: FxHashMap::default(),
            full_b_count: None,
        };
        matcher.set_seq2(b);
        matcher.set_seq1(a);
        matcher
    }

    pub fn set_seq1(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    pub fn set_seq2(&mut self, b: &str) {
        self.b = b.chars().collect();
        self.full_b_count = None;
        self.chain_b();
    }

    fn chain_b(&mut self) {
        let mut b2j: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (i, &c) in self.b.iter().enumerate() {
            b2j.entry(c).or_default().push(i);
        }

        let n = self.b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            let popular: FxHashSet<char> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > ntest)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }
        self.b2j = b2j;
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (a, b) = (&self.a, &self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        let mut j2len: FxHashMap<usize, usize> = FxHashMap::default();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(indices) = self.b2j.get(c) {
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

        // Characters dropped by autojunk can still extend a match at its edges.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        MatchBlock {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// Non-overlapping matching blocks, ascending, adjacent blocks merged,
    /// terminated by a zero-size sentinel at `(len(a), len(b))`.
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size > 0 {
                if alo < m.a && blo < m.b {
                    queue.push((alo, m.a, blo, m.b));
                }
                if m.a + m.size < ahi && m.b + m.size < bhi {
                    queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
                }
                blocks.push(m);
            }
        }
        blocks.sort();

        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(MatchBlock {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// `2 * M / T`: M matched characters, T total characters of both sequences.
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio()` from character multisets.
    pub fn quick_ratio(&mut self) -> f64 {
        let b = &self.b;
        let full_b_count = self.full_b_count.get_or_insert_with(|| {
            let mut counts = FxHashMap::default();
            for &c in b {
                *counts.entry(c).or_insert(0) += 1;
            }
            counts
        });

        let mut avail: FxHashMap<char, isize> = FxHashMap::default();
        let mut matches = 0;
        for c in &self.a {
            let num = *avail
                .entry(*c)
                .or_insert_with(|| full_b_count.get(c).copied().unwrap_or(0) as isize);
            avail.insert(*c, num - 1);
            if num > 0 {
                matches += 1;
            }
        }
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio()` from lengths alone.
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        1.0
    } else {
        2.0 * matches as f64 / length as f64
    }
}

/// Similarity ratio of two strings in `[0, 1]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

/// Up to `n` possibilities scoring at least `cutoff` against `word`, best first.
///
/// Equal scores are ordered by the possibility itself, greater string first.
pub fn get_close_matches<'a, I>(word: &str, possibilities: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 || !(0.0..=1.0).contains(&cutoff) {
        return Vec::new();
    }

    let mut matcher = SequenceMatcher::new("", word);
    let mut scored: Vec<(f64, &'a str)> = Vec::new();
    for candidate in possibilities {
        matcher.set_seq1(candidate);
        if matcher.real_quick_ratio() >= cutoff && matcher.quick_ratio() >= cutoff {
            let score = matcher.ratio();
            if score >= cutoff {
                scored.push((score, candidate));
            }
        }
    }

    scored.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| y.1.cmp(x.1)));
    scored.into_iter().take(n).map(|(_, s)| s).collect()
}

/// The single best close match, if any clears `cutoff`.
pub fn best_close_match<'a, I>(word: &str, possibilities: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    get_close_matches(word, possibilities, 1, cutoff).into_iter().next()
}
