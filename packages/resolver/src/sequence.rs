//! Sequence-matcher similarity over characters.
//!
//! The ratio is `2·M / T`, where `T` is the combined length of both
//! strings and `M` the number of characters in matching blocks. Blocks are
//! found recursively: take the longest common run (earliest in the first
//! string, then earliest in the second), then recurse on the pieces to its
//! left and right. When the second string has 200 or more characters,
//! characters making up more than 1% of it are skipped as run seeds.

use std::collections::BTreeMap;

/// Length of the second sequence from which popular characters are pruned.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Compares many first sequences against one fixed second sequence.
///
/// The index of the second sequence is built once, so scoring a list of
/// candidates against the same query does not rebuild it.
pub struct SequenceMatcher {
    b: Vec<char>,
    b2j: BTreeMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    /// Indexes `b`, the sequence every candidate is compared against.
    #[must_use]
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let threshold = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= threshold);
        }

        Self { b, b2j }
    }

    /// Similarity of `a` against the indexed sequence, in `[0, 1]`.
    /// Two empty sequences are identical.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matches(&a) as f64 / total as f64
    }

    /// Total size of all matching blocks.
    fn matches(&self, a: &[char]) -> usize {
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`, as
    /// `(start in a, start in b, length)`.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // Run length ending at each position of b, for the previous row of a.
        let mut j2len: BTreeMap<usize, usize> = BTreeMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: BTreeMap<usize, usize> = BTreeMap::new();
            if let Some(positions) = self.b2j.get(c) {
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
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Pruned characters never seed a run but may still extend one.
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

        (besti, bestj, bestsize)
    }
}

/// Similarity ratio of two strings.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(close(ratio("RUE DE RIVOLI", "RUE DE RIVOLI"), 1.0));
        assert!(close(ratio("", ""), 1.0));
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(close(ratio("abc", "xyz"), 0.0));
        assert!(close(ratio("abc", ""), 0.0));
    }

    #[test]
    fn counts_characters_in_matching_blocks() {
        assert!(close(ratio("abcd", "bcde"), 0.75));
        assert!(close(ratio("apple", "appel"), 0.8));
        assert!(close(ratio("ape", "appel"), 0.75));
    }

    #[test]
    fn misspelled_street_scores_above_cutoff() {
        // "CHAMPS ELY" + "EE" = 12 matched characters out of 27.
        let score = ratio("CHAMPS ELYSEES", "CHAMPS ELYZEE");
        assert!(close(score, 24.0 / 27.0));
    }

    #[test]
    fn is_not_symmetric_in_general() {
        // Block choice depends on which side is indexed.
        let forward = ratio("tide", "diet");
        let backward = ratio("diet", "tide");
        assert!(close(forward, 0.25));
        assert!(close(backward, 0.5));
    }

    #[test]
    fn popular_characters_in_long_sequences_still_extend_runs() {
        let long = "a".repeat(200);
        assert!(close(ratio("aaaaa", &long), 10.0 / 205.0));
    }

    #[test]
    fn compares_characters_not_bytes() {
        assert!(close(ratio("é", "é"), 1.0));
        assert!(close(ratio("éa", "ea"), 0.5));
    }
}
