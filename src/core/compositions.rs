/// Iterates every way of writing `total` as an ordered sum of `slots`
/// non-negative integers, starting from `[total, 0, .., 0]` and ending at
/// `[0, .., 0, total]`.
#[derive(Debug, Clone)]
pub struct Compositions {
    parts: Vec<u32>,
    remaining: usize,
}

impl Compositions {
    pub fn new(total: u32, slots: usize) -> Self {
        let mut parts = vec![0; slots];
        if let Some(first) = parts.first_mut() {
            *first = total;
        }
        Self {
            parts,
            remaining: count_compositions(total, slots),
        }
    }

    fn advance(&mut self) {
        let k = self.parts.len();
        let last = self.parts[k - 1];
        self.parts[k - 1] = 0;
        if let Some(j) = (0..k - 1).rev().find(|&j| self.parts[j] > 0) {
            self.parts[j] -= 1;
            self.parts[j + 1] = last + 1;
        }
    }
}

impl Iterator for Compositions {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.parts.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Compositions {}

/// C(total + slots - 1, slots - 1); 0 when there are no slots.
pub fn count_compositions(total: u32, slots: usize) -> usize {
    if slots == 0 {
        return 0;
    }
    let n = total as u128 + slots as u128 - 1;
    let k = (slots as u128 - 1).min(total as u128);
    let mut c: u128 = 1;
    for i in 0..k {
        c = c * (n - i) / (i + 1);
    }
    usize::try_from(c).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn small_case_in_order() {
        let all: Vec<Vec<u32>> = Compositions::new(2, 2).collect();
        assert_eq!(all, vec![vec![2, 0], vec![1, 1], vec![0, 2]]);
    }

    #[test]
    fn single_slot_and_empty() {
        assert_eq!(Compositions::new(5, 1).collect::<Vec<_>>(), vec![vec![5]]);
        assert_eq!(Compositions::new(5, 0).count(), 0);
        assert_eq!(Compositions::new(0, 3).collect::<Vec<_>>(), vec![vec![0, 0, 0]]);
    }

    #[test]
    fn counts_match_binomial() {
        assert_eq!(count_compositions(20, 5), 10_626);
        assert_eq!(count_compositions(20, 6), 53_130);
        assert_eq!(count_compositions(100, 5), 4_598_126);
        assert_eq!(Compositions::new(20, 5).len(), 10_626);
    }

    #[test]
    fn every_composition_is_distinct_and_sums() {
        let all: Vec<Vec<u32>> = Compositions::new(10, 4).collect();
        assert_eq!(all.len(), count_compositions(10, 4));
        assert!(all.iter().all(|c| c.iter().sum::<u32>() == 10));
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }
}
