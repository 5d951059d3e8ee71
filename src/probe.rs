//! Quadratic probe sequence over a slot array

/// Iterator over the slots visited when looking for a key.
///
/// Starting at `home`, the `i`-th probe lands on `(home + i * i) mod capacity`
/// for `i = 0, 1, .., capacity - 1`, so exactly `capacity` slots are visited
/// (some of them more than once, quadratic residues do not cover every slot).
#[derive(Debug, Clone)]
pub(crate) struct ProbeSeq {
    /// Index of the home slot of the key
    home: usize,
    /// Length of the slot array being probed
    capacity: usize,
    /// Number of probes already yielded, the `i` of the sequence
    step: usize,
    /// `step * step mod capacity`, advanced without ever squaring
    offset: usize,
}

impl ProbeSeq {
    /// Creates the probe sequence of a key whose home slot is `home`
    pub(crate) fn new(home: usize, capacity: usize) -> Self {
        debug_assert!(home < capacity || capacity == 0);
        Self { home, capacity, step: 0, offset: 0 }
    }
}

/// `(a + b) mod m` for `a, b < m` without overflowing
#[allow(clippy::arithmetic_side_effects)]
fn add_mod(a: usize, b: usize, m: usize) -> usize {
    let room = m - b;
    if a >= room { a - room } else { a + b }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.capacity {
            return None;
        }

        let index = add_mod(self.home, self.offset, self.capacity);

        // (i + 1)^2 = i^2 + 2i + 1
        let step = self.step % self.capacity;
        let one = usize::from(self.capacity > 1);
        self.offset = add_mod(self.offset, step, self.capacity);
        self.offset = add_mod(self.offset, step, self.capacity);
        self.offset = add_mod(self.offset, one, self.capacity);
        self.step += 1;

        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity.saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares_from_home() {
        let seq: Vec<usize> = ProbeSeq::new(0, 8).collect();
        assert_eq!(seq, vec![0, 1, 4, 1, 0, 1, 4, 1]);

        let seq: Vec<usize> = ProbeSeq::new(3, 4).collect();
        assert_eq!(seq, vec![3, 0, 3, 0]);
    }

    #[test]
    fn test_matches_direct_formula() {
        for capacity in [1_usize, 2, 3, 7, 16, 31, 64] {
            for home in 0..capacity {
                let expected: Vec<usize> =
                    (0..capacity).map(|i| (home + i * i) % capacity).collect();
                let seq: Vec<usize> = ProbeSeq::new(home, capacity).collect();
                assert_eq!(seq, expected, "home {home}, capacity {capacity}");
            }
        }
    }

    #[test]
    fn test_length_is_capacity() {
        let mut seq = ProbeSeq::new(5, 13);
        assert_eq!(seq.len(), 13);
        seq.next();
        seq.next();
        assert_eq!(seq.len(), 11);
        assert_eq!(seq.count(), 11);
    }

    #[test]
    fn test_large_capacity_does_not_overflow() {
        let capacity = usize::MAX - 1;
        let seq: Vec<usize> = ProbeSeq::new(capacity - 1, capacity).take(3).collect();
        assert_eq!(seq, vec![capacity - 1, 0, 3]);
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        assert_eq!(ProbeSeq::new(0, 0).next(), None);
    }
}
