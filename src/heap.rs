//! A fixed-capacity max-heap holding the k best candidates of a nearest-neighbor search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One kept candidate. `slot` is `None` for the sentinels the heap starts with.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    slot: Option<usize>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.slot.cmp(&other.slot))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Always holds exactly `k` entries. It starts with `k` sentinels at `+∞`, so the first `k`
/// real candidates are accepted unconditionally, and the head is always the worst kept entry.
#[derive(Debug, Clone)]
pub(crate) struct KnnHeap {
    heap: BinaryHeap<Candidate>,
}

impl KnnHeap {
    pub(crate) fn new(k: usize) -> Self {
        let sentinels = vec![
            Candidate {
                distance: f64::INFINITY,
                slot: None,
            };
            k
        ];
        Self {
            heap: BinaryHeap::from(sentinels),
        }
    }

    /// The largest kept distance.
    ///
    /// With `k == 0` nothing can ever be kept, which is expressed as `-∞`.
    #[inline]
    pub(crate) fn worst(&self) -> f64 {
        self.heap
            .peek()
            .map_or(f64::NEG_INFINITY, |candidate| candidate.distance)
    }

    /// Evict the worst entry in favor of `slot` at `distance`.
    #[inline]
    pub(crate) fn replace_worst(&mut self, slot: usize, distance: f64) {
        if let Some(mut top) = self.heap.peek_mut() {
            *top = Candidate {
                distance,
                slot: Some(slot),
            };
        }
    }

    /// Keep `slot` if it is strictly closer than the current worst entry.
    #[inline]
    pub(crate) fn offer(&mut self, slot: usize, distance: f64) -> bool {
        if distance < self.worst() {
            self.replace_worst(slot, distance);
            true
        } else {
            false
        }
    }

    /// Drain into `(slot, distance)` pairs in ascending distance, dropping leftover sentinels.
    pub(crate) fn into_sorted(self) -> Vec<(usize, f64)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .filter_map(|candidate| candidate.slot.map(|slot| (slot, candidate.distance)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::KnnHeap;

    #[test]
    fn starts_full_of_sentinels() {
        let heap = KnnHeap::new(3);
        assert_eq!(heap.worst(), f64::INFINITY);
        assert!(heap.into_sorted().is_empty());
    }

    #[test]
    fn keeps_the_k_smallest() {
        let mut heap = KnnHeap::new(2);
        for (slot, distance) in [5.0, 1.0, 4.0, 2.0, 3.0].into_iter().enumerate() {
            heap.offer(slot, distance);
        }
        assert_eq!(heap.worst(), 2.0);
        assert_eq!(heap.into_sorted(), vec![(1, 1.0), (3, 2.0)]);
    }

    #[test]
    fn rejects_ties_with_the_worst() {
        let mut heap = KnnHeap::new(1);
        assert!(heap.offer(0, 1.0));
        assert!(!heap.offer(1, 1.0));
        assert_eq!(heap.into_sorted(), vec![(0, 1.0)]);
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let mut heap = KnnHeap::new(0);
        assert!(!heap.offer(0, 0.0));
        assert!(heap.into_sorted().is_empty());
    }

    #[test]
    fn partially_filled_omits_sentinels() {
        let mut heap = KnnHeap::new(4);
        heap.offer(7, 0.5);
        heap.offer(2, 0.25);
        assert_eq!(heap.into_sorted(), vec![(2, 0.25), (7, 0.5)]);
    }
}
