/// Set of non-negative integers stored as sorted, disjoint half-open
/// intervals; the compact reachability representation of the lookahead
/// machinery.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntervalSet {
    /// Sorted, pairwise disjoint `[begin, end)` intervals.
    intervals: Vec<(usize, usize)>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(value: usize) -> Self {
        Self {
            intervals: vec![(value, value + 1)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn len_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Membership by binary search over the interval starts.
    pub fn member(&self, value: usize) -> bool {
        let pos = self.intervals.partition_point(|(begin, _)| *begin <= value);
        pos > 0 && value < self.intervals[pos - 1].1
    }

    pub fn insert(&mut self, value: usize) {
        self.union_interval(value, value + 1);
    }

    fn union_interval(&mut self, begin: usize, end: usize) {
        self.intervals.push((begin, end));
        self.normalize();
    }

    /// Merges another set into this one.
    pub fn union(&mut self, other: &IntervalSet) {
        self.intervals.extend_from_slice(&other.intervals);
        self.normalize();
    }

    /// True when the two sets share an element.
    pub fn intersects(&self, other: &IntervalSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.intervals.len() && j < other.intervals.len() {
            let a = self.intervals[i];
            let b = other.intervals[j];
            if a.1 <= b.0 {
                i += 1;
            } else if b.1 <= a.0 {
                j += 1;
            } else {
                return true;
            }
        }
        false
    }

    fn normalize(&mut self) {
        self.intervals.sort_unstable();
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(self.intervals.len());
        for (begin, end) in self.intervals.drain(..) {
            if begin >= end {
                continue;
            }
            match merged.last_mut() {
                Some(last) if begin <= last.1 => {
                    last.1 = last.1.max(end);
                }
                _ => merged.push((begin, end)),
            }
        }
        self.intervals = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_and_merge() {
        let mut set = IntervalSet::new();
        set.insert(3);
        set.insert(5);
        set.insert(4);
        // Contiguous values merge into one interval.
        assert_eq!(set.len_intervals(), 1);
        assert!(set.member(3));
        assert!(set.member(5));
        assert!(!set.member(6));
        assert!(!set.member(2));
    }

    #[test]
    fn test_union_and_intersects() {
        let mut a = IntervalSet::singleton(1);
        let b = IntervalSet::singleton(10);
        assert!(!a.intersects(&b));
        a.union(&b);
        assert!(a.member(10));
        assert!(a.intersects(&b));
    }
}
