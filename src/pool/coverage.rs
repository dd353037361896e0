//! Per-byte coverage tracking for in-progress frames.
//!
//! A received-length counter alone cannot gate completion: duplicated or
//! overlapping chunks would inflate it past the frame length and fire the
//! consumer callback before every byte has actually arrived. `ByteCoverage`
//! records which byte ranges have been seen, so the counter only grows by
//! bytes covered for the first time.

/// Set of covered byte ranges within one frame.
///
/// Ranges are half-open `[start, end)`, kept sorted and disjoint; inserting
/// merges neighbours and reports only the newly covered span.
///
/// # Examples
///
/// ```
/// use framecast::pool::ByteCoverage;
///
/// let mut coverage = ByteCoverage::new();
/// assert_eq!(coverage.insert(0, 1200), 1200);
/// assert_eq!(coverage.insert(0, 1200), 0); // duplicate adds nothing
/// assert_eq!(coverage.insert(600, 1200), 600); // overlap counts once
/// assert!(coverage.covers_exactly(1800));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ByteCoverage {
    ranges: Vec<(u32, u32)>,
    covered: u32,
}

impl ByteCoverage {
    /// Create an empty coverage set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ranges: Vec::new(),
            covered: 0,
        }
    }

    /// Record `len` bytes starting at `offset`; returns how many of them
    /// were not covered before.
    pub fn insert(&mut self, offset: u32, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        let start = offset;
        let end = offset.saturating_add(len);

        // Ranges ending before `start` cannot touch the new span.
        let first = self.ranges.partition_point(|&(_, e)| e < start);
        let mut merged_start = start;
        let mut merged_end = end;
        let mut overlap: u32 = 0;
        let mut last = first;
        while let Some(&(s, e)) = self.ranges.get(last) {
            if s > end {
                break;
            }
            overlap += e.min(end).saturating_sub(s.max(start));
            merged_start = merged_start.min(s);
            merged_end = merged_end.max(e);
            last += 1;
        }

        let newly = (end - start) - overlap;
        self.ranges
            .splice(first..last, [(merged_start, merged_end)]);
        self.covered += newly;
        newly
    }

    /// Total distinct bytes covered so far.
    #[must_use]
    pub const fn covered_bytes(&self) -> u32 { self.covered }

    /// Whether coverage is the single contiguous range `[0, total)`.
    #[must_use]
    pub fn covers_exactly(&self, total: u32) -> bool {
        matches!(self.ranges.as_slice(), [(0, end)] if *end == total)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ByteCoverage;

    #[test]
    fn disjoint_ranges_accumulate() {
        let mut coverage = ByteCoverage::new();
        assert_eq!(coverage.insert(0, 100), 100);
        assert_eq!(coverage.insert(200, 100), 100);
        assert_eq!(coverage.covered_bytes(), 200);
        assert!(!coverage.covers_exactly(300));
    }

    #[test]
    fn filling_the_gap_completes() {
        let mut coverage = ByteCoverage::new();
        coverage.insert(0, 100);
        coverage.insert(200, 100);
        assert_eq!(coverage.insert(100, 100), 100);
        assert!(coverage.covers_exactly(300));
    }

    #[rstest]
    #[case::exact_duplicate(50, 100, 0)]
    #[case::left_overlap(0, 100, 50)]
    #[case::right_overlap(100, 100, 50)]
    #[case::superset(0, 250, 150)]
    #[case::subset(60, 50, 0)]
    fn overlaps_count_new_bytes_only(
        #[case] offset: u32,
        #[case] len: u32,
        #[case] expected_new: u32,
    ) {
        let mut coverage = ByteCoverage::new();
        coverage.insert(50, 100);
        assert_eq!(coverage.insert(offset, len), expected_new);
    }

    #[test]
    fn touching_ranges_merge() {
        let mut coverage = ByteCoverage::new();
        coverage.insert(0, 100);
        coverage.insert(100, 100);
        assert!(coverage.covers_exactly(200));
    }

    #[test]
    fn zero_length_inserts_are_ignored() {
        let mut coverage = ByteCoverage::new();
        assert_eq!(coverage.insert(10, 0), 0);
        assert_eq!(coverage.covered_bytes(), 0);
    }

    #[test]
    fn reversed_arrival_still_completes() {
        let mut coverage = ByteCoverage::new();
        for chunk in (0..5u32).rev() {
            coverage.insert(chunk * 1200, 1200);
        }
        assert!(coverage.covers_exactly(6000));
    }
}
