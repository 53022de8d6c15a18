use std::mem;

use itertools::Itertools;
use tankwatch_quantities::Percent;

use crate::core::reading::Level;

/// Usable levels cut into refill-free segments.
///
/// A refill only removes the transition it happened on: the readings on both sides
/// stay as anchors of their own segments.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct RefillSplit {
    pub segments: Vec<Vec<Level>>,

    /// Number of transitions classified as refills.
    pub n_refills: usize,
}

impl RefillSplit {
    /// Split time-ordered levels on every single-step increase of at least `threshold`.
    pub fn new(levels: &[Level], threshold: Percent) -> Self {
        let Some(first) = levels.first() else {
            return Self::default();
        };
        let mut segments = Vec::new();
        let mut current = vec![*first];
        let mut n_refills = 0;
        for ((_, previous_level), next) in levels.iter().tuple_windows() {
            if next.1 - *previous_level >= threshold {
                n_refills += 1;
                segments.push(mem::take(&mut current));
            }
            current.push(*next);
        }
        segments.push(current);
        Self { segments, n_refills }
    }

    /// Number of transitions left for the consumption estimate.
    #[must_use]
    pub fn n_transitions(&self) -> usize {
        self.segments.iter().map(|segment| segment.len().saturating_sub(1)).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use itertools::Itertools;

    use super::*;

    fn levels(values: &[f64]) -> Vec<Level> {
        values
            .iter()
            .enumerate()
            .map(|(day, value)| {
                (
                    Utc.with_ymd_and_hms(2025, 1, 1 + u32::try_from(day).unwrap(), 8, 0, 0).unwrap(),
                    Percent::from(*value),
                )
            })
            .collect()
    }

    fn segment_values(split: &RefillSplit) -> Vec<Vec<f64>> {
        split
            .segments
            .iter()
            .map(|segment| segment.iter().map(|(_, level)| level.get()).collect_vec())
            .collect()
    }

    #[test]
    fn split_on_refill() {
        let split = RefillSplit::new(&levels(&[80.0, 60.0, 95.0, 85.0, 65.0]), Percent::from(10.0));
        assert_eq!(split.n_refills, 1);
        assert_eq!(segment_values(&split), [vec![80.0, 60.0], vec![95.0, 85.0, 65.0]]);
        assert_eq!(split.n_transitions(), 3);
    }

    #[test]
    fn threshold_is_inclusive() {
        let split = RefillSplit::new(&levels(&[50.0, 60.0, 69.0]), Percent::from(10.0));
        assert_eq!(split.n_refills, 1);
        assert_eq!(segment_values(&split), [vec![50.0], vec![60.0, 69.0]]);
    }

    #[test]
    fn only_refills() {
        let split = RefillSplit::new(&levels(&[20.0, 50.0, 90.0]), Percent::from(10.0));
        assert_eq!(split.n_refills, 2);
        assert_eq!(split.n_transitions(), 0);
    }

    #[test]
    fn empty() {
        let split = RefillSplit::new(&[], Percent::from(10.0));
        assert!(split.segments.is_empty());
        assert_eq!(split.n_refills, 0);
    }
}
