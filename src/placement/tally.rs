//! Counters reported by the optimizer.
//!
//! None of these values drive placement decisions; they are carried in the
//! [`crate::mask_maker::MaskDesign`] and printed in its summary table.
use std::ops::AddAssign;

use crate::catalog::Priority;
use crate::constants::{MaskId, WEIGHT_COMPULSORY, WEIGHT_SECONDARY, WEIGHT_TERTIARY};

/// Number of objects per priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriorityCounts {
    pub acquisition: usize,
    pub compulsory: usize,
    pub secondary: usize,
    pub tertiary: usize,
    pub forbidden: usize,
}

impl PriorityCounts {
    pub fn add(&mut self, priority: Priority) {
        *self.slot(priority) += 1;
    }

    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Acquisition => self.acquisition,
            Priority::Compulsory => self.compulsory,
            Priority::Secondary => self.secondary,
            Priority::Tertiary => self.tertiary,
            Priority::Forbidden => self.forbidden,
        }
    }

    pub fn total(&self) -> usize {
        self.acquisition + self.compulsory + self.secondary + self.tertiary + self.forbidden
    }

    /// Strip weight of the fillable counts: `compulsory·10000 + secondary·1000 + tertiary`.
    pub fn weight(&self) -> f64 {
        self.compulsory as f64 * WEIGHT_COMPULSORY
            + self.secondary as f64 * WEIGHT_SECONDARY
            + self.tertiary as f64 * WEIGHT_TERTIARY
    }

    fn slot(&mut self, priority: Priority) -> &mut usize {
        match priority {
            Priority::Acquisition => &mut self.acquisition,
            Priority::Compulsory => &mut self.compulsory,
            Priority::Secondary => &mut self.secondary,
            Priority::Tertiary => &mut self.tertiary,
            Priority::Forbidden => &mut self.forbidden,
        }
    }
}

impl FromIterator<Priority> for PriorityCounts {
    fn from_iter<I: IntoIterator<Item = Priority>>(iter: I) -> Self {
        let mut counts = PriorityCounts::default();
        for priority in iter {
            counts.add(priority);
        }
        counts
    }
}

impl AddAssign for PriorityCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.acquisition += rhs.acquisition;
        self.compulsory += rhs.compulsory;
        self.secondary += rhs.secondary;
        self.tertiary += rhs.tertiary;
        self.forbidden += rhs.forbidden;
    }
}

/// Catalog-level rejections, shared by every mask of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RejectionTally {
    /// Slit position outside the field of view
    pub outside_fov: PriorityCounts,
    /// Spectrum footprint outside the field of view bounds
    pub out_of_range: PriorityCounts,
    /// Objects flagged `"X"`
    pub forbidden: usize,
    /// Acquisition objects overlapping a previously kept one
    pub reference_overlap: usize,
}

impl RejectionTally {
    pub fn total(&self) -> usize {
        self.outside_fov.total() + self.out_of_range.total() + self.forbidden + self.reference_overlap
    }
}

/// Placement counters of one mask replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskSummary {
    pub mask: MaskId,
    /// Rows written per priority class, acquisition rows included
    pub placed: PriorityCounts,
    /// Committed strips
    pub strips: usize,
    /// Candidates of gaps lying outside every nod-and-shuffle band
    pub outside_bands: usize,
    /// Acquisition objects dropped because they lie outside every band
    pub references_outside_bands: usize,
}

impl MaskSummary {
    pub fn new(mask: MaskId) -> Self {
        MaskSummary {
            mask,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tally_test {
    use super::*;

    #[test]
    fn test_counts_and_weight() {
        let counts: PriorityCounts = [
            Priority::Compulsory,
            Priority::Tertiary,
            Priority::Tertiary,
            Priority::Secondary,
            Priority::Acquisition,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.get(Priority::Tertiary), 2);
        assert_eq!(counts.total(), 5);
        // acquisition objects carry no strip weight
        assert_eq!(counts.weight(), 11_002.0);
    }

    #[test]
    fn test_add_assign() {
        let mut a = PriorityCounts {
            compulsory: 1,
            ..Default::default()
        };
        a += PriorityCounts {
            compulsory: 2,
            forbidden: 1,
            ..Default::default()
        };
        assert_eq!(a.compulsory, 3);
        assert_eq!(a.total(), 4);
    }
}
