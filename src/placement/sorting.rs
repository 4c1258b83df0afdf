//! Bucket ordering.
//!
//! The reference bucket is ordered by `spec_y`, the fillable buckets by `spec_x`, ascending.
//! Keys are snapped to a [`SORT_THRESHOLD`] grid before comparison so that values closer
//! than the threshold compare equal and keep their input order (the sort is stable). The
//! snapped comparison is a total order, so sorting an already sorted bucket is a no-op.
//!
//! The threshold only applies here; overlap and fit tests compare raw values.
use std::cmp::Ordering;

use crate::catalog::{CatalogArena, CatalogObject, ObjIdx};
use crate::constants::SORT_THRESHOLD;
use crate::placement::ingest::PartitionedCatalog;

#[inline]
fn snapped(value: f64) -> f64 {
    (value / SORT_THRESHOLD).round()
}

/// Compare two keys, treating values on the same threshold cell as equal.
pub fn threshold_cmp(a: f64, b: f64) -> Ordering {
    snapped(a).total_cmp(&snapped(b))
}

/// Stable sort of a bucket by a key of its objects.
pub fn sort_bucket<F>(bucket: &mut [ObjIdx], arena: &CatalogArena, key: F)
where
    F: Fn(&CatalogObject) -> f64,
{
    bucket.sort_by(|&a, &b| threshold_cmp(key(&arena[a]), key(&arena[b])));
}

/// Sort every bucket of the catalog once, before any mask is designed.
pub fn sort_buckets(catalog: &mut PartitionedCatalog) {
    let PartitionedCatalog {
        arena,
        references,
        compulsory,
        secondary,
        tertiary,
    } = catalog;

    sort_bucket(references, arena, |o| o.spec_y);
    for bucket in [compulsory, secondary, tertiary] {
        sort_bucket(bucket, arena, |o| o.spec_x);
    }
}

#[cfg(test)]
mod sorting_test {
    use super::*;
    use crate::catalog::Priority;
    use crate::placement::test_support::object;

    #[test]
    fn test_threshold_cmp() {
        assert_eq!(threshold_cmp(1.0, 1.0 + 1e-9), Ordering::Equal);
        assert_eq!(threshold_cmp(1.0, 1.0 + 1e-5), Ordering::Less);
        assert_eq!(threshold_cmp(2.0, 1.0), Ordering::Greater);
    }

    #[test]
    fn test_sort_buckets() {
        let mut catalog = PartitionedCatalog::default();
        for (id, x, y, priority) in [
            (1, 300.0, 900.0, Priority::Acquisition),
            (2, 300.0, 100.0, Priority::Acquisition),
            (3, 500.0, 0.0, Priority::Tertiary),
            (4, 100.0, 0.0, Priority::Tertiary),
            // within the threshold of object 4: keeps its input position after it
            (5, 100.0 + 1e-8, 0.0, Priority::Tertiary),
            (6, 100.0 - 1e-8, 0.0, Priority::Tertiary),
        ] {
            let idx = catalog.arena.push(object(id, x, y, 5.0, priority));
            match priority {
                Priority::Acquisition => catalog.references.push(idx),
                _ => catalog.tertiary.push(idx),
            }
        }

        sort_buckets(&mut catalog);
        let ids = |bucket: &[ObjIdx]| -> Vec<i64> {
            bucket.iter().map(|&i| catalog.arena[i].id).collect()
        };
        assert_eq!(ids(&catalog.references), vec![2, 1]);
        assert_eq!(ids(&catalog.tertiary), vec![4, 5, 6, 3]);

        // sorting twice changes nothing
        let before = catalog.tertiary.clone();
        sort_buckets(&mut catalog);
        assert_eq!(catalog.tertiary, before);
    }
}
