//! # Acquisition references
//!
//! Acquisition objects get a fixed square box and are written to every mask before any strip
//! is packed. Two boxes must not overlap along y, so the y-sorted reference bucket is walked
//! once:
//!
//! * the first object is kept,
//! * a following object is kept only if `last_kept.spec_y + half_ref < spec_y - half_ref`,
//! * otherwise it is dropped as overlapped and the walk keeps comparing against the last
//!   kept object.
//!
//! The kept references split the detector into gaps. The two detector edges (row 1 and the
//! detector height) act as the outer boundaries, so the span below the first reference and the
//! span above the last one are ordinary gaps.
use itertools::Itertools;

use crate::catalog::{CatalogArena, ObjIdx};
use crate::constants::{Pixel, MIN_DETECTOR_Y};
use crate::instrument::fov::FovPixels;

/// Lower or upper limit of a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Row 1 of the detector
    DetectorBottom,
    /// A kept acquisition object
    Reference(ObjIdx),
    /// Last row of the detector
    DetectorTop,
}

impl Boundary {
    /// Row the boundary box is centred on.
    pub fn y(&self, arena: &CatalogArena, fov: &FovPixels) -> Pixel {
        match self {
            Boundary::DetectorBottom => MIN_DETECTOR_Y,
            Boundary::Reference(idx) => arena[*idx].spec_y,
            Boundary::DetectorTop => fov.y.dim,
        }
    }
}

/// Result of the reference de-overlap pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceList {
    kept: Vec<ObjIdx>,
    overlapped: Vec<ObjIdx>,
}

impl ReferenceList {
    /// Kept references, ordered by `spec_y`.
    pub fn kept(&self) -> &[ObjIdx] {
        &self.kept
    }

    pub fn overlapped(&self) -> &[ObjIdx] {
        &self.overlapped
    }

    /// Kept references framed by the two detector edges.
    pub fn boundaries(&self) -> Vec<Boundary> {
        std::iter::once(Boundary::DetectorBottom)
            .chain(self.kept.iter().map(|&idx| Boundary::Reference(idx)))
            .chain(std::iter::once(Boundary::DetectorTop))
            .collect()
    }

    /// Consecutive `(lower, upper)` boundary pairs, bottom to top.
    pub fn gaps(&self) -> impl Iterator<Item = (Boundary, Boundary)> {
        self.boundaries().into_iter().tuple_windows()
    }
}

/// Drop the references whose boxes overlap along y.
///
/// Arguments
/// -----------------
/// * `bucket` – Reference bucket sorted by `spec_y`.
/// * `arena` – Owner of the objects.
/// * `half_ref` – Half side of an acquisition box in pixels.
///
/// Return
/// ----------
/// * The kept and overlapped references, each in bucket order.
pub fn deoverlap(bucket: &[ObjIdx], arena: &CatalogArena, half_ref: Pixel) -> ReferenceList {
    let mut list = ReferenceList::default();

    for &idx in bucket {
        let candidate = &arena[idx];
        match list.kept.last() {
            Some(&last) if arena[last].spec_y + half_ref >= candidate.spec_y - half_ref => {
                log::warn!(
                    "Acquisition object {} overlaps acquisition object {} and was dropped",
                    candidate.id,
                    arena[last].id
                );
                list.overlapped.push(idx);
            }
            _ => list.kept.push(idx),
        }
    }

    list
}

#[cfg(test)]
mod reference_test {
    use super::*;
    use crate::catalog::Priority;
    use crate::placement::test_support::{context, object};

    fn arena(ys: &[f64]) -> (CatalogArena, Vec<ObjIdx>) {
        let mut arena = CatalogArena::new();
        let bucket = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| arena.push(object(i as i64 + 1, 2000.0, y, 10.0, Priority::Acquisition)))
            .collect();
        (arena, bucket)
    }

    #[test]
    fn test_deoverlap_keeps_walking_from_last_kept() {
        // half_ref = 20: boxes need more than 40 rows between centres
        let (arena, bucket) = arena(&[100.0, 130.0, 141.0, 150.0, 200.0]);
        let list = deoverlap(&bucket, &arena, 20.0);

        let ids = |v: &[ObjIdx]| v.iter().map(|&i| arena[i].id).collect::<Vec<_>>();
        // 130 overlaps 100; 141 is compared to 100 again and kept; 150 overlaps 141
        assert_eq!(ids(list.kept()), vec![1, 3, 5]);
        assert_eq!(ids(list.overlapped()), vec![2, 4]);
    }

    #[test]
    fn test_exact_contact_is_overlap() {
        let (arena, bucket) = arena(&[100.0, 140.0]);
        let list = deoverlap(&bucket, &arena, 20.0);
        assert_eq!(list.kept().len(), 1);
        assert_eq!(list.overlapped().len(), 1);
    }

    #[test]
    fn test_gaps_with_detector_edges() {
        let ctx = context();
        let (arena, bucket) = arena(&[1000.0]);
        let list = deoverlap(&bucket, &arena, ctx.half_ref);

        let gaps: Vec<_> = list.gaps().collect();
        assert_eq!(
            gaps,
            vec![
                (Boundary::DetectorBottom, Boundary::Reference(0)),
                (Boundary::Reference(0), Boundary::DetectorTop),
            ]
        );
        assert_eq!(gaps[0].0.y(&arena, &ctx.fov), 1.0);
        assert_eq!(gaps[0].1.y(&arena, &ctx.fov), 1000.0);
        assert_eq!(gaps[1].1.y(&arena, &ctx.fov), ctx.fov.y.dim);

        // no reference at all: one gap over the whole detector
        let empty = ReferenceList::default();
        assert_eq!(
            empty.gaps().collect::<Vec<_>>(),
            vec![(Boundary::DetectorBottom, Boundary::DetectorTop)]
        );
    }
}
