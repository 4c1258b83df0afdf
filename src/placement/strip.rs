//! # Strip generator and packer
//!
//! Fills one [`Gap`] with fillable objects, strip after strip, from the bottom of the gap to
//! its top.
//!
//! ## Algorithm
//!
//! 1. [`collect_candidates`] gathers the unused compulsory, secondary and tertiary objects
//!    whose footprint fits in the gap, in bucket order. The first strip starts one row below
//!    the lowest footprint.
//! 2. [`best_strip`] tries the strip widths `MINL, MINL + STEPL, …, MAXL` (the last one
//!    clamped to the top of the gap). For each width, [`fill_strip`] selects objects first-fit
//!    in pool order, rejecting any object whose slit or spectrum box conflicts with an object
//!    already selected. The width with the highest `weight / width` density wins; ties keep
//!    the narrower width.
//! 3. [`pack_gap`] commits the winner: its members are marked as used by the current mask and
//!    the next strip starts at the top of the highest member. When nothing fits, the packer
//!    jumps to the next object lying beyond a full `MAXL` strip, or gives up on the gap.
//!
//! Footprint
//! -----------------
//! With `dslit` the minimum slit separation and `sky` the sky region:
//!
//! ```text
//! bottom = spec_y - len - sky - dslit
//! top    = spec_y + len + sky + dslit
//! ```
//!
//! Conflict test
//! -----------------
//! Two objects conflict when their y extents `spec_y ± (len + sky)` are closer than `dslit`
//! and either their slits `slit_x ± width / 2` or their spectra `spec_x ± half_spec_len` are
//! closer than `DSPECT` along x. Intervals touching within the clearance count as
//! overlapping.
use crate::catalog::{CatalogArena, CatalogObject, ObjIdx};
use crate::constants::{MaskId, Pixel, DSPECT, MAXL, MINL, STEPL};
use crate::placement::gaps::Gap;
use crate::placement::tally::PriorityCounts;
use crate::placement::PlacementContext;

/// Closed interval along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: Pixel,
    pub hi: Pixel,
}

impl Interval {
    pub fn centred(centre: Pixel, half: Pixel) -> Self {
        Interval {
            lo: centre - half,
            hi: centre + half,
        }
    }

    /// `true` if the two intervals are closer than `clearance`.
    pub fn overlaps(&self, other: &Interval, clearance: Pixel) -> bool {
        self.lo <= other.hi + clearance && other.lo <= self.hi + clearance
    }
}

/// Slit box of an object: `(x extent, y extent)`.
pub fn slit_box(object: &CatalogObject, ctx: &PlacementContext) -> (Interval, Interval) {
    (
        Interval::centred(object.slit_x(ctx.pixel_scale), object.width / 2.0),
        y_extent(object, ctx),
    )
}

/// Spectrum box of an object: `(x extent, y extent)`.
pub fn spectrum_box(object: &CatalogObject, ctx: &PlacementContext) -> (Interval, Interval) {
    (
        Interval::centred(object.spec_x, ctx.half_spec_len as Pixel),
        y_extent(object, ctx),
    )
}

fn y_extent(object: &CatalogObject, ctx: &PlacementContext) -> Interval {
    Interval::centred(object.spec_y, object.len + ctx.sky_region)
}

/// `true` if the slits or the spectra of two objects overlap.
pub fn conflicts(a: &CatalogObject, b: &CatalogObject, ctx: &PlacementContext) -> bool {
    let (slit_ax, ay) = slit_box(a, ctx);
    let (slit_bx, by) = slit_box(b, ctx);
    if !ay.overlaps(&by, ctx.dslit) {
        return false;
    }
    let (spec_ax, _) = spectrum_box(a, ctx);
    let (spec_bx, _) = spectrum_box(b, ctx);
    slit_ax.overlaps(&slit_bx, DSPECT) || spec_ax.overlaps(&spec_bx, DSPECT)
}

#[inline]
fn bottom(object: &CatalogObject, ctx: &PlacementContext) -> Pixel {
    object.bottom(ctx.sky_region, ctx.dslit)
}

#[inline]
fn top(object: &CatalogObject, ctx: &PlacementContext) -> Pixel {
    object.top(ctx.sky_region, ctx.dslit)
}

/// Fillable objects eligible for one gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    /// Compulsory, then secondary, then tertiary objects, each in bucket order
    pub members: Vec<ObjIdx>,
    /// Row where the first strip starts
    pub start: i64,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Gather the unused fillable objects whose footprint lies in the gap.
///
/// An object is eligible when `trunc(bottom) >= y_start`, `top <= y_end` and
/// `0 <= spec_x <= trunc(fov.x.end)`.
///
/// Arguments
/// -----------------
/// * `arena` – Owner of the objects.
/// * `buckets` – Fillable buckets in scan order (see
///   [`crate::placement::ingest::PartitionedCatalog::fillable`]).
/// * `gap` – Row range to fill.
/// * `ctx` – Placement geometry.
///
/// Return
/// ----------
/// * The pool; `start` is one row below the lowest `trunc(bottom)`, or `y_end - 1` when the
///   pool is empty.
pub fn collect_candidates(
    arena: &CatalogArena,
    buckets: [&[ObjIdx]; 3],
    gap: Gap,
    ctx: &PlacementContext,
) -> CandidatePool {
    let x_end = ctx.fov.x.end.trunc();
    let mut start = gap.y_end;
    let mut members = Vec::new();

    for &idx in buckets.into_iter().flatten() {
        let object = &arena[idx];
        if !object.is_available() {
            continue;
        }
        let low = bottom(object, ctx).trunc() as i64;
        if low >= gap.y_start
            && top(object, ctx) <= gap.y_end as Pixel
            && object.spec_x >= 0.0
            && object.spec_x <= x_end
        {
            members.push(idx);
            start = start.min(low);
        }
    }

    CandidatePool {
        members,
        start: start - 1,
    }
}

/// Objects selected for one strip width.
#[derive(Debug, Clone, PartialEq)]
pub struct StripSelection {
    /// First row of the strip
    pub y: i64,
    pub width: i64,
    /// Selected pool members, in pool order
    pub members: Vec<ObjIdx>,
    pub counts: PriorityCounts,
    /// No unused pool object starts at or above `y`
    pub exhausted: bool,
}

impl StripSelection {
    pub fn empty(y: i64, width: i64) -> Self {
        StripSelection {
            y,
            width,
            members: Vec::new(),
            counts: PriorityCounts::default(),
            exhausted: true,
        }
    }

    pub fn weight(&self) -> f64 {
        self.counts.weight()
    }

    /// Weight per strip row.
    pub fn density(&self) -> f64 {
        self.weight() / self.width as f64
    }
}

/// Select, first-fit in pool order, the objects that fit in the strip `[y, y + width]`
/// without conflicting with each other.
pub fn fill_strip(
    arena: &CatalogArena,
    pool: &[ObjIdx],
    y: i64,
    width: i64,
    ctx: &PlacementContext,
) -> StripSelection {
    let mut selection = StripSelection::empty(y, width);
    let (strip_low, strip_high) = (y as Pixel, (y + width) as Pixel);

    for &idx in pool {
        let object = &arena[idx];
        if !object.is_available() || bottom(object, ctx) < strip_low {
            continue;
        }
        selection.exhausted = false;

        if top(object, ctx) > strip_high {
            continue;
        }
        if selection
            .members
            .iter()
            .any(|&m| conflicts(&arena[m], object, ctx))
        {
            continue;
        }
        selection.members.push(idx);
        selection.counts.add(object.priority);
    }

    selection
}

/// Strip widths tried from row `y` in a gap ending at `y_end`.
///
/// The widths run from `MINL` to `MAXL` by `STEPL`; the first width reaching past `y_end`
/// is clamped to `y_end - y` and ends the sequence.
pub fn strip_widths(y: i64, y_end: i64) -> Vec<i64> {
    let mut widths = Vec::new();
    for width in (MINL..=MAXL).step_by(STEPL as usize) {
        if y + width > y_end {
            widths.push(y_end - y);
            break;
        }
        widths.push(width);
    }
    widths
}

/// Run the width search from row `y`.
///
/// Return
/// ----------
/// * `None` when no unused pool object starts at or above `y`.
/// * Otherwise the selection with the strictly highest `weight / width`, starting from an
///   empty selection at width `MAXL`. The selection may be empty.
pub fn best_strip(
    arena: &CatalogArena,
    pool: &[ObjIdx],
    y: i64,
    y_end: i64,
    ctx: &PlacementContext,
) -> Option<StripSelection> {
    let mut best = StripSelection::empty(y, MAXL);

    for width in strip_widths(y, y_end) {
        let selection = fill_strip(arena, pool, y, width, ctx);
        if selection.exhausted {
            return None;
        }
        log::trace!(
            "strip y={y} width={width}: {} objects, weight {}",
            selection.members.len(),
            selection.weight()
        );
        if selection.density() > best.density() {
            best = selection;
        }
    }

    Some(best)
}

/// `true` if an unused pool object fits between rows `low` and `high`.
fn any_fits(arena: &CatalogArena, pool: &[ObjIdx], low: i64, high: i64, ctx: &PlacementContext) -> bool {
    pool.iter().map(|&idx| &arena[idx]).any(|o| {
        o.is_available() && bottom(o, ctx) >= low as Pixel && top(o, ctx) <= high as Pixel
    })
}

/// Pack a gap with strips for one mask replica.
///
/// Arguments
/// -----------------
/// * `arena` – Owner of the objects; members of committed strips get `used_by = mask`.
/// * `pool` – Candidates of the gap, from [`collect_candidates`].
/// * `gap` – Row range to fill.
/// * `mask` – Mask replica being designed.
/// * `ctx` – Placement geometry.
///
/// Return
/// ----------
/// * The committed strips, bottom to top. Each strip lists its members in pool order.
pub fn pack_gap(
    arena: &mut CatalogArena,
    pool: &CandidatePool,
    gap: Gap,
    mask: MaskId,
    ctx: &PlacementContext,
) -> Vec<StripSelection> {
    let mut strips = Vec::new();
    let mut y = pool.start;

    while y < gap.y_end {
        let Some(best) = best_strip(arena, &pool.members, y, gap.y_end, ctx) else {
            break;
        };

        if best.members.is_empty() {
            // nothing fits from y: jump to the next object beyond a full strip
            let beyond = (y + MAXL) as Pixel;
            y = pool
                .members
                .iter()
                .map(|&idx| &arena[idx])
                .filter(|o| o.is_available() && bottom(o, ctx) > beyond)
                .map(|o| bottom(o, ctx).trunc() as i64)
                .min()
                .unwrap_or(gap.y_end);
            continue;
        }

        for &idx in &best.members {
            arena.mark_used(idx, mask);
        }
        let mut y2 = best
            .members
            .iter()
            .map(|&idx| top(&arena[idx], ctx).trunc() as i64)
            .max()
            .unwrap_or(y);
        if gap.y_end - y2 > 0 && !any_fits(arena, &pool.members, y2, gap.y_end, ctx) {
            y2 = (y + MAXL).min(gap.y_end);
        }

        log::debug!(
            "mask {mask}: strip [{y}, {y2}] width {} holds {} objects (weight {})",
            best.width,
            best.members.len(),
            best.weight()
        );
        strips.push(best);
        y = y2;
    }

    strips
}
