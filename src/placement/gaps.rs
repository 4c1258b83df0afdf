//! Gap framing.
//!
//! A gap is the detector row range between two consecutive [`Boundary`] boxes, shrunk by half
//! a box and half the slit separation on each side:
//!
//! ```text
//! y_start = trunc(lower.y + half_ref + dslit / 2)
//! y_end   = trunc(upper.y - half_ref - dslit / 2)
//! ```
//!
//! In micro-shuffle mode the top of the gap is lowered by the shuffle distance so that the
//! shuffled image of the last slit stays inside the gap. In band shuffle mode the gap is
//! further clipped to every band it intersects.
use crate::catalog::CatalogArena;
use crate::constants::Pixel;
use crate::instrument::shuffle::Band;
use crate::placement::reference::Boundary;
use crate::placement::PlacementContext;

/// Row range `[y_start, y_end]` available to the strip packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub y_start: i64,
    pub y_end: i64,
}

impl Gap {
    pub fn new(y_start: i64, y_end: i64) -> Self {
        Gap { y_start, y_end }
    }

    pub fn is_empty(&self) -> bool {
        self.y_end <= self.y_start
    }
}

/// Frame the gap between two boundaries.
pub fn frame_gap(
    lower: Boundary,
    upper: Boundary,
    arena: &CatalogArena,
    ctx: &PlacementContext,
) -> Gap {
    let margin = ctx.half_ref + ctx.dslit / 2.0;
    let y_start = (lower.y(arena, &ctx.fov) + margin).trunc() as i64;
    let mut y_end = (upper.y(arena, &ctx.fov) - margin).trunc() as i64;
    if ctx.micro.is_some() {
        // the shift may be fractional in binned rows
        y_end = (y_end as Pixel - ctx.shuffle_rows()).trunc() as i64;
    }
    Gap::new(y_start, y_end)
}

/// Clip a gap to the bands it intersects.
///
/// Arguments
/// -----------------
/// * `gap` – Framed gap.
/// * `bands` – Bands ordered by increasing y.
/// * `binning` – Detector binning, bands being defined in unbinned pixels.
///
/// Return
/// ----------
/// * One clipped gap per intersected band, bottom to top. An empty vector means the gap lies
///   outside every band.
pub fn clip_to_bands(gap: Gap, bands: &[Band], binning: u32) -> Vec<Gap> {
    let mut clipped = Vec::new();
    for band in bands {
        let (low, high) = band.row_limits(binning);
        if gap.y_end < low {
            // bands are sorted: nothing above can intersect either
            break;
        }
        if gap.y_start > high {
            continue;
        }
        clipped.push(Gap::new(gap.y_start.max(low), gap.y_end.min(high)));
    }
    clipped
}
