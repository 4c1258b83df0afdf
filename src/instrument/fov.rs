//! # Detector field of view
//!
//! The usable field of view of the mask is a rectangle whose four corners are cut by
//! triangles, with an optional skew that lowers the upper y bound:
//!
//! ```text
//!            TL.dx          TR.dx
//!             |               |
//!                B         C
//!   TL.dy -    /             \      - TR.dy
//!            A                 D
//!
//!            E                 H
//!   BL.dy -    \             /      - BR.dy
//!                F         G
//! ```
//!
//! [`FieldOfView`] is configured in **arcseconds** so that it does not depend on the detector
//! binning; [`FieldOfView::in_pixels`] turns it into a [`FovPixels`] for a given pixel
//! scale, which is what the clipper and the optimizer work with.
//!
//! ## See also
//! ------------
//! * [`clip_to_fov`] – Drops catalog rows outside the field of view.
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogRecord, Priority};
use crate::constants::{ArcSec, Pixel, MIN_DETECTOR_Y};
use crate::placement::tally::PriorityCounts;

/// Start/end/extent of the field of view along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds<T> {
    pub start: T,
    pub end: T,
    /// Full detector extent along the axis
    pub dim: T,
}

/// Size of one corner cut triangle along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerCut<T> {
    pub dx: T,
    pub dy: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub x: AxisBounds<ArcSec>,
    pub y: AxisBounds<ArcSec>,
    pub top_left: CornerCut<ArcSec>,
    pub top_right: CornerCut<ArcSec>,
    pub bottom_left: CornerCut<ArcSec>,
    pub bottom_right: CornerCut<ArcSec>,
    /// Amount removed from the upper y bound
    pub y_skew: ArcSec,
}

impl Default for FieldOfView {
    fn default() -> Self {
        FieldOfView::gmos_north()
    }
}

impl FieldOfView {
    /// Field of view of the GMOS-N imaging area (three-chip mosaic, 0.0727"/pixel).
    pub fn gmos_north() -> Self {
        let cut = CornerCut {
            dx: 40.0,
            dy: 40.0,
        };
        FieldOfView {
            x: AxisBounds {
                start: 67.4656,
                end: 384.6557,
                dim: 452.0486,
            },
            y: AxisBounds {
                start: 9.3056,
                end: 326.0595,
                dim: 335.0016,
            },
            top_left: cut,
            top_right: cut,
            bottom_left: cut,
            bottom_right: cut,
            y_skew: 0.0,
        }
    }

    /// Convert the field of view to detector pixels.
    ///
    /// Arguments
    /// -----------------
    /// * `pixel_scale` – Arcseconds per (binned) pixel.
    pub fn in_pixels(&self, pixel_scale: f64) -> FovPixels {
        let axis = |a: &AxisBounds<ArcSec>| AxisBounds {
            start: a.start / pixel_scale,
            end: a.end / pixel_scale,
            dim: a.dim / pixel_scale,
        };
        let corner = |c: &CornerCut<ArcSec>| CornerCut {
            dx: c.dx / pixel_scale,
            dy: c.dy / pixel_scale,
        };
        FovPixels {
            x: axis(&self.x),
            y: axis(&self.y),
            top_left: corner(&self.top_left),
            top_right: corner(&self.top_right),
            bottom_left: corner(&self.bottom_left),
            bottom_right: corner(&self.bottom_right),
            y_skew: self.y_skew / pixel_scale,
        }
    }
}

/// Straight line `y = slope * x + intercept` cutting one corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerLine {
    pub slope: f64,
    pub intercept: f64,
    /// The inside of the field of view is below the line (top corners) or above it
    pub keep_below: bool,
}

impl CornerLine {
    fn through(p: (Pixel, Pixel), q: (Pixel, Pixel), keep_below: bool) -> Self {
        let slope = (q.1 - p.1) / (q.0 - p.0);
        CornerLine {
            slope,
            intercept: p.1 - slope * p.0,
            keep_below,
        }
    }

    pub fn is_inside(&self, x: Pixel, y: Pixel) -> bool {
        let line_y = self.slope * x + self.intercept;
        if self.keep_below {
            y <= line_y
        } else {
            y >= line_y
        }
    }
}

/// Field of view expressed in detector pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovPixels {
    pub x: AxisBounds<Pixel>,
    pub y: AxisBounds<Pixel>,
    pub top_left: CornerCut<Pixel>,
    pub top_right: CornerCut<Pixel>,
    pub bottom_left: CornerCut<Pixel>,
    pub bottom_right: CornerCut<Pixel>,
    pub y_skew: Pixel,
}

impl FovPixels {
    /// Lines of the four corner cuts, built from the points A..H of the module sketch.
    /// A corner with a zero extent on either axis has no line.
    pub fn corner_lines(&self) -> Vec<CornerLine> {
        let (xs, xe, ys, ye) = (self.x.start, self.x.end, self.y.start, self.y.end);
        let corners = [
            // A(xs, ye - dy) -> B(xs + dx, ye)
            (
                self.top_left,
                (xs, ye - self.top_left.dy),
                (xs + self.top_left.dx, ye),
                true,
            ),
            // C(xe - dx, ye) -> D(xe, ye - dy)
            (
                self.top_right,
                (xe - self.top_right.dx, ye),
                (xe, ye - self.top_right.dy),
                true,
            ),
            // E(xs, ys + dy) -> F(xs + dx, ys)
            (
                self.bottom_left,
                (xs, ys + self.bottom_left.dy),
                (xs + self.bottom_left.dx, ys),
                false,
            ),
            // G(xe - dx, ys) -> H(xe, ys + dy)
            (
                self.bottom_right,
                (xe - self.bottom_right.dx, ys),
                (xe, ys + self.bottom_right.dy),
                false,
            ),
        ];

        corners
            .into_iter()
            .filter(|(cut, ..)| cut.dx > 0.0 && cut.dy > 0.0)
            .map(|(_, p, q, keep_below)| CornerLine::through(p, q, keep_below))
            .collect()
    }

    /// `true` if the detector position lies inside the field of view.
    pub fn contains(&self, x: Pixel, y: Pixel) -> bool {
        self.contains_with(&self.corner_lines(), x, y)
    }

    /// Same as [`FovPixels::contains`] with precomputed corner lines.
    fn contains_with(&self, lines: &[CornerLine], x: Pixel, y: Pixel) -> bool {
        let in_bounds = x >= self.x.start
            && x <= self.x.end
            && y >= self.y.start
            && y <= self.y.end - self.y_skew
            && y >= MIN_DETECTOR_Y;

        in_bounds && lines.iter().all(|l| l.is_inside(x, y))
    }
}

/// Per-priority count of rows removed by [`clip_to_fov`].
pub type FovRejections = PriorityCounts;

/// Keep the catalog rows whose slit position lies inside the field of view.
///
/// The slit position is `x_ccd + slitpos_x / pixel_scale`, `y_ccd + slitpos_y / pixel_scale`.
///
/// Arguments
/// -----------------
/// * `records` – Raw catalog rows.
/// * `fov` – Field of view in pixels.
/// * `pixel_scale` – Arcseconds per pixel, used for the slit offsets.
///
/// Return
/// ----------
/// * The surviving rows in input order and the per-priority count of rejected rows.
pub fn clip_to_fov(
    records: Vec<CatalogRecord>,
    fov: &FovPixels,
    pixel_scale: f64,
) -> (Vec<CatalogRecord>, FovRejections) {
    let lines = fov.corner_lines();
    let mut rejected = FovRejections::default();

    let kept = records
        .into_iter()
        .filter(|r| {
            let x = r.x_ccd + r.slitpos_x / pixel_scale;
            let y = r.y_ccd + r.slitpos_y / pixel_scale;
            let inside = fov.contains_with(&lines, x, y);
            if !inside {
                let priority: Priority = r.priority();
                log::debug!("Object {} outside the field of view ({x:.1}, {y:.1})", r.id);
                rejected.add(priority);
            }
            inside
        })
        .collect();

    (kept, rejected)
}
