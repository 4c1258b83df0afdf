//! # Mask output tables
//!
//! One [`MaskTable`] per mask replica: the acquisition rows first, then the strip rows in
//! placement order. Rows are never reordered or deduplicated.
//!
//! | column                   | unit / content                                  |
//! |--------------------------|-------------------------------------------------|
//! | `ID`, `RA`, `DEC`        | as in the catalog                               |
//! | `x_ccd`, `y_ccd`         | binned pixels                                   |
//! | `specpos_x`, `specpos_y` | spectrum centre relative to the CCD position    |
//! | `slitpos_x`, `slitpos_y` | arcsec, `slitpos_y` nod-corrected               |
//! | `slitsize_x`, `slitsize_y` | arcsec                                        |
//! | `slittilt`               | degrees, zero for acquisition boxes             |
//! | `MAG`, `priority`, `slittype` | as in the catalog                          |
//!
//! ## See also
//! ------------
//! * [`csv_writer`] – CSV serialization of the tables.
//! * [`display`] – Summary tables for the terminal.
pub mod csv_writer;
pub mod display;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogObject;
use crate::constants::{ArcSec, Degree, MaskId, ObjectId, Pixel, ACQUISITION_BOX};
use crate::placement::tally::MaskSummary;
use crate::placement::PlacementContext;

/// One placed slit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlitRow {
    #[serde(rename = "ID")]
    pub id: ObjectId,
    #[serde(rename = "RA")]
    pub ra: Degree,
    #[serde(rename = "DEC")]
    pub dec: Degree,
    pub x_ccd: Pixel,
    pub y_ccd: Pixel,
    pub specpos_x: Pixel,
    pub specpos_y: Pixel,
    pub slitpos_x: ArcSec,
    pub slitpos_y: ArcSec,
    pub slitsize_x: ArcSec,
    pub slitsize_y: ArcSec,
    pub slittilt: Degree,
    #[serde(rename = "MAG")]
    pub mag: f64,
    pub priority: String,
    pub slittype: String,
}

impl SlitRow {
    fn with_size(object: &CatalogObject, slitsize_x: ArcSec, slitsize_y: ArcSec) -> Self {
        SlitRow {
            id: object.id,
            ra: object.ra,
            dec: object.dec,
            x_ccd: object.x_ccd,
            y_ccd: object.y_ccd,
            specpos_x: object.spec_x - object.x_ccd,
            specpos_y: object.spec_y - object.y_ccd,
            slitpos_x: object.slitpos_x,
            slitpos_y: object.slitpos_y,
            slitsize_x,
            slitsize_y,
            slittilt: object.tilt,
            mag: object.mag,
            priority: object.priority_code.clone(),
            slittype: object.slit_type.clone(),
        }
    }

    /// Row of an acquisition box.
    pub fn reference(object: &CatalogObject) -> Self {
        Self::with_size(object, ACQUISITION_BOX, ACQUISITION_BOX)
    }

    /// Row of a strip-packed slit.
    ///
    /// The slit length is the micro-shuffle slit length when that mode is active, otherwise
    /// `(len + sky_region) · 2 · pixel_scale`.
    pub fn strip(object: &CatalogObject, ctx: &PlacementContext) -> Self {
        let slitsize_x = object.width * ctx.pixel_scale;
        let slitsize_y = match &ctx.micro {
            Some(micro) => micro.slit_length,
            None => (object.len + ctx.sky_region) * 2.0 * ctx.pixel_scale,
        };
        Self::with_size(object, slitsize_x, slitsize_y)
    }
}

/// Rows and counters of one mask replica.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskTable {
    pub mask: MaskId,
    pub rows: Vec<SlitRow>,
    pub summary: MaskSummary,
}

impl MaskTable {
    pub fn new(mask: MaskId) -> Self {
        MaskTable {
            mask,
            rows: Vec::new(),
            summary: MaskSummary::new(mask),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Object identifiers in row order.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// File name of the table for an output stem, e.g. `fieldODF1.csv`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}ODF{}.csv", self.mask)
    }
}
