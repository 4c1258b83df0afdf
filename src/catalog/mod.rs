//! # Catalog objects
//!
//! Input-side data model of the slit placement pipeline.
//!
//! ## Overview
//!
//! - [`CatalogRecord`] – one raw row of the object table, exactly as read from the ingestion
//!   collaborator (CSV here, a FITS table in the observatory tools).
//! - [`Priority`] – typed view of the `priority` column, used for routing and weights. The
//!   raw `priority` and `slittype` strings are carried to the output unchanged.
//! - [`CatalogObject`] – an ingested object: raw fields converted to pixels plus the derived
//!   spectrum centre and the per-run placement state.
//! - [`CatalogArena`] – owner of every ingested object. Buckets, reference lists and candidate
//!   pools all refer to objects through an [`ObjIdx`] into the arena.
//!
//! ## Units
//!
//! | column            | unit                  |
//! |-------------------|-----------------------|
//! | `RA`, `DEC`       | degrees               |
//! | `x_ccd`, `y_ccd`  | binned pixels         |
//! | `slitpos_*`       | arcsec                |
//! | `slitsize_*`      | arcsec                |
//! | `slittilt`        | degrees               |
//!
//! ## See also
//! ------------
//! * [`crate::catalog::csv_reader`] – CSV adapter producing [`CatalogRecord`]s.
//! * [`crate::placement::ingest`] – Converts records into [`CatalogObject`]s.
pub mod csv_reader;

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::constants::{ArcSec, Degree, MaskId, ObjectId, Pixel};

/// Priority class of a catalog object.
///
/// Variants
/// -----------------
/// * `Acquisition` – code `"0"`, fixed reference box, never strip-packed.
/// * `Compulsory` – code `"1"`, highest fill priority.
/// * `Secondary` – code `"2"`.
/// * `Tertiary` – code `"3"`, also used for any unrecognized code.
/// * `Forbidden` – code `"X"`, never placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Acquisition,
    Compulsory,
    Secondary,
    Tertiary,
    Forbidden,
}

impl Priority {
    /// Parse a priority code. Unknown codes fall back to [`Priority::Tertiary`].
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => Priority::Acquisition,
            "1" => Priority::Compulsory,
            "2" => Priority::Secondary,
            "3" => Priority::Tertiary,
            "X" => Priority::Forbidden,
            other => {
                log::debug!("Unrecognized priority code {other:?}, treated as priority 3");
                Priority::Tertiary
            }
        }
    }
}

/// One raw row of the object table.
///
/// Field names follow the table column names so that the record can be deserialized
/// directly from a CSV export of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "ID")]
    pub id: ObjectId,
    #[serde(rename = "RA")]
    pub ra: Degree,
    #[serde(rename = "DEC")]
    pub dec: Degree,
    pub x_ccd: Pixel,
    pub y_ccd: Pixel,
    #[serde(default)]
    pub slitpos_x: ArcSec,
    #[serde(default)]
    pub slitpos_y: ArcSec,
    pub slitsize_x: ArcSec,
    pub slitsize_y: ArcSec,
    #[serde(default)]
    pub slittilt: Degree,
    #[serde(rename = "MAG", default)]
    pub mag: f64,
    pub priority: String,
    #[serde(default = "default_slit_type")]
    pub slittype: String,
}

fn default_slit_type() -> String {
    "R".to_string()
}

impl CatalogRecord {
    /// Build a rectangular-slit record with zero slit offsets, tilt and magnitude.
    ///
    /// Arguments
    /// -----------------
    /// * `id` – Object identifier.
    /// * `x_ccd`, `y_ccd` – Detector position in binned pixels.
    /// * `slitsize` – `(width, length)` of the slit in arcsec.
    /// * `priority` – Priority code (`"0"`, `"1"`, `"2"`, `"3"`, `"X"`).
    pub fn new(
        id: ObjectId,
        x_ccd: Pixel,
        y_ccd: Pixel,
        slitsize: (ArcSec, ArcSec),
        priority: &str,
    ) -> Self {
        CatalogRecord {
            id,
            ra: 0.0,
            dec: 0.0,
            x_ccd,
            y_ccd,
            slitpos_x: 0.0,
            slitpos_y: 0.0,
            slitsize_x: slitsize.0,
            slitsize_y: slitsize.1,
            slittilt: 0.0,
            mag: 0.0,
            priority: priority.to_string(),
            slittype: default_slit_type(),
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::from_code(&self.priority)
    }
}

/// An ingested catalog object.
///
/// Geometry is immutable once ingestion is done. The only fields written afterwards are
/// [`CatalogObject::used_by`] and [`CatalogObject::in_bands`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogObject {
    pub id: ObjectId,
    pub ra: Degree,
    pub dec: Degree,
    pub x_ccd: Pixel,
    pub y_ccd: Pixel,
    /// Slit x offset (arcsec)
    pub slitpos_x: ArcSec,
    /// Slit y offset (arcsec), nod-corrected in micro-shuffle mode
    pub slitpos_y: ArcSec,
    /// Half slit length along the spatial axis (pixels)
    pub len: Pixel,
    /// Slit width (pixels)
    pub width: Pixel,
    pub tilt: Degree,
    pub mag: f64,
    pub priority: Priority,
    /// Raw `priority` column, written back verbatim
    pub priority_code: String,
    /// Raw `slittype` column, written back verbatim
    pub slit_type: String,
    /// Centre of the dispersed spectrum, x (pixels)
    pub spec_x: Pixel,
    /// Centre of the slit and spectrum, y (pixels)
    pub spec_y: Pixel,
    /// Set when the object lies inside an active nod-and-shuffle band
    pub in_bands: bool,
    /// Mask replica that placed this object, if any
    pub used_by: Option<MaskId>,
}

impl CatalogObject {
    pub fn is_available(&self) -> bool {
        self.used_by.is_none()
    }

    /// Slit centre along x, in pixels.
    pub fn slit_x(&self, pixel_scale: f64) -> Pixel {
        self.x_ccd + self.slitpos_x / pixel_scale
    }

    /// Lowest row of the footprint, including sky region and separation margin.
    pub fn bottom(&self, sky_region: Pixel, dslit: Pixel) -> Pixel {
        self.spec_y - self.len - sky_region - dslit
    }

    /// Highest row of the footprint, including sky region and separation margin.
    pub fn top(&self, sky_region: Pixel, dslit: Pixel) -> Pixel {
        self.spec_y + self.len + sky_region + dslit
    }
}

/// Index of an object inside a [`CatalogArena`].
pub type ObjIdx = usize;

/// Owner of every ingested [`CatalogObject`] for one optimizer run.
#[derive(Debug, Clone, Default)]
pub struct CatalogArena {
    objects: Vec<CatalogObject>,
}

impl CatalogArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: CatalogObject) -> ObjIdx {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogObject> {
        self.objects.iter()
    }

    /// Record that `mask` placed the object at `idx`.
    pub fn mark_used(&mut self, idx: ObjIdx, mask: MaskId) {
        let object = &mut self.objects[idx];
        if let Some(previous) = object.used_by {
            log::error!(
                "Object {} placed by mask {mask} was already used by mask {previous}",
                object.id
            );
        }
        object.used_by = Some(mask);
    }
}

impl Index<ObjIdx> for CatalogArena {
    type Output = CatalogObject;

    fn index(&self, idx: ObjIdx) -> &Self::Output {
        &self.objects[idx]
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    #[test]
    fn test_priority_codes() {
        assert_eq!(Priority::from_code("0"), Priority::Acquisition);
        assert_eq!(Priority::from_code("1"), Priority::Compulsory);
        assert_eq!(Priority::from_code(" 2 "), Priority::Secondary);
        assert_eq!(Priority::from_code("3"), Priority::Tertiary);
        assert_eq!(Priority::from_code("X"), Priority::Forbidden);

        // unknown codes are priority 3
        assert_eq!(Priority::from_code("S"), Priority::Tertiary);
        assert_eq!(Priority::from_code(""), Priority::Tertiary);

        // only the upper-case code forbids an object
        assert_eq!(Priority::from_code("x"), Priority::Tertiary);
    }

    #[test]
    fn test_arena_marks_used() {
        let mut arena = CatalogArena::new();
        let object = crate::placement::test_support::object(5, 100.0, 200.0, 10.0, Priority::Secondary);
        let idx = arena.push(object);
        assert_eq!(arena.len(), 1);
        assert!(arena[idx].is_available());

        arena.mark_used(idx, 2);
        assert_eq!(arena[idx].used_by, Some(2));
        assert!(!arena[idx].is_available());
    }
}
