//! # Catalog ingestion and partitioning
//!
//! Turns the FOV-clipped [`CatalogRecord`]s into [`CatalogObject`]s and routes them into the
//! priority buckets of a [`PartitionedCatalog`].
//!
//! ## Per-object conversion
//!
//! * `width = slitsize_x / pixel_scale`, or the configured fixed width in pixels.
//! * `len = slitsize_y / 2 / pixel_scale`; in micro-shuffle mode
//!   `len = (shuffle_pix / binning + slit_length / pixel_scale) / 2` and every
//!   non-acquisition slit is moved by half the nod along y.
//! * `spec_x` from the anamorphic model of [`crate::instrument::spectrograph::SpectralWindow`].
//! * `spec_y = y_ccd + slitpos_y / pixel_scale`.
//!
//! An object whose spectrum box `spec_x ± width/2`, `spec_y ± len` leaves the straight
//! field of view bounds is dropped, even if its slit passed the corner clipper.
//!
//! ## See also
//! ------------
//! * [`crate::instrument::fov::clip_to_fov`] – First, slit-position based, rejection pass.
//! * [`crate::placement::sorting`] – Orders the buckets built here.
use crate::catalog::{CatalogArena, CatalogObject, CatalogRecord, ObjIdx, Priority};
use crate::constants::ArcSec;
use crate::placement::tally::{PriorityCounts, RejectionTally};
use crate::placement::PlacementContext;

/// Ingested objects and their priority buckets.
///
/// Every bucket holds indices into [`PartitionedCatalog::arena`]. Forbidden objects and objects
/// rejected by the range check are not in the arena.
#[derive(Debug, Clone, Default)]
pub struct PartitionedCatalog {
    pub arena: CatalogArena,
    /// Acquisition objects
    pub references: Vec<ObjIdx>,
    pub compulsory: Vec<ObjIdx>,
    pub secondary: Vec<ObjIdx>,
    pub tertiary: Vec<ObjIdx>,
}

impl PartitionedCatalog {
    /// Fillable buckets in scan order: compulsory, secondary, tertiary.
    pub fn fillable(&self) -> [&[ObjIdx]; 3] {
        [&self.compulsory, &self.secondary, &self.tertiary]
    }

    /// Number of objects per bucket.
    pub fn counts(&self) -> PriorityCounts {
        PriorityCounts {
            acquisition: self.references.len(),
            compulsory: self.compulsory.len(),
            secondary: self.secondary.len(),
            tertiary: self.tertiary.len(),
            forbidden: 0,
        }
    }
}

/// Convert one record to a [`CatalogObject`], without any range check.
pub fn to_object(record: CatalogRecord, ctx: &PlacementContext) -> CatalogObject {
    let ps = ctx.pixel_scale;
    let priority = record.priority();

    let width = ctx.slit_width_pix.unwrap_or(record.slitsize_x / ps);
    let mut len = record.slitsize_y / 2.0 / ps;
    let mut slitpos_y = record.slitpos_y;
    if let Some(micro) = &ctx.micro {
        len = (ctx.shuffle_rows() + micro.slit_length / ps) / 2.0;
        if priority != Priority::Acquisition {
            // whole arcsec, as the nod is
            slitpos_y += (micro.nod_amount / 2) as ArcSec;
        }
    }

    let slit_x = record.x_ccd + record.slitpos_x / ps;
    let spec_x = ctx.window.spectrum_center_x(slit_x, ctx.fov.x.dim);
    let spec_y = record.y_ccd + slitpos_y / ps;

    let tilt = if priority == Priority::Acquisition {
        0.0
    } else {
        record.slittilt
    };
    let in_bands = ctx
        .bands
        .as_ref()
        .is_some_and(|bands| bands.iter().any(|b| b.contains(spec_y, ctx.binning)));

    CatalogObject {
        id: record.id,
        ra: record.ra,
        dec: record.dec,
        x_ccd: record.x_ccd,
        y_ccd: record.y_ccd,
        slitpos_x: record.slitpos_x,
        slitpos_y,
        len,
        width,
        tilt,
        mag: record.mag,
        priority,
        priority_code: record.priority,
        slit_type: record.slittype,
        spec_x,
        spec_y,
        in_bands,
        used_by: None,
    }
}

/// `true` if the spectrum box of the object lies inside the straight field of view bounds.
pub fn in_range(object: &CatalogObject, ctx: &PlacementContext) -> bool {
    let (x, y) = (&ctx.fov.x, &ctx.fov.y);
    let half_width = object.width / 2.0;
    !(object.spec_x - half_width < x.start
        || object.spec_x + half_width > x.end
        || object.spec_y - object.len < y.start
        || object.spec_y + object.len > y.end.trunc())
}

/// Ingest the FOV-clipped records and route them by priority.
///
/// Arguments
/// -----------------
/// * `records` – Rows that survived [`crate::instrument::fov::clip_to_fov`].
/// * `ctx` – Placement geometry.
/// * `tally` – Receives the `out_of_range` and `forbidden` counts.
///
/// Return
/// ----------
/// * The partitioned catalog, buckets in input order (unsorted).
pub fn ingest(
    records: Vec<CatalogRecord>,
    ctx: &PlacementContext,
    tally: &mut RejectionTally,
) -> PartitionedCatalog {
    let mut catalog = PartitionedCatalog::default();

    for record in records {
        let object = to_object(record, ctx);

        if !in_range(&object, ctx) {
            if object.priority == Priority::Acquisition {
                log::warn!(
                    "Acquisition object {} is out of range ({:.1}, {:.1}) and was dropped",
                    object.id,
                    object.spec_x,
                    object.spec_y
                );
            } else {
                log::debug!("Object {} spectrum out of range", object.id);
            }
            tally.out_of_range.add(object.priority);
            continue;
        }

        let bucket = match object.priority {
            Priority::Acquisition => &mut catalog.references,
            Priority::Compulsory => &mut catalog.compulsory,
            Priority::Secondary => &mut catalog.secondary,
            Priority::Tertiary => &mut catalog.tertiary,
            Priority::Forbidden => {
                tally.forbidden += 1;
                continue;
            }
        };
        let idx = catalog.arena.push(object);
        bucket.push(idx);
    }

    catalog
}
