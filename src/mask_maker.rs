//! # Mask maker
//!
//! Entry point of the crate. A [`MaskMaker`] validates a [`MaskParams`] once and then turns
//! catalogs into [`MaskDesign`]s.
//!
//! ## Pipeline
//!
//! 1. [`clip_to_fov`] – drop rows whose slit lies outside the field of view.
//! 2. [`ingest`] – derive spectrum positions, range-check and partition by priority.
//! 3. [`sort_buckets`] – thresholded ordering of the buckets.
//! 4. [`deoverlap`] – drop overlapping acquisition boxes.
//! 5. For every mask replica, in order:
//!    * acquisition rows (in band mode only those lying in a band),
//!    * for every gap between consecutive references: framing, band clipping, candidate
//!      pool and strip packing.
//!
//! Objects placed by a mask stay marked for the rest of the run, so a later mask only
//! places objects no earlier mask used.
//!
//! ## Example
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use slitmask::mask_maker::MaskMaker;
//! use slitmask::mask_params::MaskParams;
//! use slitmask::output::csv_writer::write_design;
//!
//! let params = MaskParams::builder().num_masks(2).build()?;
//! let maker = MaskMaker::new(params)?;
//! let design = maker.run_csv(Utf8Path::new("catalog.csv"))?;
//! println!("{design}");
//! write_design(Utf8Path::new("masks"), "field", &design)?;
//! # Ok::<(), slitmask::slitmask_errors::MaskError>(())
//! ```
use camino::Utf8Path;

use crate::catalog::csv_reader::read_catalog_csv;
use crate::catalog::{CatalogRecord, Priority};
use crate::constants::{MaskId, ObjectId};
use crate::instrument::fov::clip_to_fov;
use crate::mask_params::MaskParams;
use crate::output::{MaskTable, SlitRow};
use crate::placement::gaps::{clip_to_bands, frame_gap};
use crate::placement::ingest::{ingest, PartitionedCatalog};
use crate::placement::reference::{deoverlap, ReferenceList};
use crate::placement::sorting::sort_buckets;
use crate::placement::strip::{collect_candidates, pack_gap};
use crate::placement::tally::{PriorityCounts, RejectionTally};
use crate::placement::PlacementContext;
use crate::slitmask_errors::MaskError;

/// Result of one optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskDesign {
    /// Objects per bucket after ingestion
    pub catalog: PriorityCounts,
    pub rejections: RejectionTally,
    /// Kept acquisition objects, by increasing `spec_y`
    pub references: Vec<ObjectId>,
    /// Acquisition objects dropped for overlapping a kept one
    pub overlapped_references: Vec<ObjectId>,
    tables: Vec<MaskTable>,
}

impl MaskDesign {
    /// One table per mask replica, in mask order.
    pub fn tables(&self) -> &[MaskTable] {
        &self.tables
    }

    /// Table of a mask replica (1-based).
    pub fn table(&self, mask: MaskId) -> Option<&MaskTable> {
        self.tables.iter().find(|t| t.mask == mask)
    }

    /// Rows written over all masks.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(MaskTable::len).sum()
    }
}

#[derive(Debug, Clone)]
pub struct MaskMaker {
    params: MaskParams,
    ctx: PlacementContext,
}

impl MaskMaker {
    /// Validate the parameters.
    ///
    /// Return
    /// ----------
    /// * The mask maker, or the configuration [`MaskError`] that prevents any mask from being
    ///   designed (see [`PlacementContext::from_params`]).
    pub fn new(params: MaskParams) -> Result<Self, MaskError> {
        let ctx = PlacementContext::from_params(&params)?;
        Ok(MaskMaker { params, ctx })
    }

    pub fn params(&self) -> &MaskParams {
        &self.params
    }

    pub fn context(&self) -> &PlacementContext {
        &self.ctx
    }

    /// Design every mask replica for a catalog.
    ///
    /// Arguments
    /// -----------------
    /// * `records` – Raw catalog rows, in catalog order.
    ///
    /// Return
    /// ----------
    /// * The design: catalog counters and one [`MaskTable`] per replica.
    pub fn run(&self, records: Vec<CatalogRecord>) -> MaskDesign {
        let ctx = &self.ctx;
        let mut rejections = RejectionTally::default();

        let (kept, outside_fov) = clip_to_fov(records, &ctx.fov, ctx.pixel_scale);
        rejections.outside_fov = outside_fov;

        let mut catalog = ingest(kept, ctx, &mut rejections);
        sort_buckets(&mut catalog);

        let references = deoverlap(&catalog.references, &catalog.arena, ctx.half_ref);
        rejections.reference_overlap = references.overlapped().len();

        let counts = catalog.counts();
        log::info!(
            "Catalog: {} acquisition, {} priority 1, {} priority 2, {} priority 3",
            counts.acquisition,
            counts.compulsory,
            counts.secondary,
            counts.tertiary
        );
        log::info!(
            "Rejected: {} outside the field of view, {} out of range, {} forbidden, {} overlapping acquisition",
            rejections.outside_fov.total(),
            rejections.out_of_range.total(),
            rejections.forbidden,
            rejections.reference_overlap
        );

        let tables = (1..=self.params.num_masks)
            .map(|mask| design_mask(&mut catalog, &references, mask, ctx))
            .collect();

        let ids = |indices: &[usize]| -> Vec<ObjectId> {
            indices.iter().map(|&i| catalog.arena[i].id).collect()
        };
        MaskDesign {
            catalog: counts,
            rejections,
            references: ids(references.kept()),
            overlapped_references: ids(references.overlapped()),
            tables,
        }
    }

    /// Read a catalog CSV file and run the optimizer on it.
    pub fn run_csv(&self, path: &Utf8Path) -> Result<MaskDesign, MaskError> {
        let records = read_catalog_csv(path)?;
        Ok(self.run(records))
    }
}

/// Design one mask replica: acquisition rows, then strip rows gap by gap.
fn design_mask(
    catalog: &mut PartitionedCatalog,
    references: &ReferenceList,
    mask: MaskId,
    ctx: &PlacementContext,
) -> MaskTable {
    let mut table = MaskTable::new(mask);

    for &idx in references.kept() {
        let object = &catalog.arena[idx];
        if ctx.bands.is_some() && !object.in_bands {
            log::warn!(
                "Mask {mask}: acquisition object {} lies outside every band and was dropped",
                object.id
            );
            table.summary.references_outside_bands += 1;
            continue;
        }
        table.rows.push(SlitRow::reference(object));
        table.summary.placed.add(Priority::Acquisition);
    }

    for (lower, upper) in references.gaps() {
        let gap = frame_gap(lower, upper, &catalog.arena, ctx);
        let pieces = match &ctx.bands {
            None => vec![gap],
            Some(bands) => {
                let clipped = clip_to_bands(gap, bands, ctx.binning);
                if clipped.is_empty() {
                    let pool = collect_candidates(&catalog.arena, catalog.fillable(), gap, ctx);
                    if !pool.is_empty() {
                        log::debug!(
                            "Mask {mask}: gap [{}, {}] lies outside every band, {} candidates skipped",
                            gap.y_start,
                            gap.y_end,
                            pool.len()
                        );
                    }
                    table.summary.outside_bands += pool.len();
                }
                clipped
            }
        };

        for piece in pieces {
            let pool = collect_candidates(&catalog.arena, catalog.fillable(), piece, ctx);
            if pool.is_empty() {
                continue;
            }
            for strip in pack_gap(&mut catalog.arena, &pool, piece, mask, ctx) {
                table.summary.strips += 1;
                for idx in strip.members {
                    let object = &catalog.arena[idx];
                    table.rows.push(SlitRow::strip(object, ctx));
                    table.summary.placed.add(object.priority);
                }
            }
        }
    }

    let placed = &table.summary.placed;
    log::info!(
        "Mask {mask}: {} acquisition, {} priority 1, {} priority 2, {} priority 3 in {} strips",
        placed.acquisition,
        placed.compulsory,
        placed.secondary,
        placed.tertiary,
        table.summary.strips
    );
    table
}

#[cfg(test)]
mod mask_maker_test {
    use super::*;

    fn params() -> MaskParams {
        MaskParams {
            pixel_scale: 0.1,
            ..MaskParams::default()
        }
    }

    #[test]
    fn test_new_rejects_bad_configuration() {
        let err = MaskMaker::new(MaskParams {
            num_masks: 0,
            ..params()
        })
        .unwrap_err();
        assert_eq!(err, MaskError::NoMasksRequested);
    }

    #[test]
    fn test_run_empty_catalog() {
        let maker = MaskMaker::new(MaskParams {
            num_masks: 2,
            ..params()
        })
        .unwrap();
        let design = maker.run(Vec::new());
        assert_eq!(design.tables().len(), 2);
        assert_eq!(design.total_rows(), 0);
        assert!(design.table(2).is_some());
        assert!(design.table(3).is_none());
    }

    #[test]
    fn test_run_places_references_first() {
        let maker = MaskMaker::new(params()).unwrap();
        let records = vec![
            CatalogRecord::new(10, 2000.0, 1200.0, (1.0, 4.0), "3"),
            CatalogRecord::new(1, 2000.0, 1000.0, (2.0, 2.0), "0"),
            // overlaps acquisition object 1
            CatalogRecord::new(2, 2000.0, 1030.0, (2.0, 2.0), "0"),
        ];
        let design = maker.run(records);

        assert_eq!(design.references, vec![1]);
        assert_eq!(design.overlapped_references, vec![2]);
        assert_eq!(design.rejections.reference_overlap, 1);

        let table = design.table(1).unwrap();
        assert_eq!(table.ids(), vec![1, 10]);
        assert_eq!(table.summary.placed.acquisition, 1);
        assert_eq!(table.summary.placed.tertiary, 1);
        assert_eq!(table.summary.strips, 1);
    }
}
