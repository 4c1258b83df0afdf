#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::Rng;

use slitmask::catalog::CatalogRecord;
use slitmask::instrument::spectrograph::{Disperser, Filter, Spectrograph};
use slitmask::mask_params::MaskParams;
use slitmask::output::MaskTable;

/// Spectrograph with 700 pixel long, unclipped spectra: `spec_x = x_ccd - 50`.
pub fn short_spectra() -> Spectrograph {
    Spectrograph {
        wavelength: 700.0,
        filter: Filter::Open,
        disperser: Disperser::R150,
        anamorphic: 1.0,
        dispersion: Some(1.0),
    }
}

/// GMOS-N field of view at 0.1"/pixel (`half_ref = 20`, `dslit = 2`), short spectra.
pub fn params() -> MaskParams {
    MaskParams {
        pixel_scale: 0.1,
        spectrograph: short_spectra(),
        ..MaskParams::default()
    }
}

/// Record with a 1" wide slit of `length` arcsec.
pub fn record(id: i64, x: f64, y: f64, length: f64, priority: &str) -> CatalogRecord {
    CatalogRecord::new(id, x, y, (1.0, length), priority)
}

/// Random catalog scattered over the field of view at 0.1"/pixel.
pub fn random_catalog(rng: &mut StdRng, n: usize) -> Vec<CatalogRecord> {
    let priorities = ["0", "1", "2", "3", "3", "3", "X"];
    (0..n)
        .map(|i| {
            let priority = priorities[rng.random_range(0..priorities.len())];
            let length = if priority == "0" {
                2.0
            } else {
                rng.random_range(2.0..8.0)
            };
            record(
                i as i64 + 1,
                rng.random_range(500.0..4000.0),
                rng.random_range(50.0..3300.0),
                length,
                priority,
            )
        })
        .collect()
}

/// Identifiers of the strip-packed rows of a table, acquisition rows excluded.
pub fn strip_ids(table: &MaskTable) -> Vec<i64> {
    table
        .rows
        .iter()
        .filter(|r| r.priority != "0")
        .map(|r| r.id)
        .collect()
}
