//! CSV serialization of the mask tables.
//!
//! The observatory tools store each mask as an `ODF` FITS table; here every [`MaskTable`] is
//! written as a CSV file with the same columns, named `<stem>ODF<mask>.csv`.
use std::fs::{self, File};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};

use crate::mask_maker::MaskDesign;
use crate::output::MaskTable;
use crate::slitmask_errors::MaskError;

/// Write the rows of one table, header included.
pub fn write_mask_csv<W: Write>(writer: W, table: &MaskTable) -> Result<(), MaskError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if table.is_empty() {
        // serde only emits the header with the first record
        csv_writer.write_record([
            "ID",
            "RA",
            "DEC",
            "x_ccd",
            "y_ccd",
            "specpos_x",
            "specpos_y",
            "slitpos_x",
            "slitpos_y",
            "slitsize_x",
            "slitsize_y",
            "slittilt",
            "MAG",
            "priority",
            "slittype",
        ])?;
    }
    for row in &table.rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write every table of a design in `dir`, creating the directory if needed.
///
/// Arguments
/// -----------------
/// * `dir` – Output directory.
/// * `stem` – File name prefix.
/// * `design` – Result of [`crate::mask_maker::MaskMaker::run`].
///
/// Return
/// ----------
/// * The paths written, in mask order.
pub fn write_design(
    dir: &Utf8Path,
    stem: &str,
    design: &MaskDesign,
) -> Result<Vec<Utf8PathBuf>, MaskError> {
    fs::create_dir_all(dir)?;

    design
        .tables()
        .iter()
        .map(|table| -> Result<Utf8PathBuf, MaskError> {
            let path = dir.join(table.file_name(stem));
            write_mask_csv(File::create(&path)?, table)?;
            log::info!("Mask {} written to {path} ({} slits)", table.mask, table.len());
            Ok(path)
        })
        .collect()
}
