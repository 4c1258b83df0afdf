//! CSV adapter for the object table.
//!
//! The observatory tools keep the object table as a FITS binary table; this crate only needs
//! the rows, so any CSV export with the same column names is accepted:
//!
//! ```text
//! ID,RA,DEC,x_ccd,y_ccd,slitpos_x,slitpos_y,slitsize_x,slitsize_y,slittilt,MAG,priority,slittype
//! ```
//!
//! The `slitpos_*`, `slittilt`, `MAG` and `slittype` columns may be omitted; they then default
//! to zero (`"R"` for the slit type).
use std::fs::File;
use std::io::Read;

use camino::Utf8Path;

use crate::catalog::CatalogRecord;
use crate::slitmask_errors::MaskError;

/// Read every [`CatalogRecord`] from a CSV reader.
///
/// Arguments
/// -----------------
/// * `reader` – Any byte source holding a header line followed by catalog rows.
///
/// Return
/// ----------
/// * The records in file order, or [`MaskError::CsvError`] on the first malformed row.
pub fn catalog_from_reader<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, MaskError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = csv_reader
        .deserialize::<CatalogRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Read a catalog CSV file from disk.
///
/// See also
/// ------------
/// * [`catalog_from_reader`] – Format details.
pub fn read_catalog_csv(path: &Utf8Path) -> Result<Vec<CatalogRecord>, MaskError> {
    let file = File::open(path)?;
    let records = catalog_from_reader(file)?;
    log::info!("Read {} catalog rows from {path}", records.len());
    Ok(records)
}
