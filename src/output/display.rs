//! # Terminal summaries
//!
//! `Display` implementations rendering a [`MaskDesign`] and its [`MaskTable`]s with
//! [`comfy-table`].
//!
//! * `{}` on a [`MaskDesign`] prints the catalog breakdown followed by one line per mask.
//! * `{}` on a [`MaskTable`] prints every placed slit.
//!
//! [`comfy-table`]: https://crates.io/crates/comfy-table
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::mask_maker::MaskDesign;
use crate::output::MaskTable;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    table
}

fn right(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

impl fmt::Display for MaskDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut catalog = new_table(&["", "Acq", "P1", "P2", "P3", "X"]);
        let rej = &self.rejections;
        let rows = [
            ("ingested", self.catalog),
            ("outside FOV", rej.outside_fov),
            ("out of range", rej.out_of_range),
        ];
        for (label, counts) in rows {
            catalog.add_row(Row::from(vec![
                Cell::new(label),
                right(counts.acquisition),
                right(counts.compulsory),
                right(counts.secondary),
                right(counts.tertiary),
                right(counts.forbidden),
            ]));
        }
        catalog.add_row(Row::from(vec![
            Cell::new("forbidden / overlapping"),
            right(rej.reference_overlap),
            right(""),
            right(""),
            right(""),
            right(rej.forbidden),
        ]));
        writeln!(f, "{catalog}")?;

        let mut masks = new_table(&[
            "Mask",
            "Acq",
            "P1",
            "P2",
            "P3",
            "Strips",
            "Outside bands",
            "Acq outside bands",
        ]);
        for table in self.tables() {
            let s = &table.summary;
            masks.add_row(Row::from(vec![
                right(s.mask),
                right(s.placed.acquisition),
                right(s.placed.compulsory),
                right(s.placed.secondary),
                right(s.placed.tertiary),
                right(s.strips),
                right(s.outside_bands),
                right(s.references_outside_bands),
            ]));
        }
        write!(f, "{masks}")
    }
}

impl fmt::Display for MaskTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = new_table(&[
            "ID",
            "x_ccd",
            "y_ccd",
            "specpos_x",
            "specpos_y",
            "slitsize_x",
            "slitsize_y",
            "priority",
            "type",
        ]);
        for r in &self.rows {
            table.add_row(Row::from(vec![
                right(r.id),
                right(format!("{:.2}", r.x_ccd)),
                right(format!("{:.2}", r.y_ccd)),
                right(format!("{:.2}", r.specpos_x)),
                right(format!("{:.2}", r.specpos_y)),
                right(format!("{:.3}", r.slitsize_x)),
                right(format!("{:.3}", r.slitsize_y)),
                right(&r.priority),
                right(&r.slittype),
            ]));
        }
        writeln!(f, "Mask {} ({} slits)", self.mask, self.len())?;
        write!(f, "{table}")
    }
}
