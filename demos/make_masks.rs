use std::env;

use camino::{Utf8Path, Utf8PathBuf};

use slitmask::mask_maker::MaskMaker;
use slitmask::mask_params::MaskParams;
use slitmask::output::csv_writer::write_design;
use slitmask::slitmask_errors::MaskError;

/// Design masks for a catalog CSV and write one `ODF` table per mask.
/// Usage:
///   make_masks [CATALOG] [--masks N] [--out DIR]
/// Example:
///   RUST_LOG=info make_masks demos/data/sample_catalog.csv --masks 2 --out /tmp/masks
fn main() -> Result<(), MaskError> {
    env_logger::init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let mut take_option = |name: &str| -> Option<String> {
        let pos = args.iter().position(|a| a == name)?;
        args.remove(pos);
        (pos < args.len()).then(|| args.remove(pos))
    };

    let num_masks = match take_option("--masks") {
        Some(n) => n
            .parse()
            .map_err(|_| MaskError::InvalidMaskParameter(format!("--masks {n}")))?,
        None => 1,
    };
    let out = take_option("--out")
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| Utf8PathBuf::from("masks"));
    let catalog = args
        .first()
        .cloned()
        .unwrap_or_else(|| "demos/data/sample_catalog.csv".to_string());

    let params = MaskParams::builder().num_masks(num_masks).build()?;
    let maker = MaskMaker::new(params)?;
    let design = maker.run_csv(Utf8Path::new(&catalog))?;

    println!("{design}");
    for table in design.tables() {
        println!("{table}");
    }

    let stem = Utf8Path::new(&catalog).file_stem().unwrap_or("catalog");
    for path in write_design(&out, stem, &design)? {
        println!("wrote {path}");
    }
    Ok(())
}
