//! # Constants and type definitions for slitmask
//!
//! This module centralizes the **packing constants**, **instrument defaults** and the
//! **type aliases** shared by the slit placement pipeline.
//!
//! ## Overview
//!
//! - Strip width search grid (`MINL`, `MAXL`, `STEPL`)
//! - Clearances between slits and spectra (`DSPECT`, `DSLIT`)
//! - Priority weights used to score a strip
//! - Unit aliases (arcseconds, pixels, nanometres)
//!
//! All geometric quantities handled by the optimizer are expressed in **binned detector
//! pixels** unless the alias says otherwise.

// -------------------------------------------------------------------------------------------------
// Strip width search
// -------------------------------------------------------------------------------------------------

/// Narrowest strip width tried by the width search (pixels)
pub const MINL: i64 = 150;

/// Widest strip width tried by the width search (pixels)
pub const MAXL: i64 = 800;

/// Step between two consecutive strip widths (pixels)
pub const STEPL: i64 = 50;

// -------------------------------------------------------------------------------------------------
// Clearances
// -------------------------------------------------------------------------------------------------

/// Minimum x clearance between two slits or two spectra (pixels)
pub const DSPECT: f64 = 2.0;

/// Minimum y separation between two slits, in **unbinned** pixels
pub const DSLIT: f64 = 2.0;

/// Side of the square acquisition box written to the output table (arcsec)
pub const ACQUISITION_BOX: ArcSec = 2.0;

/// Extra separation between two nod-and-shuffle bands (unbinned pixels)
pub const EXTRABANDSEP: f64 = 2.0;

/// Lowest usable detector row; detector coordinates start at (1, 1)
pub const MIN_DETECTOR_Y: Pixel = 1.0;

/// Threshold under which two sort keys are considered equal
pub const SORT_THRESHOLD: f64 = 1e-6;

// -------------------------------------------------------------------------------------------------
// Priority weights
// -------------------------------------------------------------------------------------------------

/// Weight of one compulsory (priority 1) slit in a strip
pub const WEIGHT_COMPULSORY: f64 = 10_000.0;

/// Weight of one secondary (priority 2) slit in a strip
pub const WEIGHT_SECONDARY: f64 = 1_000.0;

/// Weight of one tertiary (priority 3) slit in a strip
pub const WEIGHT_TERTIARY: f64 = 1.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle or length on the sky in arcseconds
pub type ArcSec = f64;
/// Length on the detector in (binned) pixels
pub type Pixel = f64;
/// Wavelength in nanometres
pub type Nanometer = f64;
/// Catalog object identifier, as written in the `ID` column
pub type ObjectId = i64;
/// 1-based number of a mask replica
pub type MaskId = u32;
