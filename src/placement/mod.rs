//! # Slit placement
//!
//! The optimizer proper. Leaves first:
//!
//! 1. [`ingest`] – converts FOV-clipped records into [`crate::catalog::CatalogObject`]s,
//!    runs the spectrum-aware range check and routes them into priority buckets.
//! 2. [`sorting`] – thresholded, stable ordering of the buckets.
//! 3. [`reference`] – drops acquisition objects whose boxes overlap along y and exposes the
//!    gaps between the kept ones.
//! 4. [`gaps`] – turns a pair of boundaries into a detector row range, trimmed for
//!    micro-shuffle and clipped to the nod-and-shuffle bands.
//! 5. [`strip`] – candidate pool, strip width search and commit.
//!
//! [`tally`] holds the counters reported along the way.
//!
//! Every stage reads the run-wide geometry from a [`PlacementContext`], derived once from
//! the [`MaskParams`].
pub mod gaps;
pub mod ingest;
pub mod reference;
pub mod sorting;
pub mod strip;
pub mod tally;

use crate::constants::{Pixel, ACQUISITION_BOX, DSLIT, DSPECT};
use crate::instrument::fov::FovPixels;
use crate::instrument::shuffle::{Band, MicroShuffle, ShuffleMode};
use crate::instrument::spectrograph::SpectralWindow;
use crate::mask_params::{self, MaskParams};
use crate::slitmask_errors::MaskError;

/// Run-wide geometry shared by every placement stage, in binned pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementContext {
    pub pixel_scale: f64,
    pub binning: u32,
    /// Sky rows above and below every slit
    pub sky_region: Pixel,
    /// Minimum y separation between two slits
    pub dslit: Pixel,
    /// Half side of an acquisition box
    pub half_ref: Pixel,
    /// Half length of a spectrum, clearance included, in whole pixels
    pub half_spec_len: i64,
    pub slit_width_pix: Option<Pixel>,
    pub fov: FovPixels,
    pub window: SpectralWindow,
    pub micro: Option<MicroShuffle>,
    /// Active bands, only in band shuffle mode
    pub bands: Option<Vec<Band>>,
}

impl PlacementContext {
    /// Validate the parameters and derive the placement geometry.
    ///
    /// Return
    /// ----------
    /// * The context, or the first configuration [`MaskError`]: parameter checks of
    ///   [`crate::mask_params::MaskParamsBuilder::build`], spectrograph checks of
    ///   [`crate::instrument::spectrograph::Spectrograph::spectral_window`], and
    ///   [`MaskError::NoBands`] when band shuffle leaves no band on the detector.
    pub fn from_params(params: &MaskParams) -> Result<Self, MaskError> {
        mask_params::validate(params)?;
        let window = params.spectrograph.spectral_window(params.binning)?;
        let fov = params.fov.in_pixels(params.pixel_scale);

        let bands = match &params.shuffle {
            ShuffleMode::Band(shuffle) => {
                let bands = shuffle.bands(fov.y.dim, params.binning);
                if bands.is_empty() {
                    return Err(MaskError::NoBands);
                }
                Some(bands)
            }
            _ => None,
        };

        Ok(PlacementContext {
            pixel_scale: params.pixel_scale,
            binning: params.binning,
            sky_region: params.sky_region,
            dslit: DSLIT / params.binning as f64,
            half_ref: ACQUISITION_BOX / params.pixel_scale,
            half_spec_len: (window.spec_len + DSPECT).trunc() as i64 / 2,
            slit_width_pix: params.slit_width_pix,
            fov,
            window,
            micro: params.shuffle.micro().copied(),
            bands,
        })
    }

    /// Micro-shuffle distance in binned pixels, zero outside micro-shuffle mode.
    pub fn shuffle_rows(&self) -> Pixel {
        self.micro
            .map_or(0.0, |m| m.shuffle_pix / self.binning as f64)
    }
}
