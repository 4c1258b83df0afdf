//! # Mask design parameters
//!
//! [`MaskParams`] gathers everything the optimizer needs besides the catalog: how many mask
//! replicas to design, the detector sampling, the spectrograph setup, the slit geometry
//! overrides, the nod-and-shuffle mode and the field of view.
//!
//! ## Defaults
//!
//! | parameter        | default                         |
//! |------------------|---------------------------------|
//! | `num_masks`      | 1                               |
//! | `pixel_scale`    | 0.0727 arcsec/pixel             |
//! | `binning`        | 1                               |
//! | `sky_region`     | 0 pixels                        |
//! | `slit_width_pix` | `None` (use `slitsize_x`)       |
//! | `spectrograph`   | R400, open filter, 700 nm       |
//! | `shuffle`        | [`ShuffleMode::None`]           |
//! | `fov`            | [`FieldOfView::gmos_north`]     |
//!
//! Parameters are usually built with [`MaskParams::builder`], which validates the values that
//! can be checked in isolation. The spectrograph and band checks need the whole configuration
//! and run in [`crate::mask_maker::MaskMaker::new`].
//!
//! ```rust,no_run
//! use slitmask::mask_params::MaskParams;
//! use slitmask::instrument::shuffle::{BandShuffle, ShuffleMode};
//!
//! let params = MaskParams::builder()
//!     .num_masks(2)
//!     .binning(2)
//!     .shuffle(ShuffleMode::Band(BandShuffle::default()))
//!     .build()
//!     .unwrap();
//! ```
use std::cmp::Ordering::{Equal, Greater};

use serde::{Deserialize, Serialize};

use crate::constants::Pixel;
use crate::instrument::fov::FieldOfView;
use crate::instrument::shuffle::ShuffleMode;
use crate::instrument::spectrograph::Spectrograph;
use crate::slitmask_errors::MaskError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParams {
    /// Number of mask replicas to design
    pub num_masks: u32,
    /// Arcseconds per binned pixel
    pub pixel_scale: f64,
    /// Detector binning
    pub binning: u32,
    /// Extra sky rows added above and below every slit (pixels)
    pub sky_region: Pixel,
    /// Fixed slit width in pixels, overriding the catalog `slitsize_x`
    pub slit_width_pix: Option<Pixel>,
    pub spectrograph: Spectrograph,
    pub shuffle: ShuffleMode,
    pub fov: FieldOfView,
}

impl Default for MaskParams {
    fn default() -> Self {
        MaskParams {
            num_masks: 1,
            pixel_scale: 0.0727,
            binning: 1,
            sky_region: 0.0,
            slit_width_pix: None,
            spectrograph: Spectrograph::default(),
            shuffle: ShuffleMode::None,
            fov: FieldOfView::default(),
        }
    }
}

impl MaskParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MaskParamsBuilder {
        MaskParamsBuilder::new()
    }
}

/// Builder for [`MaskParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct MaskParamsBuilder {
    params: MaskParams,
}

impl MaskParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_masks(mut self, v: u32) -> Self {
        self.params.num_masks = v;
        self
    }
    pub fn pixel_scale(mut self, v: f64) -> Self {
        self.params.pixel_scale = v;
        self
    }
    pub fn binning(mut self, v: u32) -> Self {
        self.params.binning = v;
        self
    }
    pub fn sky_region(mut self, v: Pixel) -> Self {
        self.params.sky_region = v;
        self
    }
    pub fn slit_width_pix(mut self, v: Pixel) -> Self {
        self.params.slit_width_pix = Some(v);
        self
    }
    pub fn spectrograph(mut self, v: Spectrograph) -> Self {
        self.params.spectrograph = v;
        self
    }
    pub fn shuffle(mut self, v: ShuffleMode) -> Self {
        self.params.shuffle = v;
        self
    }
    pub fn fov(mut self, v: FieldOfView) -> Self {
        self.params.fov = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `num_masks >= 1`
    /// * `pixel_scale > 0`, `binning >= 1`
    /// * `sky_region >= 0`, `slit_width_pix > 0` when set
    /// * shuffle definition valid (see [`ShuffleMode::validate`])
    ///
    /// Return
    /// ----------
    /// * The parameters, or the first [`MaskError`] found.
    pub fn build(self) -> Result<MaskParams, MaskError> {
        validate(&self.params)?;
        Ok(self.params)
    }
}

/// `true` iff `x > 0` (NaN is rejected).
#[inline]
fn gt0(x: f64) -> bool {
    x.partial_cmp(&0.0) == Some(Greater)
}

/// `true` iff `x >= 0` (NaN is rejected).
#[inline]
fn ge0(x: f64) -> bool {
    matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
}

/// Checks shared by [`MaskParamsBuilder::build`] and the mask maker, for parameters built
/// by hand or deserialized.
pub(crate) fn validate(p: &MaskParams) -> Result<(), MaskError> {
    if p.num_masks == 0 {
        return Err(MaskError::NoMasksRequested);
    }
    if !gt0(p.pixel_scale) {
        return Err(MaskError::InvalidPixelScale(p.pixel_scale));
    }
    if p.binning == 0 {
        return Err(MaskError::InvalidBinning(p.binning));
    }
    if !ge0(p.sky_region) {
        return Err(MaskError::InvalidMaskParameter(
            "sky_region must be >= 0".into(),
        ));
    }
    if let Some(width) = p.slit_width_pix {
        if !gt0(width) {
            return Err(MaskError::InvalidMaskParameter(
                "slit_width_pix must be > 0".into(),
            ));
        }
    }
    p.shuffle.validate()
}
