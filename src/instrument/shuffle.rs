//! # Nod-and-shuffle definitions
//!
//! Two nod-and-shuffle flavours change where slits may go:
//!
//! * **Micro shuffle** – the charge is shuffled by a few arcseconds inside every slit. Each
//!   slit gets a fixed length, the half-length of its footprint grows by half the shuffle
//!   distance and non-acquisition slits are moved by half the nod.
//! * **Band shuffle** – the detector is split into repeating `[shuffle gap][usable band]`
//!   intervals and slits may only be placed inside a band.
//!
//! Shuffle distances are always stored in **unbinned** pixels; callers dividing by the
//! binning get binned detector rows.
use serde::{Deserialize, Serialize};

use crate::constants::{ArcSec, Pixel, EXTRABANDSEP};
use crate::slitmask_errors::MaskError;

/// Convert a shuffle distance in arcsec to whole unbinned pixels, rounding up.
pub fn shuffle_pixels(amount: ArcSec, binning: u32, pixel_scale: f64) -> Pixel {
    (amount * binning as f64 / pixel_scale).ceil()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicroShuffle {
    /// Length of every slit (arcsec)
    pub slit_length: ArcSec,
    /// Shuffle distance (unbinned pixels)
    pub shuffle_pix: Pixel,
    /// Nod distance (whole arcsec)
    pub nod_amount: i32,
}

impl MicroShuffle {
    /// Micro-shuffle with the shuffle distance given in arcsec.
    pub fn from_amount(
        slit_length: ArcSec,
        shuffle_amount: ArcSec,
        nod_amount: i32,
        binning: u32,
        pixel_scale: f64,
    ) -> Self {
        MicroShuffle {
            slit_length,
            shuffle_pix: shuffle_pixels(shuffle_amount, binning, pixel_scale),
            nod_amount,
        }
    }

    pub fn validate(&self) -> Result<(), MaskError> {
        if self.slit_length < 0.0 {
            return Err(MaskError::InvalidMicroShuffle(
                "Slit length must be > 0".into(),
            ));
        }
        if self.shuffle_pix < 0.0 {
            return Err(MaskError::InvalidMicroShuffle(
                "Shuffle amount (unbinned pixels) must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// One usable nod-and-shuffle band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub num: u32,
    pub name: String,
    /// Lower edge (unbinned pixels)
    pub y_pos: Pixel,
    /// Height (unbinned pixels)
    pub height: Pixel,
}

impl Band {
    pub fn new(num: u32, y_pos: Pixel, height: Pixel) -> Self {
        Band {
            num,
            name: format!("band{num}"),
            y_pos,
            height,
        }
    }

    /// Detector rows `[start, end]` covered by the band, in binned pixels.
    pub fn row_limits(&self, binning: u32) -> (i64, i64) {
        let binning = binning as f64;
        let start = (self.y_pos / binning).trunc();
        let end = (start + self.height / binning).trunc();
        (start as i64, end as i64)
    }

    /// `true` if the binned detector row `y` lies inside the band.
    pub fn contains(&self, y: Pixel, binning: u32) -> bool {
        let binning = binning as f64;
        let low = self.y_pos / binning;
        y >= low && y <= low + self.height / binning
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandShuffle {
    /// Height of every band (unbinned pixels)
    pub band_size: Pixel,
    /// Shuffle distance (unbinned pixels)
    pub shuffle_pix: Pixel,
    /// Offset of the band pattern (unbinned pixels)
    pub y_offset: Pixel,
}

impl Default for BandShuffle {
    fn default() -> Self {
        BandShuffle {
            band_size: 1535.0,
            shuffle_pix: 1535.0,
            y_offset: 0.0,
        }
    }
}

impl BandShuffle {
    /// Band shuffle with the shuffle distance given in arcsec; bands are as tall as the
    /// shuffle distance.
    pub fn from_amount(shuffle_amount: ArcSec, y_offset: Pixel, binning: u32, pixel_scale: f64) -> Self {
        let shuffle_pix = shuffle_pixels(shuffle_amount, binning, pixel_scale);
        BandShuffle {
            band_size: shuffle_pix,
            shuffle_pix,
            y_offset,
        }
    }

    pub fn validate(&self) -> Result<(), MaskError> {
        if self.band_size < 0.0 {
            return Err(MaskError::InvalidBandDefinition(
                "Band size must be > 0".into(),
            ));
        }
        if self.shuffle_pix < 0.0 {
            return Err(MaskError::InvalidBandDefinition(
                "Shuffle amount (unbinned pixels) must be > 0".into(),
            ));
        }
        if self.band_size > self.shuffle_pix {
            return Err(MaskError::InvalidBandDefinition(
                "Band size must be less than shuffle amount (unbinned pixels)".into(),
            ));
        }
        Ok(())
    }

    /// Lay the bands out over the detector.
    ///
    /// The first band starts one shuffle distance (plus half the extra band separation and
    /// the offset) above the bottom of the detector; bands repeat every
    /// `shuffle + band_size + EXTRABANDSEP` rows as long as a full band plus its shuffle
    /// image still fits.
    ///
    /// Arguments
    /// -----------------
    /// * `image_height` – Detector height in binned pixels.
    /// * `binning` – Detector binning.
    ///
    /// Return
    /// ----------
    /// * Bands ordered by increasing `y_pos`, numbered from 1.
    pub fn bands(&self, image_height: Pixel, binning: u32) -> Vec<Band> {
        let height_unbinned = image_height.trunc() * binning as f64;
        let max_y = height_unbinned - self.band_size - self.shuffle_pix - EXTRABANDSEP / 2.0;
        let y_start = self.shuffle_pix + EXTRABANDSEP / 2.0 + self.y_offset;
        let y_inc = self.shuffle_pix + self.band_size + EXTRABANDSEP;

        let mut bands = Vec::new();
        let mut y = y_start;
        while y <= max_y {
            bands.push(Band::new(bands.len() as u32 + 1, y, self.band_size));
            y += y_inc;
        }
        bands
    }
}

/// Nod-and-shuffle mode of the mask.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShuffleMode {
    #[default]
    None,
    Micro(MicroShuffle),
    Band(BandShuffle),
}

impl ShuffleMode {
    pub fn validate(&self) -> Result<(), MaskError> {
        match self {
            ShuffleMode::None => Ok(()),
            ShuffleMode::Micro(micro) => micro.validate(),
            ShuffleMode::Band(band) => band.validate(),
        }
    }

    pub fn micro(&self) -> Option<&MicroShuffle> {
        match self {
            ShuffleMode::Micro(micro) => Some(micro),
            _ => None,
        }
    }
}

#[cfg(test)]
mod shuffle_test {
    use super::*;

    #[test]
    fn test_shuffle_pixels_round_up() {
        assert_eq!(shuffle_pixels(5.0, 1, 0.0727), 69.0);
        assert_eq!(shuffle_pixels(1.0, 2, 0.5), 4.0);
    }

    #[test]
    fn test_micro_from_amount() {
        // 1.5" at 0.1454"/pixel binned 2x2 is 20.63 unbinned pixels
        let micro = MicroShuffle::from_amount(2.0, 1.5, 2, 2, 0.1454);
        assert_eq!(micro.shuffle_pix, 21.0);
        assert_eq!(micro.slit_length, 2.0);
        assert_eq!(micro.nod_amount, 2);
        assert!(micro.validate().is_ok());
    }

    #[test]
    fn test_band_from_amount() {
        let shuffle = BandShuffle::from_amount(5.0, 10.0, 1, 0.0727);
        assert_eq!(shuffle.shuffle_pix, 69.0);
        assert_eq!(shuffle.band_size, shuffle.shuffle_pix);
        assert_eq!(shuffle.y_offset, 10.0);
        assert!(shuffle.validate().is_ok());
    }

    #[test]
    fn test_default_bands() {
        let bands = BandShuffle::default().bands(4608.0, 2);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0], Band::new(1, 1536.0, 1535.0));
        assert_eq!(bands[1].y_pos, 4608.0);
        assert_eq!(bands[1].name, "band2");

        assert_eq!(bands[0].row_limits(2), (768, 1535));
        assert!(bands[0].contains(1000.0, 2));
        assert!(!bands[0].contains(1600.0, 2));
    }

    #[test]
    fn test_offset_bands() {
        let shuffle = BandShuffle {
            band_size: 400.0,
            shuffle_pix: 500.0,
            y_offset: 10.0,
        };
        let bands = shuffle.bands(2000.0, 1);
        // max_y = 2000 - 400 - 500 - 1 = 1099, starts at 511 then 1413
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].y_pos, 511.0);
    }

    #[test]
    fn test_validation() {
        let too_big = BandShuffle {
            band_size: 2000.0,
            shuffle_pix: 1500.0,
            y_offset: 0.0,
        };
        assert_eq!(
            too_big.validate().unwrap_err(),
            MaskError::InvalidBandDefinition(
                "Band size must be less than shuffle amount (unbinned pixels)".into()
            )
        );

        let micro = MicroShuffle {
            slit_length: -1.0,
            shuffle_pix: 10.0,
            nod_amount: 0,
        };
        assert!(ShuffleMode::Micro(micro).validate().is_err());
        assert!(ShuffleMode::None.validate().is_ok());
    }
}
