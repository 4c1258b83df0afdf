//! # Spectrograph configuration
//!
//! Filters, dispersers and the derived [`SpectralWindow`] used to locate every spectrum on
//! the detector.
//!
//! ## Spectrum position
//!
//! A slit at detector column `x` disperses light along x. The anamorphic factor `A` of the
//! disperser compresses the field around the detector centre:
//!
//! ```text
//! xc = dim/2 − (dim/2 − x) / A          column of the central wavelength λc
//! λ1 = max(blue, λc − (dim − xc)·dpix)  bluest wavelength reaching the detector
//! λ2 = min(red,  λc + xc·dpix)          reddest wavelength reaching the detector
//! x1 = xc + (λc − λ1)/dpix
//! x2 = xc − (λ2 − λc)/dpix
//! spec_x = (x1 + x2) / 2
//! ```
//!
//! where `[blue, red]` is the intersection of the filter passband with the disperser range
//! and `dpix` the linear dispersion in nm per binned pixel.
//!
//! ## Errors
//!
//! [`Spectrograph::spectral_window`] is the configuration check of the whole optimizer: an
//! unusable combination is reported as a [`MaskError`] before any object is processed.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::constants::{Nanometer, Pixel};
use crate::slitmask_errors::MaskError;

/// Order-sorting and broadband filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    Open,
    G,
    R,
    I,
    Z,
    GG455,
    OG515,
    RG610,
    CaT,
}

impl Filter {
    /// Passband `(blue, red)` in nanometres.
    pub fn passband(&self) -> (Nanometer, Nanometer) {
        match self {
            Filter::Open => (360.0, 1100.0),
            Filter::G => (398.0, 552.0),
            Filter::R => (562.0, 698.0),
            Filter::I => (706.0, 850.0),
            Filter::Z => (848.0, 1100.0),
            Filter::GG455 => (460.0, 1100.0),
            Filter::OG515 => (520.0, 1100.0),
            Filter::RG610 => (615.0, 1100.0),
            Filter::CaT => (780.0, 933.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Open => "open",
            Filter::G => "g_G0301",
            Filter::R => "r_G0303",
            Filter::I => "i_G0302",
            Filter::Z => "z_G0304",
            Filter::GG455 => "GG455_G0305",
            Filter::OG515 => "OG515_G0306",
            Filter::RG610 => "RG610_G0307",
            Filter::CaT => "CaT_G0309",
        }
    }
}

impl FromStr for Filter {
    type Err = MaskError;

    /// Accepts the full filter name (`"r_G0303"`) or its short form (`"r"`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.split('_').next().unwrap_or(s).to_ascii_lowercase();
        match short.as_str() {
            "open" | "none" => Ok(Filter::Open),
            "g" => Ok(Filter::G),
            "r" => Ok(Filter::R),
            "i" => Ok(Filter::I),
            "z" => Ok(Filter::Z),
            "gg455" => Ok(Filter::GG455),
            "og515" => Ok(Filter::OG515),
            "rg610" => Ok(Filter::RG610),
            "cat" => Ok(Filter::CaT),
            _ => Err(MaskError::UnknownFilter(s.to_string())),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Gratings available for multi-object spectroscopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disperser {
    B1200,
    R831,
    B600,
    R600,
    R400,
    R150,
}

impl Disperser {
    /// Linear dispersion in nm per **unbinned** pixel.
    pub fn dispersion(&self) -> f64 {
        match self {
            Disperser::B1200 => 0.0245,
            Disperser::R831 => 0.0343,
            Disperser::B600 => 0.0452,
            Disperser::R600 => 0.0470,
            Disperser::R400 => 0.0672,
            Disperser::R150 => 0.1740,
        }
    }

    /// Useful wavelength range `(blue, red)` in nanometres.
    pub fn range(&self) -> (Nanometer, Nanometer) {
        match self {
            Disperser::B1200 => (300.0, 700.0),
            Disperser::B600 => (300.0, 1100.0),
            Disperser::R600 => (350.0, 1100.0),
            Disperser::R831 | Disperser::R400 | Disperser::R150 => (400.0, 1100.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Disperser::B1200 => "B1200_G5301",
            Disperser::R831 => "R831_G5302",
            Disperser::B600 => "B600_G5303",
            Disperser::R600 => "R600_G5304",
            Disperser::R400 => "R400_G5305",
            Disperser::R150 => "R150_G5306",
        }
    }
}

impl FromStr for Disperser {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.split('_').next().unwrap_or(s).to_ascii_uppercase();
        match short.as_str() {
            "B1200" => Ok(Disperser::B1200),
            "R831" => Ok(Disperser::R831),
            "B600" => Ok(Disperser::B600),
            "R600" => Ok(Disperser::R600),
            "R400" => Ok(Disperser::R400),
            "R150" => Ok(Disperser::R150),
            _ => Err(MaskError::UnknownDisperser(s.to_string())),
        }
    }
}

impl fmt::Display for Disperser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spectrograph {
    /// Central wavelength (nm)
    pub wavelength: Nanometer,
    pub filter: Filter,
    pub disperser: Disperser,
    /// Anamorphic magnification of the disperser at the central wavelength
    pub anamorphic: f64,
    /// Overrides the tabulated dispersion of the disperser (nm per unbinned pixel)
    pub dispersion: Option<f64>,
}

impl Default for Spectrograph {
    fn default() -> Self {
        Spectrograph {
            wavelength: 700.0,
            filter: Filter::Open,
            disperser: Disperser::R400,
            anamorphic: 0.84,
            dispersion: None,
        }
    }
}

impl Spectrograph {
    /// Validate the configuration and compute its [`SpectralWindow`].
    ///
    /// Arguments
    /// -----------------
    /// * `binning` – Detector binning along the dispersion axis.
    ///
    /// Return
    /// ----------
    /// * The spectral window, or a configuration [`MaskError`]:
    ///   [`MaskError::InvalidDispersion`], [`MaskError::InvalidAnamorphicFactor`],
    ///   [`MaskError::DegenerateSpectrumLength`] when the filter and disperser ranges do not
    ///   overlap, [`MaskError::WavelengthOutOfRange`] when the central wavelength lies outside
    ///   that overlap.
    pub fn spectral_window(&self, binning: u32) -> Result<SpectralWindow, MaskError> {
        if binning == 0 {
            return Err(MaskError::InvalidBinning(binning));
        }
        let dispersion = self.dispersion.unwrap_or(self.disperser.dispersion());
        if dispersion.is_nan() || dispersion <= 0.0 {
            return Err(MaskError::InvalidDispersion(dispersion));
        }
        if self.anamorphic.is_nan() || self.anamorphic <= 0.0 {
            return Err(MaskError::InvalidAnamorphicFactor(self.anamorphic));
        }

        let dpix = dispersion * binning as f64;
        let (filter_blue, filter_red) = self.filter.passband();
        let (grating_blue, grating_red) = self.disperser.range();
        let blue = filter_blue.max(grating_blue);
        let red = filter_red.min(grating_red);

        let spec_len = (red - blue) / dpix;
        if spec_len.is_nan() || spec_len <= 0.0 {
            return Err(MaskError::DegenerateSpectrumLength(spec_len));
        }
        if self.wavelength.is_nan() || self.wavelength <= blue || self.wavelength >= red {
            return Err(MaskError::WavelengthOutOfRange {
                wavelength: self.wavelength,
                blue,
                red,
            });
        }

        Ok(SpectralWindow {
            wavelength: self.wavelength,
            blue_limit: blue,
            red_limit: red,
            dpix,
            anamorphic: self.anamorphic,
            spec_len,
        })
    }
}

/// Validated spectral configuration, in binned pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralWindow {
    pub wavelength: Nanometer,
    pub blue_limit: Nanometer,
    pub red_limit: Nanometer,
    /// Linear dispersion in nm per binned pixel
    pub dpix: f64,
    pub anamorphic: f64,
    /// Length of a full spectrum along x (pixels)
    pub spec_len: Pixel,
}

impl SpectralWindow {
    /// Column of the spectrum centre for a slit at column `slit_x`.
    ///
    /// Arguments
    /// -----------------
    /// * `slit_x` – Slit centre in pixels (`x_ccd + slitpos_x / pixel_scale`).
    /// * `dim` – Detector extent along x in pixels.
    pub fn spectrum_center_x(&self, slit_x: Pixel, dim: Pixel) -> Pixel {
        let xc = dim / 2.0 - (dim / 2.0 - slit_x) / self.anamorphic;
        let lambda1 = self
            .blue_limit
            .max(self.wavelength - (dim - xc) * self.dpix);
        let lambda2 = self.red_limit.min(self.wavelength + xc * self.dpix);
        let x1 = xc + (self.wavelength - lambda1) / self.dpix;
        let x2 = xc - (lambda2 - self.wavelength) / self.dpix;
        (x1 + x2) / 2.0
    }
}

#[cfg(test)]
mod spectrograph_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_names() {
        assert_eq!("r_G0303".parse::<Filter>().unwrap(), Filter::R);
        assert_eq!("OPEN".parse::<Filter>().unwrap(), Filter::Open);
        assert_eq!("R400_G5305".parse::<Disperser>().unwrap(), Disperser::R400);
        assert_eq!("b600".parse::<Disperser>().unwrap(), Disperser::B600);

        assert_eq!(
            "Q42".parse::<Filter>().unwrap_err(),
            MaskError::UnknownFilter("Q42".into())
        );
        assert_eq!(
            "mirror".parse::<Disperser>().unwrap_err(),
            MaskError::UnknownDisperser("mirror".into())
        );
    }

    #[test]
    fn test_spectral_window() {
        let spectro = Spectrograph {
            wavelength: 700.0,
            filter: Filter::Open,
            disperser: Disperser::R150,
            anamorphic: 1.0,
            dispersion: None,
        };
        let window = spectro.spectral_window(2).unwrap();
        assert_eq!(window.blue_limit, 400.0);
        assert_eq!(window.red_limit, 1100.0);
        assert_relative_eq!(window.dpix, 0.348);
        assert_relative_eq!(window.spec_len, 700.0 / 0.348);
    }

    #[test]
    fn test_configuration_errors() {
        let out_of_range = Spectrograph {
            wavelength: 500.0,
            filter: Filter::I,
            ..Spectrograph::default()
        };
        assert_eq!(
            out_of_range.spectral_window(1).unwrap_err(),
            MaskError::WavelengthOutOfRange {
                wavelength: 500.0,
                blue: 706.0,
                red: 850.0
            }
        );

        let no_overlap = Spectrograph {
            filter: Filter::Z,
            disperser: Disperser::B1200,
            wavelength: 650.0,
            ..Spectrograph::default()
        };
        assert!(matches!(
            no_overlap.spectral_window(1).unwrap_err(),
            MaskError::DegenerateSpectrumLength(len) if len < 0.0
        ));

        let zero_dispersion = Spectrograph {
            dispersion: Some(0.0),
            ..Spectrograph::default()
        };
        assert_eq!(
            zero_dispersion.spectral_window(1).unwrap_err(),
            MaskError::InvalidDispersion(0.0)
        );

        let bad_anamorphic = Spectrograph {
            anamorphic: -1.0,
            ..Spectrograph::default()
        };
        assert_eq!(
            bad_anamorphic.spectral_window(1).unwrap_err(),
            MaskError::InvalidAnamorphicFactor(-1.0)
        );
    }

    #[test]
    fn test_spectrum_center_x() {
        let window = SpectralWindow {
            wavelength: 700.0,
            blue_limit: 400.0,
            red_limit: 1100.0,
            dpix: 0.174,
            anamorphic: 1.0,
            spec_len: 700.0 / 0.174,
        };
        // both ends clipped by the window: shift towards the blue end
        let spec_x = window.spectrum_center_x(3109.0, 6218.0);
        assert_relative_eq!(spec_x, 3109.0 - 100.0 / 0.174 / 2.0, epsilon = 1e-9);

        // anamorphic factor pulls the slit away from the centre
        let stretched = SpectralWindow {
            anamorphic: 0.5,
            ..window
        };
        let left = stretched.spectrum_center_x(2109.0, 6218.0);
        let xc = 3109.0 - 1000.0 / 0.5;
        // only the blue end is clipped, the red end falls on column 0
        assert_relative_eq!(left, (xc + 300.0 / 0.174) / 2.0, epsilon = 1e-9);
    }
}
