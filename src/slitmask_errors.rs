use thiserror::Error;

use crate::constants::Nanometer;

#[derive(Error, Debug)]
pub enum MaskError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Unknown disperser: {0}")]
    UnknownDisperser(String),

    #[error("Pixel scale must be strictly positive, got {0}")]
    InvalidPixelScale(f64),

    #[error("Linear dispersion must be strictly positive, got {0}")]
    InvalidDispersion(f64),

    #[error("Anamorphic factor must be strictly positive, got {0}")]
    InvalidAnamorphicFactor(f64),

    #[error("Binning must be at least 1, got {0}")]
    InvalidBinning(u32),

    #[error(
        "Central wavelength {wavelength} nm is outside the usable range [{blue}, {red}] nm"
    )]
    WavelengthOutOfRange {
        wavelength: Nanometer,
        blue: Nanometer,
        red: Nanometer,
    },

    #[error("Degenerate spectrum length: {0} pixels")]
    DegenerateSpectrumLength(f64),

    #[error("Invalid band definition: {0}")]
    InvalidBandDefinition(String),

    #[error("Invalid micro-shuffle definition: {0}")]
    InvalidMicroShuffle(String),

    #[error("Band shuffle mode selected but no band fits on the detector")]
    NoBands,

    #[error("At least one mask must be requested")]
    NoMasksRequested,

    #[error("Invalid mask parameter: {0}")]
    InvalidMaskParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for MaskError {
    fn eq(&self, other: &Self) -> bool {
        use MaskError::*;
        match (self, other) {
            (UnknownFilter(a), UnknownFilter(b)) => a == b,
            (UnknownDisperser(a), UnknownDisperser(b)) => a == b,
            (InvalidPixelScale(a), InvalidPixelScale(b)) => a == b,
            (InvalidDispersion(a), InvalidDispersion(b)) => a == b,
            (InvalidAnamorphicFactor(a), InvalidAnamorphicFactor(b)) => a == b,
            (InvalidBinning(a), InvalidBinning(b)) => a == b,
            (
                WavelengthOutOfRange {
                    wavelength: w1,
                    blue: b1,
                    red: r1,
                },
                WavelengthOutOfRange {
                    wavelength: w2,
                    blue: b2,
                    red: r2,
                },
            ) => w1 == w2 && b1 == b2 && r1 == r2,
            (DegenerateSpectrumLength(a), DegenerateSpectrumLength(b)) => a == b,
            (InvalidBandDefinition(a), InvalidBandDefinition(b)) => a == b,
            (InvalidMicroShuffle(a), InvalidMicroShuffle(b)) => a == b,
            (InvalidMaskParameter(a), InvalidMaskParameter(b)) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (NoBands, NoBands) => true,
            (NoMasksRequested, NoMasksRequested) => true,

            _ => false,
        }
    }
}
