pub mod catalog;
pub mod constants;
pub mod instrument;
pub mod mask_maker;
pub mod mask_params;
pub mod output;
pub mod placement;
pub mod slitmask_errors;

pub use mask_maker::{MaskDesign, MaskMaker};
pub use mask_params::MaskParams;
pub use slitmask_errors::MaskError;
