//! Instrument geometry and optics: the detector field of view, the spectrograph
//! configuration and the nod-and-shuffle modes.
pub mod fov;
pub mod shuffle;
pub mod spectrograph;
