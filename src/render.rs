//! CPU raster primitives shared by the compositors.

pub mod blur;
pub mod composite;
pub mod paint;
pub mod surface;
