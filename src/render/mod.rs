//! CPU compositing of caption panels and text onto page images.

pub mod blur;
pub mod composite;
pub mod compositor;
pub mod raster;

#[cfg(test)]
#[path = "../../tests/unit/render/pixels.rs"]
mod pixel_tests;

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod compositor_tests;
