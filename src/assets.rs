//! Background, logo and font assets, decoded into CPU-ready forms.

use std::sync::Arc;

pub mod decode;
pub mod fonts;
pub mod load;
pub mod media;
pub mod svg_raster;

pub use load::{Logo, load_image, load_logo, load_still_assets};

/// Decoded raster image, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied pixels.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied bytes, checking their length.
    pub fn from_premul(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
    ) -> crate::BannerResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4));
        if expected != Some(rgba8_premul.len()) || width == 0 || height == 0 {
            return Err(crate::BannerError::render(format!(
                "image bytes do not match {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Parsed SVG document.
#[derive(Clone, Debug)]
pub struct PreparedSvg {
    /// Parsed tree.
    pub tree: Arc<usvg::Tree>,
}
