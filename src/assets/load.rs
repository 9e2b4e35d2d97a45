use std::path::Path;

use crate::{
    assets::{PreparedImage, PreparedSvg, decode, svg_raster},
    foundation::error::{AssetLoadError, BannerResult},
};

/// Brand logo, kept as vector data when the source is SVG.
#[derive(Clone, Debug)]
pub enum Logo {
    /// Parsed SVG, rasterized at the drawn size.
    Svg(PreparedSvg),
    /// Decoded raster image.
    Raster(PreparedImage),
}

impl Logo {
    /// Natural size used to derive the drawn height from the drawn width.
    pub fn intrinsic_size(&self) -> (u32, u32) {
        match self {
            Self::Svg(svg) => {
                let size = svg.tree.size();
                (
                    (size.width().ceil() as u32).max(1),
                    (size.height().ceil() as u32).max(1),
                )
            }
            Self::Raster(img) => (img.width, img.height),
        }
    }

    /// Pixels to draw at `width` output pixels wide.
    pub fn rasterize(&self, width: f32) -> BannerResult<PreparedImage> {
        match self {
            Self::Svg(svg) => svg_raster::rasterize_svg_at_width(&svg.tree, width),
            Self::Raster(img) => Ok(img.clone()),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetLoadError> {
    std::fs::read(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Load and decode a raster background image.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_image(path: &Path) -> Result<PreparedImage, AssetLoadError> {
    if is_svg(path) || super::media::is_video_path(path) {
        return Err(AssetLoadError::Unsupported {
            path: path.to_path_buf(),
        });
    }
    let bytes = read(path)?;
    decode::decode_image(&bytes).map_err(|e| AssetLoadError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load the logo as SVG (by extension) or as a raster image.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_logo(path: &Path) -> Result<Logo, AssetLoadError> {
    let bytes = read(path)?;
    let decoded = if is_svg(path) {
        decode::parse_svg(&bytes).map(Logo::Svg)
    } else {
        decode::decode_image(&bytes).map(Logo::Raster)
    };
    decoded.map_err(|e| AssetLoadError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load the background and the logo concurrently.
pub fn load_still_assets(
    background: &Path,
    logo: &Path,
) -> (
    Result<PreparedImage, AssetLoadError>,
    Result<Logo, AssetLoadError>,
) {
    rayon::join(|| load_image(background), || load_logo(logo))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/load.rs"]
mod tests;
