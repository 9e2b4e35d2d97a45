use crate::{
    assets::PreparedImage,
    foundation::error::{BannerError, BannerResult},
};

const MAX_DIM: u32 = 16_384;

/// Rasterize `tree` stretched to exactly `width x height`, premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> BannerResult<Vec<u8>> {
    if width > MAX_DIM || height > MAX_DIM {
        return Err(BannerError::render(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BannerError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Rasterize `tree` at `target_width` pixels wide, keeping its aspect ratio.
///
/// Rendering at the drawn size keeps vector logos crisp at any output scale.
pub fn rasterize_svg_at_width(tree: &usvg::Tree, target_width: f32) -> BannerResult<PreparedImage> {
    let size = tree.size();
    if !target_width.is_finite() || target_width <= 0.0 || size.width() <= 0.0 {
        return Err(BannerError::render("svg has invalid width/height"));
    }
    let width = (target_width.round() as u32).max(1);
    let height = ((size.height() / size.width() * target_width).round() as u32).max(1);
    let bytes = rasterize_svg_to_premul_rgba8(tree, width, height)?;
    PreparedImage::from_premul(width, height, bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
