//! Compositors: the static one for image backgrounds and the live scene for video backgrounds.
//!
//! Both share the banner geometry and paint the logo and the text blocks the same way.

pub mod live;
pub mod still;

pub use live::{LiveScene, PlaybackState, VideoPlayback};
pub use still::{StillCompositor, StillFrame};

use crate::{
    assets::PreparedImage,
    config::{BannerGeometry, LayoutConfig},
    foundation::core::Rect,
    foundation::error::BannerResult,
    layout::{TextLayout, TextRole},
    render::{paint::Painter, surface::Surface},
    text::{TextBlock, TextEngine},
};

/// Draw the pre-rasterized logo at its configured placement.
pub(crate) fn draw_logo(
    painter: &mut Painter,
    dst: &mut Surface,
    logo: &PreparedImage,
    geometry: &BannerGeometry,
) -> BannerResult<()> {
    let p = geometry.logo;
    let h = p.height_for(logo.width, logo.height);
    let rect = Rect::new(
        f64::from(p.x),
        f64::from(p.y),
        f64::from(p.x + p.width),
        f64::from(p.y + h),
    );
    painter.draw_image(dst, logo, rect)
}

/// Draw the headline block, then the subtext block.
pub(crate) fn draw_text(
    text: &mut TextEngine,
    painter: &mut Painter,
    dst: &mut Surface,
    layout: &TextLayout,
    geometry: &BannerGeometry,
    colors: &LayoutConfig,
) -> BannerResult<()> {
    text.draw_block(
        painter,
        dst,
        TextBlock {
            role: TextRole::Headline,
            lines: &layout.headline_lines,
            x: geometry.margin_left,
            top: layout.headline_y,
            line_height: geometry.headline_line_height,
            color: colors.headline_color,
        },
    )?;
    text.draw_block(
        painter,
        dst,
        TextBlock {
            role: TextRole::Subtext,
            lines: &layout.subtext_lines,
            x: geometry.margin_left,
            top: layout.subtext_y,
            line_height: geometry.subtext_line_height,
            color: colors.subtext_color,
        },
    )
}
