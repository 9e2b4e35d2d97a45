use std::path::Path;

use crate::{
    assets::{Logo, PreparedImage, fonts::FontSet, load_still_assets},
    config::{BannerConfig, BannerGeometry},
    foundation::core::Rect,
    foundation::error::{AssetLoadError, BannerResult},
    layout::{TextLayout, compute_layout},
    model::BannerContent,
    overlay::{BlurParams, BlurStripPlan, DarkeningGradient, apply_progressive_blur},
    render::{paint::Painter, surface::Surface},
    text::TextEngine,
};

/// A fully painted banner for an image background.
#[derive(Clone, Debug)]
pub struct StillFrame {
    /// Output pixels.
    pub surface: Surface,
    /// Layout the text was painted with.
    pub layout: TextLayout,
    /// The background failed to load and the fallback colour was painted instead.
    pub used_fallback: bool,
    /// Whether the logo was painted.
    pub logo_drawn: bool,
}

/// Paints banners over still backgrounds.
///
/// Paint order: stretched background, progressive blur strips, darkening gradient, logo,
/// headline, subtext.
#[derive(Debug)]
pub struct StillCompositor {
    config: BannerConfig,
    geometry: BannerGeometry,
    text: TextEngine,
    painter: Painter,
}

impl StillCompositor {
    pub fn new(config: BannerConfig, fonts: &FontSet) -> BannerResult<Self> {
        let geometry = config.geometry()?;
        let text = TextEngine::new(fonts, &geometry)?;
        Ok(Self {
            config,
            geometry,
            text,
            painter: Painter::new(),
        })
    }

    pub fn geometry(&self) -> &BannerGeometry {
        &self.geometry
    }

    /// Layout `content` would be painted with.
    pub fn layout(&mut self, content: &BannerContent) -> TextLayout {
        compute_layout(content, &mut self.text, &self.geometry)
    }

    /// Load the background and logo concurrently, then paint the banner.
    #[tracing::instrument(skip_all, fields(background = %background.display()))]
    pub fn compose(
        &mut self,
        content: &BannerContent,
        background: &Path,
        logo: &Path,
    ) -> BannerResult<StillFrame> {
        let (bg, logo) = load_still_assets(background, logo);
        self.compose_loaded(content, bg, logo)
    }

    /// Paint the banner from already settled asset loads.
    pub fn compose_loaded(
        &mut self,
        content: &BannerContent,
        background: Result<PreparedImage, AssetLoadError>,
        logo: Result<Logo, AssetLoadError>,
    ) -> BannerResult<StillFrame> {
        let g = &self.geometry;
        let layout = compute_layout(content, &mut self.text, g);
        let overlay_top = layout.overlay_top(g.height());
        let mut surface = Surface::new(g.canvas)?;

        let used_fallback = match background {
            Ok(img) => {
                let full = Rect::new(0.0, 0.0, f64::from(g.width()), f64::from(g.height()));
                self.painter.draw_image(&mut surface, &img, full)?;
                let stretched = surface.clone();
                let params = BlurParams::from_config(&self.config.overlay, g.scale);
                let plan = BlurStripPlan::new(
                    overlay_top,
                    layout.overlay_height,
                    g.canvas.height,
                    &params,
                );
                apply_progressive_blur(&mut surface, &stretched, &plan)?;
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "background failed to load, painting fallback colour");
                surface.fill(self.config.assets.fallback_color);
                true
            }
        };

        DarkeningGradient::new(overlay_top, g.canvas.height, &self.config.overlay.stops)
            .apply(&mut surface);

        let logo_drawn = match logo.map(|l| l.rasterize(g.logo.width)) {
            Ok(Ok(img)) => {
                super::draw_logo(&mut self.painter, &mut surface, &img, g)?;
                true
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "logo failed to rasterize, continuing without it");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "logo failed to load, continuing without it");
                false
            }
        };

        super::draw_text(
            &mut self.text,
            &mut self.painter,
            &mut surface,
            &layout,
            g,
            &self.config.layout,
        )?;

        tracing::debug!(
            headline_lines = layout.headline_lines.len(),
            subtext_lines = layout.subtext_lines.len(),
            overlay_height = layout.overlay_height,
            used_fallback,
            logo_drawn,
            "composed still banner"
        );
        Ok(StillFrame {
            surface,
            layout,
            used_fallback,
            logo_drawn,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/still.rs"]
mod tests;
