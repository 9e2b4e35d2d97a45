//! Banner configuration.
//!
//! Every field defaults to the stock banner design (1200×650 design units rendered at 2×), so an
//! empty JSON object is a valid configuration. Values are in design units unless noted and are
//! multiplied by [`CanvasConfig::scale`] when turned into a [`BannerGeometry`].

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{Canvas, Rgba8},
    foundation::error::{BannerError, BannerResult},
    overlay::GradientStops,
};

/// Largest surface edge the CPU rasterizer accepts.
const MAX_SURFACE_DIM: f32 = u16::MAX as f32;

/// Root configuration object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerConfig {
    /// Output canvas size and scale.
    pub canvas: CanvasConfig,
    /// Text and logo placement.
    pub layout: LayoutConfig,
    /// Static (image background) overlay.
    pub overlay: OverlayConfig,
    /// Live (video background) overlay.
    pub live: LiveConfig,
    /// Asset locations and fallbacks.
    pub assets: AssetConfig,
    /// Video recording parameters.
    pub recording: RecordingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Canvas design size and output scale factor.
pub struct CanvasConfig {
    /// Nominal banner width.
    pub design_width: f32,
    /// Nominal banner height.
    pub design_height: f32,
    /// Output pixels per design unit.
    pub scale: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            design_width: 1200.0,
            design_height: 650.0,
            scale: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Text block and logo placement.
pub struct LayoutConfig {
    /// Left text margin.
    pub margin_left: f32,
    /// Right text margin.
    pub margin_right: f32,
    /// Distance between the bottom of the text block and the canvas bottom.
    pub margin_bottom: f32,
    /// Headline line advance.
    pub headline_line_height: f32,
    /// Subtext line advance.
    pub subtext_line_height: f32,
    /// Headline font size.
    pub headline_font_size: f32,
    /// Subtext font size.
    pub subtext_font_size: f32,
    /// Gap between headline and subtext, only used when there is subtext.
    pub block_gap: f32,
    /// Overlay extent above the first text line.
    pub overlay_top_padding: f32,
    /// Upper bound of the overlay height as a fraction of the canvas height.
    pub max_overlay_fraction: f32,
    /// Logo left edge.
    pub logo_x: f32,
    /// Logo top edge.
    pub logo_y: f32,
    /// Logo width; the height follows the logo's aspect ratio.
    pub logo_width: f32,
    /// Headline fill color.
    pub headline_color: Rgba8,
    /// Subtext fill color.
    pub subtext_color: Rgba8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_left: 90.0,
            margin_right: 90.0,
            margin_bottom: 80.0,
            headline_line_height: 72.0,
            subtext_line_height: 38.0,
            headline_font_size: 56.0,
            subtext_font_size: 24.0,
            block_gap: 32.0,
            overlay_top_padding: 60.0,
            max_overlay_fraction: 0.6,
            logo_x: 90.0,
            logo_y: 90.0,
            logo_width: 200.0,
            headline_color: Rgba8::WHITE,
            subtext_color: Rgba8::WHITE.with_opacity(0.85),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Progressive blur and darkening used over still backgrounds.
pub struct OverlayConfig {
    /// Darkening gradient stops, top of the overlay region to canvas bottom.
    pub stops: GradientStops,
    /// Blur strips per unit of scale (80 strips at 2×).
    pub strips_per_scale: u32,
    /// Blur radius of the top strip.
    pub min_blur: f32,
    /// Blur radius of the bottom strip.
    pub max_blur: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            stops: GradientStops::still_default(),
            strips_per_scale: 40,
            min_blur: 0.0,
            max_blur: 25.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Constant blur and darkening used over video backgrounds.
pub struct LiveConfig {
    /// Darkening gradient stops.
    pub stops: GradientStops,
    /// Overlay height as a fraction of the canvas height.
    pub region_fraction: f32,
    /// Constant blur radius over the whole overlay region.
    pub blur: f32,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            stops: GradientStops::live_default(),
            region_fraction: 0.5,
            blur: 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Fixed assets, relative to the assets root.
pub struct AssetConfig {
    /// Logo drawn in the top-left corner (SVG or raster).
    pub logo: PathBuf,
    /// Bold display font used for headlines.
    pub headline_font: Option<PathBuf>,
    /// Regular text font used for subtext.
    pub subtext_font: Option<PathBuf>,
    /// Flat fill used when the background cannot be loaded.
    pub fallback_color: Rgba8,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            logo: PathBuf::from("flux-logo.svg"),
            headline_font: Some(PathBuf::from("fonts/Gilroy-Bold.ttf")),
            subtext_font: Some(PathBuf::from("fonts/Figtree-Regular.ttf")),
            fallback_color: Rgba8::rgb(0x1a, 0x1a, 0x2e),
        }
    }
}

/// WebM video codecs in preference order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    /// VP9 (`libvpx-vp9`).
    Vp9,
    /// VP8 (`libvpx`), the baseline WebM codec.
    Vp8,
}

impl VideoCodec {
    /// Name of the ffmpeg encoder implementing this codec.
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::Vp9 => "libvpx-vp9",
            Self::Vp8 => "libvpx",
        }
    }

    /// MIME type of a WebM stream using this codec.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Vp9 => "video/webm;codecs=vp9",
            Self::Vp8 => "video/webm",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Video export parameters.
pub struct RecordingConfig {
    /// Capture frame rate.
    pub fps: u32,
    /// Upper bound of the clip duration in milliseconds.
    pub max_duration_ms: u64,
    /// Target video bitrate in bits per second.
    pub bitrate: u32,
    /// Codec preference; the first available one is used.
    pub codecs: Vec<VideoCodec>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            max_duration_ms: 5000,
            bitrate: 5_000_000,
            codecs: vec![VideoCodec::Vp9, VideoCodec::Vp8],
        }
    }
}

impl BannerConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> BannerResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| BannerError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the compositor cannot render.
    pub fn validate(&self) -> BannerResult<()> {
        fn positive(name: &str, v: f32) -> BannerResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(BannerError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
            Ok(())
        }
        fn non_negative(name: &str, v: f32) -> BannerResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(BannerError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
            Ok(())
        }
        fn fraction(name: &str, v: f32) -> BannerResult<()> {
            if !v.is_finite() || v <= 0.0 || v > 1.0 {
                return Err(BannerError::validation(format!("{name} must be in (0, 1]")));
            }
            Ok(())
        }

        let c = &self.canvas;
        positive("canvas.design_width", c.design_width)?;
        positive("canvas.design_height", c.design_height)?;
        positive("canvas.scale", c.scale)?;
        let (w, h) = (c.design_width * c.scale, c.design_height * c.scale);
        if w.round() < 1.0 || h.round() < 1.0 || w > MAX_SURFACE_DIM || h > MAX_SURFACE_DIM {
            return Err(BannerError::validation(format!(
                "scaled canvas {w}x{h} is outside 1..={MAX_SURFACE_DIM}"
            )));
        }

        let l = &self.layout;
        non_negative("layout.margin_left", l.margin_left)?;
        non_negative("layout.margin_right", l.margin_right)?;
        non_negative("layout.margin_bottom", l.margin_bottom)?;
        if l.margin_left + l.margin_right >= c.design_width {
            return Err(BannerError::validation(
                "horizontal text margins leave no room for text",
            ));
        }
        positive("layout.headline_line_height", l.headline_line_height)?;
        positive("layout.subtext_line_height", l.subtext_line_height)?;
        positive("layout.headline_font_size", l.headline_font_size)?;
        positive("layout.subtext_font_size", l.subtext_font_size)?;
        non_negative("layout.block_gap", l.block_gap)?;
        non_negative("layout.overlay_top_padding", l.overlay_top_padding)?;
        fraction("layout.max_overlay_fraction", l.max_overlay_fraction)?;
        non_negative("layout.logo_x", l.logo_x)?;
        non_negative("layout.logo_y", l.logo_y)?;
        positive("layout.logo_width", l.logo_width)?;

        let o = &self.overlay;
        o.stops.validate()?;
        if o.strips_per_scale == 0 {
            return Err(BannerError::validation("overlay.strips_per_scale must be > 0"));
        }
        non_negative("overlay.min_blur", o.min_blur)?;
        non_negative("overlay.max_blur", o.max_blur)?;
        if o.min_blur > o.max_blur {
            return Err(BannerError::validation(
                "overlay.min_blur must be <= overlay.max_blur",
            ));
        }

        let lv = &self.live;
        lv.stops.validate()?;
        fraction("live.region_fraction", lv.region_fraction)?;
        non_negative("live.blur", lv.blur)?;

        let r = &self.recording;
        if r.fps == 0 {
            return Err(BannerError::validation("recording.fps must be > 0"));
        }
        if r.max_duration_ms == 0 {
            return Err(BannerError::validation(
                "recording.max_duration_ms must be > 0",
            ));
        }
        if r.bitrate == 0 {
            return Err(BannerError::validation("recording.bitrate must be > 0"));
        }
        if r.codecs.is_empty() {
            return Err(BannerError::validation(
                "recording.codecs must name at least one codec",
            ));
        }
        Ok(())
    }

    /// Pixel geometry derived from this configuration.
    pub fn geometry(&self) -> BannerResult<BannerGeometry> {
        self.validate()?;
        Ok(BannerGeometry::from_config(self))
    }
}

/// Logo placement in output pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LogoPlacement {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Drawn width.
    pub width: f32,
}

impl LogoPlacement {
    /// Drawn height for a logo of the given intrinsic size.
    pub fn height_for(&self, intrinsic_width: u32, intrinsic_height: u32) -> f32 {
        if intrinsic_width == 0 {
            return 0.0;
        }
        self.width * (intrinsic_height as f32 / intrinsic_width as f32)
    }
}

/// Layout constants in output pixels (design units × scale).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BannerGeometry {
    /// Output surface size.
    pub canvas: Canvas,
    /// Output pixels per design unit.
    pub scale: f32,
    /// Left text margin.
    pub margin_left: f32,
    /// Right text margin.
    pub margin_right: f32,
    /// Bottom text margin.
    pub margin_bottom: f32,
    /// Headline line advance.
    pub headline_line_height: f32,
    /// Subtext line advance.
    pub subtext_line_height: f32,
    /// Headline font size.
    pub headline_font_size: f32,
    /// Subtext font size.
    pub subtext_font_size: f32,
    /// Headline/subtext gap.
    pub block_gap: f32,
    /// Overlay extent above the text block.
    pub overlay_top_padding: f32,
    /// Overlay height cap as a fraction of the canvas height.
    pub max_overlay_fraction: f32,
    /// Logo placement.
    pub logo: LogoPlacement,
}

impl BannerGeometry {
    fn from_config(cfg: &BannerConfig) -> Self {
        let s = cfg.canvas.scale;
        let l = &cfg.layout;
        Self {
            canvas: Canvas {
                width: (cfg.canvas.design_width * s).round() as u32,
                height: (cfg.canvas.design_height * s).round() as u32,
            },
            scale: s,
            margin_left: l.margin_left * s,
            margin_right: l.margin_right * s,
            margin_bottom: l.margin_bottom * s,
            headline_line_height: l.headline_line_height * s,
            subtext_line_height: l.subtext_line_height * s,
            headline_font_size: l.headline_font_size * s,
            subtext_font_size: l.subtext_font_size * s,
            block_gap: l.block_gap * s,
            overlay_top_padding: l.overlay_top_padding * s,
            max_overlay_fraction: l.max_overlay_fraction,
            logo: LogoPlacement {
                x: l.logo_x * s,
                y: l.logo_y * s,
                width: l.logo_width * s,
            },
        }
    }

    /// Canvas width as a float.
    pub fn width(&self) -> f32 {
        self.canvas.width as f32
    }

    /// Canvas height as a float.
    pub fn height(&self) -> f32 {
        self.canvas.height as f32
    }

    /// Width available to a line of text.
    pub fn max_text_width(&self) -> f32 {
        self.width() - self.margin_left - self.margin_right
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
