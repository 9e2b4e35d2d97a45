//! Overlay synthesis: the bottom-anchored darkening gradient and the strip-based progressive
//! blur that keep bottom-aligned text legible over any background.

use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::{LiveConfig, OverlayConfig},
    foundation::error::{BannerError, BannerResult},
    foundation::math::{lerp, opacity_to_u8},
    render::{blur::blur_rows_rgba8_premul, composite::darken_in_place, surface::Surface},
};

/// One `(offset, alpha)` stop of a black darkening gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in `[0, 1]`, 0 at the top of the overlay region.
    pub offset: f32,
    /// Black opacity at this position.
    pub alpha: f32,
}

const fn stop(offset: f32, alpha: f32) -> GradientStop {
    GradientStop { offset, alpha }
}

/// Ordered gradient stops with non-decreasing offsets and alphas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradientStops(Vec<GradientStop>);

impl GradientStops {
    /// Build and validate a stop list.
    pub fn new(stops: Vec<GradientStop>) -> BannerResult<Self> {
        let s = Self(stops);
        s.validate()?;
        Ok(s)
    }

    /// Stops used over still backgrounds: transparency front-loaded, density back-loaded.
    pub fn still_default() -> Self {
        Self(vec![
            stop(0.0, 0.0),
            stop(0.1, 0.05),
            stop(0.3, 0.1),
            stop(0.6, 0.25),
            stop(0.8, 0.35),
            stop(1.0, 0.5),
        ])
    }

    /// Stops used over video backgrounds.
    pub fn live_default() -> Self {
        Self(vec![
            stop(0.0, 0.0),
            stop(0.1, 0.05),
            stop(0.3, 0.15),
            stop(0.6, 0.35),
            stop(0.8, 0.55),
            stop(1.0, 0.7),
        ])
    }

    /// Check ordering and ranges.
    pub fn validate(&self) -> BannerResult<()> {
        let (Some(first), Some(last)) = (self.0.first(), self.0.last()) else {
            return Err(BannerError::validation("gradient needs at least one stop"));
        };
        if first.offset != 0.0 || last.offset != 1.0 {
            return Err(BannerError::validation(
                "gradient stops must start at offset 0 and end at offset 1",
            ));
        }
        for s in &self.0 {
            if !(0.0..=1.0).contains(&s.offset) || !(0.0..=1.0).contains(&s.alpha) {
                return Err(BannerError::validation(
                    "gradient stop offset/alpha must be in [0, 1]",
                ));
            }
        }
        for pair in self.0.windows(2) {
            if pair[1].offset < pair[0].offset {
                return Err(BannerError::validation(
                    "gradient stop offsets must be non-decreasing",
                ));
            }
            if pair[1].alpha < pair[0].alpha {
                return Err(BannerError::validation(
                    "gradient stop alphas must be non-decreasing",
                ));
            }
        }
        Ok(())
    }

    /// Stops in order.
    pub fn stops(&self) -> &[GradientStop] {
        &self.0
    }

    /// Opacity of the last stop.
    pub fn max_alpha(&self) -> f32 {
        self.0.last().map_or(0.0, |s| s.alpha)
    }

    /// Piecewise-linear opacity at `t` in `[0, 1]`.
    pub fn opacity_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let Some(first) = self.0.first() else {
            return 0.0;
        };
        if t <= first.offset {
            return first.alpha;
        }
        for pair in self.0.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.alpha;
                }
                return lerp(a.alpha, b.alpha, (t - a.offset) / span);
            }
        }
        self.max_alpha()
    }
}

/// Vertical black gradient from the top of the overlay region to the canvas bottom edge.
#[derive(Clone, Copy, Debug)]
pub struct DarkeningGradient<'a> {
    top: u32,
    bottom: u32,
    stops: &'a GradientStops,
}

impl<'a> DarkeningGradient<'a> {
    /// Gradient over rows `[floor(top), canvas_height)`.
    pub fn new(top: f32, canvas_height: u32, stops: &'a GradientStops) -> Self {
        let top = (top.max(0.0).floor() as u32).min(canvas_height);
        Self {
            top,
            bottom: canvas_height,
            stops,
        }
    }

    /// Rows covered by the gradient.
    pub fn rows(&self) -> Range<u32> {
        self.top..self.bottom
    }

    /// Opacity applied to row `y`; 0 outside the region, the last stop's alpha on the bottom row.
    pub fn row_opacity(&self, y: u32) -> f32 {
        if y < self.top || y >= self.bottom {
            return 0.0;
        }
        let rows = self.bottom - self.top;
        if rows <= 1 {
            return self.stops.max_alpha();
        }
        let t = (y - self.top) as f32 / (rows - 1) as f32;
        self.stops.opacity_at(t)
    }

    /// Darken the covered rows of `surface`.
    pub fn apply(&self, surface: &mut Surface) {
        let bottom = self.bottom.min(surface.height());
        for y in self.top..bottom {
            let alpha = opacity_to_u8(self.row_opacity(y));
            darken_in_place(surface.row_mut(y), alpha);
        }
    }
}

/// Strip count and blur range in output pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurParams {
    /// Number of strips.
    pub strip_count: u32,
    /// Blur radius of the top strip.
    pub min_blur: f32,
    /// Blur radius of the bottom strip.
    pub max_blur: f32,
}

impl BlurParams {
    /// Scale the configured design values to output pixels.
    pub fn from_config(cfg: &OverlayConfig, scale: f32) -> Self {
        Self {
            strip_count: ((cfg.strips_per_scale as f32 * scale).round() as u32).max(1),
            min_blur: cfg.min_blur * scale,
            max_blur: cfg.max_blur * scale,
        }
    }
}

/// A horizontal slice of the overlay region with a single blur radius.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurStrip {
    /// Position in the plan, 0 at the top.
    pub index: u32,
    /// Canvas rows covered by this strip.
    pub rows: Range<u32>,
    /// Gaussian standard deviation.
    pub radius: f32,
}

/// Partition of the overlay region into equal-height strips of increasing blur.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurStripPlan {
    strips: Vec<BlurStrip>,
}

impl BlurStripPlan {
    /// Plan strips over `[overlay_top, overlay_top + overlay_height)`, clamped to a canvas
    /// `canvas_height` rows tall.
    ///
    /// Every row of the region belongs to exactly one strip; with heights under a pixel some
    /// strips are empty.
    pub fn new(
        overlay_top: f32,
        overlay_height: f32,
        canvas_height: u32,
        params: &BlurParams,
    ) -> Self {
        let n = params.strip_count.max(1);
        let strip_h = overlay_height.max(0.0) / n as f32;
        let boundary = |i: u32| -> u32 {
            let y = (overlay_top + i as f32 * strip_h).max(0.0).floor();
            (y as u32).min(canvas_height)
        };

        let strips = (0..n)
            .map(|i| {
                let progress = if n == 1 {
                    1.0
                } else {
                    i as f32 / (n - 1) as f32
                };
                let end = if i + 1 == n {
                    boundary(n).max(boundary(i))
                } else {
                    boundary(i + 1)
                };
                BlurStrip {
                    index: i,
                    rows: boundary(i)..end,
                    radius: lerp(params.min_blur, params.max_blur, progress),
                }
            })
            .collect();
        Self { strips }
    }

    /// Strips from top to bottom.
    pub fn strips(&self) -> &[BlurStrip] {
        &self.strips
    }

    /// Rows covered by the whole plan.
    pub fn rows(&self) -> Range<u32> {
        match (self.strips.first(), self.strips.last()) {
            (Some(first), Some(last)) => first.rows.start..last.rows.end,
            _ => 0..0,
        }
    }
}

/// Replace each strip of `surface` with the background blurred at that strip's radius.
///
/// `background` is the background already stretched to the surface size.
pub fn apply_progressive_blur(
    surface: &mut Surface,
    background: &Surface,
    plan: &BlurStripPlan,
) -> BannerResult<()> {
    if surface.canvas() != background.canvas() {
        return Err(BannerError::render(
            "progressive blur background does not match surface size",
        ));
    }
    let (w, h) = (background.width(), background.height());
    let blurred: Vec<(Range<u32>, Vec<u8>)> = plan
        .strips()
        .par_iter()
        .filter(|s| !s.rows.is_empty())
        .map(|s| {
            let rows = blur_rows_rgba8_premul(background.data(), w, h, s.rows.clone(), s.radius)?;
            Ok((s.rows.clone(), rows))
        })
        .collect::<BannerResult<_>>()?;

    for (rows, bytes) in blurred {
        surface.replace_rows(rows, &bytes)?;
    }
    tracing::debug!(strips = plan.strips().len(), rows = ?plan.rows(), "applied progressive blur");
    Ok(())
}

/// Overlay used by the live (video) compositor: one constant blur plus a darkening gradient
/// over a fixed fraction of the canvas.
#[derive(Clone, Debug)]
pub struct LiveOverlay {
    top: f32,
    blur: f32,
    stops: GradientStops,
}

impl LiveOverlay {
    /// Scale the live overlay configuration to a canvas.
    pub fn from_config(cfg: &LiveConfig, canvas_height: u32, scale: f32) -> Self {
        let h = canvas_height as f32;
        Self {
            top: h - h * cfg.region_fraction,
            blur: cfg.blur * scale,
            stops: cfg.stops.clone(),
        }
    }

    /// Top edge of the overlay region.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Constant blur radius.
    pub fn blur(&self) -> f32 {
        self.blur
    }

    /// The darkening gradient over this region.
    pub fn gradient(&self, canvas_height: u32) -> DarkeningGradient<'_> {
        DarkeningGradient::new(self.top, canvas_height, &self.stops)
    }

    /// Blur the region of `surface` in place, then darken it.
    pub fn apply(&self, surface: &mut Surface) -> BannerResult<()> {
        let gradient = self.gradient(surface.height());
        let rows = gradient.rows();
        if self.blur > 0.0 && !rows.is_empty() {
            let blurred = blur_rows_rgba8_premul(
                surface.data(),
                surface.width(),
                surface.height(),
                rows.clone(),
                self.blur,
            )?;
            surface.replace_rows(rows, &blurred)?;
        }
        gradient.apply(surface);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/overlay.rs"]
mod tests;
