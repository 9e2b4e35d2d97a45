//! Bottom-anchored text layout: greedy word wrap and the derived overlay extent.

use serde::Serialize;

use crate::{config::BannerGeometry, model::BannerContent};

/// Which font specification a piece of text uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    /// Bold display text.
    Headline,
    /// Regular body text.
    Subtext,
}

/// Width measurement for a single line of text in output pixels.
pub trait TextMeasure {
    fn measure(&mut self, role: TextRole, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(TextRole, &str) -> f32,
{
    fn measure(&mut self, role: TextRole, text: &str) -> f32 {
        self(role, text)
    }
}

/// Greedy word wrap.
///
/// Words (split on whitespace) are appended to the current line while the candidate line
/// measures within `max_width`. A word that alone exceeds `max_width` gets a line of its own.
pub fn wrap_lines<M: TextMeasure + ?Sized>(
    measure: &mut M,
    role: TextRole,
    text: &str,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure.measure(role, &candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Positions of the wrapped text blocks and the overlay height, in output pixels.
///
/// Derived from content and geometry on every render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextLayout {
    pub headline_lines: Vec<String>,
    pub subtext_lines: Vec<String>,
    /// Top of the first headline line.
    pub headline_y: f32,
    /// Top of the first subtext line.
    pub subtext_y: f32,
    /// Height of the headline block, the gap and the subtext block.
    pub content_height: f32,
    /// Height of the overlay region, measured up from the canvas bottom edge.
    pub overlay_height: f32,
    /// Width available to each line.
    pub max_width: f32,
}

impl TextLayout {
    /// Top edge of the overlay region.
    pub fn overlay_top(&self, canvas_height: f32) -> f32 {
        canvas_height - self.overlay_height
    }
}

/// Wrap both text blocks and stack them against the bottom margin.
pub fn compute_layout<M: TextMeasure + ?Sized>(
    content: &BannerContent,
    measure: &mut M,
    geometry: &BannerGeometry,
) -> TextLayout {
    let max_width = geometry.max_text_width();
    let headline_lines = wrap_lines(measure, TextRole::Headline, &content.headline, max_width);
    let subtext_lines = wrap_lines(measure, TextRole::Subtext, &content.subtext, max_width);

    let headline_height = headline_lines.len() as f32 * geometry.headline_line_height;
    let subtext_height = subtext_lines.len() as f32 * geometry.subtext_line_height;
    let gap = if subtext_lines.is_empty() {
        0.0
    } else {
        geometry.block_gap
    };
    let content_height = headline_height + gap + subtext_height;

    let bottom = geometry.height() - geometry.margin_bottom;
    let headline_y = bottom - content_height;
    let subtext_y = headline_y + headline_height + gap;

    let overlay_height = (content_height + geometry.overlay_top_padding + geometry.margin_bottom)
        .min(geometry.max_overlay_fraction * geometry.height());

    TextLayout {
        headline_lines,
        subtext_lines,
        headline_y,
        subtext_y,
        content_height,
        overlay_height,
        max_width,
    }
}

#[cfg(test)]
#[path = "../tests/unit/layout.rs"]
mod tests;
