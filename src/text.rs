//! Text shaping with `parley` and glyph rasterization with `vello_cpu`.

use std::borrow::Cow;

use crate::{
    assets::fonts::{FontFace, FontSet},
    config::BannerGeometry,
    foundation::core::{Affine, Rgba8},
    foundation::error::{BannerError, BannerResult},
    layout::{TextMeasure, TextRole},
    render::{
        paint::{Painter, affine_to_cpu},
        surface::Surface,
    },
};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct RoleFont {
    family: String,
    weight: parley::fontique::FontWeight,
    style: parley::fontique::FontStyle,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

/// A run of laid-out lines for one text block.
#[derive(Clone, Copy, Debug)]
pub struct TextBlock<'a> {
    pub role: TextRole,
    pub lines: &'a [String],
    /// Left edge.
    pub x: f32,
    /// Top of the first line.
    pub top: f32,
    pub line_height: f32,
    pub color: Rgba8,
}

/// Shapes, measures and draws banner text in the two configured faces.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    headline: RoleFont,
    subtext: RoleFont,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("headline", &self.headline.family)
            .field("subtext", &self.subtext.family)
            .finish_non_exhaustive()
    }
}

impl TextEngine {
    /// Register both faces and size them for `geometry`.
    pub fn new(fonts: &FontSet, geometry: &BannerGeometry) -> BannerResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let headline = register(&mut font_ctx, &fonts.headline, geometry.headline_font_size)?;
        let subtext = register(&mut font_ctx, &fonts.subtext, geometry.subtext_font_size)?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            headline,
            subtext,
        })
    }

    fn font(&self, role: TextRole) -> &RoleFont {
        match role {
            TextRole::Headline => &self.headline,
            TextRole::Subtext => &self.subtext,
        }
    }

    fn layout_line(
        &mut self,
        role: TextRole,
        text: &str,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let font = match role {
            TextRole::Headline => &self.headline,
            TextRole::Subtext => &self.subtext,
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(font.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(font.style));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Draw each line of `block` on its own row, left-aligned at `block.x`.
    pub fn draw_block(
        &mut self,
        painter: &mut Painter,
        dst: &mut Surface,
        block: TextBlock<'_>,
    ) -> BannerResult<()> {
        if block.lines.is_empty() {
            return Ok(());
        }
        let brush = TextBrushRgba8::from(block.color);
        let layouts: Vec<_> = block
            .lines
            .iter()
            .map(|line| self.layout_line(block.role, line, brush))
            .collect();
        let font = &self.font(block.role).font;

        painter.with_layer(dst, |ctx| {
            for (i, layout) in layouts.iter().enumerate() {
                let top = block.top + i as f32 * block.line_height;
                ctx.set_transform(affine_to_cpu(Affine::translate((
                    f64::from(block.x),
                    f64::from(top),
                ))));
                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let b = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
                        let baseline = run.baseline();
                        let mut pen_x = run.offset();
                        let glyphs = run.glyphs().map(|g| {
                            let glyph = vello_cpu::Glyph {
                                id: g.id,
                                x: pen_x + g.x,
                                y: baseline - g.y,
                            };
                            pen_x += g.advance;
                            glyph
                        });
                        ctx.glyph_run(font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
            Ok(())
        })
    }
}

impl TextMeasure for TextEngine {
    fn measure(&mut self, role: TextRole, text: &str) -> f32 {
        self.layout_line(role, text, TextBrushRgba8::default()).width()
    }
}

fn register(
    font_ctx: &mut parley::FontContext,
    face: &FontFace,
    size_px: f32,
) -> BannerResult<RoleFont> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(BannerError::validation(
            "font size must be finite and > 0",
        ));
    }
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(face.bytes.to_vec()), None);
    let (family_id, infos) = families
        .first()
        .ok_or_else(|| BannerError::validation("no font families registered from font bytes"))?;
    let info = infos
        .first()
        .ok_or_else(|| BannerError::validation("registered font family has no faces"))?;
    let family = font_ctx
        .collection
        .family_name(*family_id)
        .ok_or_else(|| BannerError::validation("registered font family has no name"))?
        .to_string();

    Ok(RoleFont {
        family,
        weight: info.weight(),
        style: info.style(),
        font: vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.to_vec()),
            face.index,
        ),
        size_px,
    })
}

#[cfg(test)]
#[path = "../tests/unit/text.rs"]
mod tests;
