use std::sync::Arc;

use crate::{
    assets::PreparedImage,
    foundation::core::{Affine, Rect},
    foundation::error::{BannerError, BannerResult},
    render::{composite, surface::Surface},
};

/// Vector painter backed by `vello_cpu`, drawing onto a [`Surface`].
///
/// The render context is reused across calls as long as the target size does not change.
#[derive(Default)]
pub struct Painter {
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter")
            .field("has_ctx", &self.ctx.is_some())
            .finish()
    }
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record drawing commands with `f` into a fresh layer, then source-over it onto `dst`.
    pub fn with_layer<F>(&mut self, dst: &mut Surface, f: F) -> BannerResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> BannerResult<()>,
    {
        let width: u16 = dst
            .width()
            .try_into()
            .map_err(|_| BannerError::render("surface width exceeds u16"))?;
        let height: u16 = dst
            .height()
            .try_into()
            .map_err(|_| BannerError::render("surface height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let drawn = f(&mut ctx);
        if drawn.is_ok() {
            ctx.flush();
            let mut layer = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut layer);
            composite::over_in_place(dst.data_mut(), layer.data_as_u8_slice(), 1.0)?;
        }
        self.ctx = Some(ctx);
        drawn
    }

    /// Draw `image` stretched into `rect` (output pixels).
    pub fn draw_image(
        &mut self,
        dst: &mut Surface,
        image: &PreparedImage,
        rect: Rect,
    ) -> BannerResult<()> {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Ok(());
        }
        let paint = image_paint(image)?;
        let sx = rect.width() / f64::from(image.width);
        let sy = rect.height() / f64::from(image.height);
        let xform = Affine::translate((rect.x0, rect.y0)) * Affine::scale_non_uniform(sx, sy);
        self.with_layer(dst, |ctx| {
            ctx.set_transform(affine_to_cpu(xform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(image.width),
                f64::from(image.height),
            ));
            Ok(())
        })
    }
}

/// Rect of `(w, h)` content scaled to cover `canvas` and centered on it.
pub fn cover_rect(content_w: u32, content_h: u32, canvas_w: u32, canvas_h: u32) -> Rect {
    let (cw, ch) = (f64::from(canvas_w), f64::from(canvas_h));
    let (w, h) = (f64::from(content_w.max(1)), f64::from(content_h.max(1)));
    let s = (cw / w).max(ch / h);
    let (dw, dh) = (w * s, h * s);
    let x0 = (cw - dw) / 2.0;
    let y0 = (ch - dh) / 2.0;
    Rect::new(x0, y0, x0 + dw, y0 + dh)
}

/// Image paint for `vello_cpu` from premultiplied pixels.
pub fn image_paint(image: &PreparedImage) -> BannerResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> BannerResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BannerError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BannerError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(BannerError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
