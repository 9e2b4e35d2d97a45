use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over of one premultiplied pixel with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over of a whole premultiplied layer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> BannerResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BannerError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite black at `alpha` over every pixel of `row`.
pub fn darken_in_place(row: &mut [u8], alpha: u8) {
    if alpha == 0 {
        return;
    }
    let inv = 255u16 - u16::from(alpha);
    for px in row.chunks_exact_mut(4) {
        px[0] = mul_div255_u8(u16::from(px[0]), inv);
        px[1] = mul_div255_u8(u16::from(px[1]), inv);
        px[2] = mul_div255_u8(u16::from(px[2]), inv);
        px[3] = alpha.saturating_add(mul_div255_u8(u16::from(px[3]), inv));
    }
}

/// Convert premultiplied RGBA8 to straight alpha in place.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Flatten premultiplied RGBA8 over an opaque background color into `dst`.
pub fn flatten_to_opaque(dst: &mut [u8], src: &[u8], bg_rgb: [u8; 3]) -> BannerResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BannerError::render(
            "flatten_to_opaque expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(bg_rgb[c]), inv));
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
