//! Gaussian blur over premultiplied RGBA8 buffers.
//!
//! The blur radius follows the CSS `blur()` convention: it is the standard deviation of the
//! Gaussian. Small radii use an exact fixed-point kernel; larger radii use three successive box
//! filters, whose cost does not grow with the radius.

use std::ops::Range;

use crate::foundation::error::{BannerError, BannerResult};

/// Below this standard deviation the exact kernel is used.
const EXACT_KERNEL_MAX_SIGMA: f32 = 2.0;

/// Blur the whole image.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> BannerResult<Vec<u8>> {
    blur_rows_rgba8_premul(src, width, height, 0..height, sigma)
}

/// Blur `src` and return only `rows`, as if the whole image had been blurred.
///
/// Only the requested rows plus a `3σ` guard band above and below are processed.
pub fn blur_rows_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    rows: Range<u32>,
    sigma: f32,
) -> BannerResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BannerError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(BannerError::render(
            "blur expects src matching width*height*4",
        ));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(BannerError::validation("blur radius must be finite and >= 0"));
    }
    if rows.start > rows.end || rows.end > height {
        return Err(BannerError::render(format!(
            "blur rows {rows:?} out of bounds for height {height}"
        )));
    }

    let stride = width as usize * 4;
    if sigma == 0.0 || rows.is_empty() || width == 0 {
        return Ok(src[rows.start as usize * stride..rows.end as usize * stride].to_vec());
    }

    let guard = (3.0 * sigma).ceil() as u32;
    let band_start = rows.start.saturating_sub(guard);
    let band_end = rows.end.saturating_add(guard).min(height);
    let band_h = band_end - band_start;
    let band = &src[band_start as usize * stride..band_end as usize * stride];

    let blurred = if sigma < EXACT_KERNEL_MAX_SIGMA {
        let radius = (3.0 * sigma).ceil().max(1.0) as u32;
        let kernel = gaussian_kernel_q16(radius, sigma)?;
        let mut tmp = vec![0u8; band.len()];
        let mut out = vec![0u8; band.len()];
        horizontal_pass(band, &mut tmp, width, band_h, &kernel);
        vertical_pass(&tmp, &mut out, width, band_h, &kernel);
        out
    } else {
        let mut a = band.to_vec();
        let mut b = vec![0u8; band.len()];
        for size in box_sizes_for_gaussian(sigma, 3) {
            let r = (size - 1) / 2;
            box_blur_h(&a, &mut b, width as usize, band_h as usize, r);
            box_blur_v(&b, &mut a, width as usize, band_h as usize, r);
        }
        a
    };

    let off = (rows.start - band_start) as usize * stride;
    let len = rows.len() * stride;
    Ok(blurred[off..off + len].to_vec())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BannerResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BannerError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(BannerError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

/// Odd box widths whose successive application approximates a Gaussian of `sigma`.
fn box_sizes_for_gaussian(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f32;
    let w_ideal = ((12.0 * sigma * sigma / n) + 1.0).sqrt();
    let mut wl = w_ideal.floor() as usize;
    if wl.is_multiple_of(2) {
        wl = wl.saturating_sub(1);
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f32;
    let m_ideal =
        (12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().clamp(0.0, n) as usize;
    (0..passes).map(|i| if i < m { wl } else { wu }).collect()
}

fn box_blur_h(src: &[u8], dst: &mut [u8], w: usize, h: usize, r: usize) {
    if r == 0 {
        dst.copy_from_slice(src);
        return;
    }
    let div = (2 * r + 1) as u32;
    let last = w as isize - 1;
    for y in 0..h {
        let row = &src[y * w * 4..(y + 1) * w * 4];
        let out = &mut dst[y * w * 4..(y + 1) * w * 4];
        for c in 0..4 {
            let at = |x: isize| u32::from(row[x.clamp(0, last) as usize * 4 + c]);
            let mut acc: u32 = (-(r as isize)..=r as isize).map(at).sum();
            for x in 0..w as isize {
                out[x as usize * 4 + c] = ((acc + div / 2) / div) as u8;
                acc += at(x + r as isize + 1);
                acc -= at(x - r as isize);
            }
        }
    }
}

fn box_blur_v(src: &[u8], dst: &mut [u8], w: usize, h: usize, r: usize) {
    if r == 0 {
        dst.copy_from_slice(src);
        return;
    }
    let div = (2 * r + 1) as u32;
    let last = h as isize - 1;
    for x in 0..w {
        for c in 0..4 {
            let at = |y: isize| u32::from(src[(y.clamp(0, last) as usize * w + x) * 4 + c]);
            let mut acc: u32 = (-(r as isize)..=r as isize).map(at).sum();
            for y in 0..h as isize {
                dst[(y as usize * w + x) * 4 + c] = ((acc + div / 2) / div) as u8;
                acc += at(y + r as isize + 1);
                acc -= at(y - r as isize);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
