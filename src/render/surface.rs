use std::ops::Range;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};
use crate::render::composite;

/// Offscreen raster surface: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(canvas: Canvas) -> BannerResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(BannerError::validation("surface width/height must be non-zero"));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.byte_len()?],
        })
    }

    /// Wrap existing premultiplied bytes.
    pub fn from_premul_bytes(canvas: Canvas, data: Vec<u8>) -> BannerResult<Self> {
        if data.len() != canvas.byte_len()? {
            return Err(BannerError::render(format!(
                "surface bytes: got {}, expected {}x{}x4",
                data.len(),
                canvas.width,
                canvas.height
            )));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride() + x as usize * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Bytes of one row.
    pub fn row(&self, y: u32) -> &[u8] {
        let s = self.stride();
        &self.data[y as usize * s..(y as usize + 1) * s]
    }

    /// Mutable bytes of one row.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let s = self.stride();
        &mut self.data[y as usize * s..(y as usize + 1) * s]
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        let px = color.premul().to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Overwrite `rows` with the same rows taken from a full-size buffer `rows_bytes`.
    pub fn replace_rows(&mut self, rows: Range<u32>, rows_bytes: &[u8]) -> BannerResult<()> {
        if rows.end > self.height || rows.start > rows.end {
            return Err(BannerError::render(format!(
                "rows {rows:?} out of bounds for height {}",
                self.height
            )));
        }
        let s = self.stride();
        let dst = &mut self.data[rows.start as usize * s..rows.end as usize * s];
        if dst.len() != rows_bytes.len() {
            return Err(BannerError::render("replace_rows length mismatch"));
        }
        dst.copy_from_slice(rows_bytes);
        Ok(())
    }

    /// Source-over a same-sized layer onto this surface.
    pub fn composite_over(&mut self, layer: &Surface, opacity: f32) -> BannerResult<()> {
        if layer.width != self.width || layer.height != self.height {
            return Err(BannerError::render("composite layer size mismatch"));
        }
        composite::over_in_place(&mut self.data, &layer.data, opacity)
    }

    /// Straight-alpha copy for encoders.
    pub fn to_rgba_image(&self) -> BannerResult<image::RgbaImage> {
        let mut bytes = self.data.clone();
        composite::unpremultiply_in_place(&mut bytes);
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| BannerError::render("surface bytes do not match dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
