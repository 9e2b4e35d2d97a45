//! Encoding finished banners and writing them to disk.

use std::{
    fmt,
    io::Cursor,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;

use crate::{
    foundation::error::{BannerError, BannerResult},
    render::surface::Surface,
};

/// Still image output format. Both are lossless.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Png,
    Webp,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(BannerError::validation(format!(
                "unsupported image format '{other}' (expected png or webp)"
            ))),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encode `surface` (unpremultiplied first) as `format`.
#[tracing::instrument(
    skip_all,
    fields(format = %format, width = surface.width(), height = surface.height())
)]
pub fn encode_surface(surface: &Surface, format: ImageFormat) -> BannerResult<Vec<u8>> {
    let img = surface.to_rgba_image()?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format.codec())
        .map_err(|e| BannerError::encode(format!("{format} encoding failed: {e}")))?;
    Ok(out.into_inner())
}

/// `banner-<YYYY-MM-DD>.<ext>`
pub fn export_filename(date: chrono::NaiveDate, ext: &str) -> String {
    format!("banner-{}.{ext}", date.format("%Y-%m-%d"))
}

/// Export filename for the current UTC date.
pub fn today_filename(ext: &str) -> String {
    export_filename(chrono::Utc::now().date_naive(), ext)
}

/// Write `bytes` to `dir/filename`, creating `dir` as needed.
pub fn save_export(dir: &Path, filename: &str, bytes: &[u8]) -> BannerResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export directory '{}'", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).with_context(|| format!("write export '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "export saved");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
