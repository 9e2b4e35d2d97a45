//! Font resolution: configured font files first, system sans-serif faces as the fallback.

use std::{path::Path, sync::Arc};

use usvg::fontdb;

use crate::{
    config::AssetConfig,
    foundation::error::{BannerError, BannerResult},
    model::resolve_asset_path,
};

/// Where a face came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// Read from a configured file.
    File(std::path::PathBuf),
    /// Picked from the system font database.
    System(String),
    /// Supplied directly as bytes.
    Memory,
}

/// Raw font file bytes plus the face index inside the file.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index for collections.
    pub index: u32,
    /// Origin, for logs.
    pub origin: FontOrigin,
}

impl FontFace {
    /// Face from in-memory bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
            origin: FontOrigin::Memory,
        }
    }
}

/// Faces used for the two text roles.
#[derive(Clone, Debug)]
pub struct FontSet {
    /// Bold display face.
    pub headline: FontFace,
    /// Regular text face.
    pub subtext: FontFace,
}

impl FontSet {
    /// Resolve both faces for `cfg` under `assets_root`.
    ///
    /// A configured font that cannot be read is logged and replaced by a system face (bold for
    /// the headline). Fails only when no face at all is available.
    pub fn resolve(cfg: &AssetConfig, assets_root: &Path) -> BannerResult<Self> {
        let mut system: Option<fontdb::Database> = None;
        let mut pick = |configured: Option<&Path>, weight: fontdb::Weight, role: &str| {
            if let Some(p) = configured {
                match read_configured(assets_root, p) {
                    Ok(face) => return Ok(face),
                    Err(e) => tracing::warn!(
                        role,
                        error = %e,
                        "configured font unavailable, using system font"
                    ),
                }
            }
            let db = system.get_or_insert_with(|| {
                let mut db = fontdb::Database::new();
                db.load_system_fonts();
                db
            });
            system_face(db, weight).ok_or_else(|| {
                BannerError::validation(format!(
                    "no usable {role} font: configure one under assets"
                ))
            })
        };

        let headline = pick(cfg.headline_font.as_deref(), fontdb::Weight::BOLD, "headline")?;
        let subtext = pick(cfg.subtext_font.as_deref(), fontdb::Weight::NORMAL, "subtext")?;
        tracing::debug!(headline = ?headline.origin, subtext = ?subtext.origin, "resolved fonts");
        Ok(Self { headline, subtext })
    }

    /// Use the same face for both roles.
    pub fn single(face: FontFace) -> Self {
        Self {
            headline: face.clone(),
            subtext: face,
        }
    }
}

fn read_configured(assets_root: &Path, p: &Path) -> BannerResult<FontFace> {
    let path = if p.is_absolute() {
        p.to_path_buf()
    } else {
        resolve_asset_path(assets_root, &p.to_string_lossy())?
    };
    let bytes = std::fs::read(&path).map_err(|source| crate::AssetLoadError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(FontFace {
        bytes: Arc::new(bytes),
        index: 0,
        origin: FontOrigin::File(path),
    })
}

/// Closest sans-serif face to `weight` in `db`, preferring the generic sans-serif family.
fn system_face(db: &fontdb::Database, weight: fontdb::Weight) -> Option<FontFace> {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        ..fontdb::Query::default()
    };
    let id = db.query(&query).or_else(|| {
        db.faces()
            .filter(|f| !f.monospaced && f.style == fontdb::Style::Normal)
            .min_by_key(|f| (f.weight.0 as i32 - weight.0 as i32).abs())
            .map(|f| f.id)
    })?;
    let name = db
        .face(id)
        .and_then(|f| f.families.first().map(|(n, _)| n.clone()))
        .unwrap_or_default();
    db.with_face_data(id, |data, index| FontFace {
        bytes: Arc::new(data.to_vec()),
        index,
        origin: FontOrigin::System(name),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
