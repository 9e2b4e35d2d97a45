//! Editor-facing data: banner text, the background catalog and the current selection.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{BannerError, BannerResult};

/// Text shown on the banner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerContent {
    /// Bold headline.
    pub headline: String,
    /// Optional description under the headline; may be empty.
    #[serde(default)]
    pub subtext: String,
}

impl BannerContent {
    /// Content with the given headline and subtext.
    pub fn new(headline: impl Into<String>, subtext: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            subtext: subtext.into(),
        }
    }

    /// Whether the subtext contributes any lines.
    pub fn has_subtext(&self) -> bool {
        !self.subtext.trim().is_empty()
    }
}

impl Default for BannerContent {
    fn default() -> Self {
        Self::new(
            "FluxEdge: Cost-Effective & Scalable",
            "A decentralized edge computing network that dramatically reduces latency and costs for modern applications.",
        )
    }
}

/// Whether a background is a still image or a video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Still image, composited with the progressive blur.
    Image,
    /// Video, composited live and exported by recording.
    Video,
}

/// One selectable background.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOption {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resource path relative to the assets root.
    pub path: String,
    /// Image or video.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
}

impl BackgroundOption {
    fn image(id: &str, name: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            kind: BackgroundKind::Image,
        }
    }
}

/// Immutable list of backgrounds offered to the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundCatalog {
    entries: Vec<BackgroundOption>,
}

impl BackgroundCatalog {
    /// Build a catalog, rejecting duplicate ids and invalid paths.
    pub fn new(entries: Vec<BackgroundOption>) -> BannerResult<Self> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The stock catalog of still backgrounds.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                BackgroundOption::image("1", "4 blocks", "backgrounds/one.jpg"),
                BackgroundOption::image("2", "Node Elevated", "backgrounds/two.jpg"),
                BackgroundOption::image("3", "Flux Nodes BG", "backgrounds/three.jpg"),
                BackgroundOption::image("4", "Flux AI BG", "backgrounds/four.jpg"),
                BackgroundOption::image("5", "Flux Wallets BG", "backgrounds/five.jpg"),
                BackgroundOption::image("6", "Flux Kaspa BG", "backgrounds/six.jpg"),
                BackgroundOption::image("7", "Flux Arcane BG", "backgrounds/seven.jpg"),
                BackgroundOption::image("9", "Flux WP BG", "backgrounds/nine.jpg"),
                BackgroundOption::image("8", "Flux Generic BG 1", "backgrounds/eight.jpg"),
                BackgroundOption::image("10", "Flux Generic BG 2", "backgrounds/ten.jpg"),
                BackgroundOption::image("11", "Flux Generic BG 3", "backgrounds/11.jpg"),
                BackgroundOption::image("12", "Flux Generic BG 4", "backgrounds/12.jpg"),
                BackgroundOption::image("13", "Flux Generic BG 5", "backgrounds/13.jpg"),
            ],
        }
    }

    /// Read a catalog from a JSON array of `{id, name, path, type}` objects.
    pub fn from_json_file(path: &Path) -> BannerResult<Self> {
        let f = File::open(path).with_context(|| format!("open catalog '{}'", path.display()))?;
        let entries: Vec<BackgroundOption> = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| BannerError::serde(format!("parse catalog '{}': {e}", path.display())))?;
        Self::new(entries)
    }

    fn validate(&self) -> BannerResult<()> {
        if self.entries.is_empty() {
            return Err(BannerError::validation("background catalog is empty"));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            normalize_rel_path(&entry.path)?;
            if self.entries[..i].iter().any(|e| e.id == entry.id) {
                return Err(BannerError::validation(format!(
                    "duplicate background id '{}'",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &BackgroundOption> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries (never true for a validated catalog).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, the default selection.
    pub fn first(&self) -> Option<&BackgroundOption> {
        self.entries.first()
    }

    /// Look up an entry by id.
    pub fn find_by_id(&self, id: &str) -> Option<&BackgroundOption> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Look up an entry by resource path.
    pub fn find_by_path(&self, path: &str) -> Option<&BackgroundOption> {
        self.entries.iter().find(|e| e.path == path)
    }
}

/// Ephemeral editing session: current text and the selected background path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    /// Current banner text.
    pub content: BannerContent,
    selected_background: String,
}

impl EditorState {
    /// Fresh session with default text and the first catalog entry selected.
    pub fn new(catalog: &BackgroundCatalog) -> Self {
        Self {
            content: BannerContent::default(),
            selected_background: catalog
                .first()
                .map(|bg| bg.path.clone())
                .unwrap_or_default(),
        }
    }

    /// Select a background by resource path.
    pub fn select(&mut self, path: impl Into<String>) {
        self.selected_background = path.into();
    }

    /// Currently selected resource path.
    pub fn selected_background(&self) -> &str {
        &self.selected_background
    }

    /// Catalog entry for the current selection, if it is a catalog path.
    pub fn current_background<'a>(
        &self,
        catalog: &'a BackgroundCatalog,
    ) -> Option<&'a BackgroundOption> {
        catalog.find_by_path(&self.selected_background)
    }

    /// Whether the live (video) compositor applies. Paths outside the catalog count as images.
    pub fn is_video_background(&self, catalog: &BackgroundCatalog) -> bool {
        self.current_background(catalog)
            .is_some_and(|bg| bg.kind == BackgroundKind::Video)
    }
}

/// Normalize and validate an assets-root-relative resource path.
///
/// The result uses `/` separators and has `.` segments removed. A single leading `/` is accepted
/// (resource paths are written as site-absolute URLs) but parent traversals (`..`) are rejected.
pub fn normalize_rel_path(source: &str) -> BannerResult<String> {
    let replaced = source.replace('\\', "/");
    let s = replaced.strip_prefix('/').unwrap_or(&replaced);
    if s.is_empty() {
        return Err(BannerError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BannerError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BannerError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Resolve a resource path against the assets root.
pub fn resolve_asset_path(root: &Path, source: &str) -> BannerResult<PathBuf> {
    Ok(root.join(normalize_rel_path(source)?))
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
