use std::path::PathBuf;

/// Crate-wide result alias.
pub type BannerResult<T> = Result<T, BannerError>;

/// Errors surfaced by compositing, recording and export operations.
#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be loaded and no fallback applies.
    #[error("asset error: {0}")]
    Asset(#[from] AssetLoadError),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Image or video encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// (De)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BannerError {
    /// Build a [`BannerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BannerError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BannerError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BannerError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Typed failure of a single asset load.
///
/// Compositors recover from these locally (fallback fill, missing logo) and only log them.
#[derive(thiserror::Error, Debug)]
pub enum AssetLoadError {
    /// The file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes were read but could not be decoded.
    #[error("failed to decode '{}': {reason}", path.display())]
    Decode {
        /// Offending path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The path does not name a supported asset type.
    #[error("unsupported asset '{}'", path.display())]
    Unsupported {
        /// Offending path.
        path: PathBuf,
    },
}

impl AssetLoadError {
    /// Path of the asset that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Decode { path, .. } | Self::Unsupported { path } => path,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
