//! bannerkit composes marketing banners: a headline and subtext wrapped over a background image
//! or video, a progressively blurred and darkened overlay behind the text, and a logo.
//!
//! - Lay out text with [`layout::compute_layout`]
//! - Compose a still banner with [`StillCompositor`] and export it as PNG or WebP
//! - Mount a [`LiveScene`] over a video and record it into a WebM clip with [`FrameRecorder`]
#![forbid(unsafe_code)]

pub mod assets;
/// Still and live compositors.
pub mod compositor;
pub mod config;
pub mod export;
mod foundation;
pub mod layout;
pub mod model;
pub mod overlay;
/// Video recording sessions and clip sinks.
pub mod record;
/// CPU raster primitives.
pub mod render;
pub mod text;

pub use crate::foundation::core::{Affine, Canvas, Rect, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{AssetLoadError, BannerError, BannerResult};

pub use crate::assets::fonts::{FontFace, FontSet};
pub use crate::assets::media::{FfmpegVideoSource, VideoSource};
pub use crate::assets::{Logo, PreparedImage};
pub use crate::compositor::{LiveScene, PlaybackState, StillCompositor, StillFrame};
pub use crate::config::{BannerConfig, BannerGeometry};
pub use crate::export::ImageFormat;
pub use crate::layout::{TextLayout, TextMeasure, TextRole};
pub use crate::model::{
    BackgroundCatalog, BackgroundKind, BackgroundOption, BannerContent, EditorState,
};
pub use crate::record::{
    CancelToken, ClipSink, EncodedClip, FrameRecorder, InMemorySink, RecordOutcome, SinkConfig,
    WebmSink, WebmSinkOpts,
};
pub use crate::render::surface::Surface;
