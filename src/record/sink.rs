use std::time::Duration;

use crate::{
    foundation::core::Canvas,
    foundation::error::{BannerError, BannerResult},
    render::surface::Surface,
};

/// Configuration provided to a [`ClipSink`] when a recording starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame size.
    pub canvas: Canvas,
    /// Frames per second.
    pub fps: u32,
    /// Target bitrate in bits per second.
    pub bitrate: u32,
}

/// A finished recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedClip {
    /// MIME type of `data`.
    pub mime_type: String,
    /// Encoded bytes.
    pub data: Vec<u8>,
    /// Number of frames pushed.
    pub frame_count: u64,
    /// Frames per second.
    pub fps: u32,
}

impl EncodedClip {
    /// Playback length implied by the frame count and rate.
    pub fn duration(&self) -> Duration {
        if self.fps == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.frame_count.saturating_mul(1_000_000_000) / u64::from(self.fps))
    }
}

/// Consumer of recorded frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices between `begin`
/// and `finish`.
pub trait ClipSink {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> BannerResult<()>;
    /// Push one premultiplied frame.
    fn push_frame(&mut self, index: u64, frame: &Surface) -> BannerResult<()>;
    /// Called once after the last frame; returns the encoded clip.
    fn finish(&mut self) -> BannerResult<EncodedClip>;
    /// Drop everything pushed so far. Used on cancellation and errors.
    fn abort(&mut self) {}
}

/// MIME type of clips produced by [`InMemorySink`].
pub const RAW_RGBA_MIME: &str = "video/x-raw-rgba";

/// Sink keeping every frame in memory, for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, Surface)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, Surface)] {
        &self.frames
    }
}

impl ClipSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BannerResult<()> {
        if cfg.fps == 0 {
            return Err(BannerError::validation("fps must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &Surface) -> BannerResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BannerError::encode("in-memory sink not started"))?;
        if frame.canvas() != cfg.canvas {
            return Err(BannerError::validation("frame size mismatch"));
        }
        if self.frames.last().is_some_and(|(last, _)| index <= *last) {
            return Err(BannerError::encode("out-of-order frame index"));
        }
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn finish(&mut self) -> BannerResult<EncodedClip> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| BannerError::encode("in-memory sink not started"))?;
        let data = self
            .frames
            .iter()
            .flat_map(|(_, f)| f.data().iter().copied())
            .collect();
        Ok(EncodedClip {
            mime_type: RAW_RGBA_MIME.to_string(),
            data,
            frame_count: self.frames.len() as u64,
            fps: cfg.fps,
        })
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.frames.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/sink.rs"]
mod tests;
