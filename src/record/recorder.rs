use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::{
    compositor::LiveScene,
    config::RecordingConfig,
    foundation::error::{BannerError, BannerResult},
    record::{
        session::{CancelToken, Clock, FrameClock, RecordingSession, Tick, WallClock},
        sink::{ClipSink, EncodedClip, SinkConfig},
    },
    render::surface::Surface,
};

/// How a recording ended.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The requested duration was captured.
    Completed(EncodedClip),
    /// The cancel token fired before the duration elapsed; the sink was aborted.
    Cancelled,
}

impl RecordOutcome {
    pub fn into_clip(self) -> Option<EncodedClip> {
        match self {
            Self::Completed(clip) => Some(clip),
            Self::Cancelled => None,
        }
    }
}

/// Captures a mounted [`LiveScene`] frame by frame into a [`ClipSink`].
///
/// Each recording gets its own cancel token; clones of a recorder share the pending one.
#[derive(Clone, Debug)]
pub struct FrameRecorder {
    fps: u32,
    max_duration_ms: u64,
    bitrate: u32,
    wall_clock: bool,
    cancel: Arc<Mutex<CancelToken>>,
}

impl FrameRecorder {
    pub fn new(cfg: &RecordingConfig) -> Self {
        Self {
            fps: cfg.fps.max(1),
            max_duration_ms: cfg.max_duration_ms,
            bitrate: cfg.bitrate,
            wall_clock: false,
            cancel: Arc::new(Mutex::new(CancelToken::new())),
        }
    }

    /// Pace frames to real time instead of the deterministic frame clock.
    pub fn with_wall_clock(mut self, wall_clock: bool) -> Self {
        self.wall_clock = wall_clock;
        self
    }

    /// Token that stops the in-flight recording at its next tick, or the next recording when
    /// none is running. Once a recording ends, later recordings get a fresh token.
    pub fn cancel_token(&self) -> CancelToken {
        self.token_slot().clone()
    }

    fn token_slot(&self) -> MutexGuard<'_, CancelToken> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Clip duration for a source of `source_ms` (unknown sources record the maximum).
    pub fn clip_duration(&self, source_ms: Option<u64>) -> Duration {
        let ms = source_ms.map_or(self.max_duration_ms, |s| s.min(self.max_duration_ms));
        Duration::from_millis(ms)
    }

    fn clock(&self) -> Box<dyn Clock + Send> {
        if self.wall_clock {
            Box::new(WallClock::new(self.fps))
        } else {
            Box::new(FrameClock::new(self.fps))
        }
    }

    /// Record the scene's video layer, overlay, logo and text.
    ///
    /// The video is restarted from time zero and paused again when the recording ends, whether
    /// it completes, is cancelled or fails.
    #[tracing::instrument(skip_all, fields(fps = self.fps))]
    pub fn try_record(
        &self,
        scene: &mut LiveScene,
        sink: &mut dyn ClipSink,
    ) -> BannerResult<RecordOutcome> {
        let source_ms = scene
            .video()
            .ok_or_else(|| BannerError::validation("scene has no video layer to record"))?
            .duration_ms();
        let duration = self.clip_duration(source_ms);
        let canvas = scene.geometry().canvas;
        let mut surface = Surface::new(canvas)?;

        sink.begin(SinkConfig {
            canvas,
            fps: self.fps,
            bitrate: self.bitrate,
        })?;

        let cancel = self.cancel_token();
        let result = self.capture(scene, sink, &mut surface, duration, cancel);
        *self.token_slot() = CancelToken::new();
        if let Some(video) = scene.video_mut() {
            video.pause();
        }
        match result {
            Ok(Some(clip)) => {
                tracing::info!(
                    frames = clip.frame_count,
                    duration_ms = clip.duration().as_millis() as u64,
                    "recording completed"
                );
                Ok(RecordOutcome::Completed(clip))
            }
            Ok(None) => {
                sink.abort();
                tracing::info!("recording cancelled");
                Ok(RecordOutcome::Cancelled)
            }
            Err(e) => {
                sink.abort();
                Err(e)
            }
        }
    }

    fn capture(
        &self,
        scene: &mut LiveScene,
        sink: &mut dyn ClipSink,
        surface: &mut Surface,
        duration: Duration,
        cancel: CancelToken,
    ) -> BannerResult<Option<EncodedClip>> {
        if let Some(video) = scene.video_mut() {
            video.restart()?;
            video.play()?;
        }

        let mut session = RecordingSession::start(duration, self.fps, self.clock(), cancel);
        tracing::debug!(
            duration_ms = duration.as_millis() as u64,
            frames = session.total_frames(),
            "recording started"
        );
        loop {
            match session.next_tick() {
                Tick::Frames { first, count } => {
                    if count > 1 {
                        tracing::debug!(first, count, "capture behind clock, repeating frame");
                    }
                    scene.tick_by(count, surface)?;
                    for index in first..first + count {
                        sink.push_frame(index, surface)?;
                    }
                    session.frames_pushed_by(count);
                }
                Tick::Done => return sink.finish().map(Some),
                Tick::Cancelled => return Ok(None),
            }
        }
    }

    /// [`FrameRecorder::try_record`] with failures logged; `None` when nothing was produced.
    pub fn record(&self, scene: &mut LiveScene, sink: &mut dyn ClipSink) -> Option<EncodedClip> {
        match self.try_record(scene, sink) {
            Ok(outcome) => outcome.into_clip(),
            Err(e) => {
                tracing::error!(error = %e, "video export failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/recorder.rs"]
mod tests;
