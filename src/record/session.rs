use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// Time source driving a recording.
pub trait Clock {
    /// Mark time zero.
    fn start(&mut self);
    /// Time since [`Clock::start`].
    fn elapsed(&self) -> Duration;
    /// Called after each captured frame.
    fn tick(&mut self);
}

/// Deterministic clock: every tick advances exactly one frame interval.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    fps: u32,
    frames: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            frames: 0,
        }
    }
}

impl Clock for FrameClock {
    fn start(&mut self) {
        self.frames = 0;
    }

    fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.frames.saturating_mul(1_000_000_000) / u64::from(self.fps))
    }

    fn tick(&mut self) {
        self.frames += 1;
    }
}

/// Host clock: ticks are paced to the frame interval and elapsed time is real time.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    interval: Duration,
    started: Option<Instant>,
    next_deadline: Option<Instant>,
}

impl WallClock {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1))),
            started: None,
            next_deadline: None,
        }
    }
}

impl Clock for WallClock {
    fn start(&mut self) {
        let now = Instant::now();
        self.started = Some(now);
        self.next_deadline = Some(now + self.interval);
    }

    fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    fn tick(&mut self) {
        let Some(deadline) = self.next_deadline else {
            return;
        };
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.next_deadline = Some(deadline.max(now) + self.interval);
    }
}

/// Shared flag to stop an in-flight recording.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the recording loop does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Capture `count` frames starting at index `first`. `count` exceeds one when the clock ran
    /// ahead of capture; the skipped indices repeat the newly composed frame.
    Frames { first: u64, count: u64 },
    /// The requested duration has elapsed.
    Done,
    /// The recording was cancelled.
    Cancelled,
}

/// State of one recording: duration, frame rate, clock and cancellation.
pub struct RecordingSession {
    duration: Duration,
    fps: u32,
    total_frames: u64,
    frames_pushed: u64,
    clock: Box<dyn Clock + Send>,
    cancel: CancelToken,
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("duration", &self.duration)
            .field("fps", &self.fps)
            .field("total_frames", &self.total_frames)
            .field("frames_pushed", &self.frames_pushed)
            .field("elapsed", &self.clock.elapsed())
            .finish_non_exhaustive()
    }
}

impl RecordingSession {
    /// Start a session; the clock is reset to time zero.
    pub fn start(
        duration: Duration,
        fps: u32,
        mut clock: Box<dyn Clock + Send>,
        cancel: CancelToken,
    ) -> Self {
        clock.start();
        Self {
            duration,
            fps,
            total_frames: frames_in(duration, fps),
            frames_pushed: 0,
            clock,
            cancel,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames in a completed recording: `ceil(duration * fps)`.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn frames_pushed(&self) -> u64 {
        self.frames_pushed
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Decide the next step. Cancellation wins over completion.
    ///
    /// Frames are due up to `floor(elapsed * fps)`, so a clock that runs ahead of capture yields
    /// several indices at once and the frame count still reaches [`Self::total_frames`].
    pub fn next_tick(&self) -> Tick {
        if self.cancel.is_cancelled() {
            return Tick::Cancelled;
        }
        if self.frames_pushed >= self.total_frames {
            return Tick::Done;
        }
        let elapsed = self.clock.elapsed().as_nanos();
        let reached = (elapsed * u128::from(self.fps) / 1_000_000_000) as u64;
        let due = reached
            .saturating_add(1)
            .max(self.frames_pushed + 1)
            .min(self.total_frames);
        Tick::Frames {
            first: self.frames_pushed,
            count: due - self.frames_pushed,
        }
    }

    /// Record that `count` frames were pushed and advance the clock.
    pub fn frames_pushed_by(&mut self, count: u64) {
        self.frames_pushed += count;
        self.clock.tick();
    }
}

fn frames_in(duration: Duration, fps: u32) -> u64 {
    let fps = u128::from(fps.max(1));
    (duration.as_nanos() * fps).div_ceil(1_000_000_000) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/record/session.rs"]
mod tests;
