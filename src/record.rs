//! Frame-by-frame recording of a live scene into an encoded clip.

pub mod recorder;
pub mod session;
pub mod sink;
pub mod webm;

pub use recorder::{FrameRecorder, RecordOutcome};
pub use session::{CancelToken, Clock, FrameClock, RecordingSession, Tick, WallClock};
pub use sink::{ClipSink, EncodedClip, InMemorySink, SinkConfig};
pub use webm::{WebmSink, WebmSinkOpts};
