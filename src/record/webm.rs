use std::{
    io::Read,
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use crate::{
    assets::media::is_ffmpeg_on_path,
    config::{RecordingConfig, VideoCodec},
    foundation::error::{BannerError, BannerResult},
    record::sink::{ClipSink, EncodedClip, SinkConfig},
    render::{composite::flatten_to_opaque, surface::Surface},
};

/// Options for [`WebmSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebmSinkOpts {
    /// Codecs in preference order; the first one `ffmpeg` can encode is used.
    pub codecs: Vec<VideoCodec>,
    /// Colour the frames are flattened over before encoding.
    pub bg_rgb: [u8; 3],
}

impl WebmSinkOpts {
    pub fn from_config(cfg: &RecordingConfig) -> Self {
        Self {
            codecs: cfg.codecs.clone(),
            bg_rgb: [0, 0, 0],
        }
    }
}

impl Default for WebmSinkOpts {
    fn default() -> Self {
        Self::from_config(&RecordingConfig::default())
    }
}

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

/// Sink that spawns the system `ffmpeg`, streams raw frames to its stdin and collects the WebM
/// container from its stdout.
pub struct WebmSink {
    opts: WebmSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<Drain>,
    stderr_drain: Option<Drain>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    codec: Option<VideoCodec>,
    frames: u64,
    last_idx: Option<u64>,
}

impl std::fmt::Debug for WebmSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebmSink")
            .field("opts", &self.opts)
            .field("codec", &self.codec)
            .field("frames", &self.frames)
            .field("running", &self.child.is_some())
            .finish_non_exhaustive()
    }
}

impl WebmSink {
    pub fn new(opts: WebmSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            codec: None,
            frames: 0,
            last_idx: None,
        }
    }

    /// Codec chosen in `begin`.
    pub fn codec(&self) -> Option<VideoCodec> {
        self.codec
    }

    fn kill(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.stdout_drain.take();
        self.stderr_drain.take();
        self.cfg = None;
    }
}

/// Encoder names listed by `ffmpeg -encoders`.
pub fn available_encoders() -> BannerResult<Vec<String>> {
    let out = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| BannerError::encode(format!("failed to run ffmpeg -encoders: {e}")))?;
    if !out.status.success() {
        return Err(BannerError::encode("ffmpeg -encoders failed"));
    }
    Ok(parse_encoder_list(&String::from_utf8_lossy(&out.stdout)))
}

/// Parse the table printed by `ffmpeg -encoders`: a flags column, then the encoder name.
fn parse_encoder_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip_while(|l| !l.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|l| {
            let mut cols = l.split_whitespace();
            let flags = cols.next()?;
            let name = cols.next()?;
            (flags.len() == 6).then(|| name.to_string())
        })
        .collect()
}

/// First codec in `preferred` whose encoder is in `available`.
pub fn choose_codec(preferred: &[VideoCodec], available: &[String]) -> Option<VideoCodec> {
    preferred
        .iter()
        .copied()
        .find(|c| available.iter().any(|a| a == c.ffmpeg_encoder()))
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        let mut chunk = [0u8; 64 * 1024];
        loop {
            let n = pipe.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
        }
        Ok(bytes)
    })
}

fn join_drain(handle: Option<Drain>, what: &str) -> BannerResult<Vec<u8>> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| BannerError::encode(format!("ffmpeg {what} drain thread panicked")))?
            .map_err(|e| BannerError::encode(format!("ffmpeg {what} read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

impl ClipSink for WebmSink {
    fn begin(&mut self, cfg: SinkConfig) -> BannerResult<()> {
        if cfg.fps == 0 {
            return Err(BannerError::validation("fps must be non-zero"));
        }
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(BannerError::validation(
                "webm sink width/height must be non-zero",
            ));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(BannerError::validation(
                "webm sink width/height must be even (required for yuv420p output)",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(BannerError::encode(
                "ffmpeg is required for WebM encoding, but was not found on PATH",
            ));
        }

        let available = available_encoders()?;
        let codec = choose_codec(&self.opts.codecs, &available).ok_or_else(|| {
            BannerError::encode(format!(
                "none of the WebM encoders {:?} is available in ffmpeg",
                self.opts
                    .codecs
                    .iter()
                    .map(|c| c.ffmpeg_encoder())
                    .collect::<Vec<_>>()
            ))
        })?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            codec.ffmpeg_encoder(),
            "-b:v",
            &cfg.bitrate.to_string(),
            "-deadline",
            "realtime",
            "-cpu-used",
            "8",
            "-pix_fmt",
            "yuv420p",
            "-f",
            "webm",
            "pipe:1",
        ]);

        let mut child = cmd.spawn().map_err(|e| {
            BannerError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BannerError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BannerError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BannerError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        tracing::info!(
            encoder = codec.ffmpeg_encoder(),
            width = cfg.canvas.width,
            height = cfg.canvas.height,
            fps = cfg.fps,
            bitrate = cfg.bitrate,
            "webm encoder started"
        );

        self.scratch = vec![0u8; cfg.canvas.byte_len()?];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_drain = Some(drain(stdout));
        self.stderr_drain = Some(drain(stderr));
        self.cfg = Some(cfg);
        self.codec = Some(codec);
        self.frames = 0;
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &Surface) -> BannerResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BannerError::encode("webm sink not started"))?;
        if self.last_idx.is_some_and(|last| index <= last) {
            return Err(BannerError::encode(
                "webm sink received out-of-order frame index",
            ));
        }
        if frame.canvas() != cfg.canvas {
            return Err(BannerError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.canvas.width,
                cfg.canvas.height
            )));
        }
        self.last_idx = Some(index);

        flatten_to_opaque(&mut self.scratch, frame.data(), self.opts.bg_rgb)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(BannerError::encode("webm sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            BannerError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> BannerResult<EncodedClip> {
        drop(self.stdin.take());
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| BannerError::encode("webm sink not started"))?;
        let codec = self
            .codec
            .ok_or_else(|| BannerError::encode("webm sink has no codec"))?;
        let mut child = self
            .child
            .take()
            .ok_or_else(|| BannerError::encode("webm sink not started"))?;

        let status = child.wait().map_err(|e| {
            BannerError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let data = join_drain(self.stdout_drain.take(), "stdout")?;
        let stderr_bytes = join_drain(self.stderr_drain.take(), "stderr")?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(BannerError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        if data.is_empty() {
            return Err(BannerError::encode("ffmpeg produced no output"));
        }

        tracing::info!(frames = self.frames, bytes = data.len(), "webm encoder finished");
        Ok(EncodedClip {
            mime_type: codec.mime_type().to_string(),
            data,
            frame_count: self.frames,
            fps: cfg.fps,
        })
    }

    fn abort(&mut self) {
        self.kill();
    }
}

impl Drop for WebmSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.kill();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/webm.rs"]
mod tests;
