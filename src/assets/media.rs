use std::{
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    foundation::core::Canvas,
    foundation::error::{BannerError, BannerResult},
    render::surface::Surface,
};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "mkv"];

/// Whether `path` names a video by extension.
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VIDEO_EXTENSIONS.iter().any(|v| e.eq_ignore_ascii_case(v)))
}

/// Stream metadata reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    /// Container duration; 0 when unknown.
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    /// Duration in whole milliseconds, `None` when the container does not report one.
    pub fn duration_ms(&self) -> Option<u64> {
        (self.duration_sec.is_finite() && self.duration_sec > 0.0)
            .then(|| (self.duration_sec * 1000.0).round() as u64)
    }
}

/// A restartable stream of background video frames.
///
/// Frames are produced at the rate the source was opened with. Their size should match the
/// banner canvas; other sizes are cover-fit by the compositor.
pub trait VideoSource {
    /// Playback length, if known.
    fn duration_ms(&self) -> Option<u64>;

    /// (Re)start decoding from time zero.
    fn start(&mut self) -> BannerResult<()>;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> BannerResult<Option<Surface>>;

    /// Stop decoding and release resources.
    fn stop(&mut self);
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_runs("ffmpeg")
}

/// Return `true` when both `ffmpeg` and `ffprobe` can be invoked from `PATH`.
pub fn ffmpeg_tools_available() -> bool {
    tool_runs("ffmpeg") && tool_runs("ffprobe")
}

fn tool_runs(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> BannerResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| BannerError::render(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(BannerError::render(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| BannerError::serde(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| BannerError::render("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| BannerError::render("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| BannerError::render("missing video height from ffprobe"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| BannerError::render("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> BannerResult<VideoSourceInfo> {
    Err(BannerError::render(
        "video backgrounds require the 'media-ffmpeg' feature",
    ))
}

/// Video file decoded by a streaming `ffmpeg` child process.
///
/// The child resamples to the requested frame rate and scales to cover the canvas, cropping the
/// overflow around the center.
pub struct FfmpegVideoSource {
    info: VideoSourceInfo,
    canvas: Canvas,
    fps: u32,
    child: Option<std::process::Child>,
    stdout: Option<std::process::ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl FfmpegVideoSource {
    /// Probe `path` and prepare a decoder producing `canvas`-sized frames at `fps`.
    pub fn open(path: &Path, canvas: Canvas, fps: u32) -> BannerResult<Self> {
        if fps == 0 {
            return Err(BannerError::validation("fps must be non-zero"));
        }
        let info = probe_video(path)?;
        tracing::debug!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            fps = info.source_fps(),
            duration_sec = info.duration_sec,
            "probed video background"
        );
        Ok(Self {
            info,
            canvas,
            fps,
            child: None,
            stdout: None,
            stderr_drain: None,
        })
    }

    /// Probed metadata.
    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    fn cover_filter(&self) -> String {
        let (w, h) = (self.canvas.width, self.canvas.height);
        format!(
            "fps={},scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
            self.fps
        )
    }

    fn reap(&mut self) -> Option<String> {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.stderr_drain
            .take()
            .and_then(|h| h.join().ok())
            .and_then(|r| r.ok())
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl VideoSource for FfmpegVideoSource {
    fn duration_ms(&self) -> Option<u64> {
        self.info.duration_ms()
    }

    fn start(&mut self) -> BannerResult<()> {
        use std::process::{Command, Stdio};

        self.reap();
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.info.source_path)
            .args([
                "-an",
                "-vf",
                &self.cover_filter(),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BannerError::render(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BannerError::render("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| BannerError::render("failed to open ffmpeg stderr (unexpected)"))?;
        self.stderr_drain = Some(std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        }));
        self.child = Some(child);
        self.stdout = Some(stdout);
        Ok(())
    }

    fn next_frame(&mut self) -> BannerResult<Option<Surface>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(BannerError::render("video source not started"));
        };
        let mut frame = vec![0u8; self.canvas.byte_len()?];
        match stdout.read_exact(&mut frame) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                if let Some(stderr) = self.reap() {
                    tracing::debug!(stderr = %stderr, "ffmpeg decoder ended");
                }
                return Ok(None);
            }
            Err(e) => {
                let stderr = self.reap().unwrap_or_default();
                return Err(BannerError::render(format!(
                    "failed to read video frame from ffmpeg: {e} {stderr}"
                )));
            }
        }
        crate::assets::decode::premultiply_rgba8_in_place(&mut frame);
        Surface::from_premul_bytes(self.canvas, frame).map(Some)
    }

    fn stop(&mut self) {
        self.reap();
    }
}

impl Drop for FfmpegVideoSource {
    fn drop(&mut self) {
        self.reap();
    }
}

#[cfg(feature = "media-ffmpeg")]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
