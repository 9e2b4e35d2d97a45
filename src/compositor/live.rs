use crate::{
    assets::{Logo, PreparedImage, fonts::FontSet, media::VideoSource},
    config::{BannerConfig, BannerGeometry},
    foundation::core::Rgba8,
    foundation::error::{AssetLoadError, BannerResult},
    layout::{TextLayout, compute_layout},
    model::BannerContent,
    overlay::LiveOverlay,
    render::{
        paint::{Painter, cover_rect},
        surface::Surface,
    },
    text::TextEngine,
};

/// Whether the video layer is advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// The video layer of a mounted live scene: a source plus its playback state.
///
/// Playback loops: when the source is exhausted it restarts from time zero.
pub struct VideoPlayback {
    source: Box<dyn VideoSource + Send>,
    state: PlaybackState,
    started: bool,
    current: Option<Surface>,
}

impl std::fmt::Debug for VideoPlayback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPlayback")
            .field("state", &self.state)
            .field("started", &self.started)
            .field("has_frame", &self.current.is_some())
            .finish_non_exhaustive()
    }
}

impl VideoPlayback {
    /// Paused playback of `source`.
    pub fn new(source: Box<dyn VideoSource + Send>) -> Self {
        Self {
            source,
            state: PlaybackState::Paused,
            started: false,
            current: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Source duration, if known.
    pub fn duration_ms(&self) -> Option<u64> {
        self.source.duration_ms()
    }

    /// Start (or resume) playback.
    pub fn play(&mut self) -> BannerResult<()> {
        if !self.started {
            self.source.start()?;
            self.started = true;
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Hold the current frame.
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Seek back to time zero, keeping the playback state.
    pub fn restart(&mut self) -> BannerResult<()> {
        self.current = None;
        self.source.start()?;
        self.started = true;
        Ok(())
    }

    /// Frame on screen.
    pub fn current_frame(&self) -> Option<&Surface> {
        self.current.as_ref()
    }

    /// Move to the next frame when playing; returns the frame on screen.
    pub fn advance(&mut self) -> BannerResult<Option<&Surface>> {
        if self.is_playing() {
            let next = match self.source.next_frame()? {
                Some(frame) => Some(frame),
                None => {
                    self.source.start()?;
                    self.source.next_frame()?
                }
            };
            if let Some(frame) = next {
                self.current = Some(frame);
            }
        }
        Ok(self.current.as_ref())
    }

    /// [`VideoPlayback::advance`] `frames` times, keeping the last frame on screen.
    pub fn advance_by(&mut self, frames: u64) -> BannerResult<Option<&Surface>> {
        for _ in 0..frames {
            self.advance()?;
        }
        Ok(self.current.as_ref())
    }
}

impl Drop for VideoPlayback {
    fn drop(&mut self) {
        self.source.stop();
    }
}

/// The mounted preview for a video background.
///
/// Layers, bottom to top: video, blurred and darkened overlay, logo, headline and subtext. The
/// geometry is the same as for still banners.
#[derive(Debug)]
pub struct LiveScene {
    config: BannerConfig,
    geometry: BannerGeometry,
    content: BannerContent,
    video: Option<VideoPlayback>,
    logo: Option<PreparedImage>,
    overlay: LiveOverlay,
    text: TextEngine,
    painter: Painter,
}

impl LiveScene {
    /// Mount the scene and autoplay the video layer.
    ///
    /// A video that fails to start is logged and left paused. A logo that failed to load is
    /// logged and the scene is mounted without it.
    pub fn mount(
        config: BannerConfig,
        fonts: &FontSet,
        content: BannerContent,
        video: Option<Box<dyn VideoSource + Send>>,
        logo: Result<Logo, AssetLoadError>,
    ) -> BannerResult<Self> {
        let geometry = config.geometry()?;
        let text = TextEngine::new(fonts, &geometry)?;
        let overlay =
            LiveOverlay::from_config(&config.live, geometry.canvas.height, geometry.scale);

        let logo = match logo.map(|l| l.rasterize(geometry.logo.width)) {
            Ok(Ok(img)) => Some(img),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "logo failed to rasterize, mounting without it");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "logo failed to load, mounting without it");
                None
            }
        };

        let mut video = video.map(VideoPlayback::new);
        if let Some(v) = video.as_mut()
            && let Err(e) = v.play()
        {
            tracing::warn!(error = %e, "video autoplay failed");
        }

        Ok(Self {
            config,
            geometry,
            content,
            video,
            logo,
            overlay,
            text,
            painter: Painter::new(),
        })
    }

    pub fn geometry(&self) -> &BannerGeometry {
        &self.geometry
    }

    /// Replace the text shown by the headline and subtext layers.
    pub fn set_content(&mut self, content: BannerContent) {
        self.content = content;
    }

    /// Text of the headline layer.
    pub fn headline_text(&self) -> &str {
        &self.content.headline
    }

    /// Text of the subtext layer.
    pub fn subtext_text(&self) -> &str {
        &self.content.subtext
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// The video layer, if one is mounted.
    pub fn video(&self) -> Option<&VideoPlayback> {
        self.video.as_ref()
    }

    pub fn video_mut(&mut self) -> Option<&mut VideoPlayback> {
        self.video.as_mut()
    }

    /// Layout of the current text layers.
    pub fn layout(&mut self) -> TextLayout {
        compute_layout(&self.content, &mut self.text, &self.geometry)
    }

    /// Advance the video layer by one frame and paint the scene.
    pub fn tick(&mut self, dst: &mut Surface) -> BannerResult<()> {
        self.tick_by(1, dst)
    }

    /// Advance the video `frames` frames, then render once.
    pub fn tick_by(&mut self, frames: u64, dst: &mut Surface) -> BannerResult<()> {
        if let Some(v) = self.video.as_mut() {
            v.advance_by(frames)?;
        }
        self.render_frame(dst)
    }

    /// Paint the scene as currently shown onto `dst` (canvas-sized).
    pub fn render_frame(&mut self, dst: &mut Surface) -> BannerResult<()> {
        let g = &self.geometry;
        dst.fill(Rgba8::BLACK);

        if let Some(frame) = self.video.as_ref().and_then(VideoPlayback::current_frame) {
            if frame.canvas() == dst.canvas() {
                dst.data_mut().copy_from_slice(frame.data());
            } else {
                let img = PreparedImage::from_premul(
                    frame.width(),
                    frame.height(),
                    frame.data().to_vec(),
                )?;
                let rect = cover_rect(img.width, img.height, dst.width(), dst.height());
                self.painter.draw_image(dst, &img, rect)?;
            }
        }

        self.overlay.apply(dst)?;

        if let Some(logo) = self.logo.as_ref() {
            super::draw_logo(&mut self.painter, dst, logo, g)?;
        }

        let layout = compute_layout(&self.content, &mut self.text, g);
        super::draw_text(
            &mut self.text,
            &mut self.painter,
            dst,
            &layout,
            g,
            &self.config.layout,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/live.rs"]
mod tests;
