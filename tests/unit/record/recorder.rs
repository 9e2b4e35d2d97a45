use super::*;
use crate::{
    assets::{fonts::FontSet, media::VideoSource},
    config::BannerConfig,
    foundation::{core::Rgba8, error::AssetLoadError},
    model::BannerContent,
    record::sink::InMemorySink,
};

struct GreySource {
    duration_ms: Option<u64>,
    frame: u32,
}

impl VideoSource for GreySource {
    fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    fn start(&mut self) -> BannerResult<()> {
        self.frame = 0;
        Ok(())
    }

    fn next_frame(&mut self) -> BannerResult<Option<Surface>> {
        self.frame += 1;
        let mut s = Surface::new(crate::foundation::core::Canvas {
            width: 24,
            height: 13,
        })?;
        s.fill(Rgba8::rgb(90, 90, 90));
        Ok(Some(s))
    }

    fn stop(&mut self) {}
}

fn scene(duration_ms: Option<u64>, with_video: bool) -> Option<LiveScene> {
    let mut cfg = BannerConfig::default();
    cfg.canvas.scale = 0.1;
    let fonts = FontSet::resolve(&cfg.assets, std::path::Path::new("/nonexistent")).ok()?;
    let video: Option<Box<dyn VideoSource + Send>> = with_video.then(|| {
        Box::new(GreySource {
            duration_ms,
            frame: 0,
        }) as Box<dyn VideoSource + Send>
    });
    let logo = Err(AssetLoadError::Unsupported {
        path: "logo.bin".into(),
    });
    Some(LiveScene::mount(cfg, &fonts, BannerContent::default(), video, logo).unwrap())
}

#[test]
fn clip_duration_is_capped() {
    let rec = FrameRecorder::new(&RecordingConfig::default());
    assert_eq!(rec.clip_duration(Some(12_000)), Duration::from_millis(5000));
    assert_eq!(rec.clip_duration(Some(2000)), Duration::from_millis(2000));
    assert_eq!(rec.clip_duration(None), Duration::from_millis(5000));
}

#[test]
fn long_source_records_exactly_five_seconds() {
    let Some(mut scene) = scene(Some(60_000), true) else {
        return;
    };
    let rec = FrameRecorder::new(&RecordingConfig::default());
    let mut sink = InMemorySink::new();
    let clip = rec
        .try_record(&mut scene, &mut sink)
        .unwrap()
        .into_clip()
        .unwrap();
    assert_eq!(clip.frame_count, 150);
    assert_eq!(clip.fps, 30);
    assert_eq!(clip.duration(), Duration::from_millis(5000));
    assert!(!scene.video().unwrap().is_playing());
}

#[test]
fn short_source_records_its_own_length() {
    let Some(mut scene) = scene(Some(1000), true) else {
        return;
    };
    let rec = FrameRecorder::new(&RecordingConfig::default());
    let mut sink = InMemorySink::new();
    let clip = rec.record(&mut scene, &mut sink).unwrap();
    assert_eq!(clip.frame_count, 30);
}

#[test]
fn cancelled_recording_yields_no_clip() {
    let Some(mut scene) = scene(Some(5000), true) else {
        return;
    };
    let rec = FrameRecorder::new(&RecordingConfig::default());
    rec.cancel_token().cancel();
    let mut sink = InMemorySink::new();
    let outcome = rec.try_record(&mut scene, &mut sink).unwrap();
    assert!(matches!(outcome, RecordOutcome::Cancelled));
    assert!(!scene.video().unwrap().is_playing());
}

#[test]
fn recorder_records_again_after_a_cancel() {
    let Some(mut scene) = scene(Some(1000), true) else {
        return;
    };
    let rec = FrameRecorder::new(&RecordingConfig::default());
    let token = rec.cancel_token();
    token.cancel();
    assert!(rec.record(&mut scene, &mut InMemorySink::new()).is_none());

    let mut sink = InMemorySink::new();
    let clip = rec.record(&mut scene, &mut sink).unwrap();
    assert_eq!(clip.frame_count, 30);
    assert_eq!(sink.frames().len(), 30);
    assert!(!rec.cancel_token().is_cancelled());

    // A token from an earlier recording no longer reaches later ones.
    token.cancel();
    assert!(rec.record(&mut scene, &mut InMemorySink::new()).is_some());
}

#[test]
fn scene_without_video_is_an_error() {
    let Some(mut scene) = scene(None, false) else {
        return;
    };
    let rec = FrameRecorder::new(&RecordingConfig::default());
    let mut sink = InMemorySink::new();
    assert!(rec.try_record(&mut scene, &mut sink).is_err());
    assert!(rec.record(&mut scene, &mut sink).is_none());
    assert!(sink.config().is_none());
}
