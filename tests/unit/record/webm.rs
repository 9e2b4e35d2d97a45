use super::*;
use crate::foundation::core::{Canvas, Rgba8};

const LISTING: &str = "Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libvpx               libvpx VP8 (codec vp8)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D libopus              libopus Opus (codec opus)
";

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        canvas: Canvas { width, height },
        fps: 30,
        bitrate: 1_000_000,
    }
}

#[test]
fn encoder_listing_is_parsed_after_the_separator() {
    let names = parse_encoder_list(LISTING);
    assert_eq!(names, vec!["libvpx", "libvpx-vp9", "libopus"]);
}

#[test]
fn codec_choice_follows_preference_order() {
    let all = parse_encoder_list(LISTING);
    assert_eq!(
        choose_codec(&[VideoCodec::Vp9, VideoCodec::Vp8], &all),
        Some(VideoCodec::Vp9)
    );

    let vp8_only = vec!["libvpx".to_string()];
    assert_eq!(
        choose_codec(&[VideoCodec::Vp9, VideoCodec::Vp8], &vp8_only),
        Some(VideoCodec::Vp8)
    );
    assert_eq!(choose_codec(&[VideoCodec::Vp9], &vp8_only), None);
}

#[test]
fn begin_rejects_odd_and_empty_canvases() {
    let mut sink = WebmSink::new(WebmSinkOpts::default());
    assert!(sink.begin(cfg(3, 2)).is_err());
    assert!(sink.begin(cfg(0, 2)).is_err());
    let mut zero_fps = cfg(2, 2);
    zero_fps.fps = 0;
    assert!(sink.begin(zero_fps).is_err());
}

#[test]
fn push_and_finish_require_begin() {
    let mut sink = WebmSink::new(WebmSinkOpts::default());
    let frame = Surface::new(cfg(2, 2).canvas).unwrap();
    assert!(sink.push_frame(0, &frame).is_err());
    assert!(sink.finish().is_err());
}

#[test]
fn encodes_a_short_clip_when_ffmpeg_is_available() {
    if !crate::assets::media::ffmpeg_tools_available() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let mut sink = WebmSink::new(WebmSinkOpts::default());
    if let Err(e) = sink.begin(cfg(32, 32)) {
        eprintln!("skipping: no WebM encoder available: {e}");
        return;
    }
    let mut frame = Surface::new(cfg(32, 32).canvas).unwrap();
    for i in 0..10u64 {
        frame.fill(Rgba8::rgb((i * 20) as u8, 40, 200));
        sink.push_frame(i, &frame).unwrap();
    }
    let clip = sink.finish().unwrap();
    assert_eq!(clip.frame_count, 10);
    assert!(clip.mime_type.starts_with("video/webm"));
    // EBML magic.
    assert_eq!(&clip.data[..4], &[0x1A, 0x45, 0xDF, 0xA3]);
}
