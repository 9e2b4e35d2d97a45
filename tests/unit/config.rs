use super::*;

#[test]
fn defaults_match_the_stock_banner() {
    let cfg = BannerConfig::default();
    cfg.validate().unwrap();
    let g = cfg.geometry().unwrap();
    assert_eq!(
        g.canvas,
        Canvas {
            width: 2400,
            height: 1300
        }
    );
    assert_eq!(g.margin_left, 180.0);
    assert_eq!(g.margin_bottom, 160.0);
    assert_eq!(g.headline_line_height, 144.0);
    assert_eq!(g.subtext_line_height, 76.0);
    assert_eq!(g.max_text_width(), 2040.0);
    assert_eq!(g.logo.width, 400.0);
    assert_eq!(cfg.layout.subtext_color.a, 217);
}

#[test]
fn empty_json_object_is_the_default_config() {
    let cfg: BannerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, BannerConfig::default());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let cfg: BannerConfig =
        serde_json::from_str(r##"{"canvas":{"scale":1.0},"assets":{"fallback_color":"#000000"}}"##)
            .unwrap();
    assert_eq!(cfg.canvas.scale, 1.0);
    assert_eq!(cfg.canvas.design_width, 1200.0);
    assert_eq!(cfg.assets.fallback_color, Rgba8::BLACK);
    let g = cfg.geometry().unwrap();
    assert_eq!(g.canvas.width, 1200);
    assert_eq!(g.canvas.height, 650);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<BannerConfig>(r#"{"canvass":{}}"#).is_err());
}

#[test]
fn validation_catches_bad_values() {
    let mut cfg = BannerConfig::default();
    cfg.canvas.scale = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = BannerConfig::default();
    cfg.layout.margin_left = 700.0;
    cfg.layout.margin_right = 600.0;
    assert!(cfg.validate().is_err());

    let mut cfg = BannerConfig::default();
    cfg.overlay.min_blur = 30.0;
    assert!(cfg.validate().is_err());

    let mut cfg = BannerConfig::default();
    cfg.layout.max_overlay_fraction = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = BannerConfig::default();
    cfg.recording.codecs.clear();
    assert!(cfg.validate().is_err());

    let mut cfg = BannerConfig::default();
    cfg.recording.fps = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banner.json");
    let mut cfg = BannerConfig::default();
    cfg.canvas.scale = 1.0;
    cfg.recording.codecs = vec![VideoCodec::Vp8];
    std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

    let loaded = BannerConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, cfg);

    assert!(BannerConfig::from_json_file(&dir.path().join("missing.json")).is_err());
}

#[test]
fn codec_names() {
    assert_eq!(VideoCodec::Vp9.ffmpeg_encoder(), "libvpx-vp9");
    assert_eq!(VideoCodec::Vp8.mime_type(), "video/webm");
    let c: VideoCodec = serde_json::from_str("\"vp9\"").unwrap();
    assert_eq!(c, VideoCodec::Vp9);
}

#[test]
fn logo_height_keeps_aspect_ratio() {
    let g = BannerConfig::default().geometry().unwrap();
    assert_eq!(g.logo.height_for(200, 50), 100.0);
    assert_eq!(g.logo.height_for(0, 50), 0.0);
}
