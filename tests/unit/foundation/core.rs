use super::*;

#[test]
fn hex_roundtrip_and_errors() {
    let c = Rgba8::parse_hex("#1a1a2e").unwrap();
    assert_eq!(c, Rgba8::rgb(0x1a, 0x1a, 0x2e));
    assert_eq!(c.to_hex(), "#1a1a2e");

    let translucent = Rgba8::parse_hex("FFFFFFD9").unwrap();
    assert_eq!(translucent.a, 0xd9);
    assert_eq!(translucent.to_hex(), "#ffffffd9");

    assert!(Rgba8::parse_hex("#12345").is_err());
    assert!(Rgba8::parse_hex("#zz0000").is_err());
}

#[test]
fn color_serde_uses_hex_strings() {
    let c: Rgba8 = serde_json::from_str("\"#ff0000\"").unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#ff0000\"");
}

#[test]
fn with_opacity_scales_alpha() {
    let c = Rgba8::WHITE.with_opacity(0.85);
    assert_eq!(c.a, 217);
    assert_eq!(c.r, 255);
}

#[test]
fn premul_of_half_white() {
    let p = Rgba8Premul::from_straight_rgba(255, 255, 255, 128);
    assert_eq!(p.to_array(), [128, 128, 128, 128]);
}

#[test]
fn canvas_byte_len() {
    let c = Canvas {
        width: 2400,
        height: 1300,
    };
    assert_eq!(c.byte_len().unwrap(), 2400 * 1300 * 4);
}
