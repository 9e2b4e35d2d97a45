use super::*;
use crate::foundation::core::{Canvas, Rgba8};

fn surface() -> Surface {
    let mut s = Surface::new(Canvas {
        width: 6,
        height: 4,
    })
    .unwrap();
    s.fill(Rgba8::rgb(200, 40, 10));
    s
}

#[test]
fn format_parses_case_insensitively() {
    assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
    assert_eq!(" webp ".parse::<ImageFormat>().unwrap(), ImageFormat::Webp);
    assert!("jpeg".parse::<ImageFormat>().is_err());
    assert_eq!(ImageFormat::Webp.to_string(), "webp");
}

#[test]
fn filenames_carry_the_iso_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(export_filename(date, "png"), "banner-2024-03-07.png");
    assert_eq!(export_filename(date, "webm"), "banner-2024-03-07.webm");
    let today = today_filename("webp");
    assert!(today.starts_with("banner-") && today.ends_with(".webp"));
    assert_eq!(today.len(), "banner-YYYY-MM-DD.webp".len());
}

#[test]
fn today_filename_uses_the_utc_date() {
    let before = chrono::Utc::now().date_naive();
    let today = today_filename("png");
    let after = chrono::Utc::now().date_naive();
    assert!(
        today == export_filename(before, "png") || today == export_filename(after, "png"),
        "{today} is not dated {before} (UTC)"
    );
}

#[test]
fn png_is_lossless() {
    let bytes = encode_surface(&surface(), ImageFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (6, 4));
    assert_eq!(decoded.get_pixel(3, 2).0, [200, 40, 10, 255]);
}

#[test]
fn webp_is_lossless() {
    let bytes = encode_surface(&surface(), ImageFormat::Webp).unwrap();
    assert_eq!(&bytes[..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WEBP");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [200, 40, 10, 255]);
}

#[test]
fn save_export_creates_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out/banners");
    let path = save_export(&nested, "banner-2024-01-01.png", b"abc").unwrap();
    assert_eq!(path, nested.join("banner-2024-01-01.png"));
    assert_eq!(std::fs::read(path).unwrap(), b"abc");
}
