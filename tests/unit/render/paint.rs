use super::*;
use crate::foundation::core::Canvas;

fn surface(w: u32, h: u32) -> Surface {
    Surface::new(Canvas {
        width: w,
        height: h,
    })
    .unwrap()
}

fn close(a: Option<[u8; 4]>, b: [u8; 4]) -> bool {
    a.is_some_and(|a| a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2))
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

#[test]
fn draw_image_stretches_to_rect() {
    let mut dst = surface(16, 8);
    let mut painter = Painter::new();
    let img = solid(2, 2, [200, 0, 0, 255]);
    painter
        .draw_image(&mut dst, &img, Rect::new(0.0, 0.0, 16.0, 8.0))
        .unwrap();
    assert!(close(dst.pixel(8, 4), [200, 0, 0, 255]));
    assert!(dst.pixel(0, 0).unwrap()[3] >= 250);
}

#[test]
fn draw_image_leaves_outside_untouched() {
    let mut dst = surface(16, 16);
    let mut painter = Painter::new();
    let img = solid(1, 1, [0, 0, 255, 255]);
    painter
        .draw_image(&mut dst, &img, Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap();
    assert!(close(dst.pixel(2, 2), [0, 0, 255, 255]));
    assert_eq!(dst.pixel(12, 12), Some([0, 0, 0, 0]));
}

#[test]
fn layers_composite_over_existing_pixels() {
    let mut dst = surface(4, 4);
    dst.fill(crate::foundation::core::Rgba8::rgb(0, 255, 0));
    let mut painter = Painter::new();
    painter.with_layer(&mut dst, |_| Ok(())).unwrap();
    assert_eq!(dst.pixel(1, 1), Some([0, 255, 0, 255]));

    let err = painter.with_layer(&mut dst, |_| Err(BannerError::render("boom")));
    assert!(err.is_err());
    assert_eq!(dst.pixel(1, 1), Some([0, 255, 0, 255]));
}

#[test]
fn cover_rect_crops_wide_content() {
    let r = cover_rect(400, 100, 200, 100);
    assert_eq!(r, Rect::new(-100.0, 0.0, 300.0, 100.0));
    let r = cover_rect(100, 100, 200, 100);
    assert_eq!(r, Rect::new(0.0, -50.0, 200.0, 150.0));
}

#[test]
fn pixmap_rejects_bad_lengths() {
    assert!(pixmap_from_premul_bytes(&[0; 7], 1, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 4], 70_000, 1).is_err());
}
