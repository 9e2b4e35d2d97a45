use super::*;
use crate::assets::decode::parse_svg;

const RED_SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10"><rect width="20" height="10" fill="#ff0000"/></svg>"##;

#[test]
fn raster_fills_requested_size() {
    let svg = parse_svg(RED_SQUARE).unwrap();
    let bytes = rasterize_svg_to_premul_rgba8(&svg.tree, 8, 4).unwrap();
    assert_eq!(bytes.len(), 8 * 4 * 4);
    let mid = (2 * 8 + 4) * 4;
    assert_eq!(&bytes[mid..mid + 4], &[255, 0, 0, 255]);
}

#[test]
fn raster_at_width_keeps_aspect() {
    let svg = parse_svg(RED_SQUARE).unwrap();
    let img = rasterize_svg_at_width(&svg.tree, 400.0).unwrap();
    assert_eq!((img.width, img.height), (400, 200));
    assert!(rasterize_svg_at_width(&svg.tree, 0.0).is_err());
}

#[test]
fn oversized_raster_is_rejected() {
    let svg = parse_svg(RED_SQUARE).unwrap();
    assert!(rasterize_svg_to_premul_rgba8(&svg.tree, 20_000, 10).is_err());
}
