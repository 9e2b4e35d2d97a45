use proptest::prelude::*;

use super::*;
use crate::foundation::core::{Canvas, Rgba8};

fn surface(w: u32, h: u32, color: Rgba8) -> Surface {
    let mut s = Surface::new(Canvas {
        width: w,
        height: h,
    })
    .unwrap();
    s.fill(color);
    s
}

#[test]
fn default_stops_are_valid() {
    GradientStops::still_default().validate().unwrap();
    GradientStops::live_default().validate().unwrap();
    assert_eq!(GradientStops::still_default().max_alpha(), 0.5);
    assert_eq!(GradientStops::live_default().max_alpha(), 0.7);
}

#[test]
fn invalid_stops_are_rejected() {
    assert!(GradientStops::new(vec![]).is_err());
    assert!(GradientStops::new(vec![stop(0.0, 0.5), stop(1.0, 0.2)]).is_err());
    let unordered = vec![stop(0.0, 0.0), stop(0.6, 0.1), stop(0.5, 0.2), stop(1.0, 0.3)];
    assert!(GradientStops::new(unordered).is_err());
    assert!(GradientStops::new(vec![stop(0.1, 0.0), stop(1.0, 0.3)]).is_err());
    assert!(GradientStops::new(vec![stop(0.0, 0.0), stop(1.0, 1.5)]).is_err());
}

#[test]
fn opacity_interpolates_between_stops() {
    let stops = GradientStops::still_default();
    assert_eq!(stops.opacity_at(0.0), 0.0);
    assert!((stops.opacity_at(0.45) - 0.175).abs() < 1e-6);
    assert_eq!(stops.opacity_at(1.0), 0.5);
    assert_eq!(stops.opacity_at(2.0), 0.5);
}

#[test]
fn gradient_rows_reach_max_at_bottom() {
    let stops = GradientStops::still_default();
    let g = DarkeningGradient::new(40.5, 100, &stops);
    assert_eq!(g.rows(), 40..100);
    assert_eq!(g.row_opacity(39), 0.0);
    assert_eq!(g.row_opacity(40), 0.0);
    assert_eq!(g.row_opacity(99), 0.5);
    assert_eq!(g.row_opacity(100), 0.0);
}

#[test]
fn gradient_darkens_only_its_region() {
    let stops = GradientStops::still_default();
    let mut s = surface(2, 10, Rgba8::WHITE);
    DarkeningGradient::new(5.0, 10, &stops).apply(&mut s);
    assert_eq!(s.pixel(0, 4), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(0, 5), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(1, 9), Some([127, 127, 127, 255]));
    let mid = s.pixel(0, 7).unwrap()[0];
    assert!(mid < 255 && mid > 127);
}

#[test]
fn strip_plan_covers_region_exactly() {
    let params = BlurParams {
        strip_count: 80,
        min_blur: 0.0,
        max_blur: 50.0,
    };
    let plan = BlurStripPlan::new(700.0, 600.0, 1300, &params);
    assert_eq!(plan.strips().len(), 80);
    assert_eq!(plan.rows(), 700..1300);
    for pair in plan.strips().windows(2) {
        assert_eq!(pair[0].rows.end, pair[1].rows.start);
    }
    assert_eq!(plan.strips()[0].radius, 0.0);
    assert_eq!(plan.strips()[79].radius, 50.0);
}

#[test]
fn single_strip_uses_max_blur() {
    let params = BlurParams {
        strip_count: 1,
        min_blur: 2.0,
        max_blur: 9.0,
    };
    let plan = BlurStripPlan::new(10.0, 20.0, 30, &params);
    assert_eq!(plan.strips().len(), 1);
    assert_eq!(plan.strips()[0].radius, 9.0);
    assert_eq!(plan.strips()[0].rows, 10..30);
}

#[test]
fn params_scale_with_output() {
    let p = BlurParams::from_config(&OverlayConfig::default(), 2.0);
    assert_eq!(p.strip_count, 80);
    assert_eq!(p.min_blur, 0.0);
    assert_eq!(p.max_blur, 50.0);
}

#[test]
fn progressive_blur_only_touches_strips() {
    let w = 8;
    let h = 16;
    let mut bg = surface(w, h, Rgba8::BLACK);
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                let px = x as usize * 4;
                bg.row_mut(y)[px..px + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
    let mut out = bg.clone();
    let params = BlurParams {
        strip_count: 2,
        min_blur: 0.0,
        max_blur: 2.0,
    };
    let plan = BlurStripPlan::new(8.0, 8.0, h, &params);
    apply_progressive_blur(&mut out, &bg, &plan).unwrap();

    assert_eq!(out.row(3), bg.row(3));
    assert_eq!(out.row(9), bg.row(9));
    assert_ne!(out.row(14), bg.row(14));

    let other = surface(4, 4, Rgba8::BLACK);
    assert!(apply_progressive_blur(&mut out, &other, &plan).is_err());
}

#[test]
fn live_overlay_blurs_and_darkens_bottom_half() {
    let cfg = LiveConfig::default();
    let overlay = LiveOverlay::from_config(&cfg, 20, 0.1);
    assert_eq!(overlay.top(), 10.0);
    let mut s = surface(4, 20, Rgba8::WHITE);
    overlay.apply(&mut s).unwrap();
    assert_eq!(s.pixel(0, 5), Some([255, 255, 255, 255]));
    let bottom = s.pixel(0, 19).unwrap();
    assert!((74..=78).contains(&bottom[0]), "{bottom:?}");
    assert_eq!(bottom[3], 255);
}

proptest! {
    #[test]
    fn gradient_is_monotonic(top in 0.0f32..900.0, height in 2u32..1300) {
        let stops = GradientStops::live_default();
        let top = top.min(height as f32 - 1.0);
        let g = DarkeningGradient::new(top, height, &stops);
        let mut prev = 0.0f32;
        for y in g.rows() {
            let o = g.row_opacity(y);
            prop_assert!(o + 1e-6 >= prev);
            prev = o;
        }
        prop_assert!((g.row_opacity(height - 1) - stops.max_alpha()).abs() < 1e-6);
    }

    #[test]
    fn strip_radii_are_monotonic(
        count in 1u32..120,
        top in 0.0f32..600.0,
        height in 0.0f32..700.0,
    ) {
        let params = BlurParams { strip_count: count, min_blur: 0.0, max_blur: 50.0 };
        let plan = BlurStripPlan::new(top, height, 1300, &params);
        prop_assert_eq!(plan.strips().len(), count as usize);
        for pair in plan.strips().windows(2) {
            prop_assert!(pair[1].radius >= pair[0].radius);
            prop_assert_eq!(pair[0].rows.end, pair[1].rows.start);
        }
    }
}
