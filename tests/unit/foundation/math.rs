use super::*;

#[test]
fn mul_div255_is_exact_at_the_ends() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(200, 0), 0);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(0.0, 50.0, 0.0), 0.0);
    assert_eq!(lerp(0.0, 50.0, 1.0), 50.0);
    assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
}

#[test]
fn opacity_quantization_clamps() {
    assert_eq!(opacity_to_u8(-1.0), 0);
    assert_eq!(opacity_to_u8(0.5), 128);
    assert_eq!(opacity_to_u8(2.0), 255);
}
