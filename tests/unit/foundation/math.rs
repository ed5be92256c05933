use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn premul_over_opaque_source_replaces_destination() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_in_place(&mut dst, &[1, 2, 3, 255]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn premul_over_transparent_source_keeps_destination() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn premul_over_half_alpha_blends() {
    let mut dst = vec![0u8, 0, 200, 255];
    premul_over_in_place(&mut dst, &[128, 0, 0, 128]).unwrap();
    assert_eq!(dst, vec![128, 0, 100, 255]);
}

#[test]
fn premul_over_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn premultiply_scales_color_by_alpha() {
    let mut px = vec![255u8, 100, 0, 128, 9, 9, 9, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 50, 0, 128, 9, 9, 9, 255]);
}
