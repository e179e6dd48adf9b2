use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 255), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 255), src);
}

#[test]
fn over_half_opacity_blends() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 128), [128, 0, 127, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 255).is_err());
}

#[test]
fn region_roundtrip_writes_only_inside_rect() {
    let (w, h) = (4u32, 3u32);
    let src: Vec<u8> = (0..w * h).flat_map(|i| [i as u8, 0, 0, 255]).collect();
    let rect = PixelRect {
        x0: 1,
        y0: 1,
        x1: 3,
        y1: 3,
    };
    let region = extract_region(&src, w, rect);
    assert_eq!(region.len(), 2 * 2 * 4);
    assert_eq!(&region[0..4], &[5, 0, 0, 255]);
    assert_eq!(&region[12..16], &[10, 0, 0, 255]);

    let mut dst = vec![0u8; (w * h * 4) as usize];
    over_region(&mut dst, w, &region, rect, 255).unwrap();
    assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    assert_eq!(&dst[(5 * 4)..(5 * 4 + 4)], &[5, 0, 0, 255]);
    assert_eq!(&dst[(11 * 4)..(11 * 4 + 4)], &[0, 0, 0, 0]);
}

#[test]
fn over_region_checks_region_size() {
    let mut dst = vec![0u8; 16];
    let rect = PixelRect {
        x0: 0,
        y0: 0,
        x1: 2,
        y1: 2,
    };
    assert!(over_region(&mut dst, 2, &[0u8; 12], rect, 255).is_err());
    assert!(
        PixelRect {
            x0: 2,
            y0: 0,
            x1: 2,
            y1: 2
        }
        .is_empty()
    );
}
