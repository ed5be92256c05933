use super::*;

fn res(width: u32, height: u32) -> Resolution {
    Resolution { width, height }
}

#[test]
fn wide_image_is_letterboxed_vertically() {
    let p = placement(res(200, 100), res(720, 720));
    assert_eq!(p.scale, 3.6);
    assert_eq!(p.size, res(720, 360));
    assert_eq!(p.offset, Offset { x: 0, y: 180 });
}

#[test]
fn tall_image_is_pillarboxed_with_floor_offset() {
    let p = placement(res(100, 300), res(1280, 720));
    assert_eq!(p.size, res(240, 720));
    assert_eq!(p.offset, Offset { x: 520, y: 0 });

    let p = placement(res(3, 1), res(10, 10));
    assert_eq!(p.size, res(10, 3));
    assert_eq!(p.offset, Offset { x: 0, y: 3 });
}

#[test]
fn placed_raster_always_fits() {
    let sources = [(1, 1), (7, 3), (640, 480), (1921, 1079), (5, 999)];
    let targets = [(720, 720), (1280, 720), (33, 17)];
    for &(sw, sh) in &sources {
        for &(tw, th) in &targets {
            let p = placement(res(sw, sh), res(tw, th));
            assert!(p.size.width >= 1 && p.size.height >= 1);
            assert!(p.offset.x + p.size.width <= tw);
            assert!(p.offset.y + p.size.height <= th);
        }
    }
}

#[test]
fn place_resizes_pixels() {
    let img = RgbaImage::from_pixel(20, 10, image::Rgba([9, 8, 7, 255]));
    let (scaled, p) = place(&img, res(40, 40));
    assert_eq!(scaled.dimensions(), (40, 20));
    assert_eq!(p.offset, Offset { x: 0, y: 10 });
    let px = scaled.get_pixel(13, 7).0;
    for (got, want) in px.iter().zip([9u8, 8, 7, 255]) {
        assert!(got.abs_diff(want) <= 1, "{px:?}");
    }
}

#[test]
fn place_keeps_image_at_native_size() {
    let img = RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255]));
    let (scaled, p) = place(&img, res(8, 8));
    assert_eq!(scaled, img);
    assert_eq!(p.offset, Offset::default());
}
