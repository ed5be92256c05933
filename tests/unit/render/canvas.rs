use super::*;

const BG: Rgb8 = Rgb8::new(10, 20, 30);
const LINE: Rgb8 = Rgb8::new(255, 255, 211);

fn canvas(w: u32, h: u32) -> LineCanvas {
    let mut c = LineCanvas::new(Resolution::new(w, h).unwrap()).unwrap();
    c.clear(BG);
    c
}

#[test]
fn rejects_oversized_canvas() {
    assert!(LineCanvas::new(Resolution::new(70_000, 10).unwrap()).is_err());
}

#[test]
fn clear_fills_every_pixel() {
    let f = canvas(8, 4).snapshot();
    assert_eq!(f.data.len(), 8 * 4 * 4);
    assert!(f.data.chunks_exact(4).all(|p| p == [10, 20, 30, 255]));
}

#[test]
fn thick_line_covers_its_center_and_nothing_far_away() {
    let mut c = canvas(64, 32);
    c.draw_lines(&[Segment::new(8.0, 16.0, 56.0, 16.0, 6.0)], LINE)
        .unwrap();
    let f = c.snapshot();
    assert_eq!(f.pixel(32, 16), Some([255, 255, 211, 255]));
    assert_eq!(f.pixel(32, 14), Some([255, 255, 211, 255]));
    assert_eq!(f.pixel(32, 4), Some([10, 20, 30, 255]));
    assert_eq!(f.pixel(2, 16), Some([10, 20, 30, 255]));
}

#[test]
fn strokes_accumulate_until_cleared() {
    let mut c = canvas(32, 32);
    c.draw_lines(&[Segment::new(4.0, 8.0, 28.0, 8.0, 4.0)], LINE)
        .unwrap();
    c.draw_lines(&[Segment::new(4.0, 24.0, 28.0, 24.0, 4.0)], LINE)
        .unwrap();
    let f = c.snapshot();
    assert_eq!(f.pixel(16, 8), Some([255, 255, 211, 255]));
    assert_eq!(f.pixel(16, 24), Some([255, 255, 211, 255]));

    c.clear(BG);
    assert_eq!(c.snapshot().pixel(16, 8), Some([10, 20, 30, 255]));
}

#[test]
fn blit_places_image_at_offset_and_clips() {
    let mut c = canvas(10, 10);
    let img = RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
    c.blit(&img, Offset { x: 8, y: 3 }).unwrap();
    let f = c.snapshot();
    assert_eq!(f.pixel(8, 3), Some([200, 100, 50, 255]));
    assert_eq!(f.pixel(9, 6), Some([200, 100, 50, 255]));
    assert_eq!(f.pixel(7, 3), Some([10, 20, 30, 255]));
    assert_eq!(f.pixel(8, 7), Some([10, 20, 30, 255]));
}

#[test]
fn transparent_image_pixels_keep_background() {
    let mut c = canvas(4, 4);
    let img = RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 0]));
    c.blit(&img, Offset::default()).unwrap();
    assert!(
        c.snapshot()
            .data
            .chunks_exact(4)
            .all(|p| p == [10, 20, 30, 255])
    );
}

#[test]
fn degenerate_segment_draws_a_dot() {
    let mut c = canvas(16, 16);
    c.draw_lines(&[Segment::new(8.0, 8.0, 8.0, 8.0, 4.0)], LINE)
        .unwrap();
    assert_eq!(c.snapshot().pixel(8, 8), Some([255, 255, 211, 255]));
}
