use super::*;

/// Dark canvas with one bright horizontal bar, rows `y0..y0+thickness`, columns `x0..x1`.
fn bar_image(w: u32, h: u32, x0: u32, x1: u32, y0: u32, thickness: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        if (x0..x1).contains(&x) && (y0..y0 + thickness).contains(&y) {
            image::Luma([255])
        } else {
            image::Luma([0])
        }
    })
}

#[test]
fn closures_are_detectors() {
    let det = |_: &GrayImage, scale: f64| -> StickbugResult<Vec<Segment>> {
        Ok(vec![Segment::new(0.0, 0.0, scale, 0.0, 1.0)])
    };
    let out = det.detect(&GrayImage::new(4, 4), 2.0).unwrap();
    assert_eq!(out, vec![Segment::new(0.0, 0.0, 2.0, 0.0, 1.0)]);
}

#[test]
fn hough_rejects_non_positive_scale() {
    let det = HoughDetector::default();
    assert!(det.detect(&GrayImage::new(8, 8), 0.0).is_err());
    assert!(det.detect(&GrayImage::new(8, 8), f64::NAN).is_err());
    assert!(det.detect(&GrayImage::new(8, 8), 1e9).is_err());
}

#[test]
fn hough_finds_nothing_in_flat_image() {
    let det = HoughDetector::default();
    let flat = GrayImage::from_pixel(64, 64, image::Luma([90]));
    assert!(det.detect(&flat, 1.0).unwrap().is_empty());
}

#[test]
fn hough_finds_a_long_horizontal_bar() {
    let det = HoughDetector::default();
    let img = bar_image(120, 80, 10, 110, 38, 4);
    let segs = det.detect(&img, 1.0).unwrap();
    assert!(!segs.is_empty());
    let longest = segs
        .iter()
        .copied()
        .max_by(|a, b| a.length().total_cmp(&b.length()))
        .unwrap();
    assert!(longest.length() > 60.0, "{longest:?}");
    assert!((longest.y1 - longest.y2).abs() < 4.0, "{longest:?}");
    assert!(longest.width >= 1.0);
}

#[test]
fn longest_run_bridges_small_gaps_only() {
    let det = HoughDetector {
        min_length: 1.0,
        ..HoughDetector::default()
    };
    // Horizontal line y = 5: theta = 90 degrees, r = 5.
    let mut edges = GrayImage::new(40, 11);
    for x in (2..12).chain(14..20).chain(30..34) {
        edges.put_pixel(x, 5, image::Luma([255]));
    }
    let seg = det
        .longest_run(
            &edges,
            &PolarLine {
                r: 5.0,
                angle_in_degrees: 90,
            },
        )
        .unwrap();
    let (lo, hi) = if seg.x1 < seg.x2 {
        (seg.x1, seg.x2)
    } else {
        (seg.x2, seg.x1)
    };
    assert!((lo - 2.0).abs() < 1.0, "{seg:?}");
    assert!((hi - 19.0).abs() < 1.0, "{seg:?}");
    assert!((seg.y1 - 5.0).abs() < 1e-6);
}
