use super::*;

#[test]
fn length_is_euclidean() {
    assert_eq!(Segment::new(0.0, 0.0, 3.0, 4.0, 1.0).length(), 5.0);
    assert_eq!(Segment::new(2.0, 2.0, 2.0, 2.0, 1.0).length(), 0.0);
}

#[test]
fn translated_returns_new_value_and_keeps_width() {
    let raw = Segment::new(1.0, 2.0, 3.0, 4.0, 2.5);
    let moved = raw.translated(Offset { x: 10, y: 20 });
    assert_eq!(moved, Segment::new(11.0, 22.0, 13.0, 24.0, 2.5));
    assert_eq!(raw, Segment::new(1.0, 2.0, 3.0, 4.0, 2.5));
}

#[test]
fn stroke_px_rounds_and_clamps() {
    assert_eq!(Segment::new(0.0, 0.0, 1.0, 1.0, 4.6).stroke_px(), 5.0);
    assert_eq!(Segment::new(0.0, 0.0, 1.0, 1.0, 0.2).stroke_px(), 1.0);
    assert_eq!(Segment::new(0.0, 0.0, 1.0, 1.0, f64::NAN).stroke_px(), 1.0);
}

#[test]
fn truncated_rounds_toward_zero() {
    let s = Segment::new(1.9, -1.9, 0.5, 7.99, 2.2).truncated();
    assert_eq!(s, Segment::new(1.0, -1.0, 0.0, 7.0, 2.0));
}

#[test]
fn serde_uses_named_fields() {
    let s = Segment::new(1.0, 2.0, 3.0, 4.0, 5.0);
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(json, r#"{"x1":1.0,"y1":2.0,"x2":3.0,"y2":4.0,"width":5.0}"#);
}
