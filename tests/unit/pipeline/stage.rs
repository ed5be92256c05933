use super::*;

use StageId::{Image, Segments, Video};
use StageState::{Fresh, Stale, Unset};

fn states(g: &StageGraph) -> [StageState; 3] {
    [g.state(Image), g.state(Segments), g.state(Video)]
}

#[test]
fn starts_unset_with_declared_edges() {
    let g = StageGraph::new();
    assert_eq!(states(&g), [Unset, Unset, Unset]);
    assert!(g.upstream(Image).is_empty());
    assert_eq!(g.upstream(Segments), &[Image]);
    assert_eq!(g.upstream(Video), &[Image, Segments]);
}

#[test]
fn setting_image_stales_everything_downstream() {
    let mut g = StageGraph::new();
    g.mark_set(Image);
    assert_eq!(states(&g), [Fresh, Stale, Stale]);
}

#[test]
fn setting_segments_only_stales_video() {
    let mut g = StageGraph::new();
    g.mark_set(Image);
    g.mark_computed(Segments);
    g.mark_computed(Video);
    g.mark_set(Segments);
    assert_eq!(states(&g), [Fresh, Fresh, Stale]);
}

#[test]
fn invalidate_skips_unset_and_reports_changes() {
    let mut g = StageGraph::new();
    assert!(g.invalidate(Segments).is_empty());
    assert_eq!(states(&g), [Unset, Unset, Unset]);

    g.mark_set(Image);
    g.mark_computed(Segments);
    g.mark_computed(Video);
    assert_eq!(g.invalidate(Segments), vec![Segments, Video]);
    assert_eq!(states(&g), [Fresh, Stale, Stale]);
    assert!(g.invalidate(Video).is_empty());
}

#[test]
fn invalidating_video_leaves_segments_fresh() {
    let mut g = StageGraph::new();
    g.mark_set(Image);
    g.mark_computed(Segments);
    g.mark_computed(Video);
    assert_eq!(g.invalidate(Video), vec![Video]);
    assert_eq!(states(&g), [Fresh, Fresh, Stale]);
}
