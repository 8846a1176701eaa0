use super::*;
use serde_json::json;

fn kind(v: serde_json::Value) -> ObjectKind {
    serde_json::from_value(v).unwrap()
}

fn targets(k: &ObjectKind) -> Vec<u32> {
    k.references().iter().map(|r| r.target.0).collect()
}

#[test]
fn visual_references_clip_then_kind_then_children() {
    let k = kind(json!({
        "type": "shape_visual",
        "clip": 1,
        "view_box": 2,
        "shapes": [3, 4],
        "children": [5]
    }));
    assert_eq!(targets(&k), vec![1, 2, 3, 4, 5]);
}

#[test]
fn layer_visual_attaches_shadow_after_children() {
    let k = kind(json!({
        "type": "layer_visual",
        "clip": 1,
        "shadow": 2,
        "children": [3, 4]
    }));
    assert_eq!(targets(&k), vec![1, 3, 4, 2]);
    assert_eq!(k.references()[3].slot, Slot::Shadow);
}

#[test]
fn path_key_frames_list_easings_before_values() {
    let k = kind(json!({
        "type": "path_key_frame_animation",
        "duration_ticks": 10,
        "reference_parameters": [{"name": "p", "object": 9}],
        "key_frames": [
            {"progress": 0.0, "value": 1},
            {"progress": 1.0, "value": 2, "easing": 3}
        ]
    }));
    assert_eq!(targets(&k), vec![9, 3, 1, 2]);
}

#[test]
fn remap_visits_exactly_the_references() {
    let mut k = kind(json!({
        "type": "effect_brush",
        "factory": 1,
        "sources": [{"name": "a", "brush": 2}, {"name": "b", "brush": 3}]
    }));
    let mut seen = Vec::new();
    k.remap_references(&mut |id| {
        seen.push(id.0);
        ObjectId(id.0 + 10)
    });
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(targets(&k), vec![11, 12, 13]);
}

#[test]
fn families_and_type_names() {
    let path = kind(json!({"type": "composition_path", "source": 1}));
    assert_eq!(path.family(), NodeFamily::CompositionPath);
    let ellipse = kind(json!({"type": "canvas_ellipse", "x": 0, "y": 0, "radius_x": 1, "radius_y": 1}));
    assert_eq!(ellipse.family(), NodeFamily::CanvasGeometry);
    assert_eq!(ellipse.type_name(), "CanvasGeometry");
    let brush = kind(json!({"type": "color_brush"}));
    assert_eq!(brush.family(), NodeFamily::CompositionObject);
    assert_eq!(brush.type_name(), "CompositionColorBrush");
}

#[test]
fn trim_and_scale_defaults() {
    let k = kind(json!({"type": "rectangle_geometry", "size": [4, 2]}));
    let ObjectKind::RectangleGeometry { trim, .. } = k else {
        panic!("wrong kind");
    };
    assert_eq!(trim, Trim::default());

    let k = kind(json!({"type": "inset_clip"}));
    let ObjectKind::InsetClip { scale, .. } = k else {
        panic!("wrong kind");
    };
    assert_eq!(scale, Vec2::new(1.0, 1.0));
}

#[test]
fn slots_accept_only_matching_kinds() {
    let stop = kind(json!({"type": "color_gradient_stop", "color": "#FF0000", "offset": 0.5}));
    let brush = kind(json!({"type": "color_brush"}));
    assert!(Slot::Stop.accepts(&stop));
    assert!(!Slot::Brush.accepts(&stop));
    assert!(Slot::Brush.accepts(&brush));
    assert!(Slot::ReferenceParameter.accepts(&stop));
}
