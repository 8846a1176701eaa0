use super::*;
use crate::foundation::ids::ObjectId;
use serde_json::json;

fn analyzed(v: serde_json::Value) -> (ObjectGraph, AnalysisReport) {
    let mut g = ObjectGraph::build(serde_json::from_value(v).unwrap()).unwrap();
    let report = analyze(&mut g).unwrap();
    (g, report)
}

fn idx(g: &ObjectGraph, id: u32) -> NodeIdx {
    g.node_for(ObjectId(id)).unwrap()
}

#[test]
fn root_is_always_stored() {
    let (g, report) = analyzed(json!({"root": 0, "objects": [{"type": "container_visual"}]}));
    assert!(g.node(g.root()).requires_storage());
    assert_eq!(report.stored, 1);
    assert_eq!(report.factories, 1);
}

#[test]
fn multiply_referenced_node_is_stored() {
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "sprite_visual", "brush": 3},
            {"type": "sprite_visual", "brush": 3},
            {"type": "color_brush", "color": "#123456"}
        ]
    }));
    let brush = g.node(idx(&g, 3));
    assert_eq!(filtered_inbound_count(&g, idx(&g, 3)), 2);
    assert!(brush.requires_storage());
    assert!(!brush.requires_readonly_storage());
    assert!(!g.node(idx(&g, 1)).requires_storage());
}

#[test]
fn single_use_path_and_bezier_are_inlined() {
    let (g, report) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "shape_visual", "shapes": [1]},
            {"type": "sprite_shape", "geometry": 2},
            {"type": "path_geometry", "path": 3,
             "animators": [{"property": "TrimEnd", "animation": 5}]},
            {"type": "composition_path", "source": 4},
            {"type": "canvas_path", "commands": [{"command": "begin_figure", "start": [0.0, 0.0]}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10,
             "key_frames": [{"progress": 1.0, "value": 1.0, "easing": 6}]},
            {"type": "cubic_bezier_easing_function",
             "control_point1": [0.1, 0.2], "control_point2": [0.3, 0.4]}
        ]
    }));
    for id in [3, 6] {
        let n = g.node(idx(&g, id));
        assert!(n.inlined(), "object {id}");
        assert!(!n.requires_storage());
        assert!(!needs_a_factory(&g, idx(&g, id)));
    }
    assert_eq!(report.inlined, 2);
}

#[test]
fn shared_bezier_is_stored() {
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "animators": [
                {"property": "Opacity", "animation": 1},
                {"property": "Scale.X", "animation": 2},
                {"property": "Scale.Y", "animation": 3}
            ]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10,
             "key_frames": [{"progress": 1.0, "value": 1.0, "easing": 4}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 20,
             "key_frames": [{"progress": 1.0, "value": 1.0, "easing": 4}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 30,
             "key_frames": [{"progress": 1.0, "value": 1.0, "easing": 4}]},
            {"type": "cubic_bezier_easing_function",
             "control_point1": [0.1, 0.2], "control_point2": [0.3, 0.4]}
        ]
    }));
    let bezier = idx(&g, 4);
    assert_eq!(filtered_inbound_count(&g, bezier), 3);
    assert!(!g.node(bezier).inlined());
    assert!(g.node(bezier).requires_storage());
}

#[test]
fn own_expression_animation_is_not_a_use() {
    // The visual animates its own offset with an expression that reads the visual back.
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1]},
            {"type": "container_visual", "animators": [{"property": "Offset", "animation": 2}]},
            {"type": "expression_animation", "expression": "Vector3(my.Size.X, 0, 0)",
             "reference_parameters": [{"name": "my", "object": 1}]}
        ]
    }));
    let visual = idx(&g, 1);
    assert_eq!(g.node(visual).in_refs().len(), 2);
    assert_eq!(filtered_inbound_count(&g, visual), 1);
    assert!(!g.node(visual).requires_storage());
    assert!(!needs_a_factory(&g, idx(&g, 2)));
}

#[test]
fn foreign_expression_animation_is_a_use() {
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "container_visual"},
            {"type": "container_visual", "animators": [{"property": "Offset", "animation": 3}]},
            {"type": "expression_animation", "expression": "other.Offset",
             "reference_parameters": [{"name": "other", "object": 1}]}
        ]
    }));
    let target = idx(&g, 1);
    assert_eq!(filtered_inbound_count(&g, target), 2);
    assert!(g.node(target).requires_storage());
}

#[test]
fn property_set_referenced_twice_stores_its_owner() {
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "container_visual", "properties": 3},
            {"type": "container_visual", "animators": [{"property": "Opacity", "animation": 4}]},
            {"type": "property_set", "values": [{"name": "Progress", "value": {"scalar": 0.0}}]},
            {"type": "expression_animation", "expression": "p.Progress",
             "reference_parameters": [{"name": "p", "object": 3}]}
        ]
    }));
    let ps = idx(&g, 3);
    assert_eq!(filtered_inbound_count(&g, ps), 2);
    assert!(!g.node(ps).requires_storage());
    assert!(g.node(idx(&g, 1)).requires_storage());
    assert!(!needs_a_factory(&g, ps));
}

#[test]
fn theme_and_images_are_shared_read_only() {
    let (g, report) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "sprite_visual", "brush": 3},
            {"type": "sprite_visual", "brush": 6},
            {"type": "color_brush", "animators": [{"property": "Color", "animation": 4}]},
            {"type": "expression_animation", "expression": "_theme.Accent",
             "reference_parameters": [{"name": "_theme", "object": 5}]},
            {"type": "property_set", "values": [{"name": "Accent", "value": {"color": "#FF0000"}}]},
            {"type": "surface_brush", "surface": 7},
            {"type": "loaded_image_surface", "source": {"uri": {"uri": "ms-appx:///x.png"}}}
        ]
    }));
    assert!(report.themed);
    let theme = g.node(idx(&g, 5));
    assert!(theme.shared());
    assert!(theme.requires_storage() && theme.requires_readonly_storage());
    assert_eq!(theme.name(), Some(THEME_PROPERTIES_NAME));

    let image = g.node(idx(&g, 7));
    assert!(image.shared());
    assert!(image.requires_readonly_storage());
    assert_eq!(report.readonly, 2);
}

#[test]
fn controllers_are_always_stored() {
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual",
             "animators": [{"property": "Opacity", "animation": 1, "controller": 2}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10,
             "key_frames": [{"progress": 1.0, "value": 1.0}]},
            {"type": "animation_controller", "paused": true}
        ]
    }));
    let controller = idx(&g, 2);
    assert_eq!(filtered_inbound_count(&g, controller), 1);
    assert!(g.node(controller).requires_storage());
    assert!(needs_a_factory(&g, controller));
}

#[test]
fn multiply_referenced_path_is_not_inlined() {
    let (g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "shape_visual", "shapes": [1, 2]},
            {"type": "sprite_shape", "geometry": 3},
            {"type": "sprite_shape", "geometry": 4},
            {"type": "path_geometry", "path": 5},
            {"type": "path_geometry", "path": 5, "trim_end": 0.5},
            {"type": "composition_path", "source": 6},
            {"type": "canvas_path", "commands": []}
        ]
    }));
    let path = g.node(idx(&g, 5));
    assert!(!path.inlined());
    assert!(path.requires_storage());
}

#[test]
fn property_set_expression_on_owner_is_not_a_use() {
    let (mut g, _) = analyzed(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1]},
            {"type": "container_visual", "properties": 2},
            {"type": "property_set",
             "values": [{"name": "Progress", "value": {"scalar": 0.0}}],
             "animators": [{"property": "Progress", "animation": 3}]},
            {"type": "expression_animation", "expression": "my.Offset.X",
             "reference_parameters": [{"name": "my", "object": 1}]}
        ]
    }));
    let visual = idx(&g, 1);
    assert_eq!(g.node(visual).in_refs().len(), 2);
    assert_eq!(filtered_inbound_count(&g, visual), 1);
    assert!(!g.node(visual).requires_storage());

    crate::naming::namer::name_nodes(&mut g);
    let text = crate::generate::emitter::emit_variant(
        &g,
        "V",
        &crate::generate::csharp::CSharpStringifier,
        false,
    )
    .unwrap()
    .text;
    assert!(text.contains("_reusableExpressionAnimation.SetReferenceParameter(\"my\", result);"));
    assert!(text.contains(
        "result.Properties.StartAnimation(\"Progress\", _reusableExpressionAnimation);"
    ));
}
