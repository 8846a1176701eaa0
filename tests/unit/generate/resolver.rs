use super::*;
use crate::analyze::storage::analyze;
use crate::foundation::ids::ObjectId;
use crate::naming::namer::name_nodes;
use serde_json::json;

fn prepared(v: serde_json::Value) -> ObjectGraph {
    let mut g = ObjectGraph::build(serde_json::from_value(v).unwrap()).unwrap();
    analyze(&mut g).unwrap();
    name_nodes(&mut g);
    g
}

fn idx(g: &ObjectGraph, id: u32) -> NodeIdx {
    g.node_for(ObjectId(id)).unwrap()
}

fn shared_brush() -> ObjectGraph {
    prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "sprite_visual", "brush": 3},
            {"type": "sprite_visual", "brush": 3},
            {"type": "color_brush", "color": "#FFFFFF"}
        ]
    }))
}

#[test]
fn first_reference_constructs_and_later_ones_read() {
    let g = shared_brush();
    let (a, b, brush) = (idx(&g, 1), idx(&g, 2), idx(&g, 3));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(a, a, brush).unwrap(), Resolution::Construct);
    assert_eq!(r.resolve(b, b, brush).unwrap(), Resolution::ReadField);

    let log = r.into_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].caller, 1);
    assert_eq!(log[0].callee, 2);
    assert_eq!(log[1].resolution, Resolution::ReadField);
}

#[test]
fn later_caller_reads_even_when_asked_first() {
    let g = shared_brush();
    let (b, brush) = (idx(&g, 2), idx(&g, 3));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(b, b, brush).unwrap(), Resolution::ReadField);
}

#[test]
fn root_is_always_read() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1]},
            {"type": "container_visual", "animators": [{"property": "Offset", "animation": 2}]},
            {"type": "expression_animation", "expression": "root.Size",
             "reference_parameters": [{"name": "root", "object": 0}]}
        ]
    }));
    let (child, anim) = (idx(&g, 1), idx(&g, 2));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(child, anim, g.root()).unwrap(), Resolution::ReadField);
}

#[test]
fn inlined_callee_is_written_in_place() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "shape_visual", "shapes": [1]},
            {"type": "sprite_shape", "geometry": 2},
            {"type": "path_geometry", "path": 3},
            {"type": "composition_path", "source": 4},
            {"type": "canvas_path", "commands": []}
        ]
    }));
    let (geometry, path) = (idx(&g, 2), idx(&g, 3));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(geometry, geometry, path).unwrap(), Resolution::Inline);

    let err = r.resolve(geometry, geometry, path).unwrap_err();
    assert!(matches!(err, CodegenError::CacheConsistency(_)));
}

#[test]
fn constructing_an_unstored_node_twice_is_an_invariant_failure() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1]},
            {"type": "sprite_visual", "brush": 2},
            {"type": "color_brush"}
        ]
    }));
    let (sprite, brush) = (idx(&g, 1), idx(&g, 2));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(sprite, sprite, brush).unwrap(), Resolution::Construct);
    let err = r.resolve(sprite, sprite, brush).unwrap_err();
    assert!(matches!(err, CodegenError::CacheConsistency(_)));
}

#[test]
fn repeated_pair_reads_the_field_once_stored() {
    let g = shared_brush();
    let (a, brush) = (idx(&g, 1), idx(&g, 3));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(a, a, brush).unwrap(), Resolution::Construct);
    assert_eq!(r.resolve(a, a, brush).unwrap(), Resolution::ReadField);
}

#[test]
fn disabled_field_optimization_always_calls() {
    let g = shared_brush();
    let (a, b, brush) = (idx(&g, 1), idx(&g, 2), idx(&g, 3));
    let mut r = CallResolver::new(&g, true);
    assert_eq!(r.resolve(a, a, brush).unwrap(), Resolution::Construct);
    assert_eq!(r.resolve(b, b, brush).unwrap(), Resolution::Construct);
    assert_eq!(r.resolve(a, a, brush).unwrap(), Resolution::Construct);
}

#[test]
fn missing_edge_is_a_precondition_violation() {
    let g = shared_brush();
    let (a, b) = (idx(&g, 1), idx(&g, 2));
    let mut r = CallResolver::new(&g, false);
    let err = r.resolve(a, a, b).unwrap_err();
    assert!(matches!(err, CodegenError::Precondition(_)));
}

#[test]
fn property_set_animators_resolve_through_the_set() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "properties": 1},
            {"type": "property_set",
             "values": [{"name": "Progress", "value": {"scalar": 0.0}}],
             "animators": [{"property": "Progress", "animation": 2}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10,
             "key_frames": [{"progress": 1.0, "value": 1.0}]}
        ]
    }));
    let (ps, anim) = (idx(&g, 1), idx(&g, 2));
    let mut r = CallResolver::new(&g, false);
    assert_eq!(r.resolve(g.root(), ps, anim).unwrap(), Resolution::Construct);
}
