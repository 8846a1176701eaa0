use super::*;
use crate::analyze::storage::analyze;
use crate::foundation::ids::ObjectId;
use serde_json::json;

fn build(v: serde_json::Value) -> ObjectGraph {
    ObjectGraph::build(serde_json::from_value(v).unwrap()).unwrap()
}

fn named(v: serde_json::Value) -> ObjectGraph {
    let mut g = build(v);
    analyze(&mut g).unwrap();
    name_nodes(&mut g);
    g
}

fn name_of(g: &ObjectGraph, id: u32) -> Option<&str> {
    g.node(g.node_for(ObjectId(id)).unwrap()).name()
}

#[test]
fn float_ids_are_identifier_safe() {
    assert_eq!(float_as_id(1.0), "1");
    assert_eq!(float_as_id(0.5), "0p5");
    assert_eq!(float_as_id(-2.25), "m2p25");
    assert_eq!(float_as_id(-0.0), "0");
    assert_eq!(float_as_id(1.23456), "1p235");
}

#[test]
fn square_vectors_use_one_component() {
    assert_eq!(vector2_as_id(Vec2::new(4.0, 4.0)), "4");
    assert_eq!(vector2_as_id(Vec2::new(4.0, 2.5)), "4x2p5");
}

#[test]
fn counter_width_matches_group_size() {
    let bases: Vec<String> = (0..11).map(|_| "Shape".to_owned()).collect();
    let names = number_names(&bases);
    assert_eq!(names[0], "Shape_00");
    assert_eq!(names[10], "Shape_10");

    let names = number_names(&["Solo".to_owned()]);
    assert_eq!(names, vec!["Solo_0"]);
}

#[test]
fn groups_are_numbered_independently() {
    let bases = ["A", "B", "A"].map(str::to_owned);
    assert_eq!(number_names(&bases), vec!["A_0", "B_0", "A_1"]);
}

#[test]
fn descriptions_use_key_fields() {
    let g = named(json!({
        "root": 0,
        "objects": [
            {"type": "shape_visual", "shapes": [1, 2]},
            {"type": "sprite_shape", "geometry": 3, "fill_brush": 4},
            {"type": "sprite_shape", "geometry": 5},
            {"type": "rectangle_geometry", "size": [10.0, 20.0]},
            {"type": "color_brush", "color": "#FF0000"},
            {"type": "ellipse_geometry", "radius": [3.0, 3.0]}
        ]
    }));
    assert_eq!(name_of(&g, 0), Some("ShapeVisual_0"));
    assert_eq!(name_of(&g, 1), Some("SpriteShape_0"));
    assert_eq!(name_of(&g, 2), Some("SpriteShape_1"));
    assert_eq!(name_of(&g, 3), Some("Rectangle_10x20_0"));
    assert_eq!(name_of(&g, 4), Some("ColorBrush_Red_0"));
    assert_eq!(name_of(&g, 5), Some("Ellipse_3_0"));
}

#[test]
fn animations_are_named_after_property_and_range() {
    let g = named(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1], "animators": [
                {"property": "Opacity", "animation": 2},
                {"property": "Offset", "animation": 3}
            ]},
            {"type": "sprite_visual", "brush": 4},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10, "key_frames": [
                {"progress": 0.0, "value": 0.0},
                {"progress": 1.0, "value": 1.0}
            ]},
            {"type": "vector3_key_frame_animation", "duration_ticks": 10,
             "key_frames": [{"progress": 1.0, "value": [1.0, 2.0, 3.0]}]},
            {"type": "color_brush", "color": "#0000FF",
             "animators": [{"property": "Color", "animation": 5}]},
            {"type": "color_key_frame_animation", "duration_ticks": 10, "key_frames": [
                {"progress": 0.0, "value": "#0000FF"},
                {"progress": 1.0, "value": "#FF0000"}
            ]}
        ]
    }));
    assert_eq!(name_of(&g, 2), Some("OpacityScalarAnimation_0_to_1_0"));
    assert_eq!(name_of(&g, 3), Some("OffsetVector3Animation_0"));
    assert_eq!(name_of(&g, 4), Some("AnimatedColorBrush_Blue_to_Red_0"));
    assert_eq!(name_of(&g, 5), Some("ColorAnimation_Blue_to_Red_0"));
}

#[test]
fn image_names_come_from_the_file_stem() {
    let g = build(json!({
        "root": 0,
        "objects": [
            {"type": "sprite_visual", "brush": 1},
            {"type": "surface_brush", "surface": 2},
            {"type": "loaded_image_surface",
             "source": {"uri": {"uri": "ms-appx:///Assets/my-photo.final.png?v=2"}}}
        ]
    }));
    let img = g.node_for(ObjectId(2)).unwrap();
    assert_eq!(describe(&g, img), "Image_my_photo_final");
}

#[test]
fn shared_and_factoryless_nodes_get_no_counter_name() {
    let g = named(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "properties": 1, "children": [2]},
            {"type": "property_set", "values": [{"name": "Progress", "value": {"scalar": 0.0}}]},
            {"type": "sprite_visual", "brush": 3},
            {"type": "surface_brush", "surface": 4},
            {"type": "loaded_image_surface", "source": {"stream": {"bytes": [1]}}}
        ]
    }));
    assert_eq!(name_of(&g, 1), None);
    assert_eq!(name_of(&g, 4), None);
    assert_eq!(name_of(&g, 3), Some("SurfaceBrush_0"));
}

#[test]
fn factories_come_out_in_alphanumeric_name_order() {
    let g = named(json!({
        "root": 0,
        "objects": [
            {"type": "shape_visual", "shapes": [1, 2, 3]},
            {"type": "sprite_shape", "geometry": 4},
            {"type": "sprite_shape", "geometry": 5},
            {"type": "sprite_shape", "geometry": 6},
            {"type": "rectangle_geometry", "size": [10.0, 10.0]},
            {"type": "rectangle_geometry", "size": [2.0, 2.0]},
            {"type": "ellipse_geometry", "radius": [1.0, 1.0]}
        ]
    }));
    let names: Vec<&str> = factory_nodes_by_name(&g)
        .into_iter()
        .map(|i| g.node(i).name().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Ellipse_1_0",
            "Rectangle_2_0",
            "Rectangle_10_0",
            "ShapeVisual_0",
            "SpriteShape_0",
            "SpriteShape_1",
            "SpriteShape_2",
        ]
    );
}

#[test]
fn naming_is_deterministic() {
    let doc = json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "container_visual"},
            {"type": "container_visual"}
        ]
    });
    let a = named(doc.clone());
    let b = named(doc);
    let names = |g: &ObjectGraph| -> Vec<Option<String>> {
        g.nodes().map(|(_, n)| n.name().map(str::to_owned)).collect()
    };
    assert_eq!(names(&a), names(&b));
    assert_eq!(
        names(&a),
        vec![
            Some("ContainerVisual_0".to_owned()),
            Some("ContainerVisual_1".to_owned()),
            Some("ContainerVisual_2".to_owned()),
        ]
    );
}

#[test]
fn dotted_properties_make_valid_identifiers() {
    let g = named(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "animators": [
                {"property": "Offset.X", "animation": 1},
                {"property": "Scale.XY", "animation": 2}
            ]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10, "key_frames": [
                {"progress": 0.0, "value": 0.0},
                {"progress": 1.0, "value": 1.0}
            ]},
            {"type": "vector2_key_frame_animation", "duration_ticks": 10,
             "key_frames": [{"progress": 1.0, "value": [2.0, 2.0]}]}
        ]
    }));
    assert_eq!(name_of(&g, 1), Some("OffsetXScalarAnimation_0_to_1_0"));
    assert_eq!(name_of(&g, 2), Some("ScaleXYVector2Animation_0"));
}
