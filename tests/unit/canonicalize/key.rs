use super::*;
use serde_json::json;

fn graph() -> ObjectGraph {
    let doc = serde_json::from_value(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1, 2]},
            {"type": "sprite_visual", "brush": 3},
            {"type": "sprite_visual", "brush": 4},
            {"type": "color_brush", "color": "#FF0000"},
            {"type": "color_brush", "color": "#FF0000"}
        ]
    }))
    .unwrap();
    ObjectGraph::build(doc).unwrap()
}

fn key(g: &ObjectGraph, f: impl FnOnce(&mut KeyWriter<'_>)) -> CanonKey {
    let mut w = KeyWriter::new(g, 7);
    f(&mut w);
    w.finish()
}

#[test]
fn negative_zero_matches_zero() {
    let g = graph();
    assert_eq!(key(&g, |w| w.write_f32(-0.0)), key(&g, |w| w.write_f32(0.0)));
    assert_ne!(key(&g, |w| w.write_f32(1.0)), key(&g, |w| w.write_f32(0.0)));
}

#[test]
fn every_nan_encodes_the_same() {
    let g = graph();
    let other_nan = f32::from_bits(0x7fc0_0001);
    assert!(other_nan.is_nan());
    assert_eq!(
        key(&g, |w| w.write_f32(other_nan)),
        key(&g, |w| w.write_f32(f32::NAN))
    );
}

#[test]
fn strings_are_length_prefixed() {
    let g = graph();
    let split_early = key(&g, |w| {
        w.write_str("ab");
        w.write_str("c");
    });
    let split_late = key(&g, |w| {
        w.write_str("a");
        w.write_str("bc");
    });
    assert_ne!(split_early, split_late);
}

#[test]
fn absent_and_present_options_differ() {
    let g = graph();
    assert_ne!(
        key(&g, |w| w.write_opt_str(None)),
        key(&g, |w| w.write_opt_str(Some("")))
    );
    assert_ne!(
        key(&g, |w| w.write_opt_vec2(None)),
        key(&g, |w| w.write_opt_vec2(Some(Vec2::new(0.0, 0.0))))
    );
}

#[test]
fn tag_leads_the_key() {
    let g = graph();
    let k = KeyWriter::new(&g, 3).finish();
    assert_eq!(k.as_bytes(), &[3]);
}

#[test]
fn references_write_the_canonical_node() {
    let mut g = graph();
    let a = |g: &ObjectGraph| {
        let mut w = KeyWriter::new(g, 0);
        w.write_ref(ObjectId(3)).unwrap();
        w.finish()
    };
    let b = |g: &ObjectGraph| {
        let mut w = KeyWriter::new(g, 0);
        w.write_ref(ObjectId(4)).unwrap();
        w.finish()
    };
    assert_ne!(a(&g), b(&g));

    let first = g.node_for(ObjectId(3)).unwrap();
    let second = g.node_for(ObjectId(4)).unwrap();
    g.node_mut(second).canonical = first;
    assert_eq!(a(&g), b(&g));
}

#[test]
fn unknown_reference_is_an_error() {
    let g = graph();
    let mut w = KeyWriter::new(&g, 0);
    assert!(w.write_ref(ObjectId(99)).is_err());
}

#[test]
fn path_commands_distinguish_closed_figures() {
    let g = graph();
    let open = [
        PathCommand::BeginFigure { start: Vec2::new(0.0, 0.0) },
        PathCommand::AddLine {
            end: Vec2::new(1.0, 0.0),
        },
        PathCommand::EndFigure { closed: false },
    ];
    let mut closed = open.clone();
    closed[2] = PathCommand::EndFigure { closed: true };
    assert_ne!(
        key(&g, |w| w.write_path_commands(&open)),
        key(&g, |w| w.write_path_commands(&closed))
    );
}
