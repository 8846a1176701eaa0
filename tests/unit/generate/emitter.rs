use super::*;
use crate::analyze::storage::analyze;
use crate::foundation::color::Color;
use crate::generate::cppwinrt::CppwinrtStringifier;
use crate::generate::csharp::CSharpStringifier;
use crate::naming::namer::name_nodes;
use serde_json::json;

fn prepared(v: serde_json::Value) -> ObjectGraph {
    let mut g = ObjectGraph::build(serde_json::from_value(v).unwrap()).unwrap();
    analyze(&mut g).unwrap();
    name_nodes(&mut g);
    g
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
fn class_name_carries_the_api_version() {
    assert_eq!(variant_class_name(7), "AnimatedVisual_UAPv7");
}

#[test]
fn shared_brush_is_constructed_once_then_read() {
    let g = shared_brush();
    let v = emit_variant(&g, "AnimatedVisual_UAPv7", &CSharpStringifier, false).unwrap();
    let text = &v.text;

    assert!(text.starts_with("sealed class AnimatedVisual_UAPv7\n{\n"));
    assert!(text.contains("    readonly Compositor _c;\n"));
    assert!(text.contains("    CompositionColorBrush _colorBrush_White_0;\n"));
    assert!(text.contains("    ContainerVisual _containerVisual_0;\n"));
    assert!(text.contains(
        "var result = _colorBrush_White_0 = _c.CreateColorBrush(Color.FromArgb(0xFF, 0xFF, 0xFF, 0xFF));"
    ));
    assert!(text.contains("result.Children.InsertAtTop(SpriteVisual_0());"));
    assert!(text.contains("result.Brush = ColorBrush_White_0();"));
    assert!(text.contains("result.Brush = _colorBrush_White_0;"));
    assert!(text.contains("    public AnimatedVisual_UAPv7(Compositor compositor)\n"));
    assert!(text.contains("        _c = compositor;\n        ContainerVisual_0();\n"));
    assert!(text.contains("    internal Visual RootVisual()\n"));
    assert!(text.contains("        return _containerVisual_0;\n"));

    assert_eq!(v.factories.len(), 4);
    assert!(v.shared_args.is_empty());
    let reads = v
        .resolutions
        .iter()
        .filter(|r| r.resolution == Resolution::ReadField)
        .count();
    assert_eq!(v.resolutions.len(), 4);
    assert_eq!(reads, 1);
}

#[test]
fn factories_are_written_in_name_order() {
    let g = shared_brush();
    let text = emit_variant(&g, "V", &CSharpStringifier, false).unwrap().text;
    let at = |needle: &str| text.find(needle).unwrap();
    assert!(at("ColorBrush_White_0()\n") < at("ContainerVisual ContainerVisual_0()"));
    assert!(at("SpriteVisual SpriteVisual_0()") < at("SpriteVisual SpriteVisual_1()"));
}

#[test]
fn stored_fields_come_before_unstored_ones_by_readonly_then_type() {
    let g = shared_brush();
    let text = emit_variant(&g, "V", &CSharpStringifier, false).unwrap().text;
    let at = |needle: &str| text.find(needle).unwrap();
    assert!(at("readonly Compositor _c;") < at("CompositionColorBrush _colorBrush_White_0;"));
    assert!(at("CompositionColorBrush _colorBrush") < at("ContainerVisual _containerVisual_0;"));
}

#[test]
fn disabled_field_optimization_guards_stored_factories() {
    let g = shared_brush();
    let text = emit_variant(&g, "V", &CSharpStringifier, true).unwrap().text;
    assert!(text.contains("if (_colorBrush_White_0 != null)"));
    assert!(text.contains("return _colorBrush_White_0;"));
    assert!(!text.contains("result.Brush = _colorBrush_White_0;"));
}

#[test]
fn inlined_path_has_no_factory() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "shape_visual", "shapes": [1]},
            {"type": "sprite_shape", "geometry": 2},
            {"type": "path_geometry", "path": 3},
            {"type": "composition_path", "source": 4},
            {"type": "canvas_path", "fill_mode": "winding", "commands": [
                {"command": "begin_figure", "start": [0.0, 0.0]},
                {"command": "add_line", "end": [10.0, 0.0]},
                {"command": "end_figure", "closed": true}
            ]}
        ]
    }));
    let v = emit_variant(&g, "V", &CSharpStringifier, false).unwrap();
    assert!(!v.text.contains("CompositionPath CompositionPath_"));
    assert!(
        v.text
            .contains("var result = _c.CreatePathGeometry(new CompositionPath(Geometry_0()));")
    );
    assert!(v.text.contains("var builder = new CanvasPathBuilder(null);"));
    assert!(
        v.text
            .contains("builder.SetFilledRegionDetermination(CanvasFilledRegionDetermination.Winding);")
    );
    assert!(v.text.contains("builder.EndFigure(CanvasFigureLoop.Closed);"));
    assert!(v.text.contains("var result = CanvasGeometry.CreatePath(builder);"));
    assert!(
        v.resolutions
            .iter()
            .any(|r| r.resolution == Resolution::Inline)
    );
}

#[test]
fn unshared_expression_reuses_one_instance() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "children": [1]},
            {"type": "container_visual", "animators": [{"property": "Offset", "animation": 2}]},
            {"type": "expression_animation", "expression": "Vector3(my.Size.X, 0, 0)",
             "reference_parameters": [{"name": "my", "object": 1}]}
        ]
    }));
    let text = emit_variant(&g, "V", &CSharpStringifier, false).unwrap().text;
    assert!(text.contains("    ExpressionAnimation _reusableExpressionAnimation;\n"));
    assert!(text.contains("_reusableExpressionAnimation = _c.CreateExpressionAnimation();"));
    assert!(text.contains("_reusableExpressionAnimation.ClearAllParameters();"));
    assert!(text.contains(
        "_reusableExpressionAnimation.Expression = \"Vector3(my.Size.X, 0, 0)\";"
    ));
    assert!(text.contains("_reusableExpressionAnimation.SetReferenceParameter(\"my\", result);"));
    assert!(text.contains("result.StartAnimation(\"Offset\", _reusableExpressionAnimation);"));
    assert!(!text.contains("ExpressionAnimation ExpressionAnimation_"));
}

#[test]
fn key_frames_resolve_easings_and_controllers() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual",
             "animators": [{"property": "Opacity", "animation": 1, "controller": 3}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 20000000, "key_frames": [
                {"progress": 0.0, "value": 0.0},
                {"progress": 1.0, "value": 1.0, "easing": 2}
            ]},
            {"type": "cubic_bezier_easing_function",
             "control_point1": [0.5, 0.0], "control_point2": [0.5, 1.0]},
            {"type": "animation_controller", "paused": true}
        ]
    }));
    let text = emit_variant(&g, "V", &CSharpStringifier, false).unwrap().text;
    assert!(text.contains("result.Duration = TimeSpan.FromTicks(20000000);"));
    assert!(text.contains("result.InsertKeyFrame(0F, 0F);"));
    assert!(text.contains(
        "result.InsertKeyFrame(1F, 1F, _c.CreateCubicBezierEasingFunction(new Vector2(0.5F, 0F), new Vector2(0.5F, 1F)));"
    ));
    assert!(text.contains("result.Pause();"));
    assert!(text.contains(
        "result.StartAnimation(\"Opacity\", OpacityScalarAnimation_0_to_1_0(), AnimationController_0());"
    ));
}

#[test]
fn property_set_values_are_inserted_by_the_owner() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual", "properties": 1},
            {"type": "property_set", "values": [
                {"name": "Progress", "value": {"scalar": 0.25}},
                {"name": "Tint", "value": {"color": "#FF0000"}}
            ]}
        ]
    }));
    let text = emit_variant(&g, "V", &CSharpStringifier, false).unwrap().text;
    assert!(text.contains("result.Properties.InsertScalar(\"Progress\", 0.25F);"));
    assert!(text.contains(
        "result.Properties.InsertColor(\"Tint\", Color.FromArgb(0xFF, 0xFF, 0x00, 0x00));"
    ));
    assert!(!text.contains("CompositionPropertySet PropertySet_"));
}

#[test]
fn cppwinrt_variant_uses_winrt_spelling() {
    let g = shared_brush();
    let text = emit_variant(&g, "V", &CppwinrtStringifier, false).unwrap().text;
    assert!(text.starts_with("class V final\n{\n"));
    assert!(text.contains("const auto result = m_colorBrush_White_0 = m_c.CreateColorBrush("));
    assert!(text.contains("result.Brush(m_colorBrush_White_0);"));
    assert!(text.contains("    public:\n    V(Compositor const& compositor)\n        : m_c(compositor)\n"));
    assert!(text.ends_with("};\n"));
}

#[test]
fn source_declares_shared_objects_and_variant_factories() {
    let g = shared_brush();
    let v = emit_variant(&g, "AnimatedVisual_UAPv7", &CSharpStringifier, false).unwrap();
    let shared = SharedObjects {
        theme: Some(vec![PropertySetValue {
            name: "Accent".to_owned(),
            value: PropertyValue::Color(Color {
                a: 255,
                r: 255,
                g: 0,
                b: 0,
            }),
        }]),
        images: vec![SharedImage {
            name: "Image_a_0".to_owned(),
            source: ImageSource::Uri {
                uri: "ms-appx:///a.png".to_owned(),
            },
        }],
    };
    let header = SourceHeader {
        class_name: "Foo",
        namespace: "Acme",
        target: "C#",
    };
    let text = emit_source(&header, &shared, &[v], &CSharpStringifier);

    assert!(text.starts_with("//----"));
    assert!(text.contains("//     Variants: UAPv7\n"));
    assert!(text.contains("using System.Numerics;\n"));
    assert!(text.contains("namespace Acme\n{\n    public sealed class Foo\n"));
    assert!(text.contains("        readonly CompositionPropertySet _themeProperties;\n"));
    assert!(text.contains("        readonly LoadedImageSurface _image_a_0;\n"));
    assert!(text.contains("            _themeProperties = ThemeProperties();\n"));
    assert!(text.contains("            _image_a_0 = Image_a_0();\n"));
    assert!(text.contains(
        "result.InsertColor(\"Accent\", Color.FromArgb(0xFF, 0xFF, 0x00, 0x00));"
    ));
    assert!(text.contains(
        "return LoadedImageSurface.StartLoadFromUri(new Uri(\"ms-appx:///a.png\"));"
    ));
    assert!(text.contains("internal Visual CreateAnimatedVisual_UAPv7()"));
    assert!(text.contains("return new AnimatedVisual_UAPv7(_c).RootVisual();"));
    assert!(text.contains("        sealed class AnimatedVisual_UAPv7\n"));
    assert!(text.ends_with("    }\n}\n"));
}

#[test]
fn stream_images_embed_their_bytes() {
    let shared = SharedObjects {
        theme: None,
        images: vec![SharedImage {
            name: "ImageFromStream_0".to_owned(),
            source: ImageSource::Stream {
                bytes: vec![0x89, 0x50],
            },
        }],
    };
    let header = SourceHeader {
        class_name: "Foo",
        namespace: "Acme",
        target: "C#",
    };
    let text = emit_source(&header, &shared, &[], &CSharpStringifier);
    assert!(text.contains(
        "LoadedImageSurface.StartLoadFromStream(new byte[] { 0x89, 0x50 }.AsBuffer().AsStream().AsRandomAccessStream())"
    ));
    assert!(!text.contains("_themeProperties"));
}

#[test]
fn dotted_animated_property_keeps_the_factory_name_valid() {
    let g = prepared(json!({
        "root": 0,
        "objects": [
            {"type": "container_visual",
             "animators": [{"property": "Offset.X", "animation": 1}]},
            {"type": "scalar_key_frame_animation", "duration_ticks": 10, "key_frames": [
                {"progress": 0.0, "value": 0.0},
                {"progress": 1.0, "value": 1.0}
            ]}
        ]
    }));
    let text = emit_variant(&g, "V", &CSharpStringifier, false).unwrap().text;
    assert!(text.contains(
        "result.StartAnimation(\"Offset.X\", OffsetXScalarAnimation_0_to_1_0());"
    ));
    assert!(text.contains("ScalarKeyFrameAnimation OffsetXScalarAnimation_0_to_1_0()"));
    assert!(!text.contains("Offset.XScalar"));
}
