use super::*;
use crate::generate::cppwinrt::CppwinrtStringifier;
use crate::generate::csharp::CSharpStringifier;

#[test]
fn camel_case_lowers_the_first_letter_only() {
    assert_eq!(camel_case("ShapeVisual_0"), "shapeVisual_0");
    assert_eq!(camel_case(""), "");
    assert_eq!(camel_case("x"), "x");
}

#[test]
fn hex_bytes_are_two_upper_digits() {
    assert_eq!(hex_byte(0), "0x00");
    assert_eq!(hex_byte(0xAB), "0xAB");
}

#[test]
fn floats_drop_integral_fractions() {
    assert_eq!(float_digits(2.0, ""), "2");
    assert_eq!(float_digits(-0.0, ""), "0");
    assert_eq!(float_digits(0.25, ""), "0.25");
    assert_eq!(float_digits(3.0, ".0"), "3.0");
}

#[test]
fn csharp_literals() {
    let s = CSharpStringifier;
    assert_eq!(s.float(1.5), "1.5F");
    assert_eq!(s.vector2(Vec2::new(1.0, 2.0)), "new Vector2(1F, 2F)");
    assert_eq!(
        s.color(Color {
            r: 0xFF,
            g: 0,
            b: 0x10,
            a: 0x80
        }),
        "Color.FromArgb(0x80, 0xFF, 0x00, 0x10)"
    );
    assert_eq!(s.time_span(100), "TimeSpan.FromTicks(100)");
    assert_eq!(s.string("a\"b"), "\"a\\\"b\"");
    assert_eq!(s.field_name("Root_0"), "_root_0");
    assert_eq!(s.byte_array(&[1, 255]), "new byte[] { 0x01, 0xFF }");
}

#[test]
fn csharp_declarations() {
    let s = CSharpStringifier;
    assert_eq!(
        s.field_declaration("CompositionColorBrush", "_brush", true),
        "readonly CompositionColorBrush _brush;"
    );
    assert_eq!(
        s.factory_signature("SpriteVisual", "Root_0"),
        "SpriteVisual Root_0()"
    );
    assert_eq!(
        s.constructor_head("A", &[("Compositor".into(), "compositor".into())], &[]),
        vec!["public A(Compositor compositor)"]
    );
    assert_eq!(
        s.constructor_body_inits(&[("_c".into(), "compositor".into())]),
        vec!["_c = compositor;"]
    );
}

#[test]
fn cppwinrt_literals() {
    let s = CppwinrtStringifier;
    assert_eq!(s.field_name("Root_0"), "m_root_0");
    assert_eq!(s.const_var(), "const auto");
    assert_eq!(s.ilist_add(), "Append");
    assert_eq!(
        s.canvas_geometry_factory_call("geometry"),
        "CanvasGeometryToIGeometrySource2D(geometry)"
    );
    assert_eq!(
        s.namespace_open("Acme.Anim"),
        vec!["namespace winrt::Acme::Anim", "{"]
    );
}

#[test]
fn cppwinrt_constructor_initializes_in_the_head() {
    let s = CppwinrtStringifier;
    let head = s.constructor_head(
        "A",
        &[("Compositor".into(), "compositor".into())],
        &[("m_c".into(), "compositor".into())],
    );
    assert_eq!(head[0], "public:");
    assert!(head[1].starts_with("A("));
    assert_eq!(head[2], "    : m_c(compositor)");
    assert!(s.constructor_body_inits(&[("m_c".into(), "compositor".into())]).is_empty());
}

#[test]
fn targets_agree_on_defaults() {
    let targets: [&dyn Stringifier; 2] = [&CSharpStringifier, &CppwinrtStringifier];
    for s in targets {
        assert_eq!(s.bool_literal(true), "true");
        assert_eq!(s.statement_end(), ";");
        assert_eq!(s.namespace_close(), "}");
    }
}
