use crate::foundation::color::Color;
use crate::foundation::math::{Matrix3x2, Vec2, Vec3, Vec4};
use crate::generate::stringifier::{Stringifier, camel_case, float_digits, hex_byte};
use crate::model::object::{CombineMode, FillMode};

/// C# target.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpStringifier;

impl Stringifier for CSharpStringifier {
    fn deref(&self) -> &'static str {
        "."
    }

    fn new_object(&self, type_name: &str) -> String {
        format!("new {type_name}")
    }

    fn null(&self) -> &'static str {
        "null"
    }

    fn property_get(&self, target: &str, property: &str) -> String {
        format!("{target}.{property}")
    }

    fn property_set(&self, target: &str, property: &str, value: &str) -> String {
        format!("{target}.{property} = {value}")
    }

    fn readonly(&self, type_name: &str) -> String {
        format!("readonly {type_name}")
    }

    fn reference_type_name(&self, type_name: &str) -> String {
        type_name.to_owned()
    }

    fn scope_resolve(&self) -> &'static str {
        "."
    }

    fn string(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn float(&self, value: f32) -> String {
        format!("{}F", float_digits(value, ""))
    }

    fn color(&self, value: Color) -> String {
        format!(
            "Color.FromArgb({}, {}, {}, {})",
            hex_byte(value.a),
            hex_byte(value.r),
            hex_byte(value.g),
            hex_byte(value.b)
        )
    }

    fn vector2(&self, value: Vec2) -> String {
        format!("new Vector2({}, {})", self.float(value.x), self.float(value.y))
    }

    fn vector3(&self, value: Vec3) -> String {
        format!(
            "new Vector3({}, {}, {})",
            self.float(value.x),
            self.float(value.y),
            self.float(value.z)
        )
    }

    fn vector4(&self, value: Vec4) -> String {
        format!(
            "new Vector4({}, {}, {}, {})",
            self.float(value.x),
            self.float(value.y),
            self.float(value.z),
            self.float(value.w)
        )
    }

    fn matrix3x2(&self, value: &Matrix3x2) -> String {
        let c: Vec<String> = value.as_coeffs().iter().map(|v| self.float(*v)).collect();
        format!("new Matrix3x2({})", c.join(", "))
    }

    fn time_span(&self, ticks: i64) -> String {
        format!("TimeSpan.FromTicks({ticks})")
    }

    fn const_var(&self) -> &'static str {
        "var"
    }

    fn ilist_add(&self) -> &'static str {
        "Add"
    }

    fn canvas_geometry_factory_call(&self, value: &str) -> String {
        value.to_owned()
    }

    fn field_name(&self, name: &str) -> String {
        format!("_{}", camel_case(name))
    }

    fn factory_signature(&self, return_type: &str, name: &str) -> String {
        format!("{return_type} {name}()")
    }

    fn visible_method_signature(&self, return_type: &str, name: &str) -> String {
        format!("internal {return_type} {name}()")
    }

    fn field_declaration(&self, type_name: &str, field: &str, readonly: bool) -> String {
        if readonly {
            format!("{} {field};", self.readonly(type_name))
        } else {
            format!("{type_name} {field};")
        }
    }

    fn fill_mode(&self, value: FillMode) -> String {
        match value {
            FillMode::Alternate => "CanvasFilledRegionDetermination.Alternate",
            FillMode::Winding => "CanvasFilledRegionDetermination.Winding",
        }
        .to_owned()
    }

    fn combine_mode(&self, value: CombineMode) -> String {
        match value {
            CombineMode::Union => "CanvasGeometryCombine.Union",
            CombineMode::Intersect => "CanvasGeometryCombine.Intersect",
            CombineMode::Xor => "CanvasGeometryCombine.Xor",
            CombineMode::Exclude => "CanvasGeometryCombine.Exclude",
        }
        .to_owned()
    }

    fn figure_loop(&self, closed: bool) -> String {
        if closed {
            "CanvasFigureLoop.Closed"
        } else {
            "CanvasFigureLoop.Open"
        }
        .to_owned()
    }

    fn array(&self, element_type: &str, items: &[String]) -> String {
        format!("new {element_type}[] {{ {} }}", items.join(", "))
    }

    fn byte_array(&self, bytes: &[u8]) -> String {
        let items: Vec<String> = bytes.iter().map(|b| hex_byte(*b)).collect();
        format!("new byte[] {{ {} }}", items.join(", "))
    }

    fn load_image_from_uri(&self, uri: &str) -> String {
        format!("LoadedImageSurface.StartLoadFromUri(new Uri({}))", self.string(uri))
    }

    fn load_image_from_stream(&self, bytes_expr: &str) -> String {
        format!(
            "LoadedImageSurface.StartLoadFromStream({bytes_expr}.AsBuffer().AsStream().AsRandomAccessStream())"
        )
    }

    fn namespace_open(&self, namespace: &str) -> Vec<String> {
        vec![format!("namespace {namespace}"), "{".to_owned()]
    }

    fn class_declaration(&self, name: &str, public: bool) -> String {
        if public {
            format!("public sealed class {name}")
        } else {
            format!("sealed class {name}")
        }
    }

    fn class_close(&self) -> &'static str {
        "}"
    }

    fn constructor_head(
        &self,
        class: &str,
        params: &[(String, String)],
        _inits: &[(String, String)],
    ) -> Vec<String> {
        let params: Vec<String> = params.iter().map(|(t, n)| format!("{t} {n}")).collect();
        vec![format!("public {class}({})", params.join(", "))]
    }

    fn constructor_body_inits(&self, inits: &[(String, String)]) -> Vec<String> {
        inits
            .iter()
            .map(|(field, param)| format!("{field} = {param};"))
            .collect()
    }

    fn prelude(&self) -> Vec<String> {
        [
            "using Microsoft.Graphics.Canvas.Geometry;",
            "using System;",
            "using System.IO;",
            "using System.Numerics;",
            "using System.Runtime.InteropServices.WindowsRuntime;",
            "using Windows.UI;",
            "using Windows.UI.Composition;",
            "using Windows.UI.Xaml.Media;",
        ]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
    }
}
