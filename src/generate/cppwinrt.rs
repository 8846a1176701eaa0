use crate::foundation::color::Color;
use crate::foundation::math::{Matrix3x2, Vec2, Vec3, Vec4};
use crate::generate::stringifier::{Stringifier, camel_case, float_digits, hex_byte};
use crate::model::object::{CombineMode, FillMode};

/// C++/WinRT target.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppwinrtStringifier;

impl Stringifier for CppwinrtStringifier {
    fn deref(&self) -> &'static str {
        "."
    }

    fn new_object(&self, type_name: &str) -> String {
        type_name.to_owned()
    }

    fn null(&self) -> &'static str {
        "nullptr"
    }

    fn property_get(&self, target: &str, property: &str) -> String {
        format!("{target}.{property}()")
    }

    fn property_set(&self, target: &str, property: &str, value: &str) -> String {
        format!("{target}.{property}({value})")
    }

    fn readonly(&self, type_name: &str) -> String {
        format!("{type_name} const")
    }

    fn reference_type_name(&self, type_name: &str) -> String {
        match type_name {
            "CanvasGeometry" => "winrt::com_ptr<CanvasGeometry>".to_owned(),
            _ => type_name.to_owned(),
        }
    }

    fn scope_resolve(&self) -> &'static str {
        "::"
    }

    fn string(&self, value: &str) -> String {
        format!("L\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn float(&self, value: f32) -> String {
        format!("{}F", float_digits(value, ".0"))
    }

    fn color(&self, value: Color) -> String {
        format!(
            "{{ {}, {}, {}, {} }}",
            hex_byte(value.a),
            hex_byte(value.r),
            hex_byte(value.g),
            hex_byte(value.b)
        )
    }

    fn vector2(&self, value: Vec2) -> String {
        format!("{{ {}, {} }}", self.float(value.x), self.float(value.y))
    }

    fn vector3(&self, value: Vec3) -> String {
        format!(
            "{{ {}, {}, {} }}",
            self.float(value.x),
            self.float(value.y),
            self.float(value.z)
        )
    }

    fn vector4(&self, value: Vec4) -> String {
        format!(
            "{{ {}, {}, {}, {} }}",
            self.float(value.x),
            self.float(value.y),
            self.float(value.z),
            self.float(value.w)
        )
    }

    fn matrix3x2(&self, value: &Matrix3x2) -> String {
        let c: Vec<String> = value.as_coeffs().iter().map(|v| self.float(*v)).collect();
        format!("{{ {} }}", c.join(", "))
    }

    fn time_span(&self, ticks: i64) -> String {
        format!("TimeSpan{{ {ticks}L }}")
    }

    fn const_var(&self) -> &'static str {
        "const auto"
    }

    fn ilist_add(&self) -> &'static str {
        "Append"
    }

    fn canvas_geometry_factory_call(&self, value: &str) -> String {
        format!("CanvasGeometryToIGeometrySource2D({value})")
    }

    fn field_name(&self, name: &str) -> String {
        format!("m_{}", camel_case(name))
    }

    fn factory_signature(&self, return_type: &str, name: &str) -> String {
        format!("{} {name}()", self.reference_type_name(return_type))
    }

    fn visible_method_signature(&self, return_type: &str, name: &str) -> String {
        format!("{} {name}() const", self.reference_type_name(return_type))
    }

    fn field_declaration(&self, type_name: &str, field: &str, readonly: bool) -> String {
        let ty = self.reference_type_name(type_name);
        if readonly {
            format!("{} {field}{{ nullptr }};", self.readonly(&ty))
        } else {
            format!("{ty} {field}{{ nullptr }};")
        }
    }

    fn fill_mode(&self, value: FillMode) -> String {
        match value {
            FillMode::Alternate => "D2D1_FILL_MODE_ALTERNATE",
            FillMode::Winding => "D2D1_FILL_MODE_WINDING",
        }
        .to_owned()
    }

    fn combine_mode(&self, value: CombineMode) -> String {
        match value {
            CombineMode::Union => "D2D1_COMBINE_MODE_UNION",
            CombineMode::Intersect => "D2D1_COMBINE_MODE_INTERSECT",
            CombineMode::Xor => "D2D1_COMBINE_MODE_XOR",
            CombineMode::Exclude => "D2D1_COMBINE_MODE_EXCLUDE",
        }
        .to_owned()
    }

    fn figure_loop(&self, closed: bool) -> String {
        if closed {
            "D2D1_FIGURE_END_CLOSED"
        } else {
            "D2D1_FIGURE_END_OPEN"
        }
        .to_owned()
    }

    fn array(&self, element_type: &str, items: &[String]) -> String {
        format!(
            "std::array<{}, {}>{{ {} }}",
            self.reference_type_name(element_type),
            items.len(),
            items.join(", ")
        )
    }

    fn byte_array(&self, bytes: &[u8]) -> String {
        let items: Vec<String> = bytes.iter().map(|b| hex_byte(*b)).collect();
        format!(
            "std::array<uint8_t, {}>{{ {} }}",
            bytes.len(),
            items.join(", ")
        )
    }

    fn load_image_from_uri(&self, uri: &str) -> String {
        format!("LoadedImageSurface::StartLoadFromUri(Uri({}))", self.string(uri))
    }

    fn load_image_from_stream(&self, bytes_expr: &str) -> String {
        format!("LoadedImageSurface::StartLoadFromStream(StreamFromBytes({bytes_expr}))")
    }

    fn namespace_open(&self, namespace: &str) -> Vec<String> {
        vec![
            format!("namespace winrt::{}", namespace.replace('.', "::")),
            "{".to_owned(),
        ]
    }

    fn class_declaration(&self, name: &str, _public: bool) -> String {
        format!("class {name} final")
    }

    fn class_close(&self) -> &'static str {
        "};"
    }

    fn constructor_head(
        &self,
        class: &str,
        params: &[(String, String)],
        inits: &[(String, String)],
    ) -> Vec<String> {
        let params: Vec<String> = params
            .iter()
            .map(|(t, n)| format!("{} const& {n}", self.reference_type_name(t)))
            .collect();
        let mut out = vec!["public:".to_owned(), format!("{class}({})", params.join(", "))];
        for (i, (field, param)) in inits.iter().enumerate() {
            let lead = if i == 0 { ':' } else { ',' };
            out.push(format!("    {lead} {field}({param})"));
        }
        out
    }

    fn constructor_body_inits(&self, _inits: &[(String, String)]) -> Vec<String> {
        Vec::new()
    }

    fn prelude(&self) -> Vec<String> {
        [
            "#pragma once",
            "#include <array>",
            "#include <winrt/Windows.Foundation.Numerics.h>",
            "#include <winrt/Windows.UI.Composition.h>",
            "#include <d2d1.h>",
            "using namespace winrt::Windows::Foundation;",
            "using namespace winrt::Windows::Foundation::Numerics;",
            "using namespace winrt::Windows::UI;",
            "using namespace winrt::Windows::UI::Composition;",
            "using TimeSpan = winrt::Windows::Foundation::TimeSpan;",
        ]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
    }
}
