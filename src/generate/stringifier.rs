use crate::foundation::color::Color;
use crate::foundation::math::{Matrix3x2, Vec2, Vec3, Vec4};
use crate::model::object::{CombineMode, FillMode};

/// Target-language spelling of the constructs the emitter writes.
///
/// The emitter only ever talks to this trait; one implementation exists per target.
pub trait Stringifier: Send + Sync {
    /// Member access operator.
    fn deref(&self) -> &'static str;

    /// Constructor expression prefix for `type_name`; arguments follow in parentheses.
    fn new_object(&self, type_name: &str) -> String;

    /// Null literal.
    fn null(&self) -> &'static str;

    /// Read a property.
    fn property_get(&self, target: &str, property: &str) -> String;

    /// Assign a property, without the statement terminator.
    fn property_set(&self, target: &str, property: &str, value: &str) -> String;

    /// Marks a declared type as read-only.
    fn readonly(&self, type_name: &str) -> String;

    /// How a runtime type is spelled when held by reference.
    fn reference_type_name(&self, type_name: &str) -> String;

    /// Static member / enum scope operator.
    fn scope_resolve(&self) -> &'static str;

    /// String literal.
    fn string(&self, value: &str) -> String;

    /// Single-precision float literal.
    fn float(&self, value: f32) -> String;

    /// Color literal.
    fn color(&self, value: Color) -> String;

    /// Two-component vector literal.
    fn vector2(&self, value: Vec2) -> String;

    /// Three-component vector literal.
    fn vector3(&self, value: Vec3) -> String;

    /// Four-component vector literal.
    fn vector4(&self, value: Vec4) -> String;

    /// 3x2 matrix literal.
    fn matrix3x2(&self, value: &Matrix3x2) -> String;

    /// Duration literal from 100ns ticks.
    fn time_span(&self, ticks: i64) -> String;

    /// Keyword introducing an immutable local.
    fn const_var(&self) -> &'static str;

    /// Method that appends to a runtime list.
    fn ilist_add(&self) -> &'static str;

    /// Converts a canvas geometry expression into a geometry source.
    fn canvas_geometry_factory_call(&self, value: &str) -> String;

    /// Field name for a node name.
    fn field_name(&self, name: &str) -> String;

    /// Boolean literal.
    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    /// Statement terminator.
    fn statement_end(&self) -> &'static str {
        ";"
    }

    /// Declaration line of a factory method returning `return_type`.
    fn factory_signature(&self, return_type: &str, name: &str) -> String;

    /// Declaration line of a method the enclosing source class may call.
    fn visible_method_signature(&self, return_type: &str, name: &str) -> String;

    /// Declaration line of a field.
    fn field_declaration(&self, type_name: &str, field: &str, readonly: bool) -> String;

    /// Fill mode enum value.
    fn fill_mode(&self, value: FillMode) -> String;

    /// Geometry combine enum value.
    fn combine_mode(&self, value: CombineMode) -> String;

    /// Figure loop enum value.
    fn figure_loop(&self, closed: bool) -> String;

    /// Array literal of reference-typed elements.
    fn array(&self, element_type: &str, items: &[String]) -> String;

    /// Inline byte array literal.
    fn byte_array(&self, bytes: &[u8]) -> String;

    /// Expression that starts loading an image from a URI.
    fn load_image_from_uri(&self, uri: &str) -> String;

    /// Expression that starts loading an image from inline bytes.
    fn load_image_from_stream(&self, bytes_expr: &str) -> String;

    /// Lines opening a namespace; the caller indents what follows.
    fn namespace_open(&self, namespace: &str) -> Vec<String>;

    /// Line closing a namespace.
    fn namespace_close(&self) -> &'static str {
        "}"
    }

    /// Line declaring a class. The opening brace follows on its own line.
    fn class_declaration(&self, name: &str, public: bool) -> String;

    /// Line closing a class.
    fn class_close(&self) -> &'static str;

    /// Lines of a constructor up to (not including) its opening brace.
    ///
    /// `params` are `(type, name)` pairs; `inits` assigns fields from parameters.
    fn constructor_head(
        &self,
        class: &str,
        params: &[(String, String)],
        inits: &[(String, String)],
    ) -> Vec<String>;

    /// Field assignments a constructor body performs for `inits` when the head did not.
    fn constructor_body_inits(&self, inits: &[(String, String)]) -> Vec<String>;

    /// Prelude lines at the top of the file, after the header comment.
    fn prelude(&self) -> Vec<String>;
}

/// `Name` -> `name`.
pub fn camel_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `0xAB` for one byte.
pub fn hex_byte(value: u8) -> String {
    format!("0x{value:02X}")
}

/// Float text shared by both targets: integral values without a fraction, otherwise the
/// shortest round-trip form.
pub(crate) fn float_digits(value: f32, integral_suffix: &str) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    if value.is_finite() && value.floor() == value && value.abs() < 1e9 {
        format!("{value:.0}{integral_suffix}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/stringifier.rs"]
mod tests;
