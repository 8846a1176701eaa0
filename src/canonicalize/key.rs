use crate::foundation::color::Color;
use crate::foundation::error::CodegenResult;
use crate::foundation::ids::{NodeIdx, ObjectId};
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::graph::object_graph::ObjectGraph;
use crate::model::object::{FillMode, PathCommand, Trim};

/// Exact structural equivalence key. Two candidates of one pass merge iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonKey(Vec<u8>);

impl CanonKey {
    /// Raw encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Append-only encoder for [`CanonKey`]s.
///
/// Variable-length fields are length-prefixed so concatenated fields never alias. References are
/// written as the canonical node of the referenced object.
pub(crate) struct KeyWriter<'g> {
    graph: &'g ObjectGraph,
    buf: Vec<u8>,
}

impl<'g> KeyWriter<'g> {
    pub(crate) fn new(graph: &'g ObjectGraph, tag: u8) -> Self {
        let mut buf = Vec::with_capacity(32);
        buf.push(tag);
        Self { graph, buf }
    }

    pub(crate) fn finish(self) -> CanonKey {
        CanonKey(self.buf)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub(crate) fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// `-0.0` and `0.0` encode identically; every NaN encodes as the same NaN.
    pub(crate) fn write_f32(&mut self, v: f32) {
        let v = if v == 0.0 {
            0.0
        } else if v.is_nan() {
            f32::NAN
        } else {
            v
        };
        self.write_u32(v.to_bits());
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.write_u32(b.len() as u32);
        self.buf.extend_from_slice(b);
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn write_opt_str(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.write_u8(1);
                self.write_str(s);
            }
            None => self.write_u8(0),
        }
    }

    pub(crate) fn write_len(&mut self, n: usize) {
        self.write_u32(n as u32);
    }

    pub(crate) fn write_node(&mut self, n: NodeIdx) {
        self.write_u32(n.0);
    }

    /// Writes the canonical node of a referenced object.
    pub(crate) fn write_ref(&mut self, id: ObjectId) -> CodegenResult<()> {
        let node = self.graph.expect_node(id)?;
        self.write_node(self.graph.canonical(node));
        Ok(())
    }

    pub(crate) fn write_opt_ref(&mut self, id: Option<ObjectId>) -> CodegenResult<()> {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_ref(id)
            }
            None => {
                self.write_u8(0);
                Ok(())
            }
        }
    }

    pub(crate) fn write_vec2(&mut self, v: Vec2) {
        self.write_f32(v.x);
        self.write_f32(v.y);
    }

    pub(crate) fn write_opt_vec2(&mut self, v: Option<Vec2>) {
        match v {
            Some(v) => {
                self.write_u8(1);
                self.write_vec2(v);
            }
            None => self.write_u8(0),
        }
    }

    pub(crate) fn write_color(&mut self, c: Color) {
        self.write_u32(c.to_u32());
    }

    pub(crate) fn write_trim(&mut self, t: &Trim) {
        self.write_f32(t.trim_start);
        self.write_f32(t.trim_end);
        self.write_f32(t.trim_offset);
    }

    pub(crate) fn write_fill_mode(&mut self, f: FillMode) {
        self.write_u8(match f {
            FillMode::Alternate => 0,
            FillMode::Winding => 1,
        });
    }

    pub(crate) fn write_path_commands(&mut self, commands: &[PathCommand]) {
        self.write_len(commands.len());
        for c in commands {
            match c {
                PathCommand::BeginFigure { start } => {
                    self.write_u8(0);
                    self.write_vec2(*start);
                }
                PathCommand::AddLine { end } => {
                    self.write_u8(1);
                    self.write_vec2(*end);
                }
                PathCommand::AddCubicBezier {
                    control_point1,
                    control_point2,
                    end,
                } => {
                    self.write_u8(2);
                    self.write_vec2(*control_point1);
                    self.write_vec2(*control_point2);
                    self.write_vec2(*end);
                }
                PathCommand::EndFigure { closed } => {
                    self.write_u8(3);
                    self.write_bool(*closed);
                }
            }
        }
    }
}

/// A key frame value that can take part in an equivalence key.
pub(crate) trait KeyValue {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()>;
}

impl KeyValue for bool {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_bool(*self);
        Ok(())
    }
}

impl KeyValue for f32 {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_f32(*self);
        Ok(())
    }
}

impl KeyValue for Color {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_color(*self);
        Ok(())
    }
}

impl KeyValue for Vec2 {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_vec2(*self);
        Ok(())
    }
}

impl KeyValue for Vec3 {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_f32(self.x);
        w.write_f32(self.y);
        w.write_f32(self.z);
        Ok(())
    }
}

impl KeyValue for Vec4 {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_f32(self.x);
        w.write_f32(self.y);
        w.write_f32(self.z);
        w.write_f32(self.w);
        Ok(())
    }
}

/// Path key frame values compare by canonical composition path.
impl KeyValue for ObjectId {
    fn write_key(&self, w: &mut KeyWriter<'_>) -> CodegenResult<()> {
        w.write_ref(*self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canonicalize/key.rs"]
mod tests;
