use serde::{Deserialize, Serialize};

/// Two-component vector as it appears in composition properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

/// Three-component vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

/// Four-component vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

/// Row-major 3x2 affine matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix3x2 {
    /// Row 1, column 1.
    pub m11: f32,
    /// Row 1, column 2.
    pub m12: f32,
    /// Row 2, column 1.
    pub m21: f32,
    /// Row 2, column 2.
    pub m22: f32,
    /// Translation x.
    pub m31: f32,
    /// Translation y.
    pub m32: f32,
}

impl Vec2 {
    /// Construct from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vec3 {
    /// Construct from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Vec4 {
    /// Construct from components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Matrix3x2 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        m31: 0.0,
        m32: 0.0,
    };

    /// The six coefficients in row-major order.
    pub fn as_coeffs(&self) -> [f32; 6] {
        [self.m11, self.m12, self.m21, self.m22, self.m31, self.m32]
    }
}

impl Default for Matrix3x2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<'de> Deserialize<'de> for Vec2 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f32; 2]),
            Obj { x: f32, y: f32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

impl<'de> Deserialize<'de> for Vec3 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f32; 3]),
            Obj { x: f32, y: f32, z: f32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y, z]) => Ok(Self { x, y, z }),
            Repr::Obj { x, y, z } => Ok(Self { x, y, z }),
        }
    }
}

impl<'de> Deserialize<'de> for Vec4 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f32; 4]),
            Obj { x: f32, y: f32, z: f32, w: f32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y, z, w]) => Ok(Self { x, y, z, w }),
            Repr::Obj { x, y, z, w } => Ok(Self { x, y, z, w }),
        }
    }
}

impl<'de> Deserialize<'de> for Matrix3x2 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f32; 6]),
            Obj {
                m11: f32,
                m12: f32,
                m21: f32,
                m22: f32,
                m31: f32,
                m32: f32,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([m11, m12, m21, m22, m31, m32]) | Repr::Obj {
                m11,
                m12,
                m21,
                m22,
                m31,
                m32,
            } => Ok(Self {
                m11,
                m12,
                m21,
                m22,
                m31,
                m32,
            }),
        }
    }
}
