use serde::{Deserialize, Serialize};

/// 8-bit ARGB color, straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    /// Alpha.
    pub a: u8,
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Construct from ARGB components.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Packed `0xAARRGGBB` value.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.a) << 24)
            | (u32::from(self.r) << 16)
            | (u32::from(self.g) << 8)
            | u32::from(self.b)
    }

    /// Upper-case `AARRGGBB` hex digits.
    pub fn hex(self) -> String {
        format!("{:08X}", self.to_u32())
    }

    /// Identifier-safe, human readable name. Unique per ARGB value.
    ///
    /// Well-known colors use their name. Colors with transparency that match a well-known opaque
    /// color get a `Transparent`/`SemiTransparent` prefix. Anything else is described as almost
    /// the nearest well-known color, followed by its hex value.
    pub fn name(self) -> String {
        if let Some(name) = friendly_name(self) {
            return name;
        }
        let nearest = nearest_well_known(self);
        let almost = format!("Almost{nearest}_{}", self.hex());
        match self.a {
            255 => almost,
            0 => format!("Transparent{almost}"),
            _ => format!("SemiTransparent{almost}"),
        }
    }
}

fn friendly_name(c: Color) -> Option<String> {
    if let Some(name) = well_known_name(c.to_u32()) {
        return Some(name.to_owned());
    }
    if c.a == 255 {
        return None;
    }
    let opaque = Color { a: 255, ..c };
    let name = well_known_name(opaque.to_u32())?;
    Some(if c.a == 0 {
        format!("Transparent{name}")
    } else {
        format!("SemiTransparent{name}")
    })
}

fn well_known_name(argb: u32) -> Option<&'static str> {
    WELL_KNOWN
        .binary_search_by_key(&argb, |(v, _)| *v)
        .ok()
        .map(|i| WELL_KNOWN[i].1)
}

fn nearest_well_known(c: Color) -> &'static str {
    let mut best = ("Black", i32::MAX);
    for &(argb, name) in WELL_KNOWN {
        if argb >> 24 != 0xFF {
            continue;
        }
        let dr = i32::from(c.r) - ((argb >> 16) & 0xFF) as i32;
        let dg = i32::from(c.g) - ((argb >> 8) & 0xFF) as i32;
        let db = i32::from(c.b) - (argb & 0xFF) as i32;
        let d = dr * dr + dg * dg + db * db;
        if d < best.1 {
            best = (name, d);
        }
    }
    best.0
}

// Sorted by packed value for binary search.
const WELL_KNOWN: &[(u32, &str)] = &[
    (0x00000000, "Transparent"),
    (0xFF000000, "Black"),
    (0xFF000080, "Navy"),
    (0xFF00008B, "DarkBlue"),
    (0xFF0000CD, "MediumBlue"),
    (0xFF0000FF, "Blue"),
    (0xFF006400, "DarkGreen"),
    (0xFF008000, "Green"),
    (0xFF008080, "Teal"),
    (0xFF008B8B, "DarkCyan"),
    (0xFF00BFFF, "DeepSkyBlue"),
    (0xFF00CED1, "DarkTurquoise"),
    (0xFF00FA9A, "MediumSpringGreen"),
    (0xFF00FF00, "Lime"),
    (0xFF00FF7F, "SpringGreen"),
    (0xFF00FFFF, "Cyan"),
    (0xFF191970, "MidnightBlue"),
    (0xFF1E90FF, "DodgerBlue"),
    (0xFF20B2AA, "LightSeaGreen"),
    (0xFF228B22, "ForestGreen"),
    (0xFF2E8B57, "SeaGreen"),
    (0xFF2F4F4F, "DarkSlateGray"),
    (0xFF32CD32, "LimeGreen"),
    (0xFF3CB371, "MediumSeaGreen"),
    (0xFF40E0D0, "Turquoise"),
    (0xFF4169E1, "RoyalBlue"),
    (0xFF4682B4, "SteelBlue"),
    (0xFF483D8B, "DarkSlateBlue"),
    (0xFF48D1CC, "MediumTurquoise"),
    (0xFF4B0082, "Indigo"),
    (0xFF556B2F, "DarkOliveGreen"),
    (0xFF5F9EA0, "CadetBlue"),
    (0xFF6495ED, "CornflowerBlue"),
    (0xFF66CDAA, "MediumAquamarine"),
    (0xFF696969, "DimGray"),
    (0xFF6A5ACD, "SlateBlue"),
    (0xFF6B8E23, "OliveDrab"),
    (0xFF708090, "SlateGray"),
    (0xFF778899, "LightSlateGray"),
    (0xFF7B68EE, "MediumSlateBlue"),
    (0xFF7CFC00, "LawnGreen"),
    (0xFF7FFF00, "Chartreuse"),
    (0xFF7FFFD4, "Aquamarine"),
    (0xFF800000, "Maroon"),
    (0xFF800080, "Purple"),
    (0xFF808000, "Olive"),
    (0xFF808080, "Gray"),
    (0xFF87CEEB, "SkyBlue"),
    (0xFF87CEFA, "LightSkyBlue"),
    (0xFF8A2BE2, "BlueViolet"),
    (0xFF8B0000, "DarkRed"),
    (0xFF8B008B, "DarkMagenta"),
    (0xFF8B4513, "SaddleBrown"),
    (0xFF8FBC8F, "DarkSeaGreen"),
    (0xFF90EE90, "LightGreen"),
    (0xFF9370DB, "MediumPurple"),
    (0xFF9400D3, "DarkViolet"),
    (0xFF98FB98, "PaleGreen"),
    (0xFF9932CC, "DarkOrchid"),
    (0xFF9ACD32, "YellowGreen"),
    (0xFFA0522D, "Sienna"),
    (0xFFA52A2A, "Brown"),
    (0xFFA9A9A9, "DarkGray"),
    (0xFFADD8E6, "LightBlue"),
    (0xFFADFF2F, "GreenYellow"),
    (0xFFAFEEEE, "PaleTurquoise"),
    (0xFFB0C4DE, "LightSteelBlue"),
    (0xFFB0E0E6, "PowderBlue"),
    (0xFFB22222, "Firebrick"),
    (0xFFB8860B, "DarkGoldenrod"),
    (0xFFBA55D3, "MediumOrchid"),
    (0xFFBC8F8F, "RosyBrown"),
    (0xFFBDB76B, "DarkKhaki"),
    (0xFFC0C0C0, "Silver"),
    (0xFFC71585, "MediumVioletRed"),
    (0xFFCD5C5C, "IndianRed"),
    (0xFFCD853F, "Peru"),
    (0xFFD2691E, "Chocolate"),
    (0xFFD2B48C, "Tan"),
    (0xFFD3D3D3, "LightGray"),
    (0xFFD8BFD8, "Thistle"),
    (0xFFDA70D6, "Orchid"),
    (0xFFDAA520, "Goldenrod"),
    (0xFFDB7093, "PaleVioletRed"),
    (0xFFDC143C, "Crimson"),
    (0xFFDCDCDC, "Gainsboro"),
    (0xFFDDA0DD, "Plum"),
    (0xFFDEB887, "BurlyWood"),
    (0xFFE0FFFF, "LightCyan"),
    (0xFFE6E6FA, "Lavender"),
    (0xFFE9967A, "DarkSalmon"),
    (0xFFEE82EE, "Violet"),
    (0xFFEEE8AA, "PaleGoldenrod"),
    (0xFFF08080, "LightCoral"),
    (0xFFF0E68C, "Khaki"),
    (0xFFF0F8FF, "AliceBlue"),
    (0xFFF0FFF0, "Honeydew"),
    (0xFFF0FFFF, "Azure"),
    (0xFFF4A460, "SandyBrown"),
    (0xFFF5DEB3, "Wheat"),
    (0xFFF5F5DC, "Beige"),
    (0xFFF5F5F5, "WhiteSmoke"),
    (0xFFF5FFFA, "MintCream"),
    (0xFFF8F8FF, "GhostWhite"),
    (0xFFFA8072, "Salmon"),
    (0xFFFAEBD7, "AntiqueWhite"),
    (0xFFFAF0E6, "Linen"),
    (0xFFFAFAD2, "LightGoldenrodYellow"),
    (0xFFFDF5E6, "OldLace"),
    (0xFFFF0000, "Red"),
    (0xFFFF00FF, "Magenta"),
    (0xFFFF1493, "DeepPink"),
    (0xFFFF4500, "OrangeRed"),
    (0xFFFF6347, "Tomato"),
    (0xFFFF69B4, "HotPink"),
    (0xFFFF7F50, "Coral"),
    (0xFFFF8C00, "DarkOrange"),
    (0xFFFFA07A, "LightSalmon"),
    (0xFFFFA500, "Orange"),
    (0xFFFFB6C1, "LightPink"),
    (0xFFFFC0CB, "Pink"),
    (0xFFFFD700, "Gold"),
    (0xFFFFDAB9, "PeachPuff"),
    (0xFFFFDEAD, "NavajoWhite"),
    (0xFFFFE4B5, "Moccasin"),
    (0xFFFFE4C4, "Bisque"),
    (0xFFFFE4E1, "MistyRose"),
    (0xFFFFEBCD, "BlanchedAlmond"),
    (0xFFFFEFD5, "PapayaWhip"),
    (0xFFFFF0F5, "LavenderBlush"),
    (0xFFFFF5EE, "SeaShell"),
    (0xFFFFF8DC, "Cornsilk"),
    (0xFFFFFACD, "LemonChiffon"),
    (0xFFFFFAF0, "FloralWhite"),
    (0xFFFFFAFA, "Snow"),
    (0xFFFFFF00, "Yellow"),
    (0xFFFFFFE0, "LightYellow"),
    (0xFFFFFFF0, "Ivory"),
    (0xFFFFFFFF, "White"),
];

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::argb(a, r, g, b)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::argb(255, *r, *g, *b)),
                [r, g, b, a] => Ok(Self::argb(*a, *r, *g, *b)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    match s.len() {
        6 => Ok(Color::argb(
            255,
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::argb(
            hex_byte(&s[6..8])?,
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}
