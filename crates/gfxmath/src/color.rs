//! RGBA colors, string parsing and HSB conversion.
//!
//! Parsing accepts a fixed table of CSS color names (case-insensitive) or a hex
//! code in one of the forms `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`. The `#`
//! prefix is optional. Short forms duplicate each digit, and a missing alpha
//! channel means fully opaque.

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use serde::Serialize;

use crate::vector::{glsl_mod, pack_unorm4x8, unpack_unorm4x8};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("color string is empty")]
    Empty,
    #[error("'{0}' is neither a known color name nor a 3, 4, 6 or 8 digit hex code")]
    Unrecognized(String),
    #[error("'{0}' contains characters that are not hexadecimal digits")]
    InvalidDigit(String),
}

/// Four floating-point channels. Values are not clamped on construction.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Named colors as `(name, [r, g, b, a])` bytes. Names are lowercase.
const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("transparent", [255, 255, 255, 0]),
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("green", [0, 128, 0, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("aqua", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("fuchsia", [255, 0, 255, 255]),
    ("silver", [192, 192, 192, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("maroon", [128, 0, 0, 255]),
    ("olive", [128, 128, 0, 255]),
    ("navy", [0, 0, 128, 255]),
    ("purple", [128, 0, 128, 255]),
    ("teal", [0, 128, 128, 255]),
    ("orange", [255, 165, 0, 255]),
];

impl Color {
    pub const TRANSPARENT: Self = Self::new(1.0, 1.0, 1.0, 0.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const LIME: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Builds a color from the first four values of `values`.
    ///
    /// Returns `None` when fewer than four values are supplied.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match values {
            [r, g, b, a, ..] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// Looks up a color by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, [r, g, b, a])| Self::from_rgba8(*r, *g, *b, *a))
    }

    /// Parses a hex code with or without the leading `#`.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.is_empty() {
            return Err(ColorError::Empty);
        }
        if !matches!(digits.len(), 3 | 4 | 6 | 8) {
            return Err(ColorError::Unrecognized(input.to_string()));
        }
        let mut buffer = [0u8; 8];
        for (slot, byte) in buffer.iter_mut().zip(digits.bytes()) {
            *slot = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => return Err(ColorError::InvalidDigit(input.to_string())),
            };
        }
        let nibbles = &buffer[..digits.len()];

        let mut bytes = [255u8; 4];
        match nibbles.len() {
            3 | 4 => {
                for (slot, nibble) in bytes.iter_mut().zip(nibbles) {
                    *slot = nibble * 17;
                }
            }
            _ => {
                for (slot, pair) in bytes.iter_mut().zip(nibbles.chunks_exact(2)) {
                    *slot = (pair[0] << 4) | pair[1];
                }
            }
        }

        let [r, g, b, a] = bytes;
        Ok(Self::from_rgba8(r, g, b, a))
    }

    /// Channels clamped to `[0, 1]` and quantized to bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// `#RRGGBBAA` representation of [`Color::to_rgba8`].
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }

    pub fn to_packed(self) -> u32 {
        pack_unorm4x8(self.into())
    }

    pub fn from_packed(packed: u32) -> Self {
        unpack_unorm4x8(packed).into()
    }

    /// Linear blend from `self` (at `t = 0`) to `other` (at `t = 1`).
    pub fn mix(self, other: Self, t: f32) -> Self {
        Vec4::from(self).lerp(Vec4::from(other), t).into()
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Empty);
        }
        if let Some(color) = Self::from_name(trimmed) {
            return Ok(color);
        }
        Self::from_hex(trimmed)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({:.4}, {:.4}, {:.4}, {:.4})",
            self.r, self.g, self.b, self.a
        )
    }
}

impl From<Color> for Vec4 {
    fn from(color: Color) -> Self {
        Vec4::new(color.r, color.g, color.b, color.a)
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Parses a color name or hex code. See [`Color::from_str`].
pub fn color_from_string(input: &str) -> Result<Color, ColorError> {
    input.parse()
}

/// Converts hue, saturation and brightness into RGB.
///
/// Hue is periodic with period 1. Saturation and brightness are clamped to
/// `[0, 1]` first.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> (f32, f32, f32) {
    let saturation = saturation.clamp(0.0, 1.0);
    let brightness = brightness.clamp(0.0, 1.0);
    let i = hue * 6.0;
    let t = Vec3::new(
        glsl_mod(i, 6.0),
        glsl_mod(i + 4.0, 6.0),
        glsl_mod(i + 2.0, 6.0),
    );
    let k = (t - Vec3::splat(3.0)).abs();
    let rgb = (k - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
    let result = brightness * Vec3::ONE.lerp(rgb, saturation);
    (result.x, result.y, result.z)
}
