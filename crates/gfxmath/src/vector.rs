//! GLSL-flavoured helpers for `glam` vectors.
//!
//! The packed codec matches the shading-language built-ins `packUnorm4x8` and
//! `unpackUnorm4x8`: the first component lands in the least significant byte,
//! the last component in the most significant byte.

use glam::{Vec2, Vec4};

/// Packs a normalized vector into a `u32`, one byte per component.
///
/// Components are clamped to `[0, 1]` before quantization, so any real input
/// is accepted.
pub fn pack_unorm4x8(v: Vec4) -> u32 {
    let scaled = (v.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    let x = scaled.x as u32;
    let y = scaled.y as u32;
    let z = scaled.z as u32;
    let w = scaled.w as u32;
    (w << 24) | (z << 16) | (y << 8) | x
}

/// Unpacks four normalized components from a `u32` produced by [`pack_unorm4x8`].
pub fn unpack_unorm4x8(packed: u32) -> Vec4 {
    let x = packed & 0x0000_00ff;
    let y = (packed & 0x0000_ff00) >> 8;
    let z = (packed & 0x00ff_0000) >> 16;
    let w = (packed & 0xff00_0000) >> 24;
    Vec4::new(x as f32, y as f32, z as f32, w as f32) / 255.0
}

/// Maps byte-range values onto `[0, 1]`.
pub fn normalize_bytes(x: u8, y: u8, z: u8, w: u8) -> Vec4 {
    Vec4::new(x as f32, y as f32, z as f32, w as f32) / 255.0
}

/// GLSL `mod`: `x - y * floor(x / y)`. The result takes the sign of `y`.
pub fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// 2D cross product `a.x * b.y - a.y * b.x`.
pub fn determinant(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Clockwise normal of `v`.
pub fn cw_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Counter-clockwise normal of `v`.
pub fn ccw_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Angle of a Cartesian vector in `[-PI, PI]`.
pub fn polar_angle(cartesian: Vec2) -> f32 {
    cartesian.y.atan2(cartesian.x)
}

/// Converts Cartesian coordinates into `(angle, radius)`.
pub fn to_polar(cartesian: Vec2) -> Vec2 {
    Vec2::new(polar_angle(cartesian), cartesian.length())
}

/// Converts `(angle, radius)` back into Cartesian coordinates.
pub fn to_cartesian(polar: Vec2) -> Vec2 {
    let (sin, cos) = polar.x.sin_cos();
    Vec2::new(polar.y * cos, polar.y * sin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn pack_places_first_component_in_low_byte() {
        let packed = pack_unorm4x8(Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(packed, 0x0000_00ff);
        let packed = pack_unorm4x8(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(packed, 0xff00_0000);
    }

    #[test]
    fn pack_clamps_out_of_range_components() {
        let packed = pack_unorm4x8(Vec4::new(-3.0, 2.0, 0.5, f32::INFINITY));
        assert_eq!(packed & 0xff, 0);
        assert_eq!((packed >> 8) & 0xff, 255);
        assert_eq!((packed >> 16) & 0xff, 128);
        assert_eq!(packed >> 24, 255);
    }

    #[test]
    fn round_trip_matches_byte_quantization() {
        for x in (0..256u32).step_by(5) {
            for y in (0..256u32).step_by(5) {
                for z in (0..256u32).step_by(5) {
                    for w in (0..256u32).step_by(5) {
                        let input = Vec4::new(x as f32, y as f32, z as f32, w as f32);
                        let output = unpack_unorm4x8(pack_unorm4x8(input / 255.0)) * 255.0;
                        assert!(
                            (input - output).abs().max_element() < 1e-4,
                            "{input:?} -> {output:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_snaps_between_steps() {
        let input = Vec4::new(0.1, 0.333, 0.5, 0.999);
        let output = unpack_unorm4x8(pack_unorm4x8(input));
        let expected = (input * 255.0).round() / 255.0;
        assert!((output - expected).abs().max_element() < 1e-6);
    }

    #[test]
    fn normalize_bytes_scales_to_unit_range() {
        assert_eq!(normalize_bytes(0, 255, 0, 255), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn glsl_mod_follows_divisor_sign() {
        assert_eq!(glsl_mod(7.0, 6.0), 1.0);
        assert_eq!(glsl_mod(-1.0, 6.0), 5.0);
        assert_eq!(glsl_mod(6.0, 6.0), 0.0);
    }

    #[test]
    fn normals_are_perpendicular() {
        let v = Vec2::new(3.0, 1.0);
        assert_eq!(cw_normal(v).dot(v), 0.0);
        assert_eq!(ccw_normal(v), -cw_normal(v));
        assert_eq!(determinant(Vec2::X, Vec2::Y), 1.0);
    }

    #[test]
    fn converts_to_polar() {
        let cases = [
            (Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0)),
            (Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)),
            (Vec2::new(0.0, 4.0), Vec2::new(0.5 * PI, 4.0)),
            (Vec2::new(-2.0, 0.0), Vec2::new(PI, 2.0)),
            (Vec2::new(0.0, -1.0), Vec2::new(-0.5 * PI, 1.0)),
        ];
        for (input, expected) in cases {
            assert_eq!(to_polar(input), expected, "polar of {input:?}");
        }
    }

    #[test]
    fn polar_round_trips_to_cartesian() {
        let input = Vec2::new(-1.5, 2.25);
        let back = to_cartesian(to_polar(input));
        assert!((back - input).length() < 1e-5);
    }
}
