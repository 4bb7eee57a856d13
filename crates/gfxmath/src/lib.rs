//! Numeric helpers used when feeding values to a graphics API.
//!
//! The crate groups three independent pieces:
//!
//! - `vector`: the `packUnorm4x8`/`unpackUnorm4x8` codec plus GLSL-style
//!   helpers (`mod`, normals, polar coordinates).
//! - `color`: [`Color`], name/hex parsing and HSB to RGB conversion.
//! - `transform` and `geometry`: 2D transforms in 4×4 matrices, a pixel
//!   [`Viewport`], and box/circle overlap tests.
//!
//! Everything operates on `Copy` values and holds no state, so every function
//! may be called from any thread.

pub mod color;
pub mod geometry;
pub mod transform;
pub mod vector;

pub use color::{color_from_string, hsb_to_rgb, Color, ColorError};
pub use geometry::{boxes_intersect, circles_overlap, resolve_overlap, Box2, Circle};
pub use transform::{
    combine, combine_all, rotation, scale, transform_direction, transform_point, translate,
    uniform_scale, Viewport,
};
pub use vector::{pack_unorm4x8, unpack_unorm4x8};

pub use glam;
