use std::fmt;

use serde::Serialize;

/// Image channel counts accepted by the inference functions.
pub const MIN_CHANNELS: u8 = 1;
pub const MAX_CHANNELS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid channel count {0}; only 1-4 color channels are supported")]
    ChannelCountOutOfRange(u8),
    #[error("unsupported storage format 0x{0:04X}")]
    UnsupportedFormat(u32),
    #[error("unsupported image color type {0}")]
    UnsupportedColorType(String),
    #[error("pixel buffer holds {actual} bytes but {expected} are required")]
    PixelBufferSize { expected: usize, actual: usize },
}

/// Which channels a pixel carries, independent of their storage width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelLayout {
    Red,
    RedGreen,
    Rgb,
    Rgba,
}

/// Per-channel storage: 8-bit unsigned normalized or 32-bit float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StorageFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
    R32F,
    Rg32F,
    Rgb32F,
    Rgba32F,
}

impl PixelLayout {
    pub const ALL: [PixelLayout; 4] = [
        PixelLayout::Red,
        PixelLayout::RedGreen,
        PixelLayout::Rgb,
        PixelLayout::Rgba,
    ];

    pub fn channel_count(self) -> u8 {
        channel_count_from_pixel_layout(self)
    }

    /// Storage format for this layout at the requested width.
    pub fn storage_format(self, floating_point: bool) -> StorageFormat {
        match (self, floating_point) {
            (PixelLayout::Red, false) => StorageFormat::R8,
            (PixelLayout::RedGreen, false) => StorageFormat::Rg8,
            (PixelLayout::Rgb, false) => StorageFormat::Rgb8,
            (PixelLayout::Rgba, false) => StorageFormat::Rgba8,
            (PixelLayout::Red, true) => StorageFormat::R32F,
            (PixelLayout::RedGreen, true) => StorageFormat::Rg32F,
            (PixelLayout::Rgb, true) => StorageFormat::Rgb32F,
            (PixelLayout::Rgba, true) => StorageFormat::Rgba32F,
        }
    }

    /// OpenGL client pixel format (`GL_RED`, `GL_RG`, `GL_RGB`, `GL_RGBA`).
    pub fn gl_enum(self) -> u32 {
        match self {
            PixelLayout::Red => 0x1903,
            PixelLayout::RedGreen => 0x8227,
            PixelLayout::Rgb => 0x1907,
            PixelLayout::Rgba => 0x1908,
        }
    }
}

impl StorageFormat {
    pub const ALL: [StorageFormat; 8] = [
        StorageFormat::R8,
        StorageFormat::Rg8,
        StorageFormat::Rgb8,
        StorageFormat::Rgba8,
        StorageFormat::R32F,
        StorageFormat::Rg32F,
        StorageFormat::Rgb32F,
        StorageFormat::Rgba32F,
    ];

    pub fn layout(self) -> PixelLayout {
        pixel_layout_from_storage_format(self)
    }

    pub fn is_floating_point(self) -> bool {
        matches!(
            self,
            StorageFormat::R32F | StorageFormat::Rg32F | StorageFormat::Rgb32F | StorageFormat::Rgba32F
        )
    }

    pub fn bytes_per_channel(self) -> usize {
        if self.is_floating_point() {
            4
        } else {
            1
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.bytes_per_channel() * usize::from(self.layout().channel_count())
    }

    /// OpenGL sized internal format constant.
    pub fn gl_enum(self) -> u32 {
        match self {
            StorageFormat::R8 => 0x8229,
            StorageFormat::Rg8 => 0x822B,
            StorageFormat::Rgb8 => 0x8051,
            StorageFormat::Rgba8 => 0x8058,
            StorageFormat::R32F => 0x822E,
            StorageFormat::Rg32F => 0x8230,
            StorageFormat::Rgb32F => 0x8815,
            StorageFormat::Rgba32F => 0x8814,
        }
    }

    /// OpenGL component type for uploads (`GL_UNSIGNED_BYTE` or `GL_FLOAT`).
    pub fn gl_pixel_type(self) -> u32 {
        if self.is_floating_point() {
            0x1406
        } else {
            0x1401
        }
    }

    /// Maps a sized internal format constant read back from a driver.
    pub fn from_gl_enum(value: u32) -> Result<Self, FormatError> {
        StorageFormat::ALL
            .into_iter()
            .find(|format| format.gl_enum() == value)
            .ok_or(FormatError::UnsupportedFormat(value))
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelLayout::Red => f.write_str("red"),
            PixelLayout::RedGreen => f.write_str("rg"),
            PixelLayout::Rgb => f.write_str("rgb"),
            PixelLayout::Rgba => f.write_str("rgba"),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageFormat::R8 => "r8",
            StorageFormat::Rg8 => "rg8",
            StorageFormat::Rgb8 => "rgb8",
            StorageFormat::Rgba8 => "rgba8",
            StorageFormat::R32F => "r32f",
            StorageFormat::Rg32F => "rg32f",
            StorageFormat::Rgb32F => "rgb32f",
            StorageFormat::Rgba32F => "rgba32f",
        };
        f.write_str(name)
    }
}

pub fn pixel_layout_from_channel_count(channel_count: u8) -> Result<PixelLayout, FormatError> {
    match channel_count {
        1 => Ok(PixelLayout::Red),
        2 => Ok(PixelLayout::RedGreen),
        3 => Ok(PixelLayout::Rgb),
        4 => Ok(PixelLayout::Rgba),
        other => Err(FormatError::ChannelCountOutOfRange(other)),
    }
}

/// Picks the storage format for an image with `channel_count` channels.
///
/// The count must already reflect any expansion (a paletted image with alpha
/// counts as four channels).
pub fn storage_format_from_channel_count(
    channel_count: u8,
    floating_point: bool,
) -> Result<StorageFormat, FormatError> {
    pixel_layout_from_channel_count(channel_count).map(|layout| layout.storage_format(floating_point))
}

pub fn pixel_layout_from_storage_format(format: StorageFormat) -> PixelLayout {
    match format {
        StorageFormat::R8 | StorageFormat::R32F => PixelLayout::Red,
        StorageFormat::Rg8 | StorageFormat::Rg32F => PixelLayout::RedGreen,
        StorageFormat::Rgb8 | StorageFormat::Rgb32F => PixelLayout::Rgb,
        StorageFormat::Rgba8 | StorageFormat::Rgba32F => PixelLayout::Rgba,
    }
}

/// Same as [`pixel_layout_from_storage_format`] for a raw driver constant.
pub fn pixel_layout_from_gl_storage_format(value: u32) -> Result<PixelLayout, FormatError> {
    StorageFormat::from_gl_enum(value).map(pixel_layout_from_storage_format)
}

pub fn channel_count_from_pixel_layout(layout: PixelLayout) -> u8 {
    match layout {
        PixelLayout::Red => 1,
        PixelLayout::RedGreen => 2,
        PixelLayout::Rgb => 3,
        PixelLayout::Rgba => 4,
    }
}
