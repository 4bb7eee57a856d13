use std::borrow::Cow;

use image::{ColorType, DynamicImage};
use serde::Serialize;

use crate::format::{pixel_layout_from_channel_count, FormatError, PixelLayout, StorageFormat};

/// How decoded images are turned into upload payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Store channels as 32-bit floats instead of 8-bit unsigned normalized.
    pub prefer_float: bool,
    /// Reverse row order so the first row in memory is the bottom image row.
    pub flip_vertical: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            prefer_float: false,
            flip_vertical: true,
        }
    }
}

/// Pixel data plus the descriptors a driver needs to store it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureUpload {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub format: StorageFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Receives prepared texture data, typically by handing it to a graphics API.
pub trait TextureUploader {
    type Error: From<FormatError>;

    fn upload(&mut self, upload: &TextureUpload) -> Result<(), Self::Error>;
}

impl TextureUpload {
    /// Wraps `bytes`, checking that they cover exactly `width * height` pixels.
    pub fn new(
        width: u32,
        height: u32,
        format: StorageFormat,
        bytes: Vec<u8>,
    ) -> Result<Self, FormatError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if bytes.len() != expected {
            return Err(FormatError::PixelBufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout: format.layout(),
            format,
            bytes,
        })
    }

    pub fn channel_count(&self) -> u8 {
        self.layout.channel_count()
    }

    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Normalized texel at `(x, y)` as a sampler would return it: missing
    /// color channels read as zero and a missing alpha reads as one.
    pub fn texel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.format.bytes_per_pixel();
        let offset = y as usize * self.bytes_per_row() + x as usize * stride;
        let raw = self.bytes.get(offset..offset + stride)?;

        let channels: Vec<f32> = if self.format.is_floating_point() {
            raw.chunks_exact(4)
                .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect()
        } else {
            raw.iter().map(|byte| *byte as f32 / 255.0).collect()
        };

        // The format decides how many channels were read, even if `layout`
        // was set to something else.
        Some(match self.format.layout() {
            PixelLayout::Red => [channels[0], 0.0, 0.0, 1.0],
            PixelLayout::RedGreen => [channels[0], channels[1], 0.0, 1.0],
            PixelLayout::Rgb => [channels[0], channels[1], channels[2], 1.0],
            PixelLayout::Rgba => [channels[0], channels[1], channels[2], channels[3]],
        })
    }

    /// Adds an opaque alpha channel to three-channel data, for back-ends
    /// without three-channel texture formats. Other layouts pass through.
    pub fn expand_rgb_to_rgba(self) -> Self {
        if self.layout != PixelLayout::Rgb {
            return self;
        }

        let floating_point = self.format.is_floating_point();
        let channel_bytes = self.format.bytes_per_channel();
        let opaque: Vec<u8> = if floating_point {
            1.0f32.to_ne_bytes().to_vec()
        } else {
            vec![u8::MAX]
        };

        let pixels = self.width as usize * self.height as usize;
        let mut bytes = Vec::with_capacity(pixels * 4 * channel_bytes);
        for pixel in self.bytes.chunks_exact(3 * channel_bytes) {
            bytes.extend_from_slice(pixel);
            bytes.extend_from_slice(&opaque);
        }

        tracing::debug!(
            width = self.width,
            height = self.height,
            floating_point,
            "expanded rgb texture data to rgba"
        );

        Self {
            width: self.width,
            height: self.height,
            layout: PixelLayout::Rgba,
            format: PixelLayout::Rgba.storage_format(floating_point),
            bytes,
        }
    }
}

/// Converts a decoded image into an upload payload.
///
/// The channel count is taken from the decoded color type, so paletted and
/// grayscale sources arrive already expanded: luma is one channel, luma with
/// alpha two, and so on. Sixteen-bit sources are narrowed to 8 bits unless
/// floats are requested.
pub fn prepare_upload(
    image: &DynamicImage,
    options: &UploadOptions,
) -> Result<TextureUpload, FormatError> {
    let color = image.color();
    let channel_count = supported_channel_count(color)?;
    let layout = pixel_layout_from_channel_count(channel_count)?;
    let format = layout.storage_format(options.prefer_float);

    let source: Cow<'_, DynamicImage> = if options.flip_vertical {
        Cow::Owned(image.flipv())
    } else {
        Cow::Borrowed(image)
    };

    let bytes = if options.prefer_float {
        float_bytes(&source, layout)
    } else {
        unorm_bytes(&source, layout)
    };

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        color = ?color,
        %layout,
        %format,
        flipped = options.flip_vertical,
        "prepared texture upload"
    );

    TextureUpload::new(image.width(), image.height(), format, bytes)
}

/// Prepares `image` and hands the result to `uploader`.
pub fn upload_image<U: TextureUploader>(
    uploader: &mut U,
    image: &DynamicImage,
    options: &UploadOptions,
) -> Result<TextureUpload, U::Error> {
    let upload = prepare_upload(image, options)?;
    uploader.upload(&upload)?;
    Ok(upload)
}

fn supported_channel_count(color: ColorType) -> Result<u8, FormatError> {
    match color {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => Ok(color.channel_count()),
        other => Err(FormatError::UnsupportedColorType(format!("{other:?}"))),
    }
}

fn unorm_bytes(image: &DynamicImage, layout: PixelLayout) -> Vec<u8> {
    match layout {
        PixelLayout::Red => image.to_luma8().into_raw(),
        PixelLayout::RedGreen => image.to_luma_alpha8().into_raw(),
        PixelLayout::Rgb => image.to_rgb8().into_raw(),
        PixelLayout::Rgba => image.to_rgba8().into_raw(),
    }
}

fn float_bytes(image: &DynamicImage, layout: PixelLayout) -> Vec<u8> {
    // Gray sources widen to equal rgb channels, so the first channel is the luma.
    let floats: Vec<f32> = match layout {
        PixelLayout::Red => image
            .to_rgb32f()
            .into_raw()
            .chunks_exact(3)
            .map(|pixel| pixel[0])
            .collect(),
        PixelLayout::RedGreen => image
            .to_rgba32f()
            .into_raw()
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[3]])
            .collect(),
        PixelLayout::Rgb => image.to_rgb32f().into_raw(),
        PixelLayout::Rgba => image.to_rgba32f().into_raw(),
    };
    bytemuck::cast_slice(&floats).to_vec()
}
