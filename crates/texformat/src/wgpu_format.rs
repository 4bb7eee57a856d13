//! Mapping onto `wgpu` texture formats and copy layouts.

use crate::format::StorageFormat;
use crate::upload::TextureUpload;

impl StorageFormat {
    /// The matching `wgpu` format. `srgb` selects the sRGB-encoded variant
    /// where one exists (only `Rgba8`).
    ///
    /// `wgpu` has no three-channel formats, so `Rgb8` and `Rgb32F` map to
    /// `None`; run [`TextureUpload::expand_rgb_to_rgba`] first.
    pub fn wgpu_format(self, srgb: bool) -> Option<wgpu::TextureFormat> {
        match self {
            StorageFormat::R8 => Some(wgpu::TextureFormat::R8Unorm),
            StorageFormat::Rg8 => Some(wgpu::TextureFormat::Rg8Unorm),
            StorageFormat::Rgba8 if srgb => Some(wgpu::TextureFormat::Rgba8UnormSrgb),
            StorageFormat::Rgba8 => Some(wgpu::TextureFormat::Rgba8Unorm),
            StorageFormat::R32F => Some(wgpu::TextureFormat::R32Float),
            StorageFormat::Rg32F => Some(wgpu::TextureFormat::Rg32Float),
            StorageFormat::Rgba32F => Some(wgpu::TextureFormat::Rgba32Float),
            StorageFormat::Rgb8 | StorageFormat::Rgb32F => None,
        }
    }
}

impl TextureUpload {
    pub fn wgpu_extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    /// Buffer layout for `Queue::write_texture` with tightly packed rows.
    pub fn wgpu_data_layout(&self) -> wgpu::TexelCopyBufferLayout {
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(self.bytes_per_row() as u32),
            rows_per_image: Some(self.height),
        }
    }
}
