//! Texture format inference for image uploads.
//!
//! ```text
//!   decoded image ──▶ prepare_upload() ──▶ TextureUpload ──▶ TextureUploader
//!                          │                  (layout, format, bytes)
//!                          └─▶ channel count ─▶ PixelLayout ─▶ StorageFormat
//! ```
//!
//! `format` holds the closed `PixelLayout`/`StorageFormat` enums and the
//! mappings between them and channel counts. Raw driver constants only appear
//! at the edges (`gl_enum`, `from_gl_enum`). `upload` turns an `image`
//! decoding result into bytes in the inferred layout. With the `wgpu`
//! feature, formats also map onto `wgpu::TextureFormat`.

mod format;
mod upload;
#[cfg(feature = "wgpu")]
mod wgpu_format;

pub use format::{
    channel_count_from_pixel_layout, pixel_layout_from_channel_count,
    pixel_layout_from_gl_storage_format, pixel_layout_from_storage_format,
    storage_format_from_channel_count, FormatError, PixelLayout, StorageFormat, MAX_CHANNELS,
    MIN_CHANNELS,
};
pub use upload::{prepare_upload, upload_image, TextureUpload, TextureUploader, UploadOptions};
