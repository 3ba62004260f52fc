/// Image handling for the UI
///
/// This module handles:
/// - Reading the image picked for upload and detecting its format
/// - Downscaling fetched photos into grid thumbnails
/// - Building bounded previews for the detail page and the upload form
///
/// Decoding is CPU-bound, so it always runs on the blocking pool.
use iced::widget::image::Handle;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::path::PathBuf;
use thiserror::Error;

/// Size of grid thumbnails (square bound)
pub const THUMBNAIL_SIZE: u32 = 256;

/// Size of detail and upload previews (square bound)
pub const PREVIEW_SIZE: u32 = 1280;

/// Formats accepted for upload
const UPLOAD_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Extensions offered by the file picker
pub const UPLOAD_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    #[error("Could not read image: {0}")]
    Io(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Could not decode image: {0}")]
    Decode(String),
}

impl From<std::io::Error> for MediaError {
    fn from(e: std::io::Error) -> Self {
        MediaError::Io(e.to_string())
    }
}

impl From<image::ImageError> for MediaError {
    fn from(e: image::ImageError) -> Self {
        MediaError::Decode(e.to_string())
    }
}

/// An image picked for upload, ready to be sent as a multipart part
#[derive(Debug, Clone)]
pub struct SelectedImage {
    /// Filename only (e.g., "beach.jpg")
    pub file_name: String,
    /// MIME type derived from the detected format
    pub mime: &'static str,
    /// Original file contents, sent untouched
    pub bytes: Vec<u8>,
    /// Downscaled preview for the form
    pub preview: Option<Handle>,
}

/// Read a picked file and prepare it for upload
pub async fn load_selected_image(path: PathBuf) -> Result<SelectedImage, MediaError> {
    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    log::info!("📷 Selected {} ({} KB)", file_name, bytes.len() / 1024);

    tokio::task::spawn_blocking(move || prepare_selected_image(file_name, bytes))
        .await
        .map_err(|e| MediaError::Io(format!("Task join error: {}", e)))?
}

/// Blocking half of [`load_selected_image`]
pub fn prepare_selected_image(
    file_name: String,
    bytes: Vec<u8>,
) -> Result<SelectedImage, MediaError> {
    let format = image::guess_format(&bytes)
        .map_err(|_| MediaError::UnsupportedFormat(file_name.clone()))?;

    if !UPLOAD_FORMATS.contains(&format) {
        return Err(MediaError::UnsupportedFormat(format!("{:?}", format)));
    }

    let img = image::load_from_memory_with_format(&bytes, format)?;
    let preview = to_handle(bounded(img, PREVIEW_SIZE / 2));

    Ok(SelectedImage {
        file_name,
        mime: format.to_mime_type(),
        bytes,
        preview: Some(preview),
    })
}

/// Decode fetched photo bytes into a grid thumbnail
pub async fn thumbnail(bytes: Vec<u8>) -> Result<Handle, MediaError> {
    decode_bounded(bytes, THUMBNAIL_SIZE).await
}

/// Decode fetched photo bytes into a detail-page preview
pub async fn preview(bytes: Vec<u8>) -> Result<Handle, MediaError> {
    decode_bounded(bytes, PREVIEW_SIZE).await
}

async fn decode_bounded(bytes: Vec<u8>, size: u32) -> Result<Handle, MediaError> {
    tokio::task::spawn_blocking(move || decode_bounded_blocking(&bytes, size))
        .await
        .map_err(|e| MediaError::Decode(format!("Task join error: {}", e)))?
}

/// Decode and shrink so that neither side exceeds `size`
pub fn decode_bounded_blocking(bytes: &[u8], size: u32) -> Result<Handle, MediaError> {
    let img = image::load_from_memory(bytes)?;
    Ok(to_handle(bounded(img, size)))
}

/// Shrink to fit inside `size`x`size`, keeping aspect ratio. Never upscales.
fn bounded(img: DynamicImage, size: u32) -> DynamicImage {
    if img.width() <= size && img.height() <= size {
        img
    } else {
        img.resize(size, size, FilterType::Lanczos3)
    }
}

fn to_handle(img: DynamicImage) -> Handle {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Handle::from_rgba(width, height, rgba.into_raw())
}
