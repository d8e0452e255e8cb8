//! # Image Codec
//!
//! Decode and encode at the edges of the pipeline. Everything in between works
//! on [`RgbaFrame`]; this module is the only place that touches the `image`
//! crate's buffer types.
//!
//! Inputs of any supported type are decoded straight to RGBA8, so non-PNG
//! sources never need an intermediate converted file. Tiles and previews are
//! always written as PNG to keep the padding alpha.

use std::path::Path;

use grid_scale::cpu::RgbaFrame;
use grid_scale::presets::Size;
use image::{ImageFormat, RgbaImage};

use crate::error::{SplitError, SplitResult};

/// Input file extensions accepted, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Extension of every file this crate writes.
pub const OUTPUT_EXTENSION: &str = "png";

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_supported(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// File stem used to name the output folder and tiles.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn ensure_supported(path: &Path) -> SplitResult<()> {
    if is_supported(path) {
        return Ok(());
    }
    let found = extension(path).unwrap_or_else(|| "<none>".to_string());
    Err(SplitError::unsupported_format(found)
        .with_path(path)
        .with_recovery_suggestion(format!(
            "Convert the image to one of: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        )))
}

/// Read width and height from the file header without decoding pixels.
pub fn read_dimensions(path: &Path) -> SplitResult<Size> {
    ensure_supported(path)?;
    let (w, h) = image::image_dimensions(path).map_err(|e| {
        SplitError::from(e)
            .with_operation("read_dimensions")
            .with_path(path)
    })?;
    Ok(Size::new(w, h))
}

/// Decode `path` into an RGBA8 frame.
pub fn load_rgba(path: &Path) -> SplitResult<RgbaFrame> {
    ensure_supported(path)?;
    let decoded = image::open(path).map_err(|e| {
        SplitError::from(e)
            .with_operation("decode")
            .with_path(path)
    })?;
    let rgba = decoded.to_rgba8();
    let size = Size::new(rgba.width(), rgba.height());
    log::debug!("decoded {} as {}", path.display(), size);
    Ok(RgbaFrame::from_raw(size, rgba.into_raw())?)
}

/// Encode `frame` as PNG at `path`.
pub fn save_png(frame: &RgbaFrame, path: &Path) -> SplitResult<()> {
    let size = frame.size();
    let img = RgbaImage::from_raw(size.w, size.h, frame.as_bytes().to_vec())
        .ok_or_else(|| SplitError::degenerate_size("encode", size.w, size.h))?;
    img.save_with_format(path, ImageFormat::Png).map_err(|e| {
        SplitError::from(e)
            .with_operation("encode")
            .with_path(path)
    })
}
