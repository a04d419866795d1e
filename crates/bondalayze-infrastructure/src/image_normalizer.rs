//! Screenshot downsampling and re-encoding.
//!
//! Chat text stays legible as a lossy JPEG at width 1400 and quality 0.82,
//! and the payload is a fraction of the original PNG. Never upscales.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bondalayze_core::error::{BondaError, Result};
use bondalayze_core::image::EncodedImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

pub const DEFAULT_MAX_WIDTH: u32 = 1400;
pub const DEFAULT_QUALITY: f32 = 0.82;

/// Decodes `bytes`, scales to at most `max_width` pixels wide and re-encodes
/// as a JPEG data URL at `quality` (0.0-1.0).
pub fn normalize(bytes: &[u8], max_width: u32, quality: f32) -> Result<EncodedImage> {
    let source =
        image::load_from_memory(bytes).map_err(|err| BondaError::ImageDecode(err.to_string()))?;

    let (width, height) = source.dimensions();
    let (target_width, target_height) = scaled_dimensions(width, height, max_width);

    let scaled = if (target_width, target_height) == (width, height) {
        source
    } else {
        source.resize_exact(target_width, target_height, FilterType::Triangle)
    };

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality(quality));
    scaled
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|err| BondaError::internal(format!("JPEG encoding failed: {err}")))?;

    tracing::debug!(
        "[ImageNormalizer] {}x{} -> {}x{}, {} bytes",
        width,
        height,
        target_width,
        target_height,
        jpeg.len()
    );

    Ok(EncodedImage::new(format!(
        "data:image/jpeg;base64,{}",
        BASE64_STANDARD.encode(&jpeg)
    )))
}

/// `min(1, max_width / width)` applied to both sides, rounded.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width == 0 || width <= max_width {
        return (width, height);
    }
    let scale = f64::from(max_width) / f64::from(width);
    let target_width = (f64::from(width) * scale).round().max(1.0) as u32;
    let target_height = (f64::from(height) * scale).round().max(1.0) as u32;
    (target_width, target_height)
}

fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return (DEFAULT_QUALITY * 100.0).round() as u8;
    }
    (quality.clamp(0.01, 1.0) * 100.0).round() as u8
}
