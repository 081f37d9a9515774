//! Screenshot blurring.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use tracing::{trace, warn};

/// Returns the blur radius for an image of the given size.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn blur_radius(width: u32, height: u32, level: f32) -> u32 {
    let radius = (width.max(height) as f32 * level / 50.0).floor();
    if radius.is_finite() && radius > 0.0 {
        radius as u32
    } else {
        0
    }
}

#[allow(clippy::cast_precision_loss)]
fn blur_to_jpeg(data: &[u8], level: f32) -> Result<Vec<u8>, image::ImageError> {
    let rgb = image::load_from_memory(data)?.to_rgb8();
    let radius = blur_radius(rgb.width(), rgb.height(), level);

    let processed = if radius > 0 {
        trace!(radius, "Blurring screenshot");
        image::imageops::blur(&rgb, radius as f32)
    } else {
        rgb
    };

    let mut encoded = Vec::new();
    DynamicImage::ImageRgb8(processed).write_to(&mut Cursor::new(&mut encoded), ImageFormat::Jpeg)?;
    Ok(encoded)
}

/// Blurs an image and re-encodes it as JPEG.
///
/// Decoding and encoding run on the blocking pool. Undecodable input is
/// returned unchanged.
pub async fn apply_mosaic(data: Bytes, level: f32) -> Bytes {
    let input = data.clone();
    match tokio::task::spawn_blocking(move || blur_to_jpeg(&input, level)).await {
        Ok(Ok(encoded)) => Bytes::from(encoded),
        Ok(Err(e)) => {
            warn!(error = %e, "Failed to blur screenshot");
            data
        }
        Err(e) => {
            warn!(error = %e, "Blur task panicked");
            data
        }
    }
}
