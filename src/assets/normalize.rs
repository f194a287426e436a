//! Conversion of downloaded images into an embeddable encoding.
//!
//! JPEG data is embedded unchanged. Every other decodable raster is flattened
//! onto an opaque white canvas and encoded as PNG, with JPEG as the fallback
//! encoding.
use crate::assets::{AssetError, NormalizedImage};
use crate::pptx::ImageFormat;
use bytes::Bytes;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Normalize raw image bytes of unknown format.
pub fn normalize(data: &[u8]) -> Result<NormalizedImage, AssetError> {
    if ImageFormat::detect_from_bytes(data) == Some(ImageFormat::Jpeg) {
        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .into_dimensions()?;
        debug!(width, height, "embedding JPEG as-is");
        return Ok(NormalizedImage {
            data: Bytes::copy_from_slice(data),
            format: ImageFormat::Jpeg,
            width,
            height,
        });
    }

    let img = image::load_from_memory(data)?;
    let flat = flatten_onto_white(&img);
    let (width, height) = flat.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage);
    }

    let flat = DynamicImage::ImageRgb8(flat);
    match encode(&flat, image::ImageFormat::Png) {
        Ok(data) => Ok(NormalizedImage {
            data,
            format: ImageFormat::Png,
            width,
            height,
        }),
        Err(png_err) => {
            debug!(error = %png_err, "PNG encoding failed, trying JPEG");
            Ok(NormalizedImage {
                data: encode(&flat, image::ImageFormat::Jpeg)?,
                format: ImageFormat::Jpeg,
                width,
                height,
            })
        },
    }
}

/// Composite an image onto an opaque white background.
///
/// Images without an alpha channel are only converted to 8-bit RGB.
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

fn encode(img: &DynamicImage, format: image::ImageFormat) -> Result<Bytes, AssetError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)?;
    Ok(Bytes::from(buffer.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn encoded(img: DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_over_white() {
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(0, 255), 0);
        assert_eq!(over_white(100, 255), 100);
        assert_eq!(over_white(0, 128), 127);
    }

    #[test]
    fn test_transparent_png_is_flattened() {
        let mut rgba = RgbaImage::new(3, 2);
        rgba.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let png = encoded(DynamicImage::ImageRgba8(rgba), image::ImageFormat::Png);

        let normalized = normalize(&png).unwrap();
        assert_eq!(normalized.format, ImageFormat::Png);
        assert_eq!((normalized.width, normalized.height), (3, 2));

        let decoded = image::load_from_memory(&normalized.data).unwrap();
        assert!(!decoded.color().has_alpha());
        let rgb = decoded.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_other_formats_become_png() {
        let bmp = encoded(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]))),
            image::ImageFormat::Bmp,
        );
        let normalized = normalize(&bmp).unwrap();
        assert_eq!(normalized.format, ImageFormat::Png);
        assert_eq!(normalized.width, 4);
    }

    #[test]
    fn test_jpeg_passes_through() {
        let jpeg = encoded(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 5, Rgb([200, 100, 50]))),
            image::ImageFormat::Jpeg,
        );
        let normalized = normalize(&jpeg).unwrap();
        assert_eq!(normalized.format, ImageFormat::Jpeg);
        assert_eq!(&normalized.data[..], &jpeg[..]);
        assert_eq!((normalized.width, normalized.height), (8, 5));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(normalize(b"<html>not found</html>").is_err());
        assert!(normalize(&[]).is_err());
    }
}
