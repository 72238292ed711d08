//! Image preparation and embedding
//!
//! Images are decoded with the `image` crate, downscaled, flattened onto a
//! white background and re-encoded as JPEG so they can be embedded as
//! `DCTDecode` Image XObjects without any further processing.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use lopdf::{dictionary, Document, ObjectId, Stream};

use crate::error::Result;

/// JPEG quality used unless a caller asks otherwise
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// A decoded, scaled image ready to embed
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub width_px: u32,
    pub height_px: u32,
    /// Baseline JPEG bytes, RGB
    pub jpeg: Vec<u8>,
}

/// Load an image and shrink it to fit `max_w` × `max_h` pixels
///
/// Images already inside the bound keep their size. Transparency is
/// composited onto white since the PDF pages are white.
pub fn scale_down(path: &Path, max_w: u32, max_h: u32, quality: u8) -> Result<PreparedImage> {
    let img = image::open(path)?;
    let (w, h) = img.dimensions();

    let img = if w > max_w || h > max_h {
        log::debug!("Scaling {} from {}x{} to fit {}x{}", path.display(), w, h, max_w, max_h);
        img.resize(max_w, max_h, FilterType::Lanczos3)
    } else {
        img
    };

    encode(&img, quality)
}

/// Re-encode a decoded image as RGB JPEG
pub fn encode(img: &DynamicImage, quality: u8) -> Result<PreparedImage> {
    let rgb = flatten_on_white(img);
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode_image(&rgb)?;

    Ok(PreparedImage {
        width_px: rgb.width(),
        height_px: rgb.height(),
        jpeg,
    })
}

fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        let alpha = u16::from(p[3]);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    })
}

/// Add the image to the document as an Image XObject
pub fn embed(doc: &mut Document, image: &PreparedImage) -> ObjectId {
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width_px as i64,
            "Height" => image.height_px as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        image.jpeg.clone(),
    )
    // Already JPEG compressed
    .with_compression(false);

    doc.add_object(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_scale_down_preserves_aspect() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(1200, 600, Rgb([10, 120, 200])).save(&path).unwrap();

        let prepared = scale_down(&path, 300, 400, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(prepared.width_px, 300);
        assert_eq!(prepared.height_px, 150);
        // JPEG SOI marker
        assert_eq!(&prepared.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small.jpg");
        RgbImage::from_pixel(40, 30, Rgb([0, 0, 0])).save(&path).unwrap();

        let prepared = scale_down(&path, 300, 400, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!((prepared.width_px, prepared.height_px), (40, 30));
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let rgb = flatten_on_white(&img);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_unreadable_image_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(scale_down(&path, 300, 400, DEFAULT_JPEG_QUALITY).is_err());
    }

    #[test]
    fn test_embed_adds_dct_xobject() {
        let prepared = encode(&DynamicImage::ImageRgb8(RgbImage::new(8, 4)), 90).unwrap();
        let mut doc = Document::with_version("1.5");
        let id = embed(&mut doc, &prepared);
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"DCTDecode");
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 8);
    }
}
