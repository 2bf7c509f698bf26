//! Image encoding: decoded `DynamicImage` → file bytes.
//!
//! pdfium hands back embedded images already decoded to bitmaps, so every
//! saved image is a fresh PNG or JPEG rather than the original stream.

use crate::config::ImageFormat;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode `img` in `format`.
///
/// JPEG has no alpha channel; images are flattened to RGB first.
pub fn encode_image(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => img.write_to(&mut Cursor::new(&mut buf), format.as_image_format())?,
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut Cursor::new(&mut buf), format.as_image_format())?,
    }

    debug!(
        "Encoded {}x{} image → {} bytes {}",
        img.width(),
        img.height(),
        buf.len(),
        format.extension()
    );
    Ok(buf)
}

/// File name for image `index` (1-based) on page `page_num` (1-based).
pub fn image_file_name(page_num: usize, index: usize, format: ImageFormat) -> String {
    format!("page{}_img{}.{}", page_num, index, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn red_square() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn encode_png_has_signature() {
        let bytes = encode_image(&red_square(), ImageFormat::Png).expect("encode should succeed");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn encode_jpeg_drops_alpha() {
        let bytes = encode_image(&red_square(), ImageFormat::Jpeg).expect("encode should succeed");
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn file_names_follow_page_and_index() {
        assert_eq!(image_file_name(1, 1, ImageFormat::Png), "page1_img1.png");
        assert_eq!(image_file_name(12, 3, ImageFormat::Jpeg), "page12_img3.jpg");
    }
}
