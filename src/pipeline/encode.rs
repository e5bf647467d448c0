//! Image encoding: page bitmaps and raw uploads → base64 `ImageData`.
//!
//! The recognition API accepts images as base64 data embedded in the JSON
//! request body. Rendered pages are PNG-encoded — lossless compression
//! keeps Devanagari diacritics crisp, and JPEG artefacts on rendered text
//! measurably hurt recognition. Raw JPEG/PNG uploads are passed through
//! as-is after a signature sniff; re-encoding a photograph would only
//! inflate it.

use crate::error::HinglishError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as a base64 PNG ready for the recognition API.
pub fn encode_page(img: &DynamicImage) -> Result<ImageData, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded page image → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}

/// Wrap raw JPEG/PNG bytes as `ImageData`, validating the signature.
///
/// Anything that is not a JPEG or PNG is rejected with
/// [`HinglishError::UnsupportedInput`].
pub fn encode_image_bytes(bytes: &[u8]) -> Result<ImageData, HinglishError> {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(other) => {
            return Err(HinglishError::UnsupportedInput {
                detail: format!("unsupported image format {:?}", other),
            })
        }
        Err(e) => {
            return Err(HinglishError::UnsupportedInput {
                detail: format!("not a recognisable image: {}", e),
            })
        }
    };

    let b64 = STANDARD.encode(bytes);
    debug!("Wrapped {} upload → {} bytes base64", mime, b64.len());

    Ok(ImageData::new(b64, mime).with_detail("high"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_page() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let data = encode_page(&img).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/png");
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        assert!(!decoded.is_empty());
    }

    #[test]
    fn png_bytes_pass_through() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let data = encode_image_bytes(&buf).expect("png should be accepted");
        assert_eq!(data.mime_type, "image/png");
        assert_eq!(STANDARD.decode(&data.data).unwrap(), buf);
    }

    #[test]
    fn garbage_bytes_rejected() {
        let err = encode_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, HinglishError::UnsupportedInput { .. }));
    }
}
