use std::io::Cursor;

use crate::foundation::error::{StorygridError, StorygridResult};
use crate::raster::buffer::RgbaBuffer;

/// Decodes composite image bytes (PNG, JPEG, WebP, ...) into a straight
/// RGBA8 buffer. Decode failure is a [`StorygridError::Load`], surfaced to
/// the caller without retry.
pub fn decode_rgba8(bytes: &[u8]) -> StorygridResult<RgbaBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StorygridError::load(format!("decode composite image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbaBuffer::from_raw(width, height, rgba.into_raw())
}

/// Encodes a buffer as PNG bytes.
pub fn encode_png(buf: &RgbaBuffer) -> StorygridResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(buf.width(), buf.height(), buf.data().to_vec())
        .ok_or_else(|| StorygridError::validation("rgba buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| StorygridError::load(format!("encode png: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let mut buf = RgbaBuffer::new(2, 1).unwrap();
        buf.set_pixel(0, 0, [100, 50, 200, 255]);
        buf.set_pixel(1, 0, [1, 2, 3, 255]);

        let bytes = encode_png(&buf).unwrap();
        let decoded = decode_rgba8(&bytes).unwrap();
        assert_eq!(decoded, buf);
    }

    #[test]
    fn garbage_bytes_are_a_load_error() {
        let err = decode_rgba8(b"definitely not an image").unwrap_err();
        assert!(matches!(err, StorygridError::Load(_)));
    }
}
