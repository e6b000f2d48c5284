use crate::foundation::core::PanelRect;
use crate::foundation::error::{StorygridError, StorygridResult};

/// Straight-alpha RGBA8 pixel surface, row-major, tightly packed.
///
/// All engine pixel work (energy profiles, cropping, emptiness sampling)
/// happens on this buffer; codecs live in [`decode`](crate::raster::decode).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Zero-filled (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> StorygridResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wraps raw RGBA8 bytes, checking `data.len() == width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> StorygridResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(StorygridError::validation(format!(
                "rgba buffer expects {len} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at (x, y). Callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Fills `rect` (clipped to the buffer) with a solid color.
    pub fn fill_rect(&mut self, rect: &PanelRect, px: [u8; 4]) {
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        for y in rect.y.min(y1)..y1 {
            for x in rect.x.min(x1)..x1 {
                self.set_pixel(x, y, px);
            }
        }
    }

    /// Copies `rect` out into a new owned buffer.
    pub fn crop(&self, rect: &PanelRect) -> StorygridResult<Self> {
        if rect.width == 0 || rect.height == 0 {
            return Err(StorygridError::validation("crop rect must be non-empty"));
        }
        if rect.right() > self.width || rect.bottom() > self.height {
            return Err(StorygridError::validation(format!(
                "crop rect {}x{}+{}+{} exceeds {}x{} buffer",
                rect.width, rect.height, rect.x, rect.y, self.width, self.height
            )));
        }

        let row_bytes = rect.width as usize * 4;
        let mut data = Vec::with_capacity(row_bytes * rect.height as usize);
        for y in rect.y..rect.bottom() {
            let start = self.index(rect.x, y);
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Self::from_raw(rect.width, rect.height, data)
    }

    /// Nearest-neighbor downscale to `target_width`, preserving aspect.
    ///
    /// Returns a clone when the buffer is already at or below the target.
    pub fn downscale_to_width(&self, target_width: u32) -> Self {
        if target_width == 0 || self.width <= target_width {
            return self.clone();
        }
        let target_height =
            ((u64::from(self.height) * u64::from(target_width)) / u64::from(self.width)).max(1);
        let target_height = target_height as u32;

        let mut data = Vec::with_capacity(target_width as usize * target_height as usize * 4);
        for y in 0..target_height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(target_height)) as u32;
            for x in 0..target_width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(target_width)) as u32;
                data.extend_from_slice(&self.pixel(sx, sy));
            }
        }
        Self {
            width: target_width,
            height: target_height,
            data,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

fn byte_len(width: u32, height: u32) -> StorygridResult<usize> {
    if width == 0 || height == 0 {
        return Err(StorygridError::validation(
            "rgba buffer dimensions must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| StorygridError::validation("rgba buffer size overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(RgbaBuffer::from_raw(2, 2, vec![0u8; 15]).is_err());
        assert!(RgbaBuffer::from_raw(2, 2, vec![0u8; 16]).is_ok());
        assert!(RgbaBuffer::from_raw(0, 2, vec![]).is_err());
    }

    #[test]
    fn crop_copies_the_right_pixels() {
        let mut img = RgbaBuffer::new(4, 4).unwrap();
        img.set_pixel(2, 1, [9, 8, 7, 255]);

        let cropped = img
            .crop(&PanelRect {
                x: 2,
                y: 1,
                width: 2,
                height: 2,
            })
            .unwrap();
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.pixel(0, 0), [9, 8, 7, 255]);
        assert_eq!(cropped.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn crop_out_of_bounds_is_an_error() {
        let img = RgbaBuffer::new(4, 4).unwrap();
        let rect = PanelRect {
            x: 3,
            y: 0,
            width: 2,
            height: 1,
        };
        assert!(img.crop(&rect).is_err());
    }

    #[test]
    fn downscale_halves_dimensions() {
        let img = RgbaBuffer::new(8, 4).unwrap();
        let small = img.downscale_to_width(4);
        assert_eq!((small.width(), small.height()), (4, 2));

        let same = img.downscale_to_width(16);
        assert_eq!((same.width(), same.height()), (8, 4));
    }

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut img = RgbaBuffer::new(3, 3).unwrap();
        img.fill_rect(
            &PanelRect {
                x: 2,
                y: 2,
                width: 5,
                height: 5,
            },
            [1, 2, 3, 255],
        );
        assert_eq!(img.pixel(2, 2), [1, 2, 3, 255]);
        assert_eq!(img.pixel(1, 1), [0, 0, 0, 0]);
    }
}
