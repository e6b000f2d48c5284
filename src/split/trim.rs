use crate::foundation::core::PanelRect;
use crate::raster::buffer::RgbaBuffer;

/// Bounding box of the content that deviates from the background color.
///
/// The background is taken from the top-left corner; scanning moves inward
/// from each of the four edges until a line contains a pixel farther than
/// `tolerance` from it. Not used by the uniform-grid path; composable
/// helper for composites with irregular outer borders.
pub fn content_rect(img: &RgbaBuffer, tolerance: f64) -> PanelRect {
    let full = PanelRect {
        x: 0,
        y: 0,
        width: img.width(),
        height: img.height(),
    };
    let bg = img.pixel(0, 0);

    let row_has_content =
        |y: u32| (0..img.width()).any(|x| distance(img.pixel(x, y), bg) > tolerance);
    let col_has_content =
        |x: u32, y0: u32, y1: u32| (y0..y1).any(|y| distance(img.pixel(x, y), bg) > tolerance);

    let Some(top) = (0..img.height()).find(|&y| row_has_content(y)) else {
        // All background: nothing to trim to.
        return full;
    };
    let bottom = match (top..img.height()).rev().find(|&y| row_has_content(y)) {
        Some(y) => y,
        None => top,
    };

    let left = (0..img.width())
        .find(|&x| col_has_content(x, top, bottom + 1))
        .unwrap_or(0);
    let right = (left..img.width())
        .rev()
        .find(|&x| col_has_content(x, top, bottom + 1))
        .unwrap_or(left);

    PanelRect {
        x: left,
        y: top,
        width: right - left + 1,
        height: bottom - top + 1,
    }
}

fn distance(a: [u8; 4], b: [u8; 4]) -> f64 {
    let mut sq = 0.0;
    for c in 0..3 {
        let d = f64::from(a[c]) - f64::from(b[c]);
        sq += d * d;
    }
    sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_content_box_inside_a_border() {
        let mut img = RgbaBuffer::new(20, 10).unwrap();
        img.fill_rect(
            &PanelRect {
                x: 4,
                y: 2,
                width: 10,
                height: 5,
            },
            [250, 250, 250, 255],
        );
        let rect = content_rect(&img, 10.0);
        assert_eq!(rect, PanelRect {
            x: 4,
            y: 2,
            width: 10,
            height: 5,
        });
    }

    #[test]
    fn all_background_returns_the_full_image() {
        let img = RgbaBuffer::new(8, 8).unwrap();
        let rect = content_rect(&img, 5.0);
        assert_eq!((rect.width, rect.height), (8, 8));
    }

    #[test]
    fn single_content_pixel_is_a_unit_box() {
        let mut img = RgbaBuffer::new(9, 9).unwrap();
        img.set_pixel(6, 3, [255, 255, 255, 255]);
        let rect = content_rect(&img, 10.0);
        assert_eq!(rect, PanelRect {
            x: 6,
            y: 3,
            width: 1,
            height: 1,
        });
    }
}
