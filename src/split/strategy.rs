use crate::raster::buffer::RgbaBuffer;
use crate::split::energy;
use crate::split::segments::{self, Segment};

/// Locates panel boundaries in a decoded contact sheet.
///
/// Two implementations of one responsibility. [`FixedGridStrategy`] trusts
/// the generation contract (a uniform, borderless grid) and subdivides
/// geometrically; [`AdaptiveStrategy`] reads the pixels and survives
/// composites that drifted from the contract. Both return exactly
/// `expected` contiguous spans in spatial order.
pub trait BoundaryStrategy {
    fn column_spans(&self, img: &RgbaBuffer, expected: u32) -> Vec<Segment>;
    fn row_spans(&self, img: &RgbaBuffer, expected: u32) -> Vec<Segment>;
}

/// Equal subdivision straight from the planned grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedGridStrategy;

impl BoundaryStrategy for FixedGridStrategy {
    fn column_spans(&self, img: &RgbaBuffer, expected: u32) -> Vec<Segment> {
        segments::uniform_segments(img.width(), expected)
    }

    fn row_spans(&self, img: &RgbaBuffer, expected: u32) -> Vec<Segment> {
        segments::uniform_segments(img.height(), expected)
    }
}

/// Content-adaptive detection on a downscaled working copy, with uniform
/// fallback on shortfall.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdaptiveStrategy;

impl BoundaryStrategy for AdaptiveStrategy {
    fn column_spans(&self, img: &RgbaBuffer, expected: u32) -> Vec<Segment> {
        let proxy = energy::working_copy(img);
        let profile = energy::col_profile(&proxy);
        let spans = segments::detect_segments(&profile, expected);
        rescale_spans(&spans, proxy.width(), img.width())
    }

    fn row_spans(&self, img: &RgbaBuffer, expected: u32) -> Vec<Segment> {
        let proxy = energy::working_copy(img);
        let profile = energy::row_profile(&proxy);
        let spans = segments::detect_segments(&profile, expected);
        rescale_spans(&spans, proxy.height(), img.height())
    }
}

/// Maps proxy-space spans back to full-resolution coordinates.
fn rescale_spans(spans: &[Segment], from_len: u32, to_len: u32) -> Vec<Segment> {
    if from_len == to_len || from_len == 0 {
        return spans.to_vec();
    }
    spans
        .iter()
        .map(|s| Segment {
            start: (u64::from(s.start) * u64::from(to_len) / u64::from(from_len)) as u32,
            end: (u64::from(s.end) * u64::from(to_len) / u64::from(from_len)) as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_grid_subdivides_the_image() {
        let img = RgbaBuffer::new(300, 200).unwrap();
        let cols = FixedGridStrategy.column_spans(&img, 3);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], Segment { start: 0, end: 100 });
        assert_eq!(
            cols[2],
            Segment {
                start: 200,
                end: 300
            }
        );

        let rows = FixedGridStrategy.row_spans(&img, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].end, 200);
    }

    #[test]
    fn adaptive_on_flat_image_matches_uniform() {
        let img = RgbaBuffer::new(120, 80).unwrap();
        let spans = AdaptiveStrategy.row_spans(&img, 2);
        assert_eq!(spans, FixedGridStrategy.row_spans(&img, 2));
    }

    #[test]
    fn rescaling_maps_endpoints_exactly() {
        let spans = vec![Segment { start: 0, end: 128 }, Segment {
            start: 128,
            end: 256,
        }];
        let scaled = rescale_spans(&spans, 256, 1024);
        assert_eq!(scaled[0], Segment { start: 0, end: 512 });
        assert_eq!(
            scaled[1],
            Segment {
                start: 512,
                end: 1024
            }
        );
    }
}
