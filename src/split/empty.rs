use crate::raster::buffer::RgbaBuffer;

const SAMPLE_GRID: u32 = 10;
const NEAR_BLACK: u8 = 30;
const MATCH_FRACTION: f64 = 0.90;

/// Classifies a cropped panel as an intentionally blank placeholder.
///
/// Samples a coarse 10×10 grid of positions against the panel's center
/// pixel: a near-black reference with more than 90% of samples inside
/// `threshold` color distance is a placeholder, not a scene. Dark scenes
/// with any visible subject fail the vote.
pub fn is_cell_empty(panel: &RgbaBuffer, threshold: f64) -> bool {
    let reference = panel.pixel(panel.width() / 2, panel.height() / 2);
    if reference[0] >= NEAR_BLACK || reference[1] >= NEAR_BLACK || reference[2] >= NEAR_BLACK {
        return false;
    }

    let mut matches = 0u32;
    for gy in 0..SAMPLE_GRID {
        for gx in 0..SAMPLE_GRID {
            let x = sample_coord(gx, panel.width());
            let y = sample_coord(gy, panel.height());
            if color_distance(panel.pixel(x, y), reference) <= threshold {
                matches += 1;
            }
        }
    }
    f64::from(matches) > MATCH_FRACTION * f64::from(SAMPLE_GRID * SAMPLE_GRID)
}

/// Center of sample cell `i` along an axis of length `len`.
fn sample_coord(i: u32, len: u32) -> u32 {
    let c = ((u64::from(i) * 2 + 1) * u64::from(len) / u64::from(SAMPLE_GRID * 2)) as u32;
    c.min(len.saturating_sub(1))
}

fn color_distance(a: [u8; 4], b: [u8; 4]) -> f64 {
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
    use crate::foundation::core::PanelRect;

    #[test]
    fn all_black_panel_is_empty() {
        let panel = RgbaBuffer::new(80, 45).unwrap();
        assert!(is_cell_empty(&panel, 30.0));
    }

    #[test]
    fn near_black_noise_is_still_empty() {
        let mut panel = RgbaBuffer::new(80, 45).unwrap();
        for y in 0..45 {
            for x in 0..80 {
                let v = ((x + y) % 8) as u8;
                panel.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        assert!(is_cell_empty(&panel, 30.0));
    }

    #[test]
    fn centered_bright_shape_defeats_the_vote() {
        let mut panel = RgbaBuffer::new(100, 100).unwrap();
        panel.fill_rect(
            &PanelRect {
                x: 30,
                y: 30,
                width: 40,
                height: 40,
            },
            [230, 220, 90, 255],
        );
        assert!(!is_cell_empty(&panel, 30.0));
    }

    #[test]
    fn bright_uniform_panel_is_not_empty() {
        let mut panel = RgbaBuffer::new(40, 40).unwrap();
        panel.fill_rect(
            &PanelRect {
                x: 0,
                y: 0,
                width: 40,
                height: 40,
            },
            [180, 180, 180, 255],
        );
        assert!(!is_cell_empty(&panel, 30.0));
    }
}
