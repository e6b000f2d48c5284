//! One-dimensional energy profiles over rows and columns.
//!
//! Energy is the sum of absolute successive-pixel color differences along
//! an axis line: content scores high, solid separator lines score near
//! zero. Profiles are computed on a downscaled working copy with a coarse
//! sampling stride; they feed segment detection and are discarded.

use crate::raster::buffer::RgbaBuffer;

/// Working-copy width for profile computation.
pub(crate) const PROXY_WIDTH: u32 = 512;

/// Every SAMPLE_STRIDE-th pixel along a line is sampled.
const SAMPLE_STRIDE: u32 = 2;

/// Lines where more than this fraction of samples match the injected
/// separator green are forced to zero energy.
const GREEN_LINE_FRACTION: f64 = 0.30;

/// The explicit separator signature some providers inject between panels.
/// Forcing these lines to zero keeps them recognizable as boundaries even
/// inside high-contrast content.
pub(crate) fn is_separator_green(px: [u8; 4]) -> bool {
    px[1] > 200 && px[0] < 100 && px[2] < 100
}

/// Downscaled copy used for profiling; returns a clone when already small.
pub(crate) fn working_copy(img: &RgbaBuffer) -> RgbaBuffer {
    img.downscale_to_width(PROXY_WIDTH)
}

/// Per-row energy: variation along each horizontal line.
pub(crate) fn row_profile(img: &RgbaBuffer) -> Vec<u64> {
    let mut profile = vec![0u64; img.height() as usize];
    let mut suppressed = 0u32;

    for y in 0..img.height() {
        let mut energy = 0u64;
        let mut samples = 0u32;
        let mut green = 0u32;
        let mut prev: Option<[u8; 4]> = None;

        let mut x = 0;
        while x < img.width() {
            let px = img.pixel(x, y);
            samples += 1;
            if is_separator_green(px) {
                green += 1;
            }
            if let Some(p) = prev {
                energy += pixel_delta(p, px);
            }
            prev = Some(px);
            x += SAMPLE_STRIDE;
        }

        if samples > 0 && f64::from(green) > GREEN_LINE_FRACTION * f64::from(samples) {
            suppressed += 1;
        } else {
            profile[y as usize] = energy;
        }
    }

    if suppressed > 0 {
        tracing::debug!(suppressed, "separator-colored rows forced to zero energy");
    }
    profile
}

/// Per-column energy: variation along each vertical line.
pub(crate) fn col_profile(img: &RgbaBuffer) -> Vec<u64> {
    let mut profile = vec![0u64; img.width() as usize];
    let mut suppressed = 0u32;

    for x in 0..img.width() {
        let mut energy = 0u64;
        let mut samples = 0u32;
        let mut green = 0u32;
        let mut prev: Option<[u8; 4]> = None;

        let mut y = 0;
        while y < img.height() {
            let px = img.pixel(x, y);
            samples += 1;
            if is_separator_green(px) {
                green += 1;
            }
            if let Some(p) = prev {
                energy += pixel_delta(p, px);
            }
            prev = Some(px);
            y += SAMPLE_STRIDE;
        }

        if samples > 0 && f64::from(green) > GREEN_LINE_FRACTION * f64::from(samples) {
            suppressed += 1;
        } else {
            profile[x as usize] = energy;
        }
    }

    if suppressed > 0 {
        tracing::debug!(suppressed, "separator-colored columns forced to zero energy");
    }
    profile
}

fn pixel_delta(a: [u8; 4], b: [u8; 4]) -> u64 {
    let mut d = 0u64;
    for c in 0..3 {
        d += u64::from(a[c].abs_diff(b[c]));
    }
    d
}
