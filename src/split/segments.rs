//! Segment detection over a one-dimensional energy profile.

use std::cmp::Ordering;

/// Contiguous high-signal span along one axis (`end` exclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
}

impl Segment {
    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// Adaptive threshold: generous enough to keep low-key content, strict
/// enough that separator lines (near-zero energy) stay below it.
const THRESHOLD_OF_MAX: f64 = 0.02;
const THRESHOLD_OF_MEAN: f64 = 0.30;

/// Sub-threshold runs shorter than this fraction of the axis are bridged
/// rather than treated as boundaries (anti-aliasing produces single dim
/// lines inside content).
const MIN_GAP_FRACTION: f64 = 0.005;

/// Spans shorter than this fraction of the axis are noise, not panels.
const MIN_SEGMENT_FRACTION: f64 = 0.03;

/// Detects exactly `expected` spans in the profile.
///
/// Finds threshold-crossing runs; on surplus keeps the `expected` largest
/// re-sorted to spatial order, on shortfall falls back to uniform
/// subdivision. Shortfall is not an error: a geometric approximation beats
/// aborting the batch.
pub(crate) fn detect_segments(profile: &[u64], expected: u32) -> Vec<Segment> {
    let axis_len = profile.len() as u32;
    if axis_len == 0 || expected == 0 {
        return Vec::new();
    }

    let max = profile.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return uniform_segments(axis_len, expected);
    }
    let mean = profile.iter().copied().sum::<u64>() as f64 / f64::from(axis_len);
    let threshold = (THRESHOLD_OF_MAX * max as f64).min(THRESHOLD_OF_MEAN * mean);

    let min_gap = ((f64::from(axis_len) * MIN_GAP_FRACTION).ceil() as u32).max(1);
    let min_len = ((f64::from(axis_len) * MIN_SEGMENT_FRACTION).ceil() as u32).max(1);

    let mut found = Vec::new();
    let mut start: Option<u32> = None;
    let mut gap = 0u32;
    for i in 0..axis_len {
        let high = profile[i as usize] as f64 > threshold;
        match (start, high) {
            (None, true) => {
                start = Some(i);
                gap = 0;
            }
            (Some(_), true) => gap = 0,
            (Some(s), false) => {
                gap += 1;
                if gap >= min_gap {
                    push_span(&mut found, s, i + 1 - gap, min_len);
                    start = None;
                    gap = 0;
                }
            }
            (None, false) => {}
        }
    }
    if let Some(s) = start {
        push_span(&mut found, s, axis_len - gap, min_len);
    }

    match found.len().cmp(&(expected as usize)) {
        Ordering::Equal => found,
        Ordering::Greater => {
            tracing::debug!(
                found = found.len(),
                expected,
                "surplus spans detected; keeping the largest"
            );
            let mut by_len = found;
            by_len.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));
            by_len.truncate(expected as usize);
            by_len.sort_by_key(|s| s.start);
            by_len
        }
        Ordering::Less => {
            tracing::debug!(
                found = found.len(),
                expected,
                "detection shortfall; falling back to uniform subdivision"
            );
            uniform_segments(axis_len, expected)
        }
    }
}

/// Equal subdivision of the axis into `expected` spans.
pub(crate) fn uniform_segments(axis_len: u32, expected: u32) -> Vec<Segment> {
    if expected == 0 {
        return Vec::new();
    }
    (0..expected)
        .map(|i| Segment {
            start: (u64::from(axis_len) * u64::from(i) / u64::from(expected)) as u32,
            end: (u64::from(axis_len) * u64::from(i + 1) / u64::from(expected)) as u32,
        })
        .collect()
}

fn push_span(spans: &mut Vec<Segment>, start: u32, end: u32, min_len: u32) {
    if end > start && end - start >= min_len {
        spans.push(Segment { start, end });
    }
}
