use crate::foundation::core::{CancelToken, GridConfig, PanelRect};
use crate::foundation::error::{StorygridError, StorygridResult};
use crate::raster::buffer::RgbaBuffer;
use crate::raster::decode;
use crate::split::empty;
use crate::split::options::{SplitOptions, SplitStrategy};
use crate::split::strategy::{AdaptiveStrategy, BoundaryStrategy, FixedGridStrategy};

/// One accepted panel cut out of a contact sheet.
///
/// `id` is dense over accepted panels; `original_index` is the pre-filter
/// row-major position. The two diverge as soon as a blank placeholder is
/// dropped, so callers must not assume they coincide.
#[derive(Clone, Debug)]
pub struct SplitResult {
    pub id: u32,
    pub original_index: u32,
    pub row: u32,
    pub col: u32,
    /// Final crop rectangle in composite coordinates (after aspect
    /// correction and safety inset).
    pub source_rect: PanelRect,
    pub image: RgbaBuffer,
    pub is_empty: bool,
}

impl SplitResult {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decodes and decomposes a composite sheet. See
/// [`split_sheet_buffer_with_cancel`] for the pipeline.
pub fn split_sheet(
    bytes: &[u8],
    grid: &GridConfig,
    opts: &SplitOptions,
) -> StorygridResult<Vec<SplitResult>> {
    split_sheet_with_cancel(bytes, grid, opts, &CancelToken::default())
}

pub fn split_sheet_with_cancel(
    bytes: &[u8],
    grid: &GridConfig,
    opts: &SplitOptions,
    cancel: &CancelToken,
) -> StorygridResult<Vec<SplitResult>> {
    let img = decode::decode_rgba8(bytes)?;
    split_sheet_buffer_with_cancel(&img, grid, opts, cancel)
}

/// Decomposes an already-decoded sheet.
pub fn split_sheet_buffer(
    img: &RgbaBuffer,
    grid: &GridConfig,
    opts: &SplitOptions,
) -> StorygridResult<Vec<SplitResult>> {
    split_sheet_buffer_with_cancel(img, grid, opts, &CancelToken::default())
}

/// Full decomposition pipeline: boundary strategy, per-panel aspect
/// correction and safety inset, emptiness classification, row-major
/// output with dense ids over accepted panels.
///
/// Deterministic: identical buffer, grid and options always produce
/// identical panels in identical order.
#[tracing::instrument(skip(img, opts, cancel), fields(cols = grid.cols, rows = grid.rows))]
pub fn split_sheet_buffer_with_cancel(
    img: &RgbaBuffer,
    grid: &GridConfig,
    opts: &SplitOptions,
    cancel: &CancelToken,
) -> StorygridResult<Vec<SplitResult>> {
    if grid.cols == 0 || grid.rows == 0 {
        return Err(StorygridError::validation(
            "grid must have at least one column and one row",
        ));
    }
    let cols = opts.expected_cols.unwrap_or(grid.cols).max(1);
    let rows = opts.expected_rows.unwrap_or(grid.rows).max(1);

    let strategy: &dyn BoundaryStrategy = match opts.strategy {
        SplitStrategy::FixedGrid => &FixedGridStrategy,
        SplitStrategy::Adaptive => &AdaptiveStrategy,
    };
    let col_spans = strategy.column_spans(img, cols);
    let row_spans = strategy.row_spans(img, rows);

    let target_ratio = panel_target_ratio(grid);
    let margin = opts.margin_fraction();

    let mut results = Vec::with_capacity(col_spans.len() * row_spans.len());
    let mut accepted = 0u32;
    for (r, row_span) in row_spans.iter().enumerate() {
        for (c, col_span) in col_spans.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(StorygridError::cancelled("split aborted between panels"));
            }

            let raw = PanelRect {
                x: col_span.start,
                y: row_span.start,
                width: col_span.len(),
                height: row_span.len(),
            };
            if raw.width == 0 || raw.height == 0 {
                continue;
            }
            let rect = refine_rect(raw, target_ratio, margin);
            let panel = img.crop(&rect)?;

            let is_empty = empty::is_cell_empty(&panel, opts.threshold);
            if is_empty && opts.filter_empty {
                continue;
            }

            results.push(SplitResult {
                id: accepted,
                original_index: (r as u32) * cols + c as u32,
                row: r as u32,
                col: c as u32,
                source_rect: rect,
                image: panel,
                is_empty,
            });
            accepted += 1;
        }
    }
    Ok(results)
}

/// Target width:height ratio for every panel. Panels share the sheet's
/// ratio; the canvas dimensions carry it. Falls back to the planned cell
/// shape for hand-built configs without canvas data.
fn panel_target_ratio(grid: &GridConfig) -> Option<f64> {
    if grid.canvas_width > 0 && grid.canvas_height > 0 {
        Some(f64::from(grid.canvas_width) / f64::from(grid.canvas_height))
    } else if grid.cell_width > 0 && grid.cell_height > 0 {
        Some(f64::from(grid.cell_width) / f64::from(grid.cell_height))
    } else {
        None
    }
}

/// Aspect correction, safety inset, then exact-ratio rounding, all
/// centered within the raw cell.
fn refine_rect(raw: PanelRect, target: Option<f64>, margin: f64) -> PanelRect {
    let Some(target) = target else {
        return inset_rect(raw, margin);
    };
    let corrected = correct_aspect(raw, target);
    let inset = inset_rect(corrected, margin);
    force_exact_ratio(inset, target)
}

/// Center-crops the dimension that overshoots the target ratio. The raw
/// cell's shape depends on the composite's pixel dimensions, which are
/// independent of the logical grid.
fn correct_aspect(raw: PanelRect, target: f64) -> PanelRect {
    const RATIO_TOLERANCE: f64 = 1e-3;

    let rw = f64::from(raw.width);
    let rh = f64::from(raw.height);
    let actual = rw / rh;
    if (actual - target).abs() <= RATIO_TOLERANCE {
        return raw;
    }

    let (w, h) = if actual > target {
        (((rh * target).round() as u32).clamp(1, raw.width), raw.height)
    } else {
        (raw.width, ((rw / target).round() as u32).clamp(1, raw.height))
    };
    center_within(raw, w, h)
}

/// Symmetric shrink that strips residual separator-line and anti-aliasing
/// pixels at panel boundaries.
fn inset_rect(rect: PanelRect, margin: f64) -> PanelRect {
    if margin <= 0.0 {
        return rect;
    }
    let dx = ((f64::from(rect.width) * margin).round() as u32).min((rect.width - 1) / 2);
    let dy = ((f64::from(rect.height) * margin).round() as u32).min((rect.height - 1) / 2);
    PanelRect {
        x: rect.x + dx,
        y: rect.y + dy,
        width: rect.width - 2 * dx,
        height: rect.height - 2 * dy,
    }
}

/// Rounds one dimension from the other so the output strictly satisfies
/// the target ratio (within integer rounding).
fn force_exact_ratio(rect: PanelRect, target: f64) -> PanelRect {
    let h_from_w = ((f64::from(rect.width) / target).round() as u32).max(1);
    if h_from_w <= rect.height {
        return center_within(rect, rect.width, h_from_w);
    }
    let w_from_h = ((f64::from(rect.height) * target).round() as u32)
        .max(1)
        .min(rect.width);
    center_within(rect, w_from_h, rect.height)
}

fn center_within(rect: PanelRect, w: u32, h: u32) -> PanelRect {
    PanelRect {
        x: rect.x + (rect.width - w) / 2,
        y: rect.y + (rect.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_aspect_crops_the_wide_dimension() {
        let raw = PanelRect {
            x: 0,
            y: 0,
            width: 200,
            height: 50,
        };
        let out = correct_aspect(raw, 2.0);
        assert_eq!((out.width, out.height), (100, 50));
        assert_eq!(out.x, 50);
    }

    #[test]
    fn correct_aspect_crops_the_tall_dimension() {
        let raw = PanelRect {
            x: 10,
            y: 10,
            width: 100,
            height: 100,
        };
        let out = correct_aspect(raw, 2.0);
        assert_eq!((out.width, out.height), (100, 50));
        assert_eq!(out.y, 35);
    }

    #[test]
    fn exact_ratio_holds_after_inset() {
        let raw = PanelRect {
            x: 0,
            y: 0,
            width: 256,
            height: 216,
        };
        let out = refine_rect(raw, Some(16.0 / 9.0), 0.005);
        let drift = f64::from(out.width) - f64::from(out.height) * 16.0 / 9.0;
        assert!(drift.abs() <= 1.0, "drift {drift} for {out:?}");
    }

    #[test]
    fn inset_never_collapses_a_panel() {
        let rect = PanelRect {
            x: 0,
            y: 0,
            width: 3,
            height: 2,
        };
        let out = inset_rect(rect, 0.03);
        assert!(out.width >= 1 && out.height >= 1);
    }

    #[test]
    fn zero_grid_is_a_validation_error() {
        let img = RgbaBuffer::new(16, 16).unwrap();
        let grid = GridConfig {
            cols: 0,
            rows: 1,
            cell_width: 0,
            cell_height: 16,
            canvas_width: 16,
            canvas_height: 16,
            total_cells: 0,
            empty_cells: 0,
        };
        let err = split_sheet_buffer(&img, &grid, &SplitOptions::default()).unwrap_err();
        assert!(matches!(err, StorygridError::Validation(_)));
    }

    #[test]
    fn pre_cancelled_token_aborts() {
        let img = RgbaBuffer::new(64, 64).unwrap();
        let grid = GridConfig {
            cols: 2,
            rows: 2,
            cell_width: 32,
            cell_height: 32,
            canvas_width: 64,
            canvas_height: 64,
            total_cells: 4,
            empty_cells: 0,
        };
        let token = CancelToken::new();
        token.cancel();
        let err =
            split_sheet_buffer_with_cancel(&img, &grid, &SplitOptions::default(), &token)
                .unwrap_err();
        assert!(matches!(err, StorygridError::Cancelled(_)));
    }
}
