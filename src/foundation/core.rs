use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Orientation of the contact sheet and of every panel on it.
///
/// Panels share the sheet's orientation: a 16:9 sheet is cut into 16:9
/// panels, a 9:16 sheet into 9:16 panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    Landscape,
    Portrait,
}

impl AspectRatio {
    /// Width over height of a single panel (16:9 or 9:16).
    pub fn panel_ratio(self) -> f64 {
        match self {
            AspectRatio::Landscape => 16.0 / 9.0,
            AspectRatio::Portrait => 9.0 / 16.0,
        }
    }

    /// Human-readable ratio label ("16:9" / "9:16").
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

/// Output resolution class of the generated sheet.
///
/// Each tier maps to a fixed canvas size per orientation and caps how many
/// scenes a single sheet may carry before panels become illegibly small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResolutionTier {
    TwoK,
    FourK,
}

impl ResolutionTier {
    /// Canvas pixel size for this tier and orientation.
    pub fn canvas(self, aspect: AspectRatio) -> Canvas {
        let (long, short) = match self {
            ResolutionTier::TwoK => (2048, 1152),
            ResolutionTier::FourK => (4096, 2304),
        };
        match aspect {
            AspectRatio::Landscape => Canvas {
                width: long,
                height: short,
            },
            AspectRatio::Portrait => Canvas {
                width: short,
                height: long,
            },
        }
    }

    /// Maximum permissible scene count on one sheet of this tier.
    pub fn max_scenes(self) -> u32 {
        match self {
            ResolutionTier::TwoK => 12,
            ResolutionTier::FourK => 48,
        }
    }
}

/// Plain pixel dimensions of a sheet canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// A planned rows×cols partition of a contact sheet.
///
/// Produced fresh by [`compute_grid`](crate::compute_grid), never mutated,
/// and consumed by both the instruction builder and the splitter so the
/// generation contract and the decomposition assumptions stay aligned.
///
/// Invariants: `total_cells == cols * rows`, `total_cells >= scene count`,
/// `empty_cells == total_cells - scene count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    pub cols: u32,
    pub rows: u32,
    /// Raw cell width (`canvas_width / cols`, floored).
    pub cell_width: u32,
    /// Raw cell height (`canvas_height / rows`, floored).
    pub cell_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub total_cells: u32,
    /// Cells beyond the scene count, rendered as blank placeholders.
    pub empty_cells: u32,
}

/// Integer source rectangle of a panel within a composite image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PanelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PanelRect {
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

/// Cooperative cancellation for decomposition calls.
///
/// Splitting is `O(cols × rows)` and material at the 48-panel upper bound;
/// the splitter checks the token between per-panel steps and aborts with
/// [`StorygridError::Cancelled`](crate::StorygridError::Cancelled).
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_limits_are_ordered() {
        assert!(ResolutionTier::FourK.max_scenes() >= ResolutionTier::TwoK.max_scenes());
    }

    #[test]
    fn canvas_flips_with_orientation() {
        let l = ResolutionTier::TwoK.canvas(AspectRatio::Landscape);
        let p = ResolutionTier::TwoK.canvas(AspectRatio::Portrait);
        assert_eq!((l.width, l.height), (p.height, p.width));
        assert!(l.width > l.height);
    }

    #[test]
    fn panel_ratio_matches_label() {
        assert!((AspectRatio::Landscape.panel_ratio() - 16.0 / 9.0).abs() < 1e-9);
        assert!((AspectRatio::Portrait.panel_ratio() - 9.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn cancel_token_is_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
