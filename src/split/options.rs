/// How panel boundaries are located in the decoded sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitStrategy {
    /// Equal subdivision straight from the planned grid. Production
    /// default: the generation contract promises a uniform borderless
    /// grid, and geometric arithmetic is more reliable than pixel
    /// heuristics when that holds.
    FixedGrid,
    /// Energy-profile detection with uniform fallback. Survives
    /// composites that drifted from the contract (visible separators,
    /// uneven cells).
    Adaptive,
}

/// Tuning for one decomposition call.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SplitOptions {
    pub strategy: SplitStrategy,
    /// Maximum RGB color distance between a sampled pixel and the panel's
    /// center reference for the sample to count toward the blank-panel
    /// vote.
    pub threshold: f64,
    /// Drop panels classified as blank placeholders from the output.
    pub filter_empty: bool,
    /// Override the planned column count (boundary detection hint).
    pub expected_cols: Option<u32>,
    /// Override the planned row count.
    pub expected_rows: Option<u32>,
    /// Symmetric crop inset per panel side, in percent of the panel
    /// dimension. Removes residual separator-line and anti-aliasing
    /// pixels at panel edges. Clamped to [0, 3].
    pub edge_margin_percent: f64,
}

pub(crate) const MAX_EDGE_MARGIN_PERCENT: f64 = 3.0;

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            strategy: SplitStrategy::FixedGrid,
            threshold: 30.0,
            filter_empty: true,
            expected_cols: None,
            expected_rows: None,
            edge_margin_percent: 0.5,
        }
    }
}

impl SplitOptions {
    /// Inset as a fraction of the panel dimension, clamped to the
    /// supported range.
    pub(crate) fn margin_fraction(&self) -> f64 {
        (self.edge_margin_percent.clamp(0.0, MAX_EDGE_MARGIN_PERCENT)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_production_path() {
        let opts = SplitOptions::default();
        assert_eq!(opts.strategy, SplitStrategy::FixedGrid);
        assert!(opts.filter_empty);
        assert!((opts.edge_margin_percent - 0.5).abs() < 1e-9);
        assert!(opts.expected_cols.is_none());
    }

    #[test]
    fn margin_is_clamped() {
        let opts = SplitOptions {
            edge_margin_percent: 50.0,
            ..SplitOptions::default()
        };
        assert!((opts.margin_fraction() - 0.03).abs() < 1e-9);

        let opts = SplitOptions {
            edge_margin_percent: -1.0,
            ..SplitOptions::default()
        };
        assert_eq!(opts.margin_fraction(), 0.0);
    }
}
