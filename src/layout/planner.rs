use crate::foundation::core::{AspectRatio, Canvas, GridConfig, ResolutionTier};

/// Structured outcome of a scene-count check. Limit violations are a
/// caller decision, never an error path.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneCountCheck {
    pub is_valid: bool,
    pub limit: u32,
    pub message: String,
}

/// Smallest tier whose scene limit covers `scene_count`.
pub fn recommend_resolution_tier(scene_count: i32) -> ResolutionTier {
    if scene_count <= ResolutionTier::TwoK.max_scenes() as i32 {
        ResolutionTier::TwoK
    } else {
        ResolutionTier::FourK
    }
}

pub fn validate_scene_count(scene_count: i32, tier: ResolutionTier) -> SceneCountCheck {
    let limit = tier.max_scenes();
    if scene_count < 1 {
        return SceneCountCheck {
            is_valid: false,
            limit,
            message: format!("scene count must be at least 1, got {scene_count}"),
        };
    }
    if scene_count as u32 > limit {
        return SceneCountCheck {
            is_valid: false,
            limit,
            message: format!(
                "{scene_count} scenes exceed the {limit}-scene limit of this resolution tier"
            ),
        };
    }
    SceneCountCheck {
        is_valid: true,
        limit,
        message: format!("{scene_count} scenes fit within the {limit}-scene limit"),
    }
}

/// Plans the rows×cols partition for a sheet.
///
/// Total function: every input yields a usable configuration. Counts of 1
/// (or fewer) span the full canvas; curated counts use the hand-picked
/// table; everything else goes through the candidate search with a
/// near-square fallback.
pub fn compute_grid(scene_count: i32, aspect: AspectRatio, tier: ResolutionTier) -> GridConfig {
    let canvas = tier.canvas(aspect);
    if scene_count <= 0 {
        // Nothing to place: one full-canvas placeholder cell.
        return grid_from(canvas, 1, 1, 0);
    }
    let n = scene_count as u32;
    if n == 1 {
        return grid_from(canvas, 1, 1, 1);
    }

    let (cols, rows) = curated_layout(n, aspect)
        .or_else(|| search_layout(n, aspect, canvas))
        .unwrap_or_else(|| square_fallback(n, aspect));
    grid_from(canvas, cols, rows, n)
}

/// Hand-picked partitions for common scene counts.
///
/// These exist to veto degenerate elongated grids the generic search could
/// otherwise reach; they always override it. Entries are (cols, rows) for
/// landscape and mirror for portrait.
fn curated_layout(scene_count: u32, aspect: AspectRatio) -> Option<(u32, u32)> {
    let landscape = match scene_count {
        // 2x2 keeps all four panels at a quarter of the canvas.
        4 => (2, 2),
        // 3x2 beats 6x1 strips by a wide legibility margin.
        6 => (3, 2),
        // 4x2 over 8x1; two even rows.
        8 => (4, 2),
        // The only square grid in the table.
        9 => (3, 3),
        // 5x2 over the search's taste for 4x3 with two holes.
        10 => (5, 2),
        // 4x3, never 6x2: twelve thin strips are unusable panels.
        12 => (4, 3),
        _ => return None,
    };
    Some(orient(landscape, aspect))
}

/// Candidate search over major-axis counts, maximizing the smaller fitted
/// panel dimension (per-panel legibility).
fn search_layout(n: u32, aspect: AspectRatio, canvas: Canvas) -> Option<(u32, u32)> {
    let target = aspect.panel_ratio();
    let mut best: Option<(u32, u32)> = None;
    let mut best_score = 0u32;

    for major in 1..=n {
        let (cols, rows) = match aspect {
            AspectRatio::Landscape => (major, n.div_ceil(major)),
            AspectRatio::Portrait => (n.div_ceil(major), major),
        };

        // A partition that could shed a whole line is pure waste.
        let empty = cols * rows - n;
        if empty >= cols.min(rows) {
            continue;
        }
        // Grids running against the sheet orientation produce panels the
        // aspect correction would crop to slivers.
        match aspect {
            AspectRatio::Landscape if cols < rows => continue,
            AspectRatio::Portrait if rows < cols => continue,
            _ => {}
        }

        let (fit_w, fit_h) = fitted_panel(canvas.width / cols, canvas.height / rows, target);
        let score = fit_w.min(fit_h);
        if score > best_score {
            best_score = score;
            best = Some((cols, rows));
        }
    }
    best
}

/// Near-square grid for counts the search cannot place.
fn square_fallback(n: u32, aspect: AspectRatio) -> (u32, u32) {
    let major = (n as f64).sqrt().ceil() as u32;
    let major = major.max(1);
    orient((major, n.div_ceil(major)), aspect)
}

fn orient(landscape: (u32, u32), aspect: AspectRatio) -> (u32, u32) {
    match aspect {
        AspectRatio::Landscape => landscape,
        AspectRatio::Portrait => (landscape.1, landscape.0),
    }
}

/// Largest box with the target ratio that fits inside a raw cell.
fn fitted_panel(cell_w: u32, cell_h: u32, ratio: f64) -> (u32, u32) {
    if cell_w == 0 || cell_h == 0 {
        return (0, 0);
    }
    let w = f64::from(cell_w);
    let h = f64::from(cell_h);
    if w / h > ratio {
        ((h * ratio).floor() as u32, cell_h)
    } else {
        (cell_w, (w / ratio).floor() as u32)
    }
}

fn grid_from(canvas: Canvas, cols: u32, rows: u32, scene_count: u32) -> GridConfig {
    let total_cells = cols * rows;
    GridConfig {
        cols,
        rows,
        cell_width: canvas.width / cols,
        cell_height: canvas.height / rows,
        canvas_width: canvas.width,
        canvas_height: canvas.height,
        total_cells,
        empty_cells: total_cells - scene_count.min(total_cells),
    }
}
