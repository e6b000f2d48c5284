use std::fmt::Write as _;

use crate::foundation::core::{AspectRatio, GridConfig, ResolutionTier};
use crate::layout::planner;

/// Everything the instruction builder needs for one sheet.
///
/// One explicit request type instead of loose optional fields: scene lines
/// in storyboard order, shared style tokens, and an optional recurring-
/// character description repeated verbatim so the provider keeps faces
/// consistent across panels.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SheetRequest {
    pub scenes: Vec<String>,
    pub aspect_ratio: AspectRatio,
    pub resolution_tier: ResolutionTier,
    #[serde(default)]
    pub style_tokens: Vec<String>,
    #[serde(default)]
    pub character_hints: Option<String>,
}

/// The partition the instruction promises the provider.
///
/// Callers must hand this same config to the splitter; the decomposition
/// assumes the returned image is the uniform, borderless grid stated here.
pub fn instruction_grid(req: &SheetRequest) -> GridConfig {
    planner::compute_grid(
        req.scenes.len() as i32,
        req.aspect_ratio,
        req.resolution_tier,
    )
}

/// Builds the deterministic generation instruction for one contact sheet.
///
/// The text encodes the exact panel count and rows×cols layout, the
/// per-panel ratio separately from the canvas ratio (generation models
/// conflate the two), the no-borders structural constraint the fixed-grid
/// splitter depends on, one line per scene in row-major reading order, and
/// a plain-background line per unused cell.
pub fn build_instruction(req: &SheetRequest) -> String {
    let grid = instruction_grid(req);
    let ratio = req.aspect_ratio.label();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Create a single storyboard contact sheet: one image containing exactly {} panels \
         arranged in a uniform grid of {} rows by {} columns.",
        grid.total_cells, grid.rows, grid.cols
    );
    let _ = writeln!(
        out,
        "The overall canvas is {}x{} pixels ({ratio}). Each individual panel must itself \
         be {ratio}; never stretch or letterbox a panel to fill its cell.",
        grid.canvas_width, grid.canvas_height
    );
    let _ = writeln!(
        out,
        "Structural rules: panels meet edge to edge with no borders, no gutters, no \
         separator lines, no frames, no text, no captions, and no watermarks anywhere."
    );

    if !req.style_tokens.is_empty() {
        let _ = writeln!(out, "Visual style: {}.", req.style_tokens.join(", "));
    }
    if let Some(hints) = &req.character_hints {
        let _ = writeln!(out, "Recurring characters: {hints}.");
    }

    let _ = writeln!(
        out,
        "Panels in reading order (left to right, then top to bottom):"
    );
    for (idx, scene) in req.scenes.iter().enumerate() {
        let _ = writeln!(out, "Panel {}: {}", idx + 1, scene.trim());
    }
    for idx in req.scenes.len() as u32..grid.total_cells {
        let _ = writeln!(
            out,
            "Panel {}: a plain flat near-black background, intentionally left blank.",
            idx + 1
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scene_count: usize) -> SheetRequest {
        SheetRequest {
            scenes: (1..=scene_count).map(|i| format!("scene {i}")).collect(),
            aspect_ratio: AspectRatio::Landscape,
            resolution_tier: ResolutionTier::TwoK,
            style_tokens: vec!["ink wash".to_string(), "high contrast".to_string()],
            character_hints: Some("a courier in a red coat".to_string()),
        }
    }

    #[test]
    fn instruction_states_layout_and_panel_ratio() {
        let text = build_instruction(&request(6));
        assert!(text.contains("exactly 6 panels"));
        assert!(text.contains("2 rows by 3 columns"));
        assert!(text.contains("16:9"));
        assert!(text.contains("no borders"));
        assert!(text.contains("Panel 6: scene 6"));
    }

    #[test]
    fn empty_cells_get_placeholder_lines() {
        // 5 scenes on a 3x2 grid: one blank cell.
        let text = build_instruction(&request(5));
        assert_eq!(text.matches("intentionally left blank").count(), 1);
        assert!(text.contains("Panel 6: a plain flat near-black background"));
    }

    #[test]
    fn instruction_is_deterministic() {
        let req = request(7);
        assert_eq!(build_instruction(&req), build_instruction(&req));
    }

    #[test]
    fn grid_matches_what_the_splitter_will_use() {
        let req = request(8);
        let grid = instruction_grid(&req);
        assert_eq!(
            grid,
            planner::compute_grid(8, AspectRatio::Landscape, ResolutionTier::TwoK)
        );
    }
}
