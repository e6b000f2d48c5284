//! Storygrid plans storyboard contact sheets and splits them back apart.
//!
//! A contact sheet is a single AI-generated image holding several scene
//! panels arranged in a grid. This crate owns the three steps of that
//! round trip; talking to the generation provider is the caller's job.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: [`compute_grid`] turns a scene count, aspect ratio and
//!    resolution tier into a [`GridConfig`] (rows×cols partition, cell
//!    geometry, empty-cell count).
//! 2. **Instruct**: [`build_instruction`] encodes that partition into the
//!    generation instruction handed to the external image provider.
//! 3. **Split**: [`split_sheet`] decomposes the returned composite into
//!    ordered, aspect-corrected [`SplitResult`] panels, discarding blank
//!    placeholder cells.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: identical bytes plus identical config
//!   and options always yield identical panels in identical order.
//! - **No IO in the engine**: composite bytes arrive as an opaque slice;
//!   decoding them is the only fallible suspension point.
//! - **Straight RGBA8 end-to-end**: all pixel work happens on an explicit
//!   in-memory [`RgbaBuffer`], never on a rendering surface.
#![forbid(unsafe_code)]

mod foundation;
mod layout;
mod prompt;
mod raster;
mod split;

pub use foundation::core::{
    AspectRatio, CancelToken, Canvas, GridConfig, PanelRect, ResolutionTier,
};
pub use foundation::error::{StorygridError, StorygridResult};
pub use layout::planner::{
    SceneCountCheck, compute_grid, recommend_resolution_tier, validate_scene_count,
};
pub use prompt::builder::{SheetRequest, build_instruction, instruction_grid};
pub use raster::buffer::RgbaBuffer;
pub use raster::decode::{decode_rgba8, encode_png};
pub use split::empty::is_cell_empty;
pub use split::options::{SplitOptions, SplitStrategy};
pub use split::segments::Segment;
pub use split::splitter::{
    SplitResult, split_sheet, split_sheet_buffer, split_sheet_buffer_with_cancel,
    split_sheet_with_cancel,
};
pub use split::strategy::{AdaptiveStrategy, BoundaryStrategy, FixedGridStrategy};
pub use split::trim::content_rect;
