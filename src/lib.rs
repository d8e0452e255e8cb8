//! # Grid Splitter Library
//!
//! Splits one raster image into a grid of equally sized square tiles that can
//! be reassembled as a mosaic or sprite sheet.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `codec`: decode any supported input to RGBA8, encode tiles as PNG
//! - `processing`: resize and pad stages, tile sinks
//! - `session`: two-phase preview/commit orchestration
//! - `config`: configuration management and validation
//! - `error`: error taxonomy with context
//!
//! The geometry itself (ratio math, resampling, padding, tiling) lives in the
//! `grid_scale` crate of this workspace.
//!
//! ## Pipeline
//!
//! decode → resize to `tiles_x:tiles_y` → pad to the exact ratio → (preview /
//! confirmation) → cut `tiles_x * tiles_y` cells → resample each to
//! `tile_size²` → write `{base}_Split_R{row}C{col}.png`
//!
//! ## Example
//!
//! ```rust,no_run
//! use grid_splitter::config::SplitConfig;
//! use grid_splitter::split_image;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SplitConfig::new("sheet.png", 4, 4, [0, 0, 0, 0]);
//! let report = split_image(config.to_split_options()?)?;
//! println!("{} tiles in {}", report.tile_count, report.output_dir.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use grid_scale::cpu::RgbaFrame;
use grid_scale::grid::GridSpec;
use grid_scale::presets::{RatioCatalog, RatioSuggestion, ResampleFilter, Size};

pub mod codec;
pub mod config;
pub mod error;
pub mod processing;
pub mod session;

/// Re-export error types for convenience
pub use error::{HasRecoverySuggestion, HasSeverity, SplitError, SplitResult};

use processing::DirectorySink;
use session::Splitter;

/// Everything needed to run one split, already validated.
///
/// Usually built with [`config::SplitConfig::to_split_options`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Source image path.
    pub input: PathBuf,

    /// Directory tiles are written into. Created if missing; existing files
    /// with the same names are overwritten.
    pub output_dir: PathBuf,

    /// Prefix of every tile name.
    pub base_name: String,

    /// Grid dimensions and tile size.
    pub grid: GridSpec,

    /// RGBA fill for padding.
    pub padding: [u8; 4],

    /// Resampling kernel.
    pub filter: ResampleFilter,
}

/// Outcome of a completed split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub output_dir: PathBuf,
    pub source_size: Size,
    pub padded_size: Size,
    pub tile_count: usize,
    /// Tile files in the order they were written.
    pub files: Vec<PathBuf>,
}

/// Split without a confirmation step.
pub fn split_image(options: SplitOptions) -> SplitResult<SplitReport> {
    split_image_with(options, |_| true)
}

/// Split, asking `confirm` to approve the padded frame before any tile is
/// written. Returning `false` yields [`SplitError::Aborted`] and leaves the
/// output directory untouched.
pub fn split_image_with<F>(options: SplitOptions, confirm: F) -> SplitResult<SplitReport>
where
    F: FnOnce(&RgbaFrame) -> bool,
{
    let frame = codec::load_rgba(&options.input)?;
    let prepared = Splitter::from_options(&options).preview(frame)?;

    if !confirm(prepared.padded()) {
        log::info!("preview rejected, no tiles created");
        return Err(SplitError::aborted("preview"));
    }

    let source_size = prepared.source_size();
    let padded_size = prepared.padded().size();
    let mut sink = DirectorySink::create(&options.output_dir)?;
    let tile_count = prepared.commit(&options.base_name, &mut sink)?;

    Ok(SplitReport {
        output_dir: options.output_dir,
        source_size,
        padded_size,
        tile_count,
        files: sink.written().to_vec(),
    })
}

/// Read the size of `path` and rank `catalog` against it.
pub fn suggest_for(
    path: &Path,
    catalog: &RatioCatalog,
    top_n: usize,
) -> SplitResult<Vec<RatioSuggestion>> {
    let size = codec::read_dimensions(path)?;
    Ok(catalog.suggest(size.w, size.h, top_n))
}
