//! # Split Session
//!
//! Two-phase orchestration of a split run. [`Splitter::preview`] conforms the
//! frame (resize, then pad) and hands back a [`Prepared`] value whose padded
//! frame can be shown to a user. Only [`Prepared::commit`] cuts and emits
//! tiles, so a confirmation step sits naturally between the two calls without
//! the core ever calling out to it.
//!
//! ```rust
//! use grid_scale::cpu::RgbaFrame;
//! use grid_scale::grid::GridSpec;
//! use grid_scale::presets::{ResampleFilter, Size};
//! use grid_splitter::processing::MemorySink;
//! use grid_splitter::session::Splitter;
//!
//! # fn main() -> grid_splitter::SplitResult<()> {
//! let frame = RgbaFrame::filled(Size::new(100, 50), [255, 0, 0, 255])?;
//! let splitter = Splitter::new(GridSpec::new(2, 2, 16)?, ResampleFilter::Lanczos3, [0; 4]);
//!
//! // the 2:1 frame is squeezed to the grid's 1:1 ratio, keeping its height
//! let prepared = splitter.preview(frame)?;
//! assert_eq!(prepared.padded().size(), Size::new(50, 50));
//!
//! let mut sink = MemorySink::new();
//! assert_eq!(prepared.commit("demo", &mut sink)?, 4);
//! # Ok(())
//! # }
//! ```

use fast_image_resize::Resizer;
use grid_scale::cpu::RgbaFrame;
use grid_scale::grid::{cell_size, split_into_grid_with, GridSpec};
use grid_scale::presets::{ResampleFilter, Size};

use crate::error::{SplitError, SplitResult};
use crate::processing::{ProcessingPipeline, TileSink};

/// Holds the grid and rendering parameters for one run.
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    grid: GridSpec,
    filter: ResampleFilter,
    padding: [u8; 4],
}

impl Splitter {
    pub fn new(grid: GridSpec, filter: ResampleFilter, padding: [u8; 4]) -> Self {
        Self {
            grid,
            filter,
            padding,
        }
    }

    pub fn from_options(options: &crate::SplitOptions) -> Self {
        Self::new(options.grid, options.filter, options.padding)
    }

    /// Phase one: conform `frame` to the grid ratio.
    ///
    /// Also rejects grids whose cells would be empty on the padded frame, so a
    /// [`Prepared`] value can always be cut.
    pub fn preview(&self, frame: RgbaFrame) -> SplitResult<Prepared> {
        let source = frame.size();
        let grid_label = format!("{}x{}", self.grid.tiles_x, self.grid.tiles_y);
        let mut pipeline = ProcessingPipeline::conform(self.grid, self.filter, self.padding);
        let padded = pipeline.process_frame(frame).map_err(|e| {
            e.with_metadata("grid", grid_label.clone())
                .with_metadata("source", source.to_string())
        })?;
        cell_size(padded.size(), self.grid.tiles_x, self.grid.tiles_y).map_err(|e| {
            SplitError::from(e)
                .with_operation("tile")
                .with_metadata("grid", grid_label.clone())
                .with_metadata("source", source.to_string())
        })?;

        log::info!(
            "conformed {} to {} for a {}x{} grid",
            source,
            padded.size(),
            self.grid.tiles_x,
            self.grid.tiles_y
        );
        Ok(Prepared {
            source,
            padded,
            grid: self.grid,
            filter: self.filter,
        })
    }
}

/// A conformed frame waiting to be tiled.
#[derive(Debug, Clone)]
pub struct Prepared {
    source: Size,
    padded: RgbaFrame,
    grid: GridSpec,
    filter: ResampleFilter,
}

impl Prepared {
    /// The padded frame the tiles will be cut from.
    pub fn padded(&self) -> &RgbaFrame {
        &self.padded
    }

    /// Size of the frame passed to [`Splitter::preview`].
    pub fn source_size(&self) -> Size {
        self.source
    }

    /// Phase two: cut the padded frame into tiles named after `base` and feed
    /// them to `sink` one by one. Returns the count reported by the sink.
    pub fn commit(self, base: &str, sink: &mut dyn TileSink) -> SplitResult<usize> {
        let mut resizer = Resizer::new();
        let produced = split_into_grid_with(
            &mut resizer,
            &self.padded,
            self.grid,
            self.filter,
            |tile| sink.accept(base, tile),
        )
        .map_err(|e: SplitError| e.with_operation("tile"))?;

        let accepted = sink.finish()?;
        log::info!(
            "produced {} tiles of {}x{} from {}",
            produced,
            self.grid.tile_side,
            self.grid.tile_side,
            self.padded.size()
        );
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::MemorySink;

    #[test]
    fn test_preview_then_commit() {
        let frame = RgbaFrame::filled(Size::new(200, 100), [0, 0, 255, 255]).unwrap();
        let splitter = Splitter::new(GridSpec::new(3, 2, 32).unwrap(), ResampleFilter::Lanczos3, [0; 4]);

        let prepared = splitter.preview(frame).unwrap();
        assert_eq!(prepared.source_size(), Size::new(200, 100));
        // 200x100 is 2.0, wider than 1.5: height held, width round(150)
        assert_eq!(prepared.padded().size(), Size::new(150, 100));

        let mut sink = MemorySink::new();
        assert_eq!(prepared.commit("b", &mut sink).unwrap(), 6);
        let names: Vec<&str> = sink.names().collect();
        assert_eq!(
            names,
            vec![
                "b_Split_R1C1",
                "b_Split_R1C2",
                "b_Split_R1C3",
                "b_Split_R2C1",
                "b_Split_R2C2",
                "b_Split_R2C3"
            ]
        );
        assert!(sink.tiles.iter().all(|(_, t)| t.pixels.size() == Size::new(32, 32)));
    }

    #[test]
    fn test_preview_degenerate_carries_metadata() {
        let frame = RgbaFrame::filled(Size::new(1, 1), [0; 4]).unwrap();
        let splitter = Splitter::new(GridSpec::new(1, 9, 8).unwrap(), ResampleFilter::Lanczos3, [0; 4]);
        let err = splitter.preview(frame).unwrap_err();
        assert_eq!(err.category(), "degenerate_size");
        assert_eq!(err.context().metadata.get("grid").map(String::as_str), Some("1x9"));
    }

    #[test]
    fn test_preview_rejects_grid_finer_than_frame() {
        // 4 pixels of width cannot host 8 columns
        let frame = RgbaFrame::filled(Size::new(4, 2), [0; 4]).unwrap();
        let splitter = Splitter::new(GridSpec::new(8, 4, 8).unwrap(), ResampleFilter::Lanczos3, [0; 4]);
        let err = splitter.preview(frame).unwrap_err();
        assert_eq!(err.category(), "degenerate_size");
        assert_eq!(err.context().operation.as_deref(), Some("tile"));
        assert_eq!(err.context().metadata.get("grid").map(String::as_str), Some("8x4"));
    }
}
