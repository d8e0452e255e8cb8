//! # Frame Processing Pipeline
//!
//! Synchronous, linear processing for a single split run.
//!
//! ## Architecture
//!
//! 1. **Stage Trait**: one geometry step, consuming a frame and returning a new one
//! 2. **ProcessingPipeline**: ordered stage chain (resize, then pad)
//! 3. **TileSink Trait**: destination for tiles as the tiler produces them
//! 4. **DirectorySink / MemorySink**: write PNG files, or keep tiles in memory
//!
//! Stages never hold on to a frame past `process`. Sinks see each tile exactly
//! once and persist it immediately; there is no batching.

use std::fs;
use std::path::PathBuf;

use fast_image_resize::Resizer;
use grid_scale::cpu::{pad_to_exact_ratio, resize_to_ratio, RgbaFrame};
use grid_scale::grid::{GridSpec, Tile};
use grid_scale::presets::ResampleFilter;

use crate::codec;
use crate::error::{SplitError, SplitResult};

/// One geometry step of the pipeline.
pub trait Stage {
    /// Short name used in logs and error context.
    fn name(&self) -> &'static str;

    /// Consume `frame` and return the transformed frame.
    fn process(&mut self, frame: RgbaFrame) -> SplitResult<RgbaFrame>;
}

/// Rescales the whole frame to the grid's ratio.
pub struct ResizeStage {
    pub target_ratio: f64,
    pub filter: ResampleFilter,
    pub resizer: Resizer,
}

impl ResizeStage {
    pub fn new(grid: GridSpec, filter: ResampleFilter) -> Self {
        Self {
            target_ratio: grid.target_ratio(),
            filter,
            resizer: Resizer::new(),
        }
    }
}

impl Stage for ResizeStage {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn process(&mut self, frame: RgbaFrame) -> SplitResult<RgbaFrame> {
        let out = resize_to_ratio(&mut self.resizer, &frame, self.target_ratio, self.filter)?;
        log::debug!("resize: {} -> {}", frame.size(), out.size());
        Ok(out)
    }
}

/// Pads the frame to the exact `tiles_x:tiles_y` ratio.
pub struct PadStage {
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub bg_rgba: [u8; 4],
}

impl Stage for PadStage {
    fn name(&self) -> &'static str {
        "pad"
    }

    fn process(&mut self, frame: RgbaFrame) -> SplitResult<RgbaFrame> {
        let out = pad_to_exact_ratio(&frame, self.tiles_x, self.tiles_y, self.bg_rgba)?;
        log::debug!("pad: {} -> {}", frame.size(), out.size());
        Ok(out)
    }
}

/// Ordered chain of stages.
#[derive(Default)]
pub struct ProcessingPipeline {
    pub stages: Vec<Box<dyn Stage>>,
}

impl ProcessingPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The resize-then-pad chain that conforms a frame to `grid`.
    pub fn conform(grid: GridSpec, filter: ResampleFilter, bg_rgba: [u8; 4]) -> Self {
        Self::new().with_stage(ResizeStage::new(grid, filter)).with_stage(PadStage {
            tiles_x: grid.tiles_x,
            tiles_y: grid.tiles_y,
            bg_rgba,
        })
    }

    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run `frame` through every stage in order.
    pub fn process_frame(&mut self, frame: RgbaFrame) -> SplitResult<RgbaFrame> {
        let mut current = frame;
        for stage in &mut self.stages {
            let name = stage.name();
            current = stage
                .process(current)
                .map_err(|e| e.with_operation(name))?;
        }
        Ok(current)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Destination for tiles.
pub trait TileSink {
    /// Take ownership of one tile. Called once per tile in row-major order.
    fn accept(&mut self, base: &str, tile: Tile) -> SplitResult<()>;

    /// Called after the last tile; returns the number of tiles accepted.
    fn finish(&mut self) -> SplitResult<usize>;
}

/// Writes every tile as `<dir>/<name>.png` the moment it arrives.
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Use `dir` as the destination, creating it (and parents) if missing.
    pub fn create(dir: impl Into<PathBuf>) -> SplitResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            SplitError::io("create output directory", e).with_path(&dir)
        })?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Paths written so far, in production order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TileSink for DirectorySink {
    fn accept(&mut self, base: &str, tile: Tile) -> SplitResult<()> {
        let path = self
            .dir
            .join(format!("{}.{}", tile.name(base), codec::OUTPUT_EXTENSION));
        codec::save_png(&tile.pixels, &path)?;
        log::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> SplitResult<usize> {
        Ok(self.written.len())
    }
}

/// Keeps named tiles in memory.
#[derive(Default)]
pub struct MemorySink {
    pub tiles: Vec<(String, Tile)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiles.iter().map(|(name, _)| name.as_str())
    }
}

impl TileSink for MemorySink {
    fn accept(&mut self, base: &str, tile: Tile) -> SplitResult<()> {
        self.tiles.push((tile.name(base), tile));
        Ok(())
    }

    fn finish(&mut self) -> SplitResult<usize> {
        Ok(self.tiles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_scale::presets::Size;

    fn solid(w: u32, h: u32) -> RgbaFrame {
        RgbaFrame::filled(Size::new(w, h), [40, 80, 120, 255]).unwrap()
    }

    #[test]
    fn test_conform_pipeline_hits_grid_ratio() {
        let grid = GridSpec::new(3, 4, 64).unwrap();
        let mut pipeline = ProcessingPipeline::conform(grid, ResampleFilter::Lanczos3, [0; 4]);
        assert_eq!(pipeline.stage_count(), 2);

        let out = pipeline.process_frame(solid(1920, 1080)).unwrap();
        // 1080 * 0.75 = 810 exactly, so no padding is needed
        assert_eq!(out.size(), Size::new(810, 1080));
    }

    #[test]
    fn test_pad_stage_alone() {
        let mut pipeline = ProcessingPipeline::new().with_stage(PadStage {
            tiles_x: 1,
            tiles_y: 1,
            bg_rgba: [0; 4],
        });
        let out = pipeline.process_frame(solid(100, 50)).unwrap();
        assert_eq!(out.size(), Size::new(100, 100));
        assert_eq!(out.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(out.pixel(10, 30), Some([40, 80, 120, 255]));
    }

    #[test]
    fn test_stage_errors_carry_stage_name() {
        let mut pipeline = ProcessingPipeline::new().with_stage(ResizeStage {
            target_ratio: 0.01,
            filter: ResampleFilter::Lanczos3,
            resizer: Resizer::new(),
        });
        let err = pipeline.process_frame(solid(10, 10)).unwrap_err();
        assert_eq!(err.category(), "degenerate_size");
        assert_eq!(err.context().operation.as_deref(), Some("resize"));
    }

    #[test]
    fn test_memory_sink_names() {
        let mut sink = MemorySink::new();
        let tile = Tile { row: 2, col: 3, pixels: solid(4, 4) };
        sink.accept("pic", tile).unwrap();
        assert_eq!(sink.finish().unwrap(), 1);
        assert_eq!(sink.names().collect::<Vec<_>>(), vec!["pic_Split_R2C3"]);
    }

    #[test]
    fn test_directory_sink_writes_png() {
        let root = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::create(root.path().join("nested/out")).unwrap();
        sink.accept("pic", Tile { row: 1, col: 1, pixels: solid(4, 4) }).unwrap();
        assert_eq!(sink.finish().unwrap(), 1);

        let expected = root.path().join("nested/out/pic_Split_R1C1.png");
        assert_eq!(sink.written(), &[expected.clone()]);
        assert!(expected.is_file());
    }
}
