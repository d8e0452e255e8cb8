//! # Processing Module
//!
//! This module contains the stage pipeline and tile sinks for a split run.

pub mod processing;

// Re-export commonly used types for convenience
pub use processing::{
    DirectorySink, MemorySink, PadStage, ProcessingPipeline, ResizeStage, Stage, TileSink,
};
