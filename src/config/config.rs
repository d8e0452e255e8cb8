//! # Configuration Module
//!
//! This module provides the configuration structure and validation for a split run.
//! It is the common interface between the `splitter` CLI and the library entry
//! points in [`crate::split_image`].
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `input` | `PathBuf` | png, jpg, jpeg, bmp, gif, webp | Source image |
//! | `tiles_x` | `u32` | ≥ 1 | Columns |
//! | `tiles_y` | `u32` | ≥ 1 | Rows |
//! | `tile_size` | `u32` | 1-8192 | Side of each exported square tile |
//! | `padding` | `[u8; 4]` | any | RGBA fill for the padded area |
//! | `output_root` | `PathBuf` | any | Parent of the per-image output folder |
//! | `filter` | `ResampleFilter` | see enum | Resampling kernel |
//!
//! ## Padding Colors
//!
//! The CLI accepts a 6-digit hex string (`RRGGBB`, optional leading `#`), which
//! becomes an opaque color. Without one, padding is fully transparent black.
//!
//! ## Examples
//!
//! ```rust
//! use grid_splitter::config::SplitConfig;
//!
//! let mut config = SplitConfig::new("photo.jpg", 3, 4, [0, 0, 0, 0]);
//! config.output_root = "out".into();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.output_dir(), std::path::Path::new("out/photo_split_3x4"));
//!
//! let options = config.to_split_options().unwrap();
//! assert_eq!(options.grid.tile_count(), 12);
//! ```

use std::path::{Path, PathBuf};

use grid_scale::grid::GridSpec;
use grid_scale::presets::{RatioCatalog, ResampleFilter};

use crate::codec;
use crate::error::{SplitError, SplitResult};

/// Side length of exported tiles when none is given.
pub const DEFAULT_TILE_SIZE: u32 = 64;
/// Largest accepted tile side.
pub const MAX_TILE_SIZE: u32 = 8192;
/// Grid offered at the interactive prompt: 3 columns, 4 rows.
pub const DEFAULT_GRID: (u32, u32) = (3, 4);
/// Number of ratio suggestions shown when no grid is given.
pub const DEFAULT_SUGGESTIONS: usize = 3;
/// Fully transparent black.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Configuration for one split run.
///
/// # Examples
///
/// ```rust
/// use grid_splitter::config::SplitConfig;
/// use grid_scale::presets::ResampleFilter;
///
/// let config = SplitConfig {
///     tile_size: 128,
///     filter: ResampleFilter::CatmullRom,
///     ..SplitConfig::new("sheet.png", 8, 8, [255, 255, 255, 255])
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Source image path. The extension must be one of [`codec::SUPPORTED_EXTENSIONS`].
    pub input: PathBuf,

    /// Number of tile columns. Must be at least 1.
    pub tiles_x: u32,

    /// Number of tile rows. Must be at least 1.
    pub tiles_y: u32,

    /// Side length of every exported tile, in pixels.
    pub tile_size: u32,

    /// RGBA fill for the area added while padding.
    pub padding: [u8; 4],

    /// Directory the `<base>_split_<X>x<Y>` output folder is created in.
    ///
    /// Defaults to the user's Pictures folder.
    pub output_root: PathBuf,

    /// Resampling kernel for the proportional resize and per-tile scaling.
    pub filter: ResampleFilter,

    /// Canonical ratios offered as suggestions.
    pub catalog: RatioCatalog,

    /// How many suggestions to show.
    pub suggestions: usize,
}

impl Default for SplitConfig {
    /// Default values:
    /// - `input`: empty (must be set before validation)
    /// - `tiles_x` × `tiles_y`: 3 × 4
    /// - `tile_size`: 64
    /// - `padding`: transparent
    /// - `output_root`: `$HOME/Pictures`
    /// - `filter`: Lanczos3
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            tiles_x: DEFAULT_GRID.0,
            tiles_y: DEFAULT_GRID.1,
            tile_size: DEFAULT_TILE_SIZE,
            padding: TRANSPARENT,
            output_root: default_output_root(),
            filter: ResampleFilter::default(),
            catalog: RatioCatalog::default(),
            suggestions: DEFAULT_SUGGESTIONS,
        }
    }
}

impl SplitConfig {
    /// Creates a configuration for `input` with the given grid and padding;
    /// everything else takes its default.
    pub fn new(input: impl Into<PathBuf>, tiles_x: u32, tiles_y: u32, padding: [u8; 4]) -> Self {
        Self {
            input: input.into(),
            tiles_x,
            tiles_y,
            padding,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.as_os_str().is_empty() {
            return Err("Input image path must be set".to_string());
        }
        if !codec::is_supported(&self.input) {
            return Err(format!(
                "Unsupported file type '{}'; expected one of: {}",
                self.input.display(),
                codec::SUPPORTED_EXTENSIONS.join(", ")
            ));
        }
        if self.tiles_x == 0 {
            return Err("Horizontal tile count must be greater than 0".to_string());
        }
        if self.tiles_y == 0 {
            return Err("Vertical tile count must be greater than 0".to_string());
        }
        if !(1..=MAX_TILE_SIZE).contains(&self.tile_size) {
            return Err(format!("Tile size must be between 1 and {}", MAX_TILE_SIZE));
        }
        Ok(())
    }

    /// Base name used for the output folder and every tile file.
    pub fn base_name(&self) -> String {
        codec::base_name(&self.input)
    }

    /// `<output_root>/<base>_split_<tiles_x>x<tiles_y>`
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(format!(
            "{}_split_{}x{}",
            self.base_name(),
            self.tiles_x,
            self.tiles_y
        ))
    }

    /// Convert to [`crate::SplitOptions`] for use with the library.
    pub fn to_split_options(&self) -> SplitResult<crate::SplitOptions> {
        self.validate()
            .map_err(|reason| SplitError::config("split_config", self.input.display().to_string(), reason))?;
        Ok(crate::SplitOptions {
            input: self.input.clone(),
            output_dir: self.output_dir(),
            base_name: self.base_name(),
            grid: GridSpec::new(self.tiles_x, self.tiles_y, self.tile_size)?,
            padding: self.padding,
            filter: self.filter,
        })
    }
}

/// Parse a 6-digit `RRGGBB` hex string (optionally `#`-prefixed) into an opaque color.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 4], String> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Padding color must be 6 hex digits (RRGGBB), got '{}'", hex));
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| e.to_string());
    Ok([channel(0)?, channel(2)?, channel(4)?, 255])
}

/// The user's Pictures folder, or the working directory if no home is known.
pub fn default_output_root() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| Path::new(&home).join("Pictures"))
        .unwrap_or_else(|| PathBuf::from("."))
}
