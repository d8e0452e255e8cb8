// SPDX-License-Identifier: MIT
//! # grid-scale: Ratio Conforming and Grid Tiling for RGBA Images
//!
//! This crate holds the geometry core of the splitter: it takes a decoded RGBA8
//! buffer, conforms it to the aspect ratio dictated by a tile grid, and cuts it
//! into equally sized square tiles.
//!
//! ## Pipeline
//!
//! 1. **Ratio math** ([`presets`]): target ratio `tiles_x / tiles_y`, resize and
//!    pad plans, nearest canonical ratio suggestions
//! 2. **Proportional resize** ([`cpu::resize_to_ratio`]): hold one axis, rescale
//!    the whole image into the other (no cropping)
//! 3. **Padding** ([`cpu::pad_to_exact_ratio`]): centered solid-color canvas
//!    growth along a single axis
//! 4. **Tiling** ([`grid::split_into_grid`]): floor-sized cells in row-major
//!    order, each resampled to `tile_side × tile_side`
//!
//! ## Rounding
//!
//! - Resize and pad sizes use `round()` on the scaled axis
//! - Pad offsets use floor division, so an odd leftover pixel lands bottom/right
//! - Cell sizes use floor division, so up to `tiles - 1` trailing pixels per axis
//!   are not covered by any tile
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use grid_scale::cpu::{pad_to_exact_ratio, resize_to_ratio, RgbaFrame};
//! use grid_scale::grid::{split_into_grid, GridSpec};
//! use grid_scale::presets::{ResampleFilter, Size};
//!
//! # fn main() -> Result<(), grid_scale::cpu::ScaleError> {
//! let frame = RgbaFrame::filled(Size { w: 1920, h: 1080 }, [200, 40, 40, 255])?;
//! let spec = GridSpec::new(3, 4, 64)?;
//! let mut resizer = fast_image_resize::Resizer::new();
//!
//! let resized = resize_to_ratio(&mut resizer, &frame, spec.target_ratio(), ResampleFilter::Lanczos3)?;
//! let padded = pad_to_exact_ratio(&resized, spec.tiles_x, spec.tiles_y, [0, 0, 0, 0])?;
//! let tiles = split_into_grid(&mut resizer, &padded, spec, ResampleFilter::Lanczos3)?;
//! assert_eq!(tiles.len(), 12);
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod grid;
pub mod presets;
