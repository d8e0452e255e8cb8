// SPDX-License-Identifier: MIT
//! # Grid Tiling
//!
//! Cuts a padded frame into `tiles_x × tiles_y` equal cells and resamples each
//! cell to a square `tile_side × tile_side` tile.
//!
//! ## Cell Geometry
//!
//! - **Cell size**: `floor(w / tiles_x)` × `floor(h / tiles_y)`
//! - **Slack**: the last `w % tiles_x` columns and `h % tiles_y` rows of pixels
//!   belong to no cell and are dropped
//! - **Order**: row-major, all columns of row 1 before row 2
//! - **Numbering**: rows and columns are 1-based
//!
//! ## Naming
//!
//! Tile `(row, col)` of base `photo` is called `photo_Split_R{row}C{col}`. The
//! name depends only on the cell position, so any consumer that writes tiles
//! out of order still produces the same file set.

use fast_image_resize::Resizer;

use crate::cpu::{paste_rows, scale_rgba_buffer, RgbaFrame, ScaleError, Staging};
use crate::presets::{target_ratio, ResampleFilter, Size};

/// Grid dimensions and exported tile size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    /// Number of columns
    pub tiles_x: u32,
    /// Number of rows
    pub tiles_y: u32,
    /// Side length of every exported (square) tile
    pub tile_side: u32,
}

impl GridSpec {
    pub fn new(tiles_x: u32, tiles_y: u32, tile_side: u32) -> Result<Self, ScaleError> {
        if tiles_x == 0 || tiles_y == 0 {
            return Err(ScaleError::InvalidGrid { tiles_x, tiles_y });
        }
        if tile_side == 0 {
            return Err(ScaleError::DegenerateSize { stage: "tile output", w: 0, h: 0 });
        }
        Ok(Self { tiles_x, tiles_y, tile_side })
    }

    pub fn tile_count(&self) -> usize {
        (self.tiles_x as usize) * (self.tiles_y as usize)
    }

    /// `tiles_x / tiles_y`. Always valid for a constructed spec.
    pub fn target_ratio(&self) -> f64 {
        f64::from(self.tiles_x) / f64::from(self.tiles_y)
    }
}

/// Rectangle definition in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
}

/// One exported grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// 1-based row
    pub row: u32,
    /// 1-based column
    pub col: u32,
    pub pixels: RgbaFrame,
}

impl Tile {
    pub fn name(&self, base: &str) -> String {
        tile_name(base, self.row, self.col)
    }
}

/// `"{base}_Split_R{row}C{col}"`
pub fn tile_name(base: &str, row: u32, col: u32) -> String {
    format!("{}_Split_R{}C{}", base, row, col)
}

/// Floor-divided cell size for a grid over `input`.
pub fn cell_size(input: Size, tiles_x: u32, tiles_y: u32) -> Result<Size, ScaleError> {
    target_ratio(tiles_x, tiles_y)?;
    let cell = Size {
        w: input.w / tiles_x,
        h: input.h / tiles_y,
    };
    if cell.is_empty() {
        return Err(ScaleError::DegenerateSize { stage: "tile crop", w: cell.w, h: cell.h });
    }
    Ok(cell)
}

/// Cell rectangles in row-major order, paired with their 1-based (row, col).
pub fn mk_grid(input: Size, tiles_x: u32, tiles_y: u32) -> Result<Vec<(u32, u32, Rect)>, ScaleError> {
    let cell = cell_size(input, tiles_x, tiles_y)?;
    let mut rects = Vec::with_capacity((tiles_x as usize) * (tiles_y as usize));
    for r in 0..tiles_y {
        for c in 0..tiles_x {
            rects.push((
                r + 1,
                c + 1,
                Rect {
                    x: c * cell.w,
                    y: r * cell.h,
                    w: cell.w,
                    h: cell.h,
                },
            ));
        }
    }
    Ok(rects)
}

/// Split `frame` into tiles, handing each to `sink` as soon as it is produced.
///
/// Tiles arrive in row-major order. If `sink` fails, iteration stops and the
/// error is returned; tiles already delivered are not revisited. Returns the
/// number of tiles delivered, always `spec.tile_count()` on success.
pub fn split_into_grid_with<E, F>(
    resizer: &mut Resizer,
    frame: &RgbaFrame,
    spec: GridSpec,
    filter: ResampleFilter,
    mut sink: F,
) -> Result<usize, E>
where
    E: From<ScaleError>,
    F: FnMut(Tile) -> Result<(), E>,
{
    let rects = mk_grid(frame.size(), spec.tiles_x, spec.tiles_y)?;
    let out = Size::new(spec.tile_side, spec.tile_side);
    let first_len = rects.first().map_or(0, |(_, _, r)| r.size().rgba_len());
    let mut staging = Staging::with_capacity(first_len);

    let mut delivered = 0usize;
    for (row, col, rect) in rects {
        compact_crop_to_staging(frame, rect, &mut staging);
        let pixels = scale_rgba_buffer(
            resizer,
            staging.as_slice(),
            Size::new(rect.w, rect.h),
            out,
            filter,
        )?;
        sink(Tile { row, col, pixels })?;
        delivered += 1;
    }
    Ok(delivered)
}

/// Collecting form of [`split_into_grid_with`].
pub fn split_into_grid(
    resizer: &mut Resizer,
    frame: &RgbaFrame,
    spec: GridSpec,
    filter: ResampleFilter,
) -> Result<Vec<Tile>, ScaleError> {
    let mut tiles = Vec::with_capacity(spec.tile_count());
    split_into_grid_with(resizer, frame, spec, filter, |tile| {
        tiles.push(tile);
        Ok::<(), ScaleError>(())
    })?;
    Ok(tiles)
}

/// Extract `roi` from `frame` into a tightly packed staging buffer.
fn compact_crop_to_staging(frame: &RgbaFrame, roi: Rect, staging: &mut Staging) {
    let row_bytes = (roi.w as usize) * 4;
    let pitch = (frame.width() as usize) * 4;
    let start = (roi.y as usize) * pitch + (roi.x as usize) * 4;
    staging.ensure_len(row_bytes * (roi.h as usize));
    paste_rows(
        &frame.as_bytes()[start..],
        pitch,
        &mut staging.buf,
        row_bytes,
        row_bytes,
        roi.h as usize,
    );
}
