// SPDX-License-Identifier: MIT
//! # Ratio Math and Geometry Plans
//!
//! This module computes every size and offset the pipeline needs before any
//! pixel is touched. Nothing here allocates image buffers.
//!
//! ## Design Philosophy
//!
//! The planning layer is split the same way the pipeline is:
//! 1. **Target ratio**: what shape the grid dictates (`tiles_x / tiles_y`)
//! 2. **Ratio fit**: the box the source is rescaled into, holding one axis
//! 3. **PadPlan**: the final canvas and where the resized content sits in it
//!
//! ## Suggestions
//!
//! When the caller has no grid in mind, [`RatioCatalog::suggest`] ranks a list of
//! canonical ratios by distance to the source aspect. The catalog is a value, so
//! callers can swap in their own list.

use crate::cpu::ScaleError;

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Width over height. Callers must not ask for the ratio of a zero-height size.
    pub fn ratio(self) -> f64 {
        f64::from(self.w) / f64::from(self.h)
    }

    /// Number of bytes an RGBA8 buffer of this size occupies.
    pub fn rgba_len(self) -> usize {
        (self.w as usize) * (self.h as usize) * 4
    }

    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Resampling kernel used for both the proportional resize and per-tile scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResampleFilter {
    /// Windowed sinc, radius 3. Sharpest result, the default.
    #[default]
    Lanczos3,
    /// Cubic with slightly softer edges than Lanczos.
    CatmullRom,
    /// Cubic tuned to avoid ringing.
    Mitchell,
    /// Linear interpolation, fast and soft.
    Bilinear,
    /// Box filter; behaves as area averaging when downscaling.
    #[value(name = "box")]
    BoxFilter,
}

/// Compute the width:height ratio a `tiles_x` × `tiles_y` grid dictates.
///
/// Fails with [`ScaleError::InvalidGrid`] if either count is zero.
pub fn target_ratio(tiles_x: u32, tiles_y: u32) -> Result<f64, ScaleError> {
    if tiles_x == 0 || tiles_y == 0 {
        return Err(ScaleError::InvalidGrid { tiles_x, tiles_y });
    }
    Ok(f64::from(tiles_x) / f64::from(tiles_y))
}

/// Compute the box `input` is rescaled into so its ratio becomes `target`.
///
/// A relatively wider input keeps its height and gets `round(h * target)` as
/// width; anything else keeps its width and gets `round(w / target)` as height.
/// The whole source is later scaled into this box, nothing is cropped.
pub fn ratio_fit(input: Size, target: f64) -> Result<Size, ScaleError> {
    if !(target.is_finite() && target > 0.0) {
        return Err(ScaleError::InvalidRatio(target));
    }
    ensure_non_degenerate("resize input", input)?;

    let (w, h) = (f64::from(input.w), f64::from(input.h));
    let out = if input.ratio() > target {
        Size {
            w: round_to_u32("resize", h * target)?,
            h: input.h,
        }
    } else {
        Size {
            w: input.w,
            h: round_to_u32("resize", w / target)?,
        }
    };
    ensure_non_degenerate("resize", out)?;
    Ok(out)
}

/// Canvas growth plan for padding an image to an exact grid ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadPlan {
    /// Size of the image being padded
    pub input: Size,
    /// Size of the padded canvas
    pub out: Size,
    /// Where the input lands on the canvas: (x, y, width, height).
    pub dst_roi: (u32, u32, u32, u32),
}

impl PadPlan {
    pub fn offset(&self) -> (u32, u32) {
        (self.dst_roi.0, self.dst_roi.1)
    }
}

/// Plan the padded canvas for a `tiles_x:tiles_y` target.
///
/// Exactly one axis grows. A too-narrow input grows in width, anything else
/// grows in height. The offset is the floor of half the growth, so an odd
/// leftover pixel falls on the right or bottom edge.
pub fn pad_plan(input: Size, tiles_x: u32, tiles_y: u32) -> Result<PadPlan, ScaleError> {
    let target = target_ratio(tiles_x, tiles_y)?;
    ensure_non_degenerate("pad input", input)?;

    let (w, h) = (f64::from(input.w), f64::from(input.h));
    let out = if input.ratio() < target {
        Size {
            w: round_to_u32("pad", h * target)?.max(input.w),
            h: input.h,
        }
    } else {
        Size {
            w: input.w,
            h: round_to_u32("pad", w / target)?.max(input.h),
        }
    };

    let x = (out.w - input.w) / 2;
    let y = (out.h - input.h) / 2;
    Ok(PadPlan {
        input,
        out,
        dst_roi: (x, y, input.w, input.h),
    })
}

fn round_to_u32(stage: &'static str, v: f64) -> Result<u32, ScaleError> {
    let rounded = v.round();
    if rounded > f64::from(u32::MAX) {
        return Err(ScaleError::Oversize { stage, requested: rounded });
    }
    Ok(rounded as u32)
}

pub(crate) fn ensure_non_degenerate(stage: &'static str, size: Size) -> Result<(), ScaleError> {
    if size.is_empty() {
        return Err(ScaleError::DegenerateSize {
            stage,
            w: size.w,
            h: size.h,
        });
    }
    Ok(())
}

/// A named canonical ratio such as 16:9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalRatio {
    pub w: u32,
    pub h: u32,
}

impl CanonicalRatio {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn ratio(self) -> f64 {
        f64::from(self.w) / f64::from(self.h)
    }

    pub fn label(self) -> String {
        format!("{}:{}", self.w, self.h)
    }
}

/// Ratios offered when the caller supplies no grid, in tie-break order.
pub const STANDARD_RATIOS: [CanonicalRatio; 11] = [
    CanonicalRatio::new(1, 1),
    CanonicalRatio::new(4, 3),
    CanonicalRatio::new(3, 2),
    CanonicalRatio::new(16, 9),
    CanonicalRatio::new(3, 4),
    CanonicalRatio::new(2, 3),
    CanonicalRatio::new(9, 16),
    CanonicalRatio::new(5, 4),
    CanonicalRatio::new(4, 5),
    CanonicalRatio::new(5, 7),
    CanonicalRatio::new(7, 5),
];

/// One ranked entry produced by [`RatioCatalog::suggest`]. Display only.
#[derive(Clone, Debug, PartialEq)]
pub struct RatioSuggestion {
    pub candidate_w: u32,
    pub candidate_h: u32,
    /// `candidate_w / candidate_h`
    pub ratio: f64,
    /// `|aspect - ratio|` against the measured image
    pub distance: f64,
    pub label: String,
}

/// Ordered list of canonical ratios used for suggestions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatioCatalog {
    entries: Vec<CanonicalRatio>,
}

impl Default for RatioCatalog {
    fn default() -> Self {
        Self {
            entries: STANDARD_RATIOS.to_vec(),
        }
    }
}

impl RatioCatalog {
    /// Build a catalog from custom entries. Entries with a zero side are dropped.
    pub fn new(entries: impl IntoIterator<Item = CanonicalRatio>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|r| r.w > 0 && r.h > 0)
                .collect(),
        }
    }

    pub fn entries(&self) -> &[CanonicalRatio] {
        &self.entries
    }

    /// Rank catalog entries by `|width/height - candidate|`, closest first.
    ///
    /// Ties keep catalog order. A zero-sized input yields no suggestions.
    pub fn suggest(&self, width: u32, height: u32, top_n: usize) -> Vec<RatioSuggestion> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let aspect = f64::from(width) / f64::from(height);

        let mut matches: Vec<RatioSuggestion> = self
            .entries
            .iter()
            .map(|r| RatioSuggestion {
                candidate_w: r.w,
                candidate_h: r.h,
                ratio: r.ratio(),
                distance: (aspect - r.ratio()).abs(),
                label: r.label(),
            })
            .collect();
        // sort_by is stable, which gives the catalog-order tie-break
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(top_n);
        matches
    }
}

/// Rank the standard catalog against a `width` × `height` image.
pub fn suggest_ratios(width: u32, height: u32, top_n: usize) -> Vec<RatioSuggestion> {
    RatioCatalog::default().suggest(width, height, top_n)
}
