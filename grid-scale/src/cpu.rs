// SPDX-License-Identifier: MIT
// CPU scaler and padder built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → new RGBA8 frame out; inputs are never mutated.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{FilterType, ResizeAlg, ResizeOptions, Resizer};

use crate::presets::{ensure_non_degenerate, pad_plan, ratio_fit, PadPlan, ResampleFilter, Size};

#[derive(Debug)]
pub enum ScaleError {
    /// A tile count was zero.
    InvalidGrid { tiles_x: u32, tiles_y: u32 },
    /// A target ratio was zero, negative or not finite.
    InvalidRatio(f64),
    /// A computed dimension came out as zero.
    DegenerateSize { stage: &'static str, w: u32, h: u32 },
    /// A computed dimension does not fit in `u32`.
    Oversize { stage: &'static str, requested: f64 },
    /// Pixel buffer length does not match the declared size.
    BufferLength { expected: usize, actual: usize },
    /// A plan was applied to a frame of a different size.
    PlanMismatch { expected: Size, actual: Size },
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::InvalidGrid { tiles_x, tiles_y } => {
                write!(f, "Invalid grid {}x{}: tile counts must be at least 1", tiles_x, tiles_y)
            }
            ScaleError::InvalidRatio(r) => write!(f, "Invalid target ratio {}", r),
            ScaleError::DegenerateSize { stage, w, h } => {
                write!(f, "Degenerate size {}x{} computed during {}", w, h, stage)
            }
            ScaleError::Oversize { stage, requested } => {
                write!(f, "Size {} computed during {} exceeds the pixel limit", requested, stage)
            }
            ScaleError::BufferLength { expected, actual } => {
                write!(f, "Pixel buffer holds {} bytes, expected {}", actual, expected)
            }
            ScaleError::PlanMismatch { expected, actual } => {
                write!(f, "Plan built for {} applied to a {} frame", expected, actual)
            }
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Tightly packed RGBA8 image. Width and height are always at least 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    data: Vec<u8>,
    size: Size,
}

impl RgbaFrame {
    /// Wrap an owned RGBA8 buffer. The length must be exactly `w * h * 4`.
    pub fn from_raw(size: Size, data: Vec<u8>) -> Result<Self, ScaleError> {
        ensure_non_degenerate("frame", size)?;
        if data.len() != size.rgba_len() {
            return Err(ScaleError::BufferLength { expected: size.rgba_len(), actual: data.len() });
        }
        Ok(Self { data, size })
    }

    /// A frame with every pixel set to `rgba`.
    pub fn filled(size: Size, rgba: [u8; 4]) -> Result<Self, ScaleError> {
        ensure_non_degenerate("frame", size)?;
        let mut data = vec![0u8; size.rgba_len()];
        fill_rgba(&mut data, rgba);
        Ok(Self { data, size })
    }

    pub fn size(&self) -> Size { self.size }
    pub fn width(&self) -> u32 { self.size.w }
    pub fn height(&self) -> u32 { self.size.h }
    pub fn as_bytes(&self) -> &[u8] { &self.data }

    /// Pixel at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.w || y >= self.size.h {
            return None;
        }
        let off = ((y as usize) * (self.size.w as usize) + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[off..off + 4]);
        Some(px)
    }
}

/// Pre-allocated scratch for compacting a sub-rectangle into tightly packed rows.
pub struct Staging {
    pub(crate) buf: Vec<u8>,
}
impl Staging {
    pub fn with_capacity(cap: usize) -> Self { Self { buf: Vec::with_capacity(cap) } }
    pub fn ensure_len(&mut self, len: usize) { if self.buf.len() < len { self.buf.resize(len, 0); } }
    pub fn as_slice(&self) -> &[u8] { &self.buf }
}

impl ResampleFilter {
    pub(crate) fn resize_alg(self) -> ResizeAlg {
        let filter = match self {
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Mitchell => FilterType::Mitchell,
            ResampleFilter::Bilinear => FilterType::Bilinear,
            ResampleFilter::BoxFilter => FilterType::Box,
        };
        ResizeAlg::Convolution(filter)
    }
}

/// Resample the whole frame into `out`. Up- and downscaling both go through here.
pub fn scale_rgba_cpu(
    resizer: &mut Resizer,
    src: &RgbaFrame,
    out: Size,
    filter: ResampleFilter,
) -> Result<RgbaFrame, ScaleError> {
    scale_rgba_buffer(resizer, &src.data, src.size, out, filter)
}

/// `src_rgba` must be tightly packed, `src.rgba_len()` bytes.
pub(crate) fn scale_rgba_buffer(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    src: Size,
    out: Size,
    filter: ResampleFilter,
) -> Result<RgbaFrame, ScaleError> {
    ensure_non_degenerate("scale", out)?;
    if src_rgba.len() < src.rgba_len() {
        return Err(ScaleError::BufferLength { expected: src.rgba_len(), actual: src_rgba.len() });
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(src.w, src.h, &src_rgba[..src.rgba_len()])?;
    let mut dst = vec![0u8; out.rgba_len()];
    {
        let mut dst_image = TypedImage::<U8x4>::from_buffer(out.w, out.h, &mut dst)?;
        // Alpha stays enabled so transparent padding does not bleed dark fringes.
        let opts = ResizeOptions::new().resize_alg(filter.resize_alg());
        resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &opts)?;
    }
    RgbaFrame::from_raw(out, dst)
}

/// Rescale `frame` so its width:height equals `target_ratio` up to rounding.
///
/// One axis keeps its length, the other is rescaled; the entire source content
/// ends up in the output. Fails with [`ScaleError::DegenerateSize`] when the
/// rescaled axis rounds to zero.
pub fn resize_to_ratio(
    resizer: &mut Resizer,
    frame: &RgbaFrame,
    target_ratio: f64,
    filter: ResampleFilter,
) -> Result<RgbaFrame, ScaleError> {
    let out = ratio_fit(frame.size, target_ratio)?;
    if out == frame.size {
        return Ok(frame.clone());
    }
    scale_rgba_cpu(resizer, frame, out, filter)
}

/// Grow `frame` along one axis to the exact `tiles_x:tiles_y` ratio.
///
/// The new canvas is filled with `bg_rgba` and the source is copied over it
/// (replacing, not blending) at the plan's centered offset.
pub fn pad_to_exact_ratio(
    frame: &RgbaFrame,
    tiles_x: u32,
    tiles_y: u32,
    bg_rgba: [u8; 4],
) -> Result<RgbaFrame, ScaleError> {
    let plan = pad_plan(frame.size, tiles_x, tiles_y)?;
    pad_rgba(frame, &plan, bg_rgba)
}

/// Apply a precomputed [`PadPlan`].
pub fn pad_rgba(frame: &RgbaFrame, plan: &PadPlan, bg_rgba: [u8; 4]) -> Result<RgbaFrame, ScaleError> {
    if frame.size != plan.input {
        return Err(ScaleError::PlanMismatch { expected: plan.input, actual: frame.size });
    }

    let mut canvas = vec![0u8; plan.out.rgba_len()];
    fill_rgba(&mut canvas, bg_rgba);

    let (x, y, w, h) = plan.dst_roi;
    let row_bytes = (w as usize) * 4;
    let dst_pitch = (plan.out.w as usize) * 4;
    let start = (y as usize) * dst_pitch + (x as usize) * 4;
    paste_rows(&frame.data, row_bytes, &mut canvas[start..], dst_pitch, row_bytes, h as usize);

    RgbaFrame::from_raw(plan.out, canvas)
}

#[inline]
fn fill_rgba(dst: &mut [u8], bg: [u8; 4]) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&bg);
    }
}

/// Copy `rows` rows of `row_bytes` between buffers with independent pitches.
#[inline]
pub(crate) fn paste_rows(
    src: &[u8],
    src_pitch: usize,
    dst: &mut [u8],
    dst_pitch: usize,
    row_bytes: usize,
    rows: usize,
) {
    for r in 0..rows {
        let s = &src[r * src_pitch..r * src_pitch + row_bytes];
        let d = &mut dst[r * dst_pitch..r * dst_pitch + row_bytes];
        d.copy_from_slice(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaFrame {
        RgbaFrame::filled(Size::new(w, h), rgba).unwrap()
    }

    #[test]
    fn test_frame_rejects_bad_buffers() {
        assert!(matches!(
            RgbaFrame::from_raw(Size::new(2, 2), vec![0; 15]),
            Err(ScaleError::BufferLength { expected: 16, actual: 15 })
        ));
        assert!(matches!(
            RgbaFrame::from_raw(Size::new(0, 2), vec![]),
            Err(ScaleError::DegenerateSize { .. })
        ));
        let frame = RgbaFrame::from_raw(Size::new(2, 1), vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(frame.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_resize_square_to_two_to_one() {
        let mut resizer = Resizer::new();
        let out = resize_to_ratio(&mut resizer, &solid(100, 100, RED), 2.0, ResampleFilter::Lanczos3)
            .unwrap();
        assert_eq!(out.size(), Size::new(100, 50));
        // a flat color survives resampling
        assert_eq!(out.pixel(50, 25), Some(RED));
    }

    #[test]
    fn test_resize_squeezes_whole_source() {
        // left half red, right half blue; a crop would lose one of the colors
        let blue = [0, 0, 255, 255];
        let mut data = Vec::with_capacity(200 * 100 * 4);
        for _y in 0..100 {
            for x in 0..200 {
                data.extend_from_slice(if x < 100 { &RED } else { &blue });
            }
        }
        let frame = RgbaFrame::from_raw(Size::new(200, 100), data).unwrap();

        let mut resizer = Resizer::new();
        let out = resize_to_ratio(&mut resizer, &frame, 1.0, ResampleFilter::Lanczos3).unwrap();
        assert_eq!(out.size(), Size::new(100, 100));
        assert_eq!(out.pixel(0, 50), Some(RED));
        assert_eq!(out.pixel(99, 50), Some(blue));
    }

    #[test]
    fn test_resize_matching_ratio_keeps_pixels() {
        let mut resizer = Resizer::new();
        let frame = solid(30, 40, RED);
        let out = resize_to_ratio(&mut resizer, &frame, 0.75, ResampleFilter::Lanczos3).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_resize_degenerate() {
        let mut resizer = Resizer::new();
        let err = resize_to_ratio(&mut resizer, &solid(1, 1, RED), 0.2, ResampleFilter::Lanczos3)
            .unwrap_err();
        assert!(matches!(err, ScaleError::DegenerateSize { .. }));
    }

    #[test]
    fn test_pad_centers_content() {
        let padded = pad_to_exact_ratio(&solid(100, 50, RED), 1, 1, CLEAR).unwrap();
        assert_eq!(padded.size(), Size::new(100, 100));
        assert_eq!(padded.pixel(0, 24), Some(CLEAR));
        assert_eq!(padded.pixel(0, 25), Some(RED));
        assert_eq!(padded.pixel(99, 74), Some(RED));
        assert_eq!(padded.pixel(99, 75), Some(CLEAR));
    }

    #[test]
    fn test_pad_uses_fill_color_and_replaces() {
        let white = [255, 255, 255, 255];
        let half_clear = [10, 20, 30, 0];
        let padded = pad_to_exact_ratio(&solid(2, 4, half_clear), 1, 1, white).unwrap();
        assert_eq!(padded.size(), Size::new(4, 4));
        assert_eq!(padded.pixel(0, 0), Some(white));
        // transparent source pixels overwrite the canvas rather than blend
        assert_eq!(padded.pixel(1, 0), Some(half_clear));
        assert_eq!(padded.pixel(2, 3), Some(half_clear));
        assert_eq!(padded.pixel(3, 3), Some(white));
    }

    #[test]
    fn test_pad_rejects_foreign_plan() {
        let plan = pad_plan(Size::new(10, 10), 2, 1).unwrap();
        let err = pad_rgba(&solid(5, 5, RED), &plan, CLEAR).unwrap_err();
        assert!(matches!(err, ScaleError::PlanMismatch { .. }));
    }

    #[test]
    fn test_scale_upscale_and_downscale() {
        let mut resizer = Resizer::new();
        let up = scale_rgba_cpu(&mut resizer, &solid(3, 3, RED), Size::new(64, 64), ResampleFilter::BoxFilter)
            .unwrap();
        assert_eq!(up.size(), Size::new(64, 64));
        let down = scale_rgba_cpu(&mut resizer, &up, Size::new(8, 8), ResampleFilter::Bilinear).unwrap();
        assert_eq!(down.size(), Size::new(8, 8));
        assert_eq!(down.pixel(4, 4), Some(RED));
    }
}
