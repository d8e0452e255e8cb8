//! Common test utilities for the splitter integration tests
//!
//! Builds synthetic frames and writes them to disk in various formats.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use grid_scale::cpu::RgbaFrame;
use grid_scale::grid::GridSpec;
use grid_scale::presets::{ResampleFilter, Size};
use grid_splitter::SplitOptions;

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];

/// Left half red, right half blue.
pub fn two_tone(w: u32, h: u32) -> RgbaFrame {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            data.extend_from_slice(if x < w / 2 { &RED } else { &BLUE });
        }
    }
    RgbaFrame::from_raw(Size::new(w, h), data).unwrap()
}

/// Write `frame` to `dir/name`; the format follows the extension.
pub fn write_image(dir: &Path, name: &str, frame: &RgbaFrame) -> PathBuf {
    let path = dir.join(name);
    let img = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.as_bytes().to_vec())
        .unwrap();
    if name.ends_with(".jpg") || name.ends_with(".jpeg") || name.ends_with(".bmp") {
        // formats without alpha
        image::DynamicImage::ImageRgba8(img).to_rgb8().save(&path).unwrap();
    } else {
        img.save(&path).unwrap();
    }
    path
}

pub fn options(input: PathBuf, output_dir: PathBuf, tiles_x: u32, tiles_y: u32, side: u32) -> SplitOptions {
    SplitOptions {
        base_name: grid_splitter::codec::base_name(&input),
        input,
        output_dir,
        grid: GridSpec::new(tiles_x, tiles_y, side).unwrap(),
        padding: [0, 0, 0, 0],
        filter: ResampleFilter::Lanczos3,
    }
}

/// Sorted file names in `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
