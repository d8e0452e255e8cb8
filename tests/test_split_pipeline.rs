//! End-to-end tests for `split_image` / `split_image_with`
//!
//! Inputs are written to a temporary directory, split, and the resulting tile
//! files are decoded back for inspection.

mod common;

use common::{BLUE, RED, listing, options, two_tone, write_image};
use grid_scale::cpu::RgbaFrame;
use grid_scale::grid::tile_name;
use grid_scale::presets::{RatioCatalog, Size};
use grid_splitter::codec::load_rgba;
use grid_splitter::{SplitError, split_image, split_image_with, suggest_for};

#[test]
fn test_split_writes_every_tile() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "poster.png", &two_tone(300, 200));
    let out = dir.path().join("out");

    let report = split_image(options(input, out.clone(), 3, 4, 16)).unwrap();

    assert_eq!(report.tile_count, 12);
    assert_eq!(report.source_size, Size::new(300, 200));
    // 1.5 is wider than 0.75: height held, width round(200 * 0.75)
    assert_eq!(report.padded_size, Size::new(150, 200));
    assert_eq!(report.files.len(), 12);

    let mut expected: Vec<String> = (1..=4)
        .flat_map(|r| (1..=3).map(move |c| format!("{}.png", tile_name("poster", r, c))))
        .collect();
    expected.sort();
    assert_eq!(listing(&out), expected);

    for file in &report.files {
        assert_eq!(load_rgba(file).unwrap().size(), Size::new(16, 16));
    }
}

#[test]
fn test_files_are_reported_in_row_major_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "grid.png", &two_tone(64, 64));
    let report = split_image(options(input, dir.path().join("o"), 2, 2, 8)).unwrap();

    let names: Vec<String> = report
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "grid_Split_R1C1.png",
            "grid_Split_R1C2.png",
            "grid_Split_R2C1.png",
            "grid_Split_R2C2.png"
        ]
    );
}

#[test]
fn test_tiles_keep_their_cell_content() {
    let dir = tempfile::tempdir().unwrap();
    // already 2:1, so nothing is resized or padded
    let input = write_image(dir.path(), "flag.png", &two_tone(200, 100));
    let report = split_image(options(input, dir.path().join("o"), 2, 1, 10)).unwrap();
    assert_eq!(report.padded_size, Size::new(200, 100));

    let left = load_rgba(&report.files[0]).unwrap();
    let right = load_rgba(&report.files[1]).unwrap();
    assert_eq!(left.pixel(5, 5), Some(RED));
    assert_eq!(right.pixel(5, 5), Some(BLUE));
}

#[test]
fn test_square_input_squeezed_to_two_to_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "sq.png", &RgbaFrame::filled(Size::new(100, 100), RED).unwrap());
    let report = split_image(options(input, dir.path().join("o"), 2, 1, 64)).unwrap();
    assert_eq!(report.padded_size, Size::new(100, 50));
    assert_eq!(report.tile_count, 2);
}

#[test]
fn test_rejected_preview_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "a.png", &two_tone(40, 40));
    let out = dir.path().join("never");

    let mut seen = None;
    let err = split_image_with(options(input, out.clone(), 2, 2, 8), |padded| {
        seen = Some(padded.size());
        false
    })
    .unwrap_err();

    assert!(matches!(err, SplitError::Aborted { .. }));
    assert_eq!(seen, Some(Size::new(40, 40)));
    assert!(!out.exists());
}

#[test]
fn test_rerun_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "same.png", &two_tone(123, 77));

    let first = split_image(options(input.clone(), dir.path().join("one"), 4, 3, 12)).unwrap();
    let second = split_image(options(input, dir.path().join("two"), 4, 3, 12)).unwrap();

    assert_eq!(listing(&first.output_dir), listing(&second.output_dir));
    for (a, b) in first.files.iter().zip(&second.files) {
        assert_eq!(load_rgba(a).unwrap(), load_rgba(b).unwrap());
    }
}

#[test]
fn test_jpeg_input_needs_no_converted_copy() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "photo.jpg", &two_tone(90, 60));
    let report = split_image(options(input, dir.path().join("tiles"), 3, 2, 8)).unwrap();

    assert_eq!(report.tile_count, 6);
    assert_eq!(listing(dir.path()), vec!["photo.jpg", "tiles"]);
}

#[test]
fn test_existing_tiles_are_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "re.png", &two_tone(20, 20));
    let out = dir.path().join("o");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("re_Split_R1C1.png"), b"stale").unwrap();

    let report = split_image(options(input, out.clone(), 1, 1, 4)).unwrap();
    assert_eq!(report.tile_count, 1);
    assert_eq!(load_rgba(&out.join("re_Split_R1C1.png")).unwrap().size(), Size::new(4, 4));
}

#[test]
fn test_unsupported_and_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let err = split_image(options(dir.path().join("x.tiff"), dir.path().join("o"), 2, 2, 8)).unwrap_err();
    assert_eq!(err.category(), "unsupported_format");

    let err = split_image(options(dir.path().join("gone.png"), dir.path().join("o"), 2, 2, 8)).unwrap_err();
    assert_eq!(err.category(), "io");
    assert!(!dir.path().join("o").exists());
}

#[test]
fn test_grid_finer_than_image_is_degenerate() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "tiny.png", &two_tone(3, 3));
    let out = dir.path().join("o");
    let err = split_image(options(input, out.clone(), 5, 5, 8)).unwrap_err();
    assert_eq!(err.category(), "degenerate_size");
    assert!(!out.exists());
}

#[test]
fn test_suggestions_for_wide_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_image(dir.path(), "wide.png", &two_tone(192, 108));
    let suggestions = suggest_for(&input, &RatioCatalog::default(), 3).unwrap();
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0].label, "16:9");
}
