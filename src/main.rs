use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use grid_scale::cpu::RgbaFrame;
use grid_scale::presets::ResampleFilter;
use grid_splitter::config::config::{DEFAULT_GRID, DEFAULT_SUGGESTIONS, DEFAULT_TILE_SIZE, TRANSPARENT};
use grid_splitter::config::{parse_hex_color, SplitConfig};
use grid_splitter::error::classify;
use grid_splitter::{codec, split_image_with, suggest_for, HasRecoverySuggestion};

const PREVIEW_FILE: &str = "preview_padded.png";

/// Split an image into a grid of equal square tiles:
/// - conform to the grid's aspect ratio without cropping
/// - pad to the exact ratio with a solid (or transparent) color
/// - export every cell as <name>_Split_R<row>C<col>.png
#[derive(Parser, Debug)]
#[command(name = "splitter")]
#[command(about = "Split an image into a grid of equal square tiles")]
#[command(long_about = "Split an image into a grid of equal square tiles.
Without a grid, the closest common aspect ratios are suggested and the tile counts are asked for.
Output goes to <out-dir>/<name>_split_<X>x<Y>/; rows and columns are numbered from 1.")]
struct Args {
    /// Image to split (png, jpg, jpeg, bmp, gif, webp)
    image: PathBuf,

    /// Number of horizontal tiles (columns)
    tiles_x: Option<u32>,

    /// Number of vertical tiles (rows)
    tiles_y: Option<u32>,

    /// Padding color as 6 hex digits, e.g. FFFFFF. Transparent when omitted
    padding: Option<String>,

    /// Side length of each exported tile in pixels
    #[arg(short = 's', long, default_value_t = DEFAULT_TILE_SIZE)]
    tile_size: u32,

    /// Parent folder for the output folder (default: ~/Pictures)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Resampling filter
    #[arg(long, value_enum, default_value_t = ResampleFilter::Lanczos3)]
    filter: ResampleFilter,

    /// Skip the preview confirmation and the tile-count prompts
    #[arg(short, long)]
    yes: bool,

    /// Replace an existing output folder without asking
    #[arg(long)]
    overwrite: bool,

    /// Number of aspect ratio suggestions to show when no grid is given
    #[arg(long, default_value_t = DEFAULT_SUGGESTIONS)]
    suggest: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = SplitConfig {
        input: args.image.clone(),
        tile_size: args.tile_size,
        filter: args.filter,
        suggestions: args.suggest,
        ..SplitConfig::default()
    };
    if let Some(root) = &args.out_dir {
        config.output_root = root.clone();
    }

    match (args.tiles_x, args.tiles_y) {
        (Some(x), Some(y)) => {
            config.tiles_x = x;
            config.tiles_y = y;
            if let Some(hex) = &args.padding {
                config.padding = parse_hex_color(hex).map_err(anyhow::Error::msg)?;
            }
        }
        (None, None) => {
            println!("Single image detected. No tile settings provided.");
            print_suggestions(&config);
            let (x, y) = if args.yes {
                DEFAULT_GRID
            } else {
                (
                    ask_u32("Enter number of tiles horizontally (columns)", DEFAULT_GRID.0)?,
                    ask_u32("Enter number of tiles vertically (rows)", DEFAULT_GRID.1)?,
                )
            };
            config.tiles_x = x;
            config.tiles_y = y;
            config.padding = TRANSPARENT;
            println!("Using settings: {}x{} tiles, transparent padding.", x, y);
        }
        _ => {
            return Err(anyhow::anyhow!(
                "Give both TILES_X and TILES_Y, or neither. Use -h for help."
            ));
        }
    }

    config.validate().map_err(anyhow::Error::msg)?;

    let output_dir = config.output_dir();
    if output_dir.exists() && !clear_output_dir(&output_dir, args.overwrite)? {
        println!("Aborted by user. No tiles created.");
        return Ok(());
    }

    let options = config.to_split_options()?;
    let yes = args.yes;
    match split_image_with(options, |padded| confirm_preview(padded, yes)) {
        Ok(report) => {
            println!(
                "Done! {} tiles saved to '{}'.",
                report.tile_count,
                report.output_dir.display()
            );
            Ok(())
        }
        Err(e) if classify::is_user_abort(&e) => {
            println!("Aborted by user. No tiles created.");
            Ok(())
        }
        Err(e) => {
            if let Some(hint) = e.recovery_suggestion() {
                log::error!("{}", hint);
            }
            Err(e.into())
        }
    }
}

fn print_suggestions(config: &SplitConfig) {
    match suggest_for(&config.input, &config.catalog, config.suggestions) {
        Ok(suggestions) => {
            println!("Suggested splits:");
            for s in suggestions {
                println!(" - {}x{} (aspect ratio ~{:.3})", s.candidate_w, s.candidate_h, s.ratio);
            }
        }
        Err(e) => log::warn!("Could not read image for aspect suggestion. ({})", e),
    }
}

/// Ask before deleting an existing output folder. Returns false if the user declines.
fn clear_output_dir(dir: &Path, overwrite: bool) -> Result<bool> {
    if !overwrite {
        let question = format!("Output folder '{}' already exists. Overwrite? (y/n)", dir.display());
        if !ask_yes_no(&question)? {
            return Ok(false);
        }
    }
    std::fs::remove_dir_all(dir)
        .with_context(|| format!("Failed to delete old output folder '{}'", dir.display()))?;
    println!("Old output folder '{}' deleted.", dir.display());
    Ok(true)
}

/// Write the padded frame next to the working directory and ask whether to continue.
fn confirm_preview(padded: &RgbaFrame, yes: bool) -> bool {
    if yes {
        return true;
    }

    let preview = Path::new(PREVIEW_FILE);
    let question = match codec::save_png(padded, preview) {
        Ok(()) => preview_question(preview),
        Err(e) => {
            log::warn!("Could not write preview image. ({})", e);
            "Continue without a preview? (y/n)".to_string()
        }
    };

    let approved = match ask_yes_no(&question) {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("Could not read answer. ({})", e);
            false
        }
    };

    if preview.exists() {
        match std::fs::remove_file(preview) {
            Ok(()) => log::info!("Preview image deleted."),
            Err(e) => log::warn!("Could not delete preview image. ({})", e),
        }
    }
    approved
}

fn preview_question(preview: &Path) -> String {
    format!(
        "Preview saved as '{}'. Open it in an image viewer, then: is the preview okay? (y/n)",
        preview.display()
    )
}

fn prompt(question: &str) -> Result<String> {
    print!("{}: ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_lowercase())
}

fn ask_yes_no(question: &str) -> Result<bool> {
    Ok(matches!(prompt(question)?.as_str(), "y" | "yes"))
}

/// Read a tile count; an empty answer takes `default`.
fn ask_u32(question: &str, default: u32) -> Result<u32> {
    let answer = prompt(&format!("{} [default {}]", question, default))?;
    if answer.is_empty() {
        return Ok(default);
    }
    answer
        .parse()
        .map_err(|_| anyhow::anyhow!("You must enter valid integer numbers for tiles, got '{}'", answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_question_names_the_file() {
        let question = preview_question(Path::new(PREVIEW_FILE));
        assert!(question.contains("'preview_padded.png'"));
        assert!(question.contains("Open it in an image viewer"));
        assert!(question.ends_with("(y/n)"));
    }

    #[test]
    fn test_cli_parses_grid_and_flags() {
        let args = Args::try_parse_from(["splitter", "a.png", "3", "4", "FFFFFF", "-s", "32", "--yes"]).unwrap();
        assert_eq!((args.tiles_x, args.tiles_y), (Some(3), Some(4)));
        assert_eq!(args.padding.as_deref(), Some("FFFFFF"));
        assert_eq!(args.tile_size, 32);
        assert!(args.yes);
    }
}
