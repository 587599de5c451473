//! CLI for generating dungeon maps

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cw_dungeon::map_generator::{render, scribble_around, MapGenerator};

/// Random dungeon generator, with a scribble of a random player position
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generated map height in tiles
    #[arg(long, default_value_t = 41)]
    height: usize,

    /// Generated map width in tiles
    #[arg(long, default_value_t = 41)]
    width: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Scribble reaches this many tiles around the player
    #[arg(long, default_value_t = 3)]
    radius: usize,

    /// Where to save the map screenshot
    output: PathBuf,
}

/// Generate map, save it and print a scribble
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut gen = MapGenerator::new(args.seed);
    let grid = gen.generate_map(args.height, args.width)?;
    render(&grid)
        .save(&args.output)
        .with_context(|| format!("Cannot save map to {}", args.output.display()))?;
    println!("{}", grid);

    let player = gen
        .random_open_tile(&grid)
        .context("Map has no open tiles")?;
    let scribble =
        scribble_around(&grid, player, args.radius).context("Cannot cut scribble from map")?;
    println!("{}", scribble.to_emojis());
    println!("Player is at {}", player);
    Ok(())
}
