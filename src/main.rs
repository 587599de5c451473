//! CLI for finding the player on a dungeon map

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cw_dungeon::{nearest, Grid, Location, Point, Scribble, SearchConfig};
use itertools::Itertools;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Locate the player from a scribble, and find the way to a target
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Dungeon map screenshot
    map: PathBuf,

    /// File, where to read the scribble. Use `-` for stdin.
    scribble: PathBuf,

    /// Search configuration in TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of steps between fountains
    #[arg(long)]
    steps: Option<usize>,

    /// Number of nearest fountains tried from each waypoint
    #[arg(long)]
    fan_out: Option<usize>,

    /// Write the classified map as JSON
    #[arg(long)]
    dump_grid: Option<PathBuf>,

    /// Write the located scribble as JSON
    #[arg(long)]
    dump_scribble: Option<PathBuf>,

    /// Where to go; the boss by default
    #[command(subcommand)]
    target: Option<Target>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Target {
    /// The boss
    Boss,
    /// The n-th nearest chest
    Chest {
        #[arg(default_value_t = 1)]
        nth: usize,
    },
    /// The n-th nearest monster
    Mob {
        #[arg(default_value_t = 1)]
        nth: usize,
    },
    /// A tile on the map
    Point { x: usize, y: usize },
}

impl Target {
    /// Resolve the target into a point on the map, as seen from `player`
    fn resolve(self, grid: &Grid, player: Point) -> anyhow::Result<Point> {
        let (things, nth, name) = match self {
            Target::Boss => return grid.boss().context("There is no boss on this map"),
            Target::Point { x, y } => return Ok(Point::new(x, y)),
            Target::Chest { nth } => (grid.chests(), nth, "chests"),
            Target::Mob { nth } => (grid.mobs(), nth, "monsters"),
        };
        if nth == 0 {
            bail!("Counting starts from 1");
        }
        let candidates = nearest(things, player, nth);
        match candidates.get(nth - 1) {
            Some(p) => Ok(*p),
            None => bail!("Requested {} nearest {}, found {}", nth, name, candidates.len()),
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
    }
}

fn search_config(args: &Args) -> anyhow::Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(fan_out) = args.fan_out {
        config.fan_out = fan_out;
    }
    Ok(config)
}

/// Read map and scribble, print player location and route
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = search_config(&args)?;

    let img = image::open(&args.map)
        .with_context(|| format!("Cannot open map {}", args.map.display()))?;
    let grid = Grid::from_image(&img.to_rgb8());
    info!("Read {}x{} map from {}", grid.width(), grid.height(), args.map.display());
    println!("{}", grid);

    let mut scribble: Scribble = read_input(&args.scribble)?.parse()?;
    scribble.locate(&grid);
    println!("{}", scribble);

    if let Some(path) = &args.dump_grid {
        fs::write(path, serde_json::to_string(&grid)?)?;
    }
    if let Some(path) = &args.dump_scribble {
        fs::write(path, serde_json::to_string(&scribble)?)?;
    }

    let player = match scribble.location() {
        Location::Found(p) => p,
        Location::NotFound => bail!("Scribble does not fit anywhere on the map"),
        Location::Ambiguous(candidates) => bail!(
            "Scribble fits {} places, player could be at {}",
            candidates.len(),
            candidates.iter().join(", ")
        ),
    };
    println!("Player is at {}", player);

    let target = args.target.unwrap_or(Target::Boss).resolve(&grid, player)?;
    let route = grid.find_path(player, target, &config);
    if route.is_empty() {
        bail!("No way from {} to {}", player, target);
    }
    if !route.budgeted {
        warn!("Route does not rest at fountains every {} steps", config.steps);
    }

    println!("{} steps to {}", route.steps(), target);
    println!("{}", route.path.iter().join(" "));
    Ok(())
}
