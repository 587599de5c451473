//! Find the player, and a way to the boss, in a Chat Wars dungeon
//!
//! The dungeon map arrives as a screenshot, where each tile is a 5×5 pixel
//! block of a fixed palette color. The player's position is only known from
//! a scribble: a small emoji grid of the surroundings, with the player drawn
//! as a yellow square. This crate
//!
//! 1. classifies the screenshot into a [Grid] of [TileType]s,
//! 2. parses the [Scribble] and slides it over the grid to find where the
//!    player can be, and
//! 3. plans a [Route] to a target, resting at fountains before the step
//!    budget runs out.
//!
//! # Examples
//! ```
//! use cw_dungeon::{Grid, Location, Point, SearchConfig, TileType};
//! use image::{Rgb, RgbImage};
//!
//! let rows: Vec<Vec<TileType>> = ["#######", "#..F.B#", "#######"]
//!     .iter()
//!     .map(|row| {
//!         row.chars()
//!             .map(|c| match c {
//!                 '#' => TileType::Wall,
//!                 'F' => TileType::Fountain,
//!                 'B' => TileType::Boss,
//!                 _ => TileType::Path,
//!             })
//!             .collect()
//!     })
//!     .collect();
//! let screenshot = RgbImage::from_fn(7 * 5, 3 * 5, |x, y| {
//!     Rgb(rows[(y / 5) as usize][(x / 5) as usize].palette())
//! });
//!
//! let grid = Grid::from_image(&screenshot);
//! let boss = grid.boss().unwrap();
//! assert_eq!(boss, Point::new(5, 1));
//!
//! let scribble = grid.search_by_scribble("⬛⬛⬛\n⬜🟨🟩\n⬛⬛⬛").unwrap();
//! let Location::Found(player) = scribble.location() else {
//!     panic!("expected a unique location, got {}", scribble);
//! };
//! assert_eq!(player, Point::new(2, 1));
//!
//! let route = grid.find_path(player, boss, &SearchConfig::default());
//! assert!(route.budgeted);
//! assert_eq!(route.steps(), 3);
//! ```

mod astar;
pub mod grid;
mod locate;
#[cfg(feature = "mapgen")]
pub mod map_generator;
mod nearest;
mod point;
pub mod scribble;
mod settings;
pub mod tile;
mod waypoint;

pub use grid::{Grid, GridError, TILE_SIZE};
pub use locate::Location;
pub use nearest::nearest;
pub use point::Point;
pub use scribble::{Scribble, ScribbleCell, ScribbleError};
pub use settings::{SearchConfig, TravelCosts};
pub use tile::{TileCodeError, TileType};
pub use waypoint::Route;
