//! Find the player on the map by sliding a scribble over it

use itertools::Itertools;
use tracing::debug;

use crate::scribble::{ScribbleCell, ScribbleError};
use crate::{Grid, Point, Scribble, TileType};

/// Outcome of resolving the player's position from a located scribble
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// The scribble fits nowhere on the map
    NotFound,
    /// The scribble fits exactly one place; absolute player position
    Found(Point),
    /// The scribble fits several places; all candidate player positions
    Ambiguous(Vec<Point>),
}

/// Whether a scribble cell is consistent with the map tile below it
fn cell_matches(cell: ScribbleCell, tile: TileType) -> bool {
    match cell {
        ScribbleCell::Wildcard => true,
        // Player can stand on anything but a wall, even an off-palette tile
        ScribbleCell::Player => tile != TileType::Wall,
        // Fountain and chest look the same in a scribble
        ScribbleCell::Tile(TileType::Fountain) => {
            matches!(tile, TileType::Fountain | TileType::Chest)
        }
        ScribbleCell::Tile(expected) => expected == tile,
    }
}

/// Whether the scribble fits the grid with its top-left corner at `origin`
fn fits_at(grid: &Grid, scribble: &Scribble, origin: Point) -> bool {
    scribble.rows().iter().enumerate().all(|(y, row)| {
        let grid_row = &grid.rows()[origin.y + y][origin.x..];
        row.iter()
            .zip(grid_row)
            .all(|(cell, tile)| cell_matches(*cell, *tile))
    })
}

impl Scribble {
    /// Find every offset where the scribble fits `grid`
    ///
    /// Offsets are top-left corners of the scribble, in row-major scan
    /// order, and only where the whole scribble lies within the grid. They
    /// replace any previous matches.
    pub fn locate(&mut self, grid: &Grid) -> &[Point] {
        let rows = (grid.height() + 1).saturating_sub(self.height());
        let cols = (grid.width() + 1).saturating_sub(self.width());

        self.matches = (0..rows)
            .cartesian_product(0..cols)
            .map(|(y, x)| Point { x, y })
            .filter(|origin| fits_at(grid, self, *origin))
            .collect();

        debug!(matches = self.matches.len(), "Located scribble");
        &self.matches
    }

    /// Absolute player positions, one per match
    ///
    /// Without a player marker, the match offsets themselves are returned.
    pub fn player_positions(&self) -> Vec<Point> {
        let offset = self.player_location.unwrap_or_default();
        self.matches.iter().map(|m| m.offset(offset)).collect()
    }

    /// Resolve the player's position from the matches
    pub fn location(&self) -> Location {
        let mut positions = self.player_positions();
        match positions.len() {
            0 => Location::NotFound,
            1 => Location::Found(positions.remove(0)),
            _ => Location::Ambiguous(positions),
        }
    }
}

impl Grid {
    /// Parse scribble text and locate it on this grid
    pub fn search_by_scribble(&self, text: &str) -> Result<Scribble, ScribbleError> {
        let mut scribble = Scribble::parse(text)?;
        scribble.locate(self);
        Ok(scribble)
    }
}
