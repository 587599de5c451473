//! Player-drawn map snippets
//!
//! A scribble is the small emoji grid that the game shows when the player
//! "marks their way on paper". It covers the immediate surroundings of the
//! player, whose own tile is drawn as a yellow square.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::tile::TileCodeError;
use crate::{Grid, Point, TileType};

/// Malformed scribble text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScribbleError {
    #[error("scribble is empty")]
    Empty,
    #[error("scribble row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// One cell of a scribble
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ScribbleCell {
    /// A regular tile
    Tile(TileType),
    /// The player's own tile; its true type is hidden
    Player,
    /// Anything the scribble alphabet has no glyph for; matches every tile
    Wildcard,
}

impl ScribbleCell {
    const S_WALL: char = '\u{2b1b}';
    const S_PATH: char = '\u{2b1c}';
    const S_PLAYER: char = '\u{1f7e8}';
    const S_FOUNTAIN: char = '\u{1f7e9}';
    const S_CAMPFIRE: char = '\u{1f7e7}';
    const S_LANDMARK: char = '\u{1f7e6}';
    const S_MONSTER: char = '\u{1f7ea}';
    const S_WILDCARD: char = '\u{1f7eb}';

    const CODE_PLAYER: u8 = 254;
    const CODE_WILDCARD: u8 = 255;

    /// Interpret one glyph of scribble text
    pub fn from_emoji(c: char) -> Self {
        match c {
            Self::S_WALL => Self::Tile(TileType::Wall),
            Self::S_PATH => Self::Tile(TileType::Path),
            Self::S_PLAYER => Self::Player,
            Self::S_FOUNTAIN => Self::Tile(TileType::Fountain),
            Self::S_CAMPFIRE => Self::Tile(TileType::Campfire),
            Self::S_LANDMARK => Self::Tile(TileType::Landmark),
            Self::S_MONSTER => Self::Tile(TileType::Monster),
            _ => Self::Wildcard,
        }
    }

    /// Cell that the game would draw for a grid tile
    pub fn from_tile(tile: TileType) -> Self {
        match tile {
            TileType::Chest => Self::Tile(TileType::Fountain),
            TileType::Boss | TileType::Unknown => Self::Wildcard,
            other => Self::Tile(other),
        }
    }

    pub fn emoji(&self) -> char {
        match self {
            Self::Tile(tile) => tile.emoji().unwrap_or(Self::S_WILDCARD),
            Self::Player => Self::S_PLAYER,
            Self::Wildcard => Self::S_WILDCARD,
        }
    }
}

impl From<ScribbleCell> for u8 {
    fn from(cell: ScribbleCell) -> Self {
        match cell {
            ScribbleCell::Tile(tile) => tile.into(),
            ScribbleCell::Player => ScribbleCell::CODE_PLAYER,
            ScribbleCell::Wildcard => ScribbleCell::CODE_WILDCARD,
        }
    }
}

impl TryFrom<u8> for ScribbleCell {
    type Error = TileCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            Self::CODE_PLAYER => Ok(Self::Player),
            Self::CODE_WILDCARD => Ok(Self::Wildcard),
            code => TileType::try_from(code).map(Self::Tile),
        }
    }
}

/// Unicode variation selectors, which carry presentation hints only
fn is_variation_selector(c: char) -> bool {
    matches!(c, '\u{fe00}'..='\u{fe0f}' | '\u{e0100}'..='\u{e01ef}')
}

/// Parsed scribble, and where it was found on a map
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredScribble")]
pub struct Scribble {
    /// Cell rows, top to bottom
    pub(crate) points: Vec<Vec<ScribbleCell>>,
    /// Player offset within the scribble
    pub(crate) player_location: Option<Point>,
    /// Top-left offsets where the scribble fits the map
    ///
    /// Filled in by [Scribble::locate].
    pub(crate) matches: Vec<Point>,
}

/// Scribble as read back from storage, before the shape is checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredScribble {
    points: Vec<Vec<ScribbleCell>>,
    player_location: Option<Point>,
    #[serde(default)]
    matches: Vec<Point>,
}

impl TryFrom<StoredScribble> for Scribble {
    type Error = ScribbleError;

    fn try_from(stored: StoredScribble) -> Result<Self, Self::Error> {
        check_rows(&stored.points)?;
        Ok(Scribble {
            points: stored.points,
            player_location: stored.player_location,
            matches: stored.matches,
        })
    }
}

/// Rows must be non-empty and of equal length
fn check_rows(points: &[Vec<ScribbleCell>]) -> Result<(), ScribbleError> {
    let expected = points.first().map_or(0, Vec::len);
    if expected == 0 {
        return Err(ScribbleError::Empty);
    }
    match points
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != expected)
    {
        Some((row, found)) => Err(ScribbleError::RaggedRow {
            row,
            expected,
            found,
        }),
        None => Ok(()),
    }
}

impl Scribble {
    /// Parse scribble text
    ///
    /// Each line is a row of emoji, one per tile. Variation selectors are
    /// dropped before interpretation. When several player markers are
    /// present, the last one wins.
    ///
    /// Returns error, if there are no tiles or the rows differ in length.
    ///
    /// # Examples
    /// ```
    /// use cw_dungeon::{Point, Scribble};
    ///
    /// let scribble = Scribble::parse("⬛⬜⬜\n⬛🟨🟩").unwrap();
    /// assert_eq!((scribble.width(), scribble.height()), (3, 2));
    /// assert_eq!(scribble.player_location(), Some(Point::new(1, 1)));
    /// ```
    pub fn parse(text: &str) -> Result<Self, ScribbleError> {
        let mut points: Vec<Vec<ScribbleCell>> = Vec::new();
        let mut player_location = None;

        for (y, line) in text.trim().lines().enumerate() {
            let mut row = Vec::new();
            for (x, c) in line.chars().filter(|c| !is_variation_selector(*c)).enumerate() {
                let cell = ScribbleCell::from_emoji(c);
                if cell == ScribbleCell::Player {
                    player_location = Some(Point { x, y });
                }
                row.push(cell);
            }
            trace!(y, row = %row.iter().map(ScribbleCell::emoji).join(""), "Parsed scribble row");
            points.push(row);
        }

        check_rows(&points)?;

        Ok(Scribble {
            points,
            player_location,
            matches: Vec::new(),
        })
    }

    /// Cut a scribble out of a grid, as the game would draw it
    ///
    /// - `origin`: Top-left corner of the window in the grid.
    /// - `width`, `height`: Window size in tiles.
    /// - `player`: Player offset within the window, if any.
    ///
    /// Returns `None`, if the window is empty or does not fit the grid.
    pub fn from_grid(
        grid: &Grid,
        origin: Point,
        width: usize,
        height: usize,
        player: Option<Point>,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let points = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if player == Some(Point { x, y }) {
                            Some(ScribbleCell::Player)
                        } else {
                            grid.get(origin.offset(Point { x, y }))
                                .map(ScribbleCell::from_tile)
                        }
                    })
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()?;
        // The player cell is not looked up, so check the far corner explicitly
        grid.get(origin.offset(Point::new(width - 1, height - 1)))?;

        Some(Scribble {
            points,
            player_location: player,
            matches: Vec::new(),
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.points.first().map_or(0, Vec::len)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.points.len()
    }

    /// Cell rows, top to bottom
    pub fn rows(&self) -> &[Vec<ScribbleCell>] {
        &self.points
    }

    /// Player offset within the scribble
    pub fn player_location(&self) -> Option<Point> {
        self.player_location
    }

    /// Top-left offsets where the scribble was found on the map
    pub fn matches(&self) -> &[Point] {
        &self.matches
    }

    /// Render as emoji text, one line per row
    pub fn to_emojis(&self) -> String {
        self.points
            .iter()
            .map(|row| row.iter().map(ScribbleCell::emoji).join(""))
            .join("\n")
    }
}

impl FromStr for Scribble {
    type Err = ScribbleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Scribble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} matches: [{}]",
            self.matches.len(),
            self.matches.iter().join(" ")
        )
    }
}
