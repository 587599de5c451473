//! Tile types and color classification

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Classified content of one map tile
///
/// Serialized as a stable numeric code, so that persisted maps can be
/// read back by later versions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TileType {
    Wall,
    Path,
    Landmark,
    Fountain,
    Chest,
    Campfire,
    Monster,
    Boss,
    Unknown,
}

/// Numeric code does not name a tile type
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tile code {0}")]
pub struct TileCodeError(pub u8);

impl TileType {
    pub const ALL: [TileType; 9] = [
        TileType::Wall,
        TileType::Path,
        TileType::Landmark,
        TileType::Fountain,
        TileType::Chest,
        TileType::Campfire,
        TileType::Monster,
        TileType::Boss,
        TileType::Unknown,
    ];

    /// Classify a tile from the floored channel means of its sample area
    ///
    /// Bands overlap, so the order of the checks is significant. Colors
    /// outside of the game palette become [TileType::Unknown].
    pub fn classify(rgb: [u8; 3]) -> Self {
        let [red, green, blue] = rgb;
        if red < 50 && green < 50 && blue < 50 {
            TileType::Wall
        } else if red > 200 && green > 200 && blue > 200 {
            TileType::Path
        } else if red > 200 && green > 150 {
            TileType::Campfire
        } else if red > 200 {
            TileType::Boss
        } else if green > 200 && blue >= 100 {
            TileType::Chest
        } else if green > 160 {
            TileType::Fountain
        } else if blue > 200 {
            if red > 100 && green > 100 {
                TileType::Monster
            } else {
                TileType::Landmark
            }
        } else {
            warn!(red, green, blue, "Unknown color combination");
            TileType::Unknown
        }
    }

    /// Representative color of the tile type
    ///
    /// [TileType::classify] maps each of these back to the same type.
    pub const fn palette(&self) -> [u8; 3] {
        match self {
            TileType::Wall => [0, 0, 0],
            TileType::Path => [255, 255, 255],
            TileType::Landmark => [60, 90, 230],
            TileType::Fountain => [30, 180, 30],
            TileType::Chest => [0, 255, 255],
            TileType::Campfire => [255, 165, 0],
            TileType::Monster => [140, 120, 255],
            TileType::Boss => [255, 0, 0],
            TileType::Unknown => [128, 128, 128],
        }
    }

    /// Whether the player may step onto this tile
    pub fn is_traversable(&self) -> bool {
        !matches!(self, TileType::Wall | TileType::Unknown)
    }

    /// Emoji used for the tile in a scribble, if it has one
    ///
    /// Chests share the fountain glyph; boss and unknown tiles have none.
    pub const fn emoji(&self) -> Option<char> {
        match self {
            TileType::Wall => Some('\u{2b1b}'),
            TileType::Path => Some('\u{2b1c}'),
            TileType::Fountain | TileType::Chest => Some('\u{1f7e9}'),
            TileType::Campfire => Some('\u{1f7e7}'),
            TileType::Landmark => Some('\u{1f7e6}'),
            TileType::Monster => Some('\u{1f7ea}'),
            TileType::Boss | TileType::Unknown => None,
        }
    }
}

impl From<TileType> for u8 {
    fn from(tile: TileType) -> Self {
        match tile {
            TileType::Wall => 0,
            TileType::Path => 1,
            TileType::Landmark => 2,
            TileType::Fountain => 3,
            TileType::Chest => 4,
            TileType::Campfire => 5,
            TileType::Monster => 6,
            TileType::Boss => 7,
            TileType::Unknown => 9,
        }
    }
}

impl TryFrom<u8> for TileType {
    type Error = TileCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TileType::ALL
            .into_iter()
            .find(|tile| u8::from(*tile) == code)
            .ok_or(TileCodeError(code))
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileType::Wall => "wall",
            TileType::Path => "path",
            TileType::Landmark => "landmark",
            TileType::Fountain => "fountain",
            TileType::Chest => "chest",
            TileType::Campfire => "campfire",
            TileType::Monster => "monster",
            TileType::Boss => "boss",
            TileType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
