//! Tuning knobs for the pathfinders
//!
//! The defaults reflect the in-game step limit and the costs that have
//! produced sensible routes so far. All values can be overridden from a
//! TOML file:
//!
//! ```toml
//! steps = 30
//! fan_out = 8
//!
//! [costs]
//! monster = 3
//! ```

use std::path::Path;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::TileType;

/// Cost of stepping onto a tile, by tile type. Lower is better.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelCosts {
    pub chest: usize,
    pub monster: usize,
    pub fountain: usize,
    /// Any other traversable tile
    pub default: usize,
}

impl TravelCosts {
    pub fn cost(&self, tile: TileType) -> usize {
        match tile {
            TileType::Chest => self.chest,
            TileType::Monster => self.monster,
            TileType::Fountain => self.fountain,
            _ => self.default,
        }
    }

    /// Smallest cost of any single step
    pub fn min_cost(&self) -> usize {
        self.chest
            .min(self.monster)
            .min(self.fountain)
            .min(self.default)
    }
}

impl Default for TravelCosts {
    fn default() -> Self {
        Self {
            chest: 1,
            monster: 1,
            fountain: 4,
            default: 5,
        }
    }
}

/// Parameters of the fountain-budgeted route search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of steps between fountains
    pub steps: usize,
    /// Number of nearest unvisited fountains tried from each waypoint
    pub fan_out: usize,
    /// Upper bound on waypoints expanded before the search gives up
    pub max_expansions: usize,
    pub costs: TravelCosts,
}

impl SearchConfig {
    pub const DEFAULT_STEPS: usize = 35;
    pub const DEFAULT_FAN_OUT: usize = 20;
    pub const DEFAULT_MAX_EXPANSIONS: usize = 5000;

    /// Read configuration from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading search configuration from {}", path.display());
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()
    }

    /// Read configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            steps: Self::DEFAULT_STEPS,
            fan_out: Self::DEFAULT_FAN_OUT,
            max_expansions: Self::DEFAULT_MAX_EXPANSIONS,
            costs: TravelCosts::default(),
        }
    }
}
