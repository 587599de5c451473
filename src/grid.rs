//! Typed dungeon grid, built from a map screenshot

use std::collections::BTreeMap;
use std::fmt;

use image::{GenericImageView, Pixel};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{Point, TileType};

/// Side length of a rendered tile, in pixels
pub const TILE_SIZE: u32 = 5;

/// Pixels skipped along each edge of a tile when sampling its color
const SAMPLE_INSET: u32 = 1;

/// Rows given to [Grid::from_tiles] do not form a rectangle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no tiles")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Classified dungeon map
///
/// Special tiles are indexed once, at construction, in row-major scan
/// order. The grid is not modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredGrid")]
pub struct Grid {
    /// Tile rows, top to bottom
    #[serde(rename = "pixels")]
    tiles: Vec<Vec<TileType>>,
    /// Number of tiles per type
    types: BTreeMap<TileType, usize>,
    /// Location of the boss; the last one seen if there are several
    boss: Option<Point>,
    chests: Vec<Point>,
    fountains: Vec<Point>,
    mobs: Vec<Point>,
}

/// Grid as read back from storage
///
/// Only the tiles are trusted; counts and special tile lists are rebuilt.
#[derive(Deserialize)]
struct StoredGrid {
    pixels: Vec<Vec<TileType>>,
}

impl TryFrom<StoredGrid> for Grid {
    type Error = GridError;

    fn try_from(stored: StoredGrid) -> Result<Self, Self::Error> {
        Grid::from_tiles(stored.pixels)
    }
}

impl Grid {
    /// Build a grid from a decoded map image
    ///
    /// The image is read as attached blocks of `TILE_SIZE`×`TILE_SIZE`
    /// pixels. Each block is classified from the mean color of its interior,
    /// leaving out the border pixels. Trailing pixels that do not fill a
    /// whole block are ignored.
    pub fn from_image<I>(img: &I) -> Self
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let (width, height) = img.dimensions();
        let tiles = (0..height / TILE_SIZE)
            .map(|row| {
                (0..width / TILE_SIZE)
                    .map(|col| {
                        TileType::classify(Self::sample(img, col * TILE_SIZE, row * TILE_SIZE))
                    })
                    .collect()
            })
            .collect();
        Self::index(tiles)
    }

    /// Build a grid from rows of tiles
    ///
    /// Returns error, if there are no tiles or the rows differ in length.
    pub fn from_tiles(tiles: Vec<Vec<TileType>>) -> Result<Self, GridError> {
        let expected = tiles.first().map(Vec::len).ok_or(GridError::Empty)?;
        if expected == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, found)) = tiles
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(GridError::RaggedRow {
                row,
                expected,
                found,
            });
        }
        Ok(Self::index(tiles))
    }

    /// Mean color of the block interior with top-left corner at (`x0`, `y0`)
    fn sample<I>(img: &I, x0: u32, y0: u32) -> [u8; 3]
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let span = SAMPLE_INSET..TILE_SIZE - SAMPLE_INSET;
        let mut sums = [0u32; 3];
        for y in span.clone() {
            for x in span.clone() {
                let channels = img.get_pixel(x0 + x, y0 + y).to_rgb().0;
                for (sum, channel) in sums.iter_mut().zip(channels) {
                    *sum += u32::from(channel);
                }
            }
        }
        let area = (TILE_SIZE - 2 * SAMPLE_INSET).pow(2);
        // Integer division floors, and the mean of u8 values fits in u8
        sums.map(|sum| (sum / area) as u8)
    }

    /// Count tile types and collect the special tiles
    fn index(tiles: Vec<Vec<TileType>>) -> Self {
        let mut types = BTreeMap::new();
        let mut boss = None;
        let mut chests = Vec::new();
        let mut fountains = Vec::new();
        let mut mobs = Vec::new();

        for (y, row) in tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let here = Point { x, y };
                match tile {
                    TileType::Boss => boss = Some(here),
                    TileType::Chest => chests.push(here),
                    TileType::Fountain => fountains.push(here),
                    TileType::Monster => mobs.push(here),
                    _ => (),
                }
                *types.entry(*tile).or_insert(0) += 1;
            }
        }

        let grid = Grid {
            tiles,
            types,
            boss,
            chests,
            fountains,
            mobs,
        };
        debug!(
            width = grid.width(),
            height = grid.height(),
            types = ?grid.types,
            "Built grid"
        );
        grid
    }

    /// Number of tile columns
    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    /// Number of tile rows
    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    /// Tile at `p`, or `None` outside of the grid
    pub fn get(&self, p: Point) -> Option<TileType> {
        self.tiles.get(p.y).and_then(|row| row.get(p.x)).copied()
    }

    /// Tile rows, top to bottom
    pub fn rows(&self) -> &[Vec<TileType>] {
        &self.tiles
    }

    /// Number of tiles of the given type
    pub fn count(&self, tile: TileType) -> usize {
        self.types.get(&tile).copied().unwrap_or(0)
    }

    pub fn boss(&self) -> Option<Point> {
        self.boss
    }

    pub fn chests(&self) -> &[Point] {
        &self.chests
    }

    pub fn fountains(&self) -> &[Point] {
        &self.fountains
    }

    pub fn mobs(&self) -> &[Point] {
        &self.mobs
    }

    /// Whether the tile at `p` exists and can be walked on
    pub fn is_traversable(&self, p: Point) -> bool {
        self.get(p).is_some_and(|tile| tile.is_traversable())
    }

    /// Tiles that can be entered from `p` in one step
    ///
    /// Order is left, right, up, down. Grid edges do not wrap.
    pub fn neighbors(&self, p: Point) -> Vec<Point> {
        let mut candidates = Vec::with_capacity(4);
        if p.x > 0 {
            candidates.push(Point::new(p.x - 1, p.y));
        }
        candidates.push(Point::new(p.x + 1, p.y));
        if p.y > 0 {
            candidates.push(Point::new(p.x, p.y - 1));
        }
        candidates.push(Point::new(p.x, p.y + 1));

        candidates.retain(|n| self.is_traversable(*n));
        candidates
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "This map has {} chests, {} fountains and {} monsters.",
            self.count(TileType::Chest),
            self.count(TileType::Fountain),
            self.count(TileType::Monster),
        )?;
        match self.boss {
            Some(boss) => write!(f, " Boss located at {}.", boss),
            None => write!(f, " No boss found."),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use image::{Rgb, RgbImage};

    use super::{Grid, GridError, TILE_SIZE};
    use crate::{Point, TileType};

    /// Parse a compact grid: `#` wall, `.` path, `F` fountain, `C` chest,
    /// `M` monster, `B` boss, `L` landmark, `W` campfire, `?` unknown.
    pub(crate) fn grid(layout: &str) -> Grid {
        let rows = layout
            .trim()
            .lines()
            .map(|row| {
                row.trim()
                    .chars()
                    .map(|c| match c {
                        '#' => TileType::Wall,
                        '.' => TileType::Path,
                        'F' => TileType::Fountain,
                        'C' => TileType::Chest,
                        'M' => TileType::Monster,
                        'B' => TileType::Boss,
                        'L' => TileType::Landmark,
                        'W' => TileType::Campfire,
                        _ => TileType::Unknown,
                    })
                    .collect()
            })
            .collect();
        Grid::from_tiles(rows).unwrap()
    }

    /// Render tiles as a screenshot would, with a noisy tile border
    fn render(grid: &Grid) -> RgbImage {
        let width = grid.width() as u32 * TILE_SIZE;
        let height = grid.height() as u32 * TILE_SIZE;
        RgbImage::from_fn(width, height, |x, y| {
            let (ix, iy) = (x % TILE_SIZE, y % TILE_SIZE);
            if ix == 0 || iy == 0 || ix == TILE_SIZE - 1 || iy == TILE_SIZE - 1 {
                Rgb([120, 10, 200])
            } else {
                let p = Point::new((x / TILE_SIZE) as usize, (y / TILE_SIZE) as usize);
                Rgb(grid.get(p).unwrap().palette())
            }
        })
    }

    #[test]
    fn image_round_trip() {
        let expected = grid(
            "
            #####
            #.F.#
            #CMB#
            #LW?#
            #####",
        );
        let built = Grid::from_image(&render(&expected));
        assert_eq!(built, expected);
        assert_eq!(built.width(), 5);
        assert_eq!(built.height(), 5);
    }

    #[test]
    fn trailing_pixels_are_ignored() {
        let img = RgbImage::from_pixel(12, 7, Rgb([255, 255, 255]));
        let built = Grid::from_image(&img);
        assert_eq!((built.width(), built.height()), (2, 1));
        assert_eq!(built.count(TileType::Path), 2);
    }

    #[test]
    fn indexes_special_tiles_in_scan_order() {
        let g = grid(
            "
            F.C.M
            B.F.C
            M.B.F",
        );
        assert_eq!(g.boss(), Some(Point::new(2, 2)));
        assert_eq!(g.chests(), &[Point::new(2, 0), Point::new(4, 1)]);
        assert_eq!(
            g.fountains(),
            &[Point::new(0, 0), Point::new(2, 1), Point::new(4, 2)]
        );
        assert_eq!(g.mobs(), &[Point::new(4, 0), Point::new(0, 2)]);
        assert_eq!(g.count(TileType::Path), 6);
        assert_eq!(g.count(TileType::Wall), 0);
        assert_eq!(
            g.to_string(),
            "This map has 2 chests, 3 fountains and 2 monsters. Boss located at {2, 2}."
        );
    }

    #[test]
    fn rejects_malformed_rows() {
        assert_eq!(Grid::from_tiles(vec![]), Err(GridError::Empty));
        assert_eq!(
            Grid::from_tiles(vec![vec![TileType::Path; 3], vec![TileType::Path; 2]]),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn neighbor_counts_on_open_grid() {
        let g = grid(
            "
            ....
            ....
            ....",
        );
        assert_eq!(g.neighbors(Point::new(0, 0)).len(), 2);
        assert_eq!(g.neighbors(Point::new(3, 2)).len(), 2);
        assert_eq!(g.neighbors(Point::new(1, 0)).len(), 3);
        assert_eq!(g.neighbors(Point::new(3, 1)).len(), 3);
        assert_eq!(g.neighbors(Point::new(1, 1)).len(), 4);
    }

    #[test]
    fn neighbors_skip_walls_and_unknown() {
        let g = grid(
            "
            .#.
            ?..
            ...",
        );
        assert_eq!(
            g.neighbors(Point::new(1, 1)),
            vec![Point::new(2, 1), Point::new(1, 2)]
        );
        for p in g.neighbors(Point::new(2, 2)) {
            assert!(p.x < g.width() && p.y < g.height());
        }
    }

    #[test]
    fn serialized_layout() {
        let g = grid("B.F");
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["pixels"], serde_json::json!([[7, 1, 3]]));
        assert_eq!(json["types"]["1"], 1);
        assert_eq!(json["boss"], serde_json::json!({"X": 0, "Y": 0}));
        assert_eq!(json["fountains"], serde_json::json!([{"X": 2, "Y": 0}]));

        let back: Grid = serde_json::from_value(json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn stored_ragged_rows_are_rejected() {
        let json = serde_json::json!({
            "pixels": [[1, 1, 1], [1]],
            "types": {"1": 4},
            "boss": null,
            "chests": [],
            "fountains": [],
            "mobs": [],
        });
        let err = serde_json::from_value::<Grid>(json).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 tiles"), "{}", err);

        let empty = serde_json::json!({"pixels": []});
        assert!(serde_json::from_value::<Grid>(empty).is_err());
    }

    #[test]
    fn stored_index_is_rebuilt_from_tiles() {
        let json = serde_json::json!({
            "pixels": [[7, 4, 3], [6, 1, 0]],
            "types": {"1": 99},
            "boss": {"X": 5, "Y": 5},
            "chests": [],
            "fountains": [{"X": 9, "Y": 9}],
            "mobs": [],
        });
        let g: Grid = serde_json::from_value(json).unwrap();
        assert_eq!(g, grid("BCF\nM.#"));
        assert_eq!(g.boss(), Some(Point::new(0, 0)));
        assert_eq!(g.fountains(), &[Point::new(2, 0)]);
        assert_eq!(g.count(TileType::Path), 1);
    }
}
