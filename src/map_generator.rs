//! Synthetic dungeon maps, for demos and tests

use image::{Rgb, RgbImage};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{Grid, GridError, Point, Scribble, TileType, TILE_SIZE};

/// Dungeon generator
pub struct MapGenerator {
    random: StdRng,
}

impl MapGenerator {
    const DIRECTIONS: [(i32, i32); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate a dungeon with loops, framed by walls
    ///
    /// Corridors are carved from a random odd cell. Among the open tiles,
    /// one becomes the boss, and a share of the rest fountains, chests,
    /// monsters, campfires and landmarks.
    ///
    /// Returns error, if the map is too small to hold a corridor.
    pub fn generate_map(&mut self, height: usize, width: usize) -> Result<Grid, GridError> {
        if height < 3 || width < 3 {
            return Err(GridError::Empty);
        }
        let mut tiles = vec![vec![TileType::Wall; width]; height];

        let start_x = 1 + self.random.gen_range(0..(width - 1) / 2) * 2;
        let start_y = 1 + self.random.gen_range(0..(height - 1) / 2) * 2;
        tiles[start_y][start_x] = TileType::Path;
        self.carve(&mut tiles, start_x, start_y);

        let mut open: Vec<Point> = tiles
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, tile)| **tile == TileType::Path)
                    .map(move |(x, _)| Point { x, y })
            })
            .collect();
        open.shuffle(&mut self.random);

        let total = open.len();
        let features = [
            (TileType::Boss, 1),
            (TileType::Fountain, total / 25),
            (TileType::Chest, total / 40),
            (TileType::Monster, total / 30),
            (TileType::Campfire, total / 100),
            (TileType::Landmark, total / 100),
        ];
        let mut spots = open.into_iter();
        for (tile, count) in features {
            for p in spots.by_ref().take(count) {
                tiles[p.y][p.x] = tile;
            }
        }

        Grid::from_tiles(tiles)
    }

    /// Carve corridors recursively
    ///
    /// From the current cell, go into random directions, two tiles at a
    /// time. Unvisited cells are opened and explored; now and then the wall
    /// towards a visited cell is removed too, which creates loops.
    fn carve(&mut self, tiles: &mut [Vec<TileType>], x: usize, y: usize) {
        let height = tiles.len();
        let width = tiles[0].len();
        let mut directions = Self::DIRECTIONS.to_vec();
        directions.shuffle(&mut self.random);

        for (dx, dy) in directions {
            let nx = (x as i32 + dx) as usize;
            let ny = (y as i32 + dy) as usize;
            // Negative coordinates wrap around and fail the check as well
            if nx >= width - 1 || ny >= height - 1 {
                continue;
            }
            let between = ((x as i32 + dx / 2) as usize, (y as i32 + dy / 2) as usize);

            if tiles[ny][nx] == TileType::Wall {
                tiles[between.1][between.0] = TileType::Path;
                tiles[ny][nx] = TileType::Path;
                self.carve(tiles, nx, ny);
            } else if self.random.gen_bool(0.05) {
                tiles[between.1][between.0] = TileType::Path;
            }
        }
    }

    /// Pick a random tile the player could stand on
    pub fn random_open_tile(&mut self, grid: &Grid) -> Option<Point> {
        let open: Vec<Point> = (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| Point { x, y }))
            .filter(|p| grid.is_traversable(*p))
            .collect();
        open.choose(&mut self.random).copied()
    }
}

/// Scribble of the tiles within `radius` of the player, clipped to the map
pub fn scribble_around(grid: &Grid, player: Point, radius: usize) -> Option<Scribble> {
    let origin = Point::new(
        player.x.saturating_sub(radius),
        player.y.saturating_sub(radius),
    );
    let width = (player.x + radius + 1).min(grid.width()).checked_sub(origin.x)?;
    let height = (player.y + radius + 1).min(grid.height()).checked_sub(origin.y)?;
    let offset = Point::new(player.x - origin.x, player.y - origin.y);
    Scribble::from_grid(grid, origin, width, height, Some(offset))
}

/// Draw the map the way the game does, one palette block per tile
pub fn render(grid: &Grid) -> RgbImage {
    let width = grid.width() as u32 * TILE_SIZE;
    let height = grid.height() as u32 * TILE_SIZE;
    RgbImage::from_fn(width, height, |x, y| {
        let p = Point::new((x / TILE_SIZE) as usize, (y / TILE_SIZE) as usize);
        Rgb(grid.get(p).unwrap_or(TileType::Unknown).palette())
    })
}
