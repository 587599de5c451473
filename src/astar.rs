//! Point-to-point A* search
//!
//! f(n) = g(n) + h(n), where g is the accumulated travel cost of the tiles
//! entered so far and h is the Manhattan distance to the goal, times the
//! cheapest step cost.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::{Grid, Point, TravelCosts};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct State {
    priority: usize,
    position: Point,
}

// Reversed on both keys, so that the max-heap pops the lowest priority
// first, and the lowest point on ties.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walk `came_from` links back from `current`, return the path start first
fn reconstruct_path(came_from: &HashMap<Point, Point>, mut current: Point) -> Vec<Point> {
    let mut path = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

impl Grid {
    /// Find the cheapest path from `start` to `goal`
    ///
    /// Moves are to the four side neighbors, onto traversable tiles only.
    /// Each step costs according to the tile entered.
    ///
    /// Returns the path from `start` to `goal`, both included, together with
    /// its total cost. `None` if `goal` cannot be reached.
    pub fn shortest_path(
        &self,
        start: Point,
        goal: Point,
        costs: &TravelCosts,
    ) -> Option<(Vec<Point>, usize)> {
        self.get(start)?;
        self.get(goal)?;

        // Scaled by the cheapest step, so that h never overestimates
        let heuristic = |p: Point| p.distance(&goal) * costs.min_cost();

        let mut frontier = BinaryHeap::new();
        let mut came_from = HashMap::new();
        let mut cost_so_far = HashMap::new();

        cost_so_far.insert(start, 0);
        frontier.push(State {
            priority: heuristic(start),
            position: start,
        });

        while let Some(State { priority, position }) = frontier.pop() {
            let current_cost = cost_so_far[&position];
            if position == goal {
                return Some((reconstruct_path(&came_from, goal), current_cost));
            }
            // Superseded by a cheaper entry for the same tile
            if priority > current_cost + heuristic(position) {
                continue;
            }

            for next in self.neighbors(position) {
                let Some(tile) = self.get(next) else {
                    continue;
                };
                let new_cost = current_cost + costs.cost(tile);
                if cost_so_far.get(&next).map_or(true, |&known| new_cost < known) {
                    cost_so_far.insert(next, new_cost);
                    came_from.insert(next, position);
                    frontier.push(State {
                        priority: new_cost + heuristic(next),
                        position: next,
                    });
                }
            }
        }

        None
    }

    /// Find the cheapest path from `start` to `goal`, start first
    ///
    /// Returns an empty path, if `goal` cannot be reached.
    pub fn search_path(&self, start: Point, goal: Point, costs: &TravelCosts) -> Vec<Point> {
        self.shortest_path(start, goal, costs)
            .map(|(path, _)| path)
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::grid::tests::grid;
    use crate::{Grid, Point, TileType, TravelCosts};

    /// Every step moves to a side neighbor that can be walked on
    pub(crate) fn assert_walkable(grid: &Grid, path: &[Point]) {
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1, "{} -> {}", pair[0], pair[1]);
            assert!(grid.is_traversable(pair[1]), "{} is blocked", pair[1]);
        }
    }

    #[test]
    fn open_grid_path_is_manhattan() {
        let g = Grid::from_tiles(vec![vec![TileType::Path; 8]; 6]).unwrap();
        let costs = TravelCosts::default();
        for (start, goal) in [
            (Point::new(0, 0), Point::new(7, 5)),
            (Point::new(6, 1), Point::new(2, 4)),
            (Point::new(3, 3), Point::new(3, 0)),
        ] {
            let path = g.search_path(start, goal, &costs);
            assert_eq!(path.len(), start.distance(&goal) + 1);
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&goal));
            assert_walkable(&g, &path);
        }
    }

    #[test]
    fn path_to_boss_corner() {
        let mut tiles = vec![vec![TileType::Path; 20]; 20];
        tiles[19][19] = TileType::Boss;
        let g = Grid::from_tiles(tiles).unwrap();

        let path = g.search_path(Point::new(0, 0), Point::new(19, 19), &TravelCosts::default());
        assert_eq!(path.len(), 39);
        assert_eq!(g.boss(), path.last().copied());
    }

    #[test]
    fn path_inside_walled_frame() {
        let mut tiles = vec![vec![TileType::Path; 22]; 22];
        for i in 0..22 {
            tiles[0][i] = TileType::Wall;
            tiles[21][i] = TileType::Wall;
            tiles[i][0] = TileType::Wall;
            tiles[i][21] = TileType::Wall;
        }
        tiles[20][20] = TileType::Boss;
        let g = Grid::from_tiles(tiles).unwrap();

        let path = g.search_path(Point::new(1, 1), Point::new(20, 20), &TravelCosts::default());
        assert_eq!(path.len(), 39);
        assert_walkable(&g, &path);
    }

    #[test]
    fn prefers_cheap_tiles() {
        let g = grid(
            "
            .....
            C###C
            CCCCC",
        );
        let start = Point::new(0, 0);
        let goal = Point::new(4, 0);

        let (path, cost) = g
            .shortest_path(start, goal, &TravelCosts::default())
            .unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(cost, 12);
        assert!(path.contains(&Point::new(2, 2)));
        assert_walkable(&g, &path);

        let flat = TravelCosts {
            chest: 1,
            monster: 1,
            fountain: 1,
            default: 1,
        };
        let (path, cost) = g.shortest_path(start, goal, &flat).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(cost, 4);
    }

    #[test]
    fn no_path_through_walls() {
        let g = grid(
            "
            .#.
            .#.
            .#.",
        );
        let costs = TravelCosts::default();
        assert!(g.search_path(Point::new(0, 0), Point::new(2, 2), &costs).is_empty());
        // Goal itself is a wall
        assert!(g.search_path(Point::new(0, 0), Point::new(1, 1), &costs).is_empty());
        // Goal outside of the grid
        assert!(g.search_path(Point::new(0, 0), Point::new(0, 3), &costs).is_empty());
    }

    #[test]
    fn unknown_tiles_block() {
        let g = grid(
            "
            .?.
            ###",
        );
        assert!(g
            .search_path(Point::new(0, 0), Point::new(2, 0), &TravelCosts::default())
            .is_empty());
    }

    #[test]
    fn start_equals_goal() {
        let g = grid("...");
        let p = Point::new(1, 0);
        assert_eq!(
            g.shortest_path(p, p, &TravelCosts::default()),
            Some((vec![p], 0))
        );
    }

    #[test]
    fn ties_are_deterministic() {
        let g = Grid::from_tiles(vec![vec![TileType::Path; 6]; 6]).unwrap();
        let costs = TravelCosts::default();
        let first = g.search_path(Point::new(0, 0), Point::new(5, 5), &costs);
        for _ in 0..5 {
            assert_eq!(g.search_path(Point::new(0, 0), Point::new(5, 5), &costs), first);
        }
    }
}
