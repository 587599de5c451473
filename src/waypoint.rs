//! Routes that stop at fountains before running out of steps
//!
//! The player can only take a limited number of steps before having to
//! rest at a fountain. Long routes are therefore chained from point-to-point
//! legs, each ending at a fountain, none longer than the step budget.
//!
//! The search runs backwards from the target: from the current waypoint,
//! the nearest unvisited fountains are tried as the previous stop. A
//! fountain that can be reached from the start within budget closes a
//! route; otherwise the search continues from that fountain. This is a
//! bounded depth-first search, and it may miss feasible routes.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{Grid, Point, SearchConfig};

/// Path found for the player
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Points from start to end, both included. Empty if there is no path.
    pub path: Vec<Point>,
    /// Whether the path keeps within the step budget between fountains
    pub budgeted: bool,
}

impl Route {
    /// True if the target cannot be reached at all
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of moves along the path
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Partial route, from a fountain to the end
struct SearchState {
    /// Where the partial route begins
    at: Point,
    /// Legs between waypoints, the one closest to the end first
    legs: Vec<Vec<Point>>,
    /// Points covered by `legs`, not counting `at`
    length: usize,
    /// Fountains already used on this branch
    visited: HashSet<Point>,
}

/// Join the opening leg with the collected legs into one path
fn assemble(opening: &[Point], last: &[Point], legs: &[Vec<Point>]) -> Vec<Point> {
    let mut path = opening.to_vec();
    for leg in std::iter::once(last).chain(legs.iter().rev().map(Vec::as_slice)) {
        path.extend_from_slice(&leg[1..]);
    }
    path
}

impl Grid {
    /// Search for a path from `start` to `end` that visits fountains often enough
    ///
    /// No stretch between the start, consecutive fountains and the end may
    /// be longer than `config.steps`. A leg to a fountain or the end may
    /// take `steps` moves, the opening leg from `start` one move less.
    ///
    /// Returns the shortest route found, or `None` if there is none within
    /// the limits of the search.
    pub fn search_path_with_steps(
        &self,
        start: Point,
        end: Point,
        config: &SearchConfig,
    ) -> Option<Vec<Point>> {
        let costs = &config.costs;

        let direct = self.search_path(start, end, costs);
        if direct.is_empty() {
            return None;
        }
        if direct.len() <= config.steps {
            return Some(direct);
        }
        if self.fountains().is_empty() {
            return None;
        }

        let mut openings: HashMap<Point, Vec<Point>> = HashMap::new();
        let mut best: Option<Vec<Point>> = None;
        let mut expansions = 0;
        let mut stack = vec![SearchState {
            at: end,
            legs: Vec::new(),
            length: 0,
            visited: HashSet::new(),
        }];

        while let Some(state) = stack.pop() {
            if expansions >= config.max_expansions {
                warn!(expansions, "Waypoint search stopped at expansion limit");
                break;
            }
            expansions += 1;

            let candidates = self
                .fountains()
                .iter()
                .copied()
                .filter(|fountain| !state.visited.contains(fountain))
                .sorted_by_key(|fountain| fountain.distance(&state.at))
                .take(config.fan_out)
                .collect_vec();

            for fountain in candidates {
                // path includes its own endpoint, hence +1
                let leg = self.search_path(fountain, state.at, costs);
                if leg.is_empty() || leg.len() > config.steps + 1 {
                    continue;
                }
                let opening = openings
                    .entry(fountain)
                    .or_insert_with(|| self.search_path(start, fountain, costs));
                if opening.is_empty() {
                    continue;
                }

                let length = state.length + leg.len() - 1;
                let best_len = best.as_ref().map_or(usize::MAX, Vec::len);

                if opening.len() <= config.steps {
                    let solution = assemble(opening, &leg, &state.legs);
                    if solution.len() < best_len {
                        debug!(length = solution.len(), via = %fountain, "Found route");
                        best = Some(solution);
                    }
                } else if length < best_len {
                    let mut visited = state.visited.clone();
                    visited.insert(fountain);
                    let mut legs = state.legs.clone();
                    legs.push(leg);
                    stack.push(SearchState {
                        at: fountain,
                        legs,
                        length,
                        visited,
                    });
                }
            }
        }

        debug!(expansions, found = best.is_some(), "Waypoint search finished");
        best
    }

    /// Find a route from `from` to `to`, stopping at fountains if possible
    ///
    /// Falls back to the plain shortest path when no budgeted route is
    /// found; [Route::budgeted] tells which one was returned.
    pub fn find_path(&self, from: Point, to: Point, config: &SearchConfig) -> Route {
        match self.search_path_with_steps(from, to, config) {
            Some(path) => Route {
                path,
                budgeted: true,
            },
            None => {
                warn!(%from, %to, "No path found when counting steps, providing shortest path");
                Route {
                    path: self.search_path(from, to, &config.costs),
                    budgeted: false,
                }
            }
        }
    }
}
