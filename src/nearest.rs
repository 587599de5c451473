//! Rank points of interest by distance

use itertools::Itertools;

use crate::Point;

/// Up to `count` of `things` closest to `location`, nearest first
///
/// Distance is Manhattan distance; equally distant points keep their input
/// order. If the closest point is `location` itself, it is skipped, since
/// there is no path to be found to the tile the player is standing on.
///
/// # Examples
/// ```
/// use cw_dungeon::{nearest, Point};
///
/// let chests = [Point::new(9, 9), Point::new(2, 1), Point::new(1, 1)];
/// assert_eq!(
///     nearest(&chests, Point::new(1, 1), 1),
///     vec![Point::new(2, 1)]
/// );
/// ```
pub fn nearest(things: &[Point], location: Point, count: usize) -> Vec<Point> {
    let mut ranked = things
        .iter()
        .copied()
        .sorted_by_key(|thing| thing.distance(&location))
        .peekable();

    ranked.next_if_eq(&location);
    ranked.take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::nearest;
    use crate::Point;

    fn points() -> Vec<Point> {
        vec![
            Point::new(5, 5),
            Point::new(1, 1),
            Point::new(6, 5),
            Point::new(9, 9),
            Point::new(5, 3),
        ]
    }

    #[test]
    fn ranks_by_distance() {
        assert_eq!(
            nearest(&points(), Point::new(0, 0), 3),
            vec![Point::new(1, 1), Point::new(5, 3), Point::new(5, 5)]
        );
    }

    #[test]
    fn skips_own_tile() {
        assert_eq!(
            nearest(&points(), Point::new(5, 5), 2),
            vec![Point::new(6, 5), Point::new(5, 3)]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let things = [Point::new(3, 0), Point::new(0, 3), Point::new(2, 1)];
        assert_eq!(nearest(&things, Point::new(0, 0), 3), things.to_vec());
    }

    #[test]
    fn count_larger_than_available() {
        assert_eq!(nearest(&points(), Point::new(5, 5), 10).len(), 4);
        assert!(nearest(&[], Point::new(0, 0), 1).is_empty());
    }
}
