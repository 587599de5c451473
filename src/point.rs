//! Grid coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location in the dungeon grid, in tile units
///
/// Ordering is lexicographic by `x`, then `y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "X")]
    pub x: usize,
    #[serde(rename = "Y")]
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`
    pub fn distance(&self, other: &Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Translate by a non-negative offset
    pub fn offset(&self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Point::new(2, 7);
        let b = Point::new(5, 3);
        assert_eq!(a.distance(&b), 7);
        assert_eq!(b.distance(&a), 7);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn displays_in_braces() {
        assert_eq!(Point::new(19, 5).to_string(), "{19, 5}");
    }

    #[test]
    fn serializes_with_uppercase_fields() {
        let json = serde_json::to_string(&Point::new(3, 4)).unwrap();
        assert_eq!(json, r#"{"X":3,"Y":4}"#);
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Point::new(3, 4));
    }
}
