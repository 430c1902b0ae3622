use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Add, Sub},
};

/// A position on a tile grid.  Used as a set and map key, so it hashes by value.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Distance between `self` and `other` according to the given metric.
    #[inline]
    pub fn distance(self, other: Position, metric: Distance) -> i32 {
        metric.between(self, other)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (i32, i32) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid distance metrics usable as path finding heuristics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    /// Sum of the axis differences.  Diagonal steps cost 2.
    Manhattan,
    /// Largest axis difference.  Diagonal steps cost 1.
    Chebyshev,
}

impl Distance {
    pub fn between(self, a: Position, b: Position) -> i32 {
        let x_diff = (a.x - b.x).abs();
        let y_diff = (a.y - b.y).abs();

        match self {
            Distance::Manhattan => x_diff + y_diff,
            Distance::Chebyshev => std::cmp::max(x_diff, y_diff),
        }
    }
}

impl Default for Distance {
    fn default() -> Self {
        Distance::Manhattan
    }
}
