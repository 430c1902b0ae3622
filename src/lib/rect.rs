use serde::{Deserialize, Serialize};

use crate::util::Position;

/// Axis-aligned rectangle with inclusive corners.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Rect {
        assert!(w > 0);
        assert!(h > 0);

        Rect {
            x1: x,
            y1: y,
            x2: x + w - 1,
            y2: y + h - 1,
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x1 && pos.x <= self.x2 && pos.y >= self.y1 && pos.y <= self.y2
    }

    /// Positions covered by the rectangle in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let Rect { x1, y1, x2, y2 } = *self;

        (y1..=y2).flat_map(move |y| (x1..=x2).map(move |x| Position::new(x, y)))
    }

    /// Positions along the border of the rectangle, each reported once.
    pub fn edge_positions(&self) -> impl Iterator<Item = Position> {
        let rect = *self;

        self.positions()
            .filter(move |p| p.x == rect.x1 || p.x == rect.x2 || p.y == rect.y1 || p.y == rect.y2)
    }
}
