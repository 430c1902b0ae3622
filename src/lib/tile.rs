use serde::{Deserialize, Serialize};

use crate::{field_of_view::ViewableField, grid::Grid, path_find::PathableMap};

/// Kinds of tile a level is built from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum TileType {
    /// Nothing generated here yet.
    #[default]
    Empty,
    Wall,
    Floor,
    StairsUp,
    StairsDown,
}

impl TileType {
    pub fn blocks_sight(self) -> bool {
        matches!(self, TileType::Wall)
    }

    pub fn is_walkable(self) -> bool {
        !matches!(self, TileType::Wall)
    }
}

// Positions off the map behave like walls.

impl ViewableField for Grid<TileType> {
    fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(true, |tile| tile.blocks_sight())
    }
}

impl PathableMap for Grid<TileType> {
    fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(true, |tile| !tile.is_walkable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_walls_block() {
        let mut grid = Grid::new(3, 1, TileType::Floor).unwrap();
        grid.set(1, 0, TileType::Wall).unwrap();
        grid.set(2, 0, TileType::StairsDown).unwrap();

        assert!(!grid.is_opaque(0, 0));
        assert!(grid.is_opaque(1, 0));
        assert!(!grid.is_blocked(2, 0));
        assert!(grid.is_blocked(1, 0));
        assert!(grid.is_opaque(3, 0));
        assert!(grid.is_blocked(-1, 0));
        assert!(TileType::Empty.is_walkable());
    }
}
