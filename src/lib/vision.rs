use serde::{Deserialize, Serialize};

use crate::{
    bitgrid::BitGrid, field_of_view::visible_tiles, util::Position, BoundedMap, ViewableField,
};

/// Tiles visible to a viewer, stored as a square of bits centered on the viewer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FieldOfView {
    pub tiles: BitGrid,
    pub range: i32,
    pub center: Position,
    pub dirty: bool,
}

impl FieldOfView {
    pub fn new(range: i32) -> FieldOfView {
        assert!(range >= 0);

        let span = match range.checked_mul(2).and_then(|r| r.checked_add(1)) {
            Some(span) => span,
            None => panic!("FieldOfView range {} is too large", range),
        };

        FieldOfView {
            tiles: BitGrid::new(span, span),
            range,
            center: Position::new(0, 0),
            dirty: true,
        }
    }

    #[inline]
    fn offset(&self, pos: Position) -> Position {
        Position::new(
            pos.x - self.center.x + self.range,
            pos.y - self.center.y + self.range,
        )
    }

    /// Recalculate the visible tiles of `map` as seen from `center`.
    pub fn recalculate<T>(&mut self, map: &T, center: Position)
    where
        T: BoundedMap + ViewableField,
    {
        self.center = center;
        self.tiles.zero_out_bits();

        for pos in visible_tiles(map, center, self.range) {
            self.set(pos, true);
        }

        self.dirty = false;
    }

    /// Set whether a tile is visible.
    ///
    /// Panics if `pos` is further than `range` tiles from the center on either axis.
    #[inline]
    pub fn set(&mut self, pos: Position, value: bool) {
        let offset_pos = self.offset(pos);
        self.tiles.set_bit(offset_pos.x, offset_pos.y, value);
    }

    #[inline]
    pub fn get(&self, pos: Position) -> bool {
        let offset_pos = self.offset(pos);
        self.tiles.get_bit(offset_pos.x, offset_pos.y)
    }

    /// Visible positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let corner = Position::new(self.center.x - self.range, self.center.y - self.range);

        self.tiles.iter_ones().map(move |pos| pos + corner)
    }

    /// Mark every visible tile in `seen`, a map-sized memory of tiles seen so far.
    pub fn mark_seen(&self, seen: &mut BitGrid) {
        self.tiles.apply_bits_onto(
            seen,
            self.center.x - self.range,
            self.center.y - self.range,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::Grid, tile::TileType};

    #[test]
    fn starts_dirty_and_empty() {
        let fov = FieldOfView::new(3);

        assert!(fov.dirty);
        assert_eq!(fov.tiles.width(), 7);
        assert_eq!(fov.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn oversized_range_panics() {
        FieldOfView::new(i32::MAX / 2 + 1);
    }

    #[test]
    fn recalculate_near_map_corner() {
        let map = Grid::new(10, 10, TileType::Floor).unwrap();
        let mut fov = FieldOfView::new(2);

        fov.recalculate(&map, Position::new(1, 1));

        assert!(!fov.dirty);
        assert!(fov.get(Position::new(0, 0)));
        assert!(fov.get(Position::new(3, 3)));
        assert!(!fov.get(Position::new(4, 1)));
        assert!(!fov.get(Position::new(-1, 1)));
        assert_eq!(fov.iter().count(), 16);
        assert_eq!(fov.iter().next(), Some(Position::new(0, 0)));
    }

    #[test]
    fn walls_hide_tiles_behind_them() {
        let mut map = Grid::new(7, 3, TileType::Floor).unwrap();
        map.set_vline(0, 2, 3, TileType::Wall).unwrap();

        let mut fov = FieldOfView::new(5);
        fov.recalculate(&map, Position::new(1, 1));

        assert!(fov.get(Position::new(3, 1)));
        assert!(!fov.get(Position::new(4, 1)));
        assert!(!fov.get(Position::new(6, 0)));
    }

    #[test]
    fn mark_seen_clips_to_seen_grid() {
        let map = Grid::new(4, 4, TileType::Floor).unwrap();
        let mut fov = FieldOfView::new(1);
        let mut seen = BitGrid::new(3, 3);

        fov.recalculate(&map, Position::new(3, 3));
        fov.mark_seen(&mut seen);

        assert_eq!(seen.iter_ones().collect::<Vec<_>>(), vec![Position::new(2, 2)]);
    }
}
