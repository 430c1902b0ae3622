use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128PlusPlus as GameRng;
use std::collections::BTreeSet;
use tilesight::{field_of_view, visible_tiles, BoundedMap, Grid, Position, TileType, ViewableField};

fn random_walls(size: i32, seed: u64) -> Grid<TileType> {
    let mut rng = GameRng::seed_from_u64(seed);
    let mut map = Grid::new(size, size, TileType::Floor).unwrap();

    for y in 0..size {
        for x in 0..size {
            if rng.gen_bool(0.25) {
                map.set(x, y, TileType::Wall).unwrap();
            }
        }
    }

    map
}

fn sorted(tiles: impl IntoIterator<Item = Position>) -> BTreeSet<(i32, i32)> {
    tiles.into_iter().map(Into::into).collect()
}

/// Rotate a position a quarter turn about `center`.
fn rotate(pos: Position, center: Position) -> Position {
    Position::new(center.x - (pos.y - center.y), center.y + (pos.x - center.x))
}

#[test]
fn empty_map_reveals_square_around_origin() {
    let map = Grid::new(12, 7, TileType::Floor).unwrap();

    for &(origin, radius) in &[((0, 0), 3), ((5, 3), 2), ((11, 6), 4), ((6, 0), 10)] {
        let origin = Position::from(origin);
        let expected = map
            .positions()
            .map(|(pos, _)| pos)
            .filter(|&pos| (pos.x - origin.x).abs() <= radius && (pos.y - origin.y).abs() <= radius);

        assert_eq!(sorted(visible_tiles(&map, origin, radius)), sorted(expected));
    }
}

#[test]
fn quarter_turn_rotates_visible_set() {
    for seed in 0..20 {
        let map = random_walls(11, seed);
        let center = Position::new(5, 5);
        let mut rotated = Grid::new(11, 11, TileType::Floor).unwrap();

        for (pos, tile) in map.positions() {
            let turned = rotate(pos, center);
            rotated.set(turned.x, turned.y, *tile).unwrap();
        }

        let visible = visible_tiles(&map, center, 5);
        let visible_rotated = visible_tiles(&rotated, center, 5);

        assert_eq!(
            sorted(visible.iter().map(|&pos| rotate(pos, center))),
            sorted(visible_rotated),
            "seed {}",
            seed
        );
    }
}

#[test]
fn mirrored_map_mirrors_visible_set() {
    for seed in 100..110 {
        let map = random_walls(9, seed);
        let center = Position::new(4, 4);
        let mirror = |pos: Position| Position::new(8 - pos.x, pos.y);
        let mut mirrored = Grid::new(9, 9, TileType::Floor).unwrap();

        for (pos, tile) in map.positions() {
            let flipped = mirror(pos);
            mirrored.set(flipped.x, flipped.y, *tile).unwrap();
        }

        assert_eq!(
            sorted(visible_tiles(&map, center, 4).into_iter().map(mirror)),
            sorted(visible_tiles(&mirrored, center, 4)),
            "seed {}",
            seed
        );
    }
}

#[test]
fn thin_maps_show_whole_corridor() {
    let cases = [
        (1, 8, (0, 3), 4),
        (8, 1, (3, 0), 4),
        (1, 1, (0, 0), 3),
        (6, 1, (0, 0), 9),
    ];

    for &(w, h, origin, radius) in &cases {
        let map = Grid::new(w, h, TileType::Floor).unwrap();
        let origin = Position::from(origin);
        let expected = map
            .positions()
            .map(|(pos, _)| pos)
            .filter(|&pos| (pos.x - origin.x).abs() <= radius && (pos.y - origin.y).abs() <= radius);

        assert_eq!(sorted(visible_tiles(&map, origin, radius)), sorted(expected));
    }
}

#[test]
fn wall_in_corridor_stops_sight() {
    let mut map = Grid::new(1, 10, TileType::Floor).unwrap();
    map.set(0, 6, TileType::Wall).unwrap();

    let visible = visible_tiles(&map, Position::new(0, 2), 9);

    assert_eq!(sorted(visible), sorted((0..=6).map(|y| Position::new(0, y))));
}

/// A map whose coordinates start away from zero.
struct OffsetRoom {
    walls: Vec<Position>,
}

impl BoundedMap for OffsetRoom {
    fn bounds(&self) -> (i32, i32, i32, i32) {
        (10, -5, 14, -1)
    }
}

impl ViewableField for OffsetRoom {
    fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.walls.contains(&Position::new(x, y))
    }
}

#[test]
fn offset_bounds_are_translated() {
    let room = OffsetRoom {
        walls: vec![Position::new(11, -5)],
    };
    let visible = visible_tiles(&room, Position::new(10, -5), 3);

    assert!(visible.contains(&Position::new(10, -5)));
    assert!(visible.contains(&Position::new(11, -5)));
    assert!(!visible.contains(&Position::new(12, -5)));
    assert!(visible.contains(&Position::new(13, -2)));
    assert!(visible.iter().all(|pos| pos.x >= 10 && pos.y >= -5));
}

#[quickcheck]
fn visits_each_tile_once_origin_first(
    width: u8,
    height: u8,
    origin: (u8, u8),
    radius: u8,
    walls: Vec<(u8, u8)>,
) -> bool {
    let width = i32::from(width % 16) + 1;
    let height = i32::from(height % 16) + 1;
    let origin = Position::new(i32::from(origin.0) % width, i32::from(origin.1) % height);
    let radius = i32::from(radius % 10);
    let walls: Vec<Position> = walls
        .into_iter()
        .map(|(x, y)| Position::new(i32::from(x) % width, i32::from(y) % height))
        .collect();

    let mut visited = Vec::new();
    field_of_view(
        origin,
        width,
        height,
        radius,
        |pos| visited.push(pos),
        |pos| walls.contains(&pos),
    );

    let unique = sorted(visited.iter().copied());

    visited.first() == Some(&origin)
        && unique.len() == visited.len()
        && visited.iter().all(|pos| {
            pos.x >= 0
                && pos.y >= 0
                && pos.x < width
                && pos.y < height
                && (pos.x - origin.x).abs() <= radius
                && (pos.y - origin.y).abs() <= radius
        })
}
