mod bitgrid;
pub mod error;
mod field_of_view;
mod grid;
pub mod magicnum;
mod path_find;
mod rect;
mod saveload;
pub mod settings;
mod tile;
pub mod util;
mod vision;

use std::hash::BuildHasher;
use wyhash::WyHash;

pub use bitgrid::BitGrid;
pub use error::{GridError, SettingsError};
pub use field_of_view::{field_of_view, visible_tiles, ViewableField};
pub use grid::Grid;
pub use path_find::{a_star, a_star_weighted, find_path, neighbours, Connectivity, PathableMap};
pub use rect::Rect;
pub use settings::Settings;
pub use tile::TileType;
pub use util::{Distance, Position};
pub use vision::FieldOfView;

/// A trait for a map that has minimum and maximum coordinate bounds.
pub trait BoundedMap {
    /// `min_x`, `min_y`, `max_x`, `max_y`.  Note that the latter two are inclusive.
    fn bounds(&self) -> (i32, i32, i32, i32);
}

/// Builds WyHash hashers with a fixed seed, so iteration order of coordinate sets is the same
/// from run to run.
#[derive(Clone, Copy, Debug, Default)]
pub struct WyHashState;

impl BuildHasher for WyHashState {
    type Hasher = WyHash;

    fn build_hasher(&self) -> WyHash {
        WyHash::with_seed(magicnum::POSITION_HASH)
    }
}

pub type HashMap<K, V> = std::collections::HashMap<K, V, WyHashState>;
pub type HashSet<T> = std::collections::HashSet<T, WyHashState>;
