use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Axis, GridError},
    rect::Rect,
    util::Position,
    BoundedMap,
};

/// A fixed-size 2D store of tile values, indexed by `(x, y)` in row-major order.
///
/// A `Grid::default()` has no size yet; every access on it fails with
/// [GridError::Uninitialized] until [Grid::resize] is called.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(
    bound(
        serialize = "T: Copy + PartialEq + Serialize",
        deserialize = "T: Copy + Deserialize<'de>"
    ),
    try_from = "RawGrid<T>"
)]
pub struct Grid<T> {
    size_x: i32,
    size_y: i32,
    #[serde(with = "crate::saveload::run_length_encoded")]
    cells: Vec<T>,
}

/// Grid data as stored, checked before it becomes a [Grid].
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Copy + Deserialize<'de>"))]
struct RawGrid<T> {
    size_x: i32,
    size_y: i32,
    #[serde(with = "crate::saveload::run_length_encoded")]
    cells: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = GridError;

    fn try_from(raw: RawGrid<T>) -> Result<Self, GridError> {
        // An unsized grid saves as zero sizes and no cells.
        if !(raw.size_x == 0 && raw.size_y == 0 && raw.cells.is_empty()) {
            check_size(raw.size_x, raw.size_y)?;
            check_cell_count(cell_count(raw.size_x, raw.size_y), raw.cells.len())?;
        }

        Ok(Self {
            size_x: raw.size_x,
            size_y: raw.size_y,
            cells: raw.cells,
        })
    }
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            size_x: 0,
            size_y: 0,
            cells: Vec::new(),
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Create a new `size_x` by `size_y` grid with every cell set to `value`.
    pub fn new(size_x: i32, size_y: i32, value: T) -> Result<Self, GridError> {
        check_size(size_x, size_y)?;

        Ok(Self {
            size_x,
            size_y,
            cells: vec![value; cell_count(size_x, size_y)],
        })
    }

    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    pub fn is_initialized(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Returns true if the coordinates lie inside the grid.  Always false for an unsized grid.
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size_x && y < self.size_y
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        y as usize * self.size_x as usize + x as usize
    }

    fn validate(&self, x: i32, y: i32) -> Result<usize, GridError> {
        if !self.is_initialized() {
            return Err(GridError::Uninitialized);
        }
        if x < 0 || x >= self.size_x {
            return Err(GridError::OutOfBounds {
                axis: Axis::X,
                value: x,
                bound: self.size_x,
            });
        }
        if y < 0 || y >= self.size_y {
            return Err(GridError::OutOfBounds {
                axis: Axis::Y,
                value: y,
                bound: self.size_y,
            });
        }

        Ok(self.idx(x, y))
    }

    pub fn get(&self, x: i32, y: i32) -> Result<&T, GridError> {
        let idx = self.validate(x, y)?;
        Ok(&self.cells[idx])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut T, GridError> {
        let idx = self.validate(x, y)?;
        Ok(&mut self.cells[idx])
    }

    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<(), GridError> {
        let idx = self.validate(x, y)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Reallocate the grid to a new size.  Cells that exist in both the old and new sizes keep
    /// their values, new cells are set to `value`.  Resizing to the current size is a no-op.
    pub fn resize(&mut self, size_x: i32, size_y: i32, value: T) -> Result<(), GridError> {
        check_size(size_x, size_y)?;

        if self.size_x == size_x && self.size_y == size_y {
            return Ok(());
        }

        let mut cells = Vec::with_capacity(cell_count(size_x, size_y));

        for y in 0..size_y {
            for x in 0..size_x {
                if self.is_in_bounds(x, y) {
                    cells.push(self.cells[self.idx(x, y)].clone());
                } else {
                    cells.push(value.clone());
                }
            }
        }

        self.size_x = size_x;
        self.size_y = size_y;
        self.cells = cells;

        Ok(())
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: T) {
        for cell in self.cells.iter_mut() {
            *cell = value.clone();
        }
    }

    /// Set every cell inside `rect` to `value`.
    pub fn fill_rect(&mut self, rect: &Rect, value: T) -> Result<(), GridError> {
        self.validate(rect.x1, rect.y1)?;
        self.validate(rect.x2, rect.y2)?;

        for pos in rect.positions() {
            let idx = self.idx(pos.x, pos.y);
            self.cells[idx] = value.clone();
        }

        Ok(())
    }

    /// Set the border cells of `rect` to `value`, leaving the inside untouched.
    pub fn draw_rect(&mut self, rect: &Rect, value: T) -> Result<(), GridError> {
        self.validate(rect.x1, rect.y1)?;
        self.validate(rect.x2, rect.y2)?;

        for pos in rect.edge_positions() {
            let idx = self.idx(pos.x, pos.y);
            self.cells[idx] = value.clone();
        }

        Ok(())
    }

    pub fn set_hline(&mut self, x1: i32, x2: i32, y: i32, value: T) -> Result<(), GridError> {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };

        self.fill_rect(&Rect::new(x1, y, x2 - x1 + 1, 1), value)
    }

    pub fn set_vline(&mut self, y1: i32, y2: i32, x: i32, value: T) -> Result<(), GridError> {
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };

        self.fill_rect(&Rect::new(x, y1, 1, y2 - y1 + 1), value)
    }

    /// Iterate over cell values in row-major order.  Empty for an unsized grid.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterate over positions and their cell values in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (Position, &T)> {
        let size_x = self.size_x as usize;

        self.cells.iter().enumerate().map(move |(i, cell)| {
            (Position::new((i % size_x) as i32, (i / size_x) as i32), cell)
        })
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Reset every cell to the default value of `T`.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }
}

impl<T: Clone + PartialEq> Grid<T> {
    /// The first position in row-major order holding `value`.
    pub fn find(&self, value: &T) -> Option<Position> {
        self.find_all(value).next()
    }

    pub fn find_all<'a>(&'a self, value: &'a T) -> impl Iterator<Item = Position> + 'a {
        self.positions()
            .filter(move |(_, cell)| *cell == value)
            .map(|(pos, _)| pos)
    }

    /// A uniformly chosen position holding `value`, or [None] if there is none.
    pub fn random_position_of<R: Rng + ?Sized>(&self, value: &T, rng: &mut R) -> Option<Position> {
        let candidates: Vec<Position> = self.find_all(value).collect();

        candidates.choose(rng).copied()
    }
}

impl<T> BoundedMap for Grid<T> {
    fn bounds(&self) -> (i32, i32, i32, i32) {
        (0, 0, self.size_x - 1, self.size_y - 1)
    }
}

/// Number of cells in a grid of the given size.  Sizes must already be checked.
#[inline]
fn cell_count(size_x: i32, size_y: i32) -> usize {
    size_x as usize * size_y as usize
}

pub(crate) fn check_cell_count(expected: usize, actual: usize) -> Result<(), GridError> {
    if expected != actual {
        return Err(GridError::CellCount { expected, actual });
    }

    Ok(())
}

fn check_size(size_x: i32, size_y: i32) -> Result<(), GridError> {
    if size_x < 1 {
        return Err(GridError::InvalidSize {
            axis: Axis::X,
            size: size_x,
        });
    }
    if size_y < 1 {
        return Err(GridError::InvalidSize {
            axis: Axis::Y,
            size: size_y,
        });
    }

    Ok(())
}
