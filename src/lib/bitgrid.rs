use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Axis, GridError},
    grid::check_cell_count,
    util::Position,
};

/// A width-by-height-sized BitVec for convenient handling of a grid of boolean values.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawBitGrid")]
pub struct BitGrid {
    width: i32,
    height: i32,
    #[serde(with = "crate::saveload::bit_vec")]
    bv: BitVec,
}

#[derive(Deserialize)]
struct RawBitGrid {
    width: i32,
    height: i32,
    #[serde(with = "crate::saveload::bit_vec")]
    bv: BitVec,
}

impl TryFrom<RawBitGrid> for BitGrid {
    type Error = GridError;

    fn try_from(raw: RawBitGrid) -> Result<Self, GridError> {
        if raw.width < 0 {
            return Err(GridError::InvalidSize {
                axis: Axis::X,
                size: raw.width,
            });
        }
        if raw.height < 0 {
            return Err(GridError::InvalidSize {
                axis: Axis::Y,
                size: raw.height,
            });
        }
        check_cell_count(raw.width as usize * raw.height as usize, raw.bv.len())?;

        Ok(Self {
            width: raw.width,
            height: raw.height,
            bv: raw.bv,
        })
    }
}

impl BitGrid {
    /// Create a new BitGrid with the given width and height.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width >= 0);
        assert!(height >= 0);

        Self {
            width,
            height,
            bv: bitvec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Reset all elements to false.
    pub fn zero_out_bits(&mut self) {
        self.bv.fill(false);
    }

    /// Get the bool at the given x and y.
    ///
    /// Returns false if out of bounds.
    #[inline]
    pub fn get_bit(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            false
        } else {
            self.bv[self.index(x, y)]
        }
    }

    /// Set the bool at the given x and y to value, returning true if the bit changed.
    ///
    /// Panics if out of bounds.
    #[inline]
    pub fn set_bit(&mut self, x: i32, y: i32, value: bool) -> bool {
        assert!(self.in_bounds(x, y), "BitGrid: ({}, {}) out of bounds", x, y);

        let index = self.index(x, y);
        let changed = self.bv[index] != value;

        self.bv.set(index, value);
        changed
    }

    /// Number of true elements.
    pub fn count_ones(&self) -> usize {
        self.bv.count_ones()
    }

    /// Iterate over the positions of all true elements in row-major order.
    pub fn iter_ones(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as usize;

        self.bv
            .iter_ones()
            .map(move |i| Position::new((i % width) as i32, (i / width) as i32))
    }

    /// Apply all true elements of this BitGrid onto another.
    ///
    /// Bits that would fall outside of the other grid, given the offset, are skipped.
    pub fn apply_bits_onto(&self, other: &mut BitGrid, offset_x: i32, offset_y: i32) {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.bv[self.index(x, y)] && other.in_bounds(x + offset_x, y + offset_y) {
                    let other_index = other.index(x + offset_x, y + offset_y);
                    other.bv.set(other_index, true);
                }
            }
        }
    }
}
