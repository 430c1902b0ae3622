use std::{fmt, io};
use thiserror::Error;

/// Grid axis named in grid errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors raised by [crate::Grid] construction and access.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum GridError {
    #[error("size {axis} ({size}) is less than 1")]
    InvalidSize { axis: Axis, size: i32 },
    #[error("{axis} ({value}) is outside of 0..{bound}")]
    OutOfBounds { axis: Axis, value: i32, bound: i32 },
    #[error("grid size has not been set")]
    Uninitialized,
    #[error("expected {expected} cells, found {actual}")]
    CellCount { expected: usize, actual: usize },
}

/// Errors that can occur when loading [crate::Settings].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("unable to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
