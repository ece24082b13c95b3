//! Ship definitions and placement geometry.

use crate::common::{BoardError, Coord};
use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on the board. Horizontal ships extend towards larger `x`,
/// vertical ones towards larger `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    origin: Coord,
    length: usize,
    orientation: Orientation,
}

impl Ship {
    /// Place a ship at `origin` with `orientation`.
    /// Fails when any covered cell falls off the board; zero-length ships
    /// cover nothing and are rejected the same way.
    pub fn new(origin: Coord, length: usize, orientation: Orientation) -> Result<Self, BoardError> {
        if length == 0 || !origin.in_bounds() {
            return Err(BoardError::ShipOutOfBounds);
        }
        let start = match orientation {
            Orientation::Horizontal => origin.x as usize,
            Orientation::Vertical => origin.y as usize,
        };
        if start.checked_add(length).map_or(true, |end| end > BOARD_SIZE) {
            return Err(BoardError::ShipOutOfBounds);
        }
        Ok(Ship {
            origin,
            length,
            orientation,
        })
    }

    /// Origin of the ship.
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Orientation of the ship.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cells covered by the ship, starting at the origin.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.length as u8).map(move |i| match self.orientation {
            Orientation::Horizontal => Coord::new(self.origin.x + i, self.origin.y),
            Orientation::Vertical => Coord::new(self.origin.x, self.origin.y + i),
        })
    }

    /// Returns `true` if the ship covers `coord`.
    pub fn covers(&self, coord: Coord) -> bool {
        self.cells().any(|c| c == coord)
    }
}
