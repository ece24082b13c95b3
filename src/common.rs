//! Common types for the game rules: coordinates, player slots, shot results
//! and errors.

use crate::config::BOARD_SIZE;

/// A cell address, `x` is the column and `y` the row, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns `true` when the address lies on the board.
    pub fn in_bounds(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }
}

impl From<(u8, u8)> for Coord {
    fn from((x, y): (u8, u8)) -> Self {
        Coord { x, y }
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the two fixed player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerId {
    Zero,
    One,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::Zero, PlayerId::One];

    /// Slot index into a two-element array.
    pub fn index(self) -> usize {
        match self {
            PlayerId::Zero => 0,
            PlayerId::One => 1,
        }
    }

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Zero => PlayerId::One,
            PlayerId::One => PlayerId::Zero,
        }
    }

    pub fn from_index(index: usize) -> Option<PlayerId> {
        match index {
            0 => Some(PlayerId::Zero),
            1 => Some(PlayerId::One),
            _ => None,
        }
    }
}

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// Outcome of applying a shot to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    /// The shot struck a ship segment.
    Hit,
    /// The shot landed in open water.
    Miss,
    /// The cell was already resolved; nothing changed.
    AlreadyResolved,
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate is off the board.
    OutOfBounds(Coord),
    /// Ship would run off the board.
    ShipOutOfBounds,
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Every random placement attempt for a ship collided.
    UnableToPlaceShip { length: usize },
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds(c) => write!(f, "Coordinate {} is off the board", c),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::UnableToPlaceShip { length } => {
                write!(f, "Unable to place ship of length {}", length)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// Reasons a submitted snapshot cannot be reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Snapshot claims a slot other than the one bound to its connection.
    SlotMismatch { expected: PlayerId, found: PlayerId },
}

impl core::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SnapshotError::SlotMismatch { expected, found } => write!(
                f,
                "Snapshot for {} submitted on the connection of {}",
                found, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SnapshotError {}
