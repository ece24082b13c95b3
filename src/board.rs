//! A player's private board: ship geometry plus per-cell resolution state.

use alloc::vec::Vec;
use rand::Rng;

use crate::common::{BoardError, Coord, ShotResult};
use crate::config::{BOARD_SIZE, MAX_PLACEMENT_ATTEMPTS};
use crate::ship::{Orientation, Ship};

/// State of a single board cell.
///
/// `Hit` supersedes `ShipPresent`; a resolved cell never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    Empty,
    ShipPresent,
    Hit,
    Miss,
}

impl Cell {
    /// `Hit` and `Miss` are terminal.
    pub fn is_resolved(self) -> bool {
        matches!(self, Cell::Hit | Cell::Miss)
    }
}

type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// Ship placements and the cell grid they are drawn on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: Grid,
    ships: Vec<Ship>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board state (no ships placed).
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            ships: Vec::new(),
        }
    }

    /// State of the cell at `coord`, or `None` when off the board.
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        if coord.in_bounds() {
            Some(self.cells[coord.y as usize][coord.x as usize])
        } else {
            None
        }
    }

    /// `true` for an on-board cell that no shot has resolved yet.
    pub fn is_unresolved(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|c| !c.is_resolved())
    }

    /// Ships placed so far, in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// `true` once at least one ship has been placed.
    pub fn has_fleet(&self) -> bool {
        !self.ships.is_empty()
    }

    /// Place a ship; on failure the board is left untouched.
    pub fn place_ship(
        &mut self,
        origin: Coord,
        length: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let ship = Ship::new(origin, length, orientation)?;
        if ship
            .cells()
            .any(|c| self.cells[c.y as usize][c.x as usize] != Cell::Empty)
        {
            return Err(BoardError::ShipOverlaps);
        }
        for c in ship.cells() {
            self.cells[c.y as usize][c.x as usize] = Cell::ShipPresent;
        }
        self.ships.push(ship);
        Ok(())
    }

    /// Returns a random non-overlapping ship of `length`, trying at most
    /// `MAX_PLACEMENT_ATTEMPTS` positions.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<Ship, BoardError> {
        if length == 0 || length > BOARD_SIZE {
            return Err(BoardError::UnableToPlaceShip { length });
        }
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (BOARD_SIZE - length, BOARD_SIZE - 1),
                Orientation::Vertical => (BOARD_SIZE - 1, BOARD_SIZE - length),
            };
            let origin = Coord::new(
                rng.random_range(0..=max_x) as u8,
                rng.random_range(0..=max_y) as u8,
            );
            let ship = Ship::new(origin, length, orientation)?;
            if ship
                .cells()
                .all(|c| self.cells[c.y as usize][c.x as usize] == Cell::Empty)
            {
                return Ok(ship);
            }
        }
        Err(BoardError::UnableToPlaceShip { length })
    }

    /// Randomly place one ship per entry of `lengths`, in order.
    ///
    /// Ships placed before a failing length stay on the board.
    pub fn auto_place_fleet<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        lengths: &[usize],
    ) -> Result<(), BoardError> {
        for &length in lengths {
            let ship = self.random_placement(rng, length)?;
            self.place_ship(ship.origin(), ship.length(), ship.orientation())?;
        }
        Ok(())
    }

    /// Resolve an incoming shot. Repeating a shot is a no-op reported as
    /// `AlreadyResolved`.
    pub fn apply_shot(&mut self, coord: Coord) -> Result<ShotResult, BoardError> {
        if !coord.in_bounds() {
            return Err(BoardError::OutOfBounds(coord));
        }
        let cell = &mut self.cells[coord.y as usize][coord.x as usize];
        let result = match *cell {
            Cell::Hit | Cell::Miss => ShotResult::AlreadyResolved,
            Cell::ShipPresent => {
                *cell = Cell::Hit;
                ShotResult::Hit
            }
            Cell::Empty => {
                *cell = Cell::Miss;
                ShotResult::Miss
            }
        };
        Ok(result)
    }

    /// Returns `true` when every cell of every placed ship is `Hit`.
    /// A board without ships is vacuously sunk.
    pub fn all_ships_sunk(&self) -> bool {
        self.ships.iter().all(|ship| {
            ship.cells()
                .all(|c| self.cells[c.y as usize][c.x as usize] == Cell::Hit)
        })
    }

    /// Copy safe to show the opponent: fleet geometry removed and un-hit
    /// ship cells shown as `Empty`.
    pub fn redacted(&self) -> Board {
        let mut cells = self.cells;
        for cell in cells.iter_mut().flatten() {
            if *cell == Cell::ShipPresent {
                *cell = Cell::Empty;
            }
        }
        Board {
            cells,
            ships: Vec::new(),
        }
    }
}
