//! Per-player aggregate exchanged with clients every round.

use alloc::vec::Vec;

use crate::board::Board;
use crate::common::{Coord, PlayerId};
use crate::config::BOARD_SIZE;

/// What a player knows about one cell of the opponent's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Observation {
    Unknown,
    Hit,
    Miss,
}

/// Hits and misses on the opponent's board; never carries ship positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationGrid {
    cells: [[Observation; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for ObservationGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationGrid {
    pub fn new() -> Self {
        Self {
            cells: [[Observation::Unknown; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, coord: Coord) -> Option<Observation> {
        if coord.in_bounds() {
            Some(self.cells[coord.y as usize][coord.x as usize])
        } else {
            None
        }
    }

    fn set(&mut self, coord: Coord, observation: Observation) {
        if coord.in_bounds() {
            self.cells[coord.y as usize][coord.x as usize] = observation;
        }
    }
}

/// Full state of one player as seen by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub player_id: PlayerId,
    pub own_board: Board,
    pub opponent_view: ObservationGrid,
    /// Outgoing shots in first-declared order, no duplicates.
    pub shots_fired: Vec<Coord>,
    /// Own shots confirmed as hits on the opponent.
    pub hits: Vec<Coord>,
    pub current_turn: PlayerId,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
}

impl PlayerState {
    /// Fresh state for `player_id` around an already populated board.
    /// Player 0 moves first.
    pub fn new(player_id: PlayerId, own_board: Board) -> Self {
        Self {
            player_id,
            own_board,
            opponent_view: ObservationGrid::new(),
            shots_fired: Vec::new(),
            hits: Vec::new(),
            current_turn: PlayerId::Zero,
            game_over: false,
            winner: None,
        }
    }

    /// Declare intent to fire at `(x, y)`. Rejects off-board and repeated
    /// targets. Resolution happens only on the authority.
    pub fn record_outgoing_shot(&mut self, x: u8, y: u8) -> bool {
        let coord = Coord::new(x, y);
        if !coord.in_bounds() || self.shots_fired.contains(&coord) {
            return false;
        }
        self.shots_fired.push(coord);
        true
    }

    /// Record the resolved outcome of one of this player's shots.
    pub fn record_observation(&mut self, x: u8, y: u8, hit: bool) {
        let coord = Coord::new(x, y);
        if hit {
            self.opponent_view.set(coord, Observation::Hit);
            if !self.hits.contains(&coord) {
                self.hits.push(coord);
            }
        } else {
            self.opponent_view.set(coord, Observation::Miss);
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.current_turn == self.player_id
    }

    /// The same state with the fleet geometry of `own_board` hidden.
    pub fn redacted(&self) -> PlayerState {
        PlayerState {
            own_board: self.own_board.redacted(),
            ..self.clone()
        }
    }
}
