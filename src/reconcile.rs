//! Authoritative reconciliation of one player's snapshot against the stored
//! pair of player states.
//!
//! Clients resend their whole shot history every tick, so every step here is
//! idempotent: a shot resolves only while its target cell is unresolved, and
//! only while it is the shooter's turn. Resubmitting an unchanged snapshot
//! leaves the session untouched.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::Board;
use crate::common::{BoardError, Coord, PlayerId, ShotResult, SnapshotError};
use crate::config::fleet_lengths;
use crate::player::PlayerState;

/// A shot that changed a board during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedShot {
    pub shooter: PlayerId,
    pub coord: Coord,
    pub hit: bool,
}

/// Result of one reconciliation round, from the submitter's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub own: PlayerState,
    pub opponent: PlayerState,
    /// Shots resolved this round, in resolution order.
    pub resolved: Vec<ResolvedShot>,
}

/// The two canonical player states plus the agreed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    players: [PlayerState; 2],
    current_turn: PlayerId,
}

impl Session {
    /// Session over two prepared boards; player 0 moves first.
    pub fn from_boards(board0: Board, board1: Board) -> Self {
        Self {
            players: [
                PlayerState::new(PlayerId::Zero, board0),
                PlayerState::new(PlayerId::One, board1),
            ],
            current_turn: PlayerId::Zero,
        }
    }

    /// Session with the standard fleet randomly placed on both boards.
    pub fn with_random_fleets<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, BoardError> {
        let lengths = fleet_lengths();
        let mut board0 = Board::new();
        board0.auto_place_fleet(rng, &lengths)?;
        let mut board1 = Board::new();
        board1.auto_place_fleet(rng, &lengths)?;
        Ok(Self::from_boards(board0, board1))
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.players[0].winner.or(self.players[1].winner)
    }

    /// Reconcile the snapshot `submitted` from the player in `slot`.
    ///
    /// Only the submitted shot list is taken from the client; boards, views,
    /// turn and win flags come from the stored states.
    pub fn reconcile(
        &mut self,
        slot: PlayerId,
        submitted: &PlayerState,
    ) -> Result<Round, SnapshotError> {
        if submitted.player_id != slot {
            return Err(SnapshotError::SlotMismatch {
                expected: slot,
                found: submitted.player_id,
            });
        }

        let mut turn = self.current_turn;
        let mut resolved = Vec::new();
        let (own, opponent) = pair_mut(&mut self.players, slot);

        for shot in &submitted.shots_fired {
            own.record_outgoing_shot(shot.x, shot.y);
        }

        // A miss on either side can hand the turn back to a player with
        // shots still queued, so run both sides until nothing resolves.
        loop {
            let before = resolved.len();
            resolve_pending(own, opponent, &mut turn, &mut resolved);
            resolve_pending(opponent, own, &mut turn, &mut resolved);
            if resolved.len() == before {
                break;
            }
        }

        own.current_turn = turn;
        opponent.current_turn = turn;

        detect_defeat(own, opponent);
        detect_defeat(opponent, own);

        let round = Round {
            own: own.clone(),
            opponent: opponent.clone(),
            resolved,
        };
        self.current_turn = turn;
        Ok(round)
    }
}

fn pair_mut(
    players: &mut [PlayerState; 2],
    slot: PlayerId,
) -> (&mut PlayerState, &mut PlayerState) {
    let [zero, one] = players;
    match slot {
        PlayerId::Zero => (zero, one),
        PlayerId::One => (one, zero),
    }
}

fn defeated(state: &PlayerState) -> bool {
    state.own_board.has_fleet() && state.own_board.all_ships_sunk()
}

/// Apply `shooter`'s unresolved shots to `target`'s board, in declaration
/// order, while the turn is the shooter's. A miss hands the turn over.
fn resolve_pending(
    shooter: &mut PlayerState,
    target: &mut PlayerState,
    turn: &mut PlayerId,
    resolved: &mut Vec<ResolvedShot>,
) {
    for i in 0..shooter.shots_fired.len() {
        if *turn != shooter.player_id || defeated(shooter) || defeated(target) {
            break;
        }
        let coord = shooter.shots_fired[i];
        if !target.own_board.is_unresolved(coord) {
            continue;
        }
        let hit = match target.own_board.apply_shot(coord) {
            Ok(ShotResult::Hit) => true,
            Ok(ShotResult::Miss) => false,
            Ok(ShotResult::AlreadyResolved) | Err(_) => continue,
        };
        shooter.record_observation(coord.x, coord.y, hit);
        if !hit {
            *turn = target.player_id;
        }
        resolved.push(ResolvedShot {
            shooter: shooter.player_id,
            coord,
            hit,
        });
    }
}

fn detect_defeat(loser: &mut PlayerState, victor: &mut PlayerState) {
    if loser.game_over || !defeated(loser) {
        return;
    }
    loser.game_over = true;
    loser.winner.get_or_insert(victor.player_id);
    victor.winner.get_or_insert(victor.player_id);
}
