#![cfg(feature = "std")]

//! Headless client: keeps the local copy of its player state, declares shots
//! and resubmits the whole snapshot every round.

use anyhow::bail;
use log::{debug, info};
use rand::Rng;
use tokio::time::{sleep, Duration};

use crate::common::{Coord, PlayerId};
use crate::config::BOARD_SIZE;
use crate::player::{Observation, PlayerState};
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::transport::Transport;

pub struct GameClient<T: Transport> {
    transport: T,
    state: PlayerState,
    opponent: Option<PlayerState>,
}

impl<T: Transport> GameClient<T> {
    /// Say hello and wait for the slot assignment.
    pub async fn connect(mut transport: T) -> anyhow::Result<Self> {
        transport
            .send(Message::Hello {
                version: PROTOCOL_VERSION,
            })
            .await?;
        match transport.recv().await? {
            Message::Welcome { slot, state } => {
                if state.player_id != slot {
                    bail!("Welcome for {} carries the state of {}", slot, state.player_id);
                }
                info!("Joined as {}", slot);
                Ok(Self {
                    transport,
                    state,
                    opponent: None,
                })
            }
            Message::Rejected { reason } => bail!("Rejected by server: {}", reason),
            other => bail!("Expected Welcome, got {}", other.kind()),
        }
    }

    pub fn slot(&self) -> PlayerId {
        self.state.player_id
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Redacted opponent state from the last reply.
    pub fn opponent(&self) -> Option<&PlayerState> {
        self.opponent.as_ref()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    pub fn is_my_turn(&self) -> bool {
        self.state.is_my_turn()
    }

    /// Fire at `(x, y)` if the local copy says it is our turn and the game
    /// is still running.
    pub fn fire(&mut self, x: u8, y: u8) -> bool {
        if !self.is_my_turn() || self.state.winner.is_some() {
            return false;
        }
        self.declare_shot(x, y)
    }

    /// Add `(x, y)` to the outgoing shot list without checking the turn.
    /// The authority holds the shot until it is legitimately ours.
    pub fn declare_shot(&mut self, x: u8, y: u8) -> bool {
        self.state.record_outgoing_shot(x, y)
    }

    /// One round: submit the full snapshot, adopt the authority's answer.
    pub async fn sync(&mut self) -> anyhow::Result<&PlayerState> {
        self.transport
            .send(Message::Snapshot(self.state.clone()))
            .await?;
        match self.transport.recv().await? {
            Message::Reconciled { own, opponent } => {
                self.state = own;
                self.opponent = Some(opponent);
                Ok(&self.state)
            }
            Message::Rejected { reason } => bail!("Rejected by server: {}", reason),
            other => bail!("Expected Reconciled, got {}", other.kind()),
        }
    }

    /// `true` while one of our declared shots has not come back resolved.
    pub fn has_pending_shot(&self) -> bool {
        self.state
            .shots_fired
            .iter()
            .any(|&c| self.state.opponent_view.get(c) == Some(Observation::Unknown))
    }

    /// Play random untargeted cells on our turn, one round per `tick`, until
    /// a winner is known.
    pub async fn play_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tick: Duration,
    ) -> anyhow::Result<PlayerId> {
        loop {
            if let Some(winner) = self.winner() {
                return Ok(winner);
            }
            if self.is_my_turn() && !self.has_pending_shot() {
                if let Some(target) = self.random_target(rng) {
                    debug!("{} fires at {}", self.slot(), target);
                    self.fire(target.x, target.y);
                }
            }
            self.sync().await?;
            if !tick.is_zero() {
                sleep(tick).await;
            }
        }
    }

    fn random_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        let open: Vec<Coord> = (0..BOARD_SIZE as u8)
            .flat_map(|y| (0..BOARD_SIZE as u8).map(move |x| Coord::new(x, y)))
            .filter(|c| !self.state.shots_fired.contains(c))
            .collect();
        if open.is_empty() {
            None
        } else {
            Some(open[rng.random_range(0..open.len())])
        }
    }
}
