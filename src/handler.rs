#![cfg(feature = "std")]

use std::sync::Arc;

use anyhow::bail;
use log::{debug, info, warn};

use crate::common::PlayerId;
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::registry::SessionRegistry;
use crate::transport::{Disconnect, Transport};

/// Lifecycle of one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    AwaitingSnapshot,
    Reconciling,
    Replying,
    Closed,
}

/// Serves one client bound to a player slot: greets it, then answers every
/// snapshot with the reconciled pair until the connection ends.
pub struct ConnectionHandler<T: Transport> {
    slot: PlayerId,
    registry: Arc<SessionRegistry>,
    transport: T,
    state: ConnectionState,
    rounds: u64,
}

impl<T: Transport> ConnectionHandler<T> {
    pub fn new(slot: PlayerId, registry: Arc<SessionRegistry>, transport: T) -> Self {
        Self {
            slot,
            registry,
            transport,
            state: ConnectionState::Connected,
            rounds: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Drive the connection to completion and return the number of rounds
    /// served. The handler ends in `Closed`; the slot's last state stays in
    /// the registry afterwards.
    pub async fn run(&mut self) -> anyhow::Result<u64> {
        let result = self.serve().await;
        self.transition(ConnectionState::Closed);
        match &result {
            Ok(()) => info!("{} disconnected after {} rounds", self.slot, self.rounds),
            Err(e) => warn!("{} connection closed: {}", self.slot, e),
        }
        result.map(|()| self.rounds)
    }

    async fn serve(&mut self) -> anyhow::Result<()> {
        self.greet().await?;
        loop {
            self.transition(ConnectionState::AwaitingSnapshot);
            let submitted = match self.transport.recv().await {
                Ok(Message::Snapshot(state)) => state,
                Ok(other) => bail!("Expected Snapshot, got {}", other.kind()),
                // Peer went away between rounds.
                Err(e) if Disconnect::is_disconnect(&e) => {
                    debug!("{} receive ended: {}", self.slot, e);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            self.transition(ConnectionState::Reconciling);
            let round = self.registry.reconcile(self.slot, &submitted)?;
            if let Some(winner) = round.own.winner {
                if !round.resolved.is_empty() {
                    info!("Game over: {} wins", winner);
                }
            }

            self.transition(ConnectionState::Replying);
            self.transport
                .send(Message::Reconciled {
                    own: round.own,
                    opponent: round.opponent.redacted(),
                })
                .await?;
            self.rounds += 1;
        }
    }

    async fn greet(&mut self) -> anyhow::Result<()> {
        match self.transport.recv().await? {
            Message::Hello { version } if version == PROTOCOL_VERSION => {
                let state = self.registry.state(self.slot);
                self.transport
                    .send(Message::Welcome {
                        slot: self.slot,
                        state,
                    })
                    .await?;
                info!("{} joined", self.slot);
                Ok(())
            }
            Message::Hello { version } => {
                let reason = format!(
                    "protocol version mismatch: expected {}, got {}",
                    PROTOCOL_VERSION, version
                );
                self.transport
                    .send(Message::Rejected {
                        reason: reason.clone(),
                    })
                    .await?;
                bail!(reason)
            }
            other => bail!("Expected Hello, got {}", other.kind()),
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!("{}: {:?} -> {:?}", self.slot, self.state, next);
        self.state = next;
    }
}
