#![cfg(feature = "std")]

use serde::{Deserialize, Serialize};

use crate::common::PlayerId;
use crate::player::PlayerState;

/// Current wire protocol version; a client on any other version is rejected.
pub const PROTOCOL_VERSION: u32 = 1;

/// Messages exchanged between a client and the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// First frame a client sends on a new connection.
    Hello { version: u32 },
    /// Slot assignment plus the authority's current state for that slot.
    Welcome { slot: PlayerId, state: PlayerState },
    /// The client's complete state, resent every tick.
    Snapshot(PlayerState),
    /// Reply to a snapshot. `opponent` is redacted before sending.
    Reconciled {
        own: PlayerState,
        opponent: PlayerState,
    },
    /// Sent right before the authority closes the connection.
    Rejected { reason: String },
}

impl Message {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Hello { .. } => "Hello",
            Message::Welcome { .. } => "Welcome",
            Message::Snapshot(_) => "Snapshot",
            Message::Reconciled { .. } => "Reconciled",
            Message::Rejected { .. } => "Rejected",
        }
    }
}
