#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod common;
mod config;
mod player;
mod reconcile;
mod ship;

#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod handler;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod registry;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod transport;

pub use board::*;
pub use common::*;
pub use config::*;
pub use player::*;
pub use reconcile::*;
pub use ship::*;

#[cfg(feature = "std")]
pub use client::GameClient;
#[cfg(feature = "std")]
pub use handler::{ConnectionHandler, ConnectionState};
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use protocol::{Message, PROTOCOL_VERSION};
#[cfg(feature = "std")]
pub use registry::SessionRegistry;
#[cfg(feature = "std")]
pub use server::GameServer;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Disconnect, Transport};
