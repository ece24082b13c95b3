#![cfg(feature = "std")]

//! TCP front door of the authority: accepts connections, binds the first two
//! to player slots and turns every later one away.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, trace, warn};
use tokio::net::TcpListener;
use tokio::time::{timeout, Duration};

use crate::config::ServerConfig;
use crate::handler::ConnectionHandler;
use crate::protocol::Message;
use crate::registry::SessionRegistry;
use crate::transport::{tcp::TcpTransport, Transport};

/// Reason sent to connections arriving after both slots are taken.
pub const SERVER_FULL: &str = "server full";

const REJECT_LINGER: Duration = Duration::from_secs(1);

pub struct GameServer {
    listener: TcpListener,
    registry: Arc<SessionRegistry>,
    config: ServerConfig,
}

impl GameServer {
    pub async fn bind(config: ServerConfig, registry: SessionRegistry) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&config.bind).await?;
        info!("Server listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            registry: Arc::new(registry),
            config,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accept connections for as long as the process runs.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Accept error: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };
            let transport = TcpTransport::from_server_config(stream, &self.config);

            match self.registry.claim_slot() {
                Some(slot) => {
                    info!("Connection from {} assigned to {}", addr, slot);
                    let mut handler =
                        ConnectionHandler::new(slot, Arc::clone(&self.registry), transport);
                    tokio::spawn(async move {
                        if let Err(e) = handler.run().await {
                            trace!("{} handler finished with error: {}", slot, e);
                        }
                    });
                }
                None => {
                    warn!("Rejecting {}: {}", addr, SERVER_FULL);
                    tokio::spawn(reject(transport));
                }
            }
        }
    }
}

async fn reject<T: Transport>(mut transport: T) {
    let reason = SERVER_FULL.to_string();
    if let Err(e) = transport.send(Message::Rejected { reason }).await {
        warn!("Failed to notify rejected connection: {}", e);
        return;
    }
    // Drain until the peer hangs up; closing with unread input resets the
    // socket and can drop the rejection before the peer reads it.
    while let Ok(Ok(_)) = timeout(REJECT_LINGER, transport.recv()).await {}
}
