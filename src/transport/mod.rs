use crate::protocol::Message;

/// A bidirectional, message-oriented connection.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

/// The peer went away. Every other transport error means the connection
/// misbehaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    Closed,
    Reset,
}

impl Disconnect {
    /// `true` when `err` is an orderly or abrupt hang-up of the peer.
    pub fn is_disconnect(err: &anyhow::Error) -> bool {
        err.downcast_ref::<Disconnect>().is_some()
    }
}

impl std::fmt::Display for Disconnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disconnect::Closed => write!(f, "Connection closed by peer"),
            Disconnect::Reset => write!(f, "Connection reset by peer"),
        }
    }
}

impl std::error::Error for Disconnect {}

pub mod in_memory;
pub mod tcp;
