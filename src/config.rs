use crate::ship::ShipType;

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const FLEET: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Random placements tried per ship before fleet construction gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Lengths of the standard fleet, in placement order.
pub fn fleet_lengths() -> [usize; NUM_SHIPS] {
    core::array::from_fn(|i| FLEET[i].length())
}

#[cfg(feature = "std")]
pub use self::server::ServerConfig;

#[cfg(feature = "std")]
mod server {
    use std::time::Duration;

    /// Default timeout for a single frame send or receive.
    pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default idle time before a connection is considered dead.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(45);

    /// Maximum frame payload (1 MB); a full snapshot is a few KB.
    pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 1_000_000;

    /// Runtime settings for the authority.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        pub bind: String,
        pub io_timeout: Duration,
        pub idle_timeout: Duration,
        pub max_message_size: u32,
    }

    impl ServerConfig {
        pub fn new(bind: impl Into<String>) -> Self {
            Self {
                bind: bind.into(),
                ..Self::default()
            }
        }
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "0.0.0.0:5555".to_string(),
                io_timeout: DEFAULT_IO_TIMEOUT,
                idle_timeout: DEFAULT_IDLE_TIMEOUT,
                max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            }
        }
    }
}

#[cfg(feature = "std")]
pub use self::server::{DEFAULT_IDLE_TIMEOUT, DEFAULT_IO_TIMEOUT, DEFAULT_MAX_MESSAGE_SIZE};
