#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{init_logging, GameClient, GameServer, ServerConfig, SessionRegistry, TcpTransport};
#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use log::info;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Run the authority for one two-player game.
    Serve {
        #[arg(long, default_value = "0.0.0.0:5555")]
        bind: String,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 30, help = "Per-frame send/receive timeout")]
        timeout_secs: u64,
    },
    /// Connect a bot that fires at random cells on its turn.
    Bot {
        #[arg(long, default_value = "127.0.0.1:5555")]
        connect: String,
        #[arg(long, help = "Fix RNG seed for reproducible shots (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 16, help = "Milliseconds between snapshots")]
        tick_ms: u64,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => {
            info!("Using fixed seed: {}", s);
            SmallRng::seed_from_u64(s)
        }
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            seed,
            timeout_secs,
        } => {
            let mut rng = make_rng(seed);
            let registry =
                SessionRegistry::with_random_fleets(&mut rng).map_err(|e| anyhow::anyhow!(e))?;
            let config = ServerConfig {
                io_timeout: Duration::from_secs(timeout_secs),
                ..ServerConfig::new(bind)
            };
            let server = GameServer::bind(config, registry).await?;

            tokio::select! {
                result = server.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                }
            }
        }
        Commands::Bot {
            connect,
            seed,
            tick_ms,
        } => {
            let mut rng = make_rng(seed);
            let transport = TcpTransport::connect(connect.as_str()).await?;
            let mut client = GameClient::connect(transport).await?;
            let winner = client
                .play_random(&mut rng, Duration::from_millis(tick_ms))
                .await?;
            if winner == client.slot() {
                println!("{} won", winner);
            } else {
                println!("{} lost, {} won", client.slot(), winner);
            }
        }
    }

    Ok(())
}
