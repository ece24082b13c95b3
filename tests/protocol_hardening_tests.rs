use std::net::SocketAddr;
use std::sync::Arc;

use broadside::transport::tcp::TcpTransport;
use broadside::transport::Transport;
use broadside::{
    Board, Coord, GameClient, GameServer, Message, Orientation, PlayerId, ServerConfig, Session,
    SessionRegistry, PROTOCOL_VERSION,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{sleep, Duration};

async fn start_server() -> anyhow::Result<(SocketAddr, Arc<SessionRegistry>)> {
    let mut board0 = Board::new();
    board0.place_ship(Coord::new(0, 0), 2, Orientation::Horizontal)?;
    let mut board1 = Board::new();
    board1.place_ship(Coord::new(3, 3), 2, Orientation::Vertical)?;
    let registry = SessionRegistry::new(Session::from_boards(board0, board1));

    let server = GameServer::bind(ServerConfig::new("127.0.0.1:0"), registry).await?;
    let addr = server.local_addr()?;
    let registry = server.registry();
    tokio::spawn(server.run());
    Ok((addr, registry))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_third_connection_rejected() -> anyhow::Result<()> {
    let (addr, registry) = start_server().await?;

    let first = GameClient::connect(TcpTransport::connect(addr).await?).await?;
    let second = GameClient::connect(TcpTransport::connect(addr).await?).await?;
    assert_eq!(first.slot(), PlayerId::Zero);
    assert_eq!(second.slot(), PlayerId::One);

    let err = GameClient::connect(TcpTransport::connect(addr).await?)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("server full"), "unexpected error: {}", err);
    assert_eq!(registry.claimed_slots(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_welcome_carries_only_own_state() -> anyhow::Result<()> {
    let (addr, _registry) = start_server().await?;

    let client = GameClient::connect(TcpTransport::connect(addr).await?).await?;
    assert_eq!(client.state().player_id, PlayerId::Zero);
    assert_eq!(client.state().own_board.ships().len(), 1);
    assert_eq!(client.state().own_board.ships()[0].origin(), Coord::new(0, 0));
    assert!(client.opponent().is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_version_mismatch_over_tcp() -> anyhow::Result<()> {
    let (addr, registry) = start_server().await?;

    let mut transport = TcpTransport::connect(addr).await?;
    transport
        .send(Message::Hello {
            version: PROTOCOL_VERSION + 7,
        })
        .await?;
    match transport.recv().await? {
        Message::Rejected { reason } => assert!(reason.contains("version")),
        other => panic!("Expected Rejected, got {}", other.kind()),
    }

    // The slot stays consumed.
    assert_eq!(registry.claimed_slots(), 1);
    let next = GameClient::connect(TcpTransport::connect(addr).await?).await?;
    assert_eq!(next.slot(), PlayerId::One);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_garbage_frame_closes_only_that_connection() -> anyhow::Result<()> {
    let (addr, registry) = start_server().await?;

    let mut raw = TcpStream::connect(addr).await?;
    raw.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await?;
    raw.flush().await?;
    sleep(Duration::from_millis(50)).await;

    let mut client = GameClient::connect(TcpTransport::connect(addr).await?).await?;
    assert_eq!(client.slot(), PlayerId::One);
    client.sync().await?;
    assert_eq!(registry.current_turn(), PlayerId::Zero);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forged_board_ignored_over_tcp() -> anyhow::Result<()> {
    let (addr, registry) = start_server().await?;

    let mut transport = TcpTransport::connect(addr).await?;
    transport
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
        })
        .await?;
    let mut state = match transport.recv().await? {
        Message::Welcome { state, .. } => state,
        other => panic!("Expected Welcome, got {}", other.kind()),
    };

    // Claim an empty fleet and a win; only the shot list is honored.
    state.own_board = Board::new();
    state.winner = Some(PlayerId::Zero);
    state.record_outgoing_shot(3, 3);
    transport.send(Message::Snapshot(state)).await?;

    match transport.recv().await? {
        Message::Reconciled { own, opponent } => {
            assert_eq!(own.own_board.ships().len(), 1);
            assert_eq!(own.winner, None);
            assert_eq!(own.hits, vec![Coord::new(3, 3)]);
            assert!(opponent.own_board.ships().is_empty());
        }
        other => panic!("Expected Reconciled, got {}", other.kind()),
    }
    assert_eq!(registry.winner(), None);
    Ok(())
}
