use std::sync::Arc;

use tictactoe::{GameEngine, MoveResult, Outcome, Player, RpcError, Server, Stub, TcpTransport, TttApi};

async fn start_server() -> anyhow::Result<(std::net::SocketAddr, Arc<GameEngine>)> {
    let engine = Arc::new(GameEngine::new());
    let server = Server::bind("127.0.0.1:0", Arc::clone(&engine)).await?;
    let addr = server.local_addr()?;
    tokio::spawn(server.run());
    Ok((addr, engine))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_two_players_and_observers_over_tcp() -> anyhow::Result<()> {
    let (addr, engine) = start_server().await?;

    let mut observers = Vec::new();
    for _ in 0..3 {
        let stub = Stub::new(TcpTransport::connect(addr).await?);
        observers.push(tokio::spawn(async move { stub.wait_for_winner().await }));
    }

    let player_a = Stub::new(TcpTransport::connect(addr).await?);
    let player_b = Stub::new(TcpTransport::connect(addr).await?);

    assert_eq!(player_a.play(0, 0, 0).await?, MoveResult::Success);
    assert_eq!(player_a.play(0, 1, 0).await?, MoveResult::WrongTurn);
    assert_eq!(player_b.play(0, 0, 1).await?, MoveResult::SquareTaken);
    assert_eq!(player_b.play(1, 1, 1).await?, MoveResult::Success);
    assert_eq!(player_a.play(0, 1, 0).await?, MoveResult::Success);
    assert_eq!(player_b.play(2, 2, 1).await?, MoveResult::Success);
    assert!(matches!(
        player_a.play(5, 5, 0).await,
        Err(RpcError::InvalidArgument(_))
    ));
    assert_eq!(player_a.play(0, 2, 0).await?, MoveResult::Success);

    for observer in observers {
        assert_eq!(observer.await??, Outcome::Winner(Player::A));
    }
    assert_eq!(player_b.check_winner().await?, Outcome::Winner(Player::A));
    assert_eq!(player_b.current_board().await?, engine.current_board());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reset_over_tcp() -> anyhow::Result<()> {
    let (addr, engine) = start_server().await?;
    let stub = Stub::new(TcpTransport::connect(addr).await?);

    assert_eq!(stub.play(1, 1, 0).await?, MoveResult::Success);
    stub.reset().await?;
    assert_eq!(engine.board().mark_counts(), (0, 0));
    assert_eq!(stub.play(1, 1, 1).await?, MoveResult::WrongTurn);
    assert_eq!(stub.play(1, 1, 0).await?, MoveResult::Success);
    Ok(())
}
