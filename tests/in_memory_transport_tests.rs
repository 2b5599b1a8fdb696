use std::sync::Arc;
use std::time::Duration;

use tictactoe::{
    GameEngine, InMemoryTransport, Message, MoveResult, Outcome, Player, RpcError, Skeleton, Stub,
    Transport, TttApi, TttService, INVALID_POSITION, PROTOCOL_VERSION,
};

fn connect(engine: &Arc<GameEngine>) -> (Stub<InMemoryTransport>, tokio::task::JoinHandle<()>) {
    let (server_transport, client_transport) = InMemoryTransport::pair();
    let service = TttService::new(Arc::clone(engine));
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(service, server_transport);
        skeleton.run().await.unwrap();
    });
    (Stub::new(client_transport), server)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stub_skeleton_in_memory() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (stub, server) = connect(&engine);

    assert_eq!(stub.current_board().await?, engine.current_board());
    assert_eq!(stub.play(0, 0, 0).await?, MoveResult::Success);
    assert_eq!(stub.play(0, 0, 1).await?, MoveResult::SquareTaken);
    assert_eq!(stub.play(1, 1, 0).await?, MoveResult::WrongTurn);
    assert_eq!(stub.check_winner().await?, Outcome::Undecided);
    assert!(stub.current_board().await?.starts_with(" O | 2 | 3"));

    stub.reset().await?;
    assert_eq!(stub.check_winner().await?, Outcome::Undecided);
    assert_eq!(engine.current_turn(), Player::A);

    drop(stub);
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_out_of_bounds_is_invalid_argument() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (stub, server) = connect(&engine);

    for (row, column) in [(3, 0), (0, 3), (-1, 0), (0, -5)] {
        match stub.play(row, column, 0).await {
            Err(RpcError::InvalidArgument(d)) => assert_eq!(d, INVALID_POSITION),
            other => panic!("expected invalid argument, got {:?}", other),
        }
    }
    // The connection is still usable and the board untouched.
    assert_eq!(stub.play(2, 2, 0).await?, MoveResult::Success);

    drop(stub);
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_player_code() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (stub, server) = connect(&engine);

    assert!(matches!(
        stub.play(0, 0, 7).await,
        Err(RpcError::InvalidArgument(_))
    ));
    assert_eq!(engine.board().mark_counts(), (0, 0));

    drop(stub);
    server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wait_for_winner_over_stub() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (waiter_stub, waiter_server) = connect(&engine);
    let (player_stub, player_server) = connect(&engine);

    let waiter = tokio::spawn(async move {
        let outcome = waiter_stub.wait_for_winner().await;
        (waiter_stub, outcome)
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    for (r, c, p) in [(0, 0, 0), (1, 1, 1), (0, 1, 0), (2, 2, 1), (0, 2, 0)] {
        assert_eq!(player_stub.play(r, c, p).await?, MoveResult::Success);
    }
    let (waiter_stub, outcome) = waiter.await?;
    assert_eq!(outcome?, Outcome::Winner(Player::A));
    assert_eq!(player_stub.check_winner().await?, Outcome::Winner(Player::A));
    assert_eq!(player_stub.play(2, 0, 1).await?, MoveResult::GameFinished);

    drop(waiter_stub);
    drop(player_stub);
    waiter_server.await?;
    player_server.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skeleton_rejects_version_mismatch() -> anyhow::Result<()> {
    let (server_transport, mut client) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(TttService::default(), server_transport);
        skeleton.run().await
    });

    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION + 1,
        })
        .await?;
    assert!(matches!(client.recv().await?, Message::Error { .. }));
    assert!(server.await?.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skeleton_answers_non_request_with_error() -> anyhow::Result<()> {
    let (server_transport, mut client) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(TttService::default(), server_transport);
        skeleton.run().await
    });

    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
        })
        .await?;
    assert_eq!(
        client.recv().await?,
        Message::HelloAck {
            version: PROTOCOL_VERSION
        }
    );
    client.send(Message::ResetAck).await?;
    assert!(matches!(client.recv().await?, Message::Error { .. }));
    client.send(Message::CheckWinner).await?;
    assert_eq!(client.recv().await?, Message::Winner(-1));

    drop(client);
    server.await??;
    Ok(())
}

async fn open_session(
    engine: &Arc<GameEngine>,
) -> anyhow::Result<(InMemoryTransport, tokio::task::JoinHandle<anyhow::Result<()>>)> {
    let (server_transport, mut client) = InMemoryTransport::pair();
    let service = TttService::new(Arc::clone(engine));
    let server = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(service, server_transport);
        skeleton.run().await
    });
    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
        })
        .await?;
    assert!(matches!(client.recv().await?, Message::HelloAck { .. }));
    Ok((client, server))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hangup_during_wait_ends_session() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (mut client, server) = open_session(&engine).await?;

    client.send(Message::WaitForWinner).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!server.is_finished());
    drop(client);

    // The match is still undecided, yet the session must not linger.
    tokio::time::timeout(Duration::from_secs(1), server).await???;
    assert_eq!(engine.check_winner(), Outcome::Undecided);
    assert_eq!(engine.submit_move(0, 0, Player::A), MoveResult::Success);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_aborted_stub_wait_releases_server_task() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (stub, server) = connect(&engine);
    let stub = Arc::new(stub);

    let waiter = {
        let stub = Arc::clone(&stub);
        tokio::spawn(async move { stub.wait_for_winner().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    waiter.abort();
    assert!(waiter.await.is_err());
    drop(stub);

    tokio::time::timeout(Duration::from_secs(1), server).await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_during_wait_is_rejected() -> anyhow::Result<()> {
    let engine = Arc::new(GameEngine::new());
    let (mut client, server) = open_session(&engine).await?;

    client.send(Message::WaitForWinner).await?;
    client.send(Message::CheckWinner).await?;

    let result = tokio::time::timeout(Duration::from_secs(1), server).await??;
    assert!(result.is_err());
    Ok(())
}
