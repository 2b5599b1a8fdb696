use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::{
    common::{MoveResult, Outcome},
    protocol::{outcome_from_wire, Message, RpcError, TttApi, PROTOCOL_VERSION},
    transport::Transport,
};

/// Remote [`TttApi`] over a [`Transport`]. Calls are serialized on the
/// connection: one request, one reply.
pub struct Stub<T: Transport> {
    transport: Mutex<T>,
    handshaken: AtomicBool,
}

impl<T: Transport> Stub<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
            handshaken: AtomicBool::new(false),
        }
    }

    async fn handshake(transport: &mut T) -> Result<(), RpcError> {
        transport
            .send(Message::Hello {
                version: PROTOCOL_VERSION,
            })
            .await?;
        match transport.recv().await? {
            Message::HelloAck { version } if version == PROTOCOL_VERSION => Ok(()),
            Message::HelloAck { version } => Err(RpcError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                got: version,
            }),
            Message::Error { code, description } => Err(RpcError::from_wire(code, description)),
            other => Err(RpcError::UnexpectedReply(format!("{:?}", other))),
        }
    }

    /// Send `request` and return the reply, handshaking first if needed.
    /// Wire errors come back as [`RpcError`].
    async fn call(&self, request: Message) -> Result<Message, RpcError> {
        let mut transport = self.transport.lock().await;
        if !self.handshaken.load(Ordering::SeqCst) {
            Self::handshake(&mut *transport).await?;
            self.handshaken.store(true, Ordering::SeqCst);
        }
        transport.send(request).await?;
        match transport.recv().await? {
            Message::Error { code, description } => Err(RpcError::from_wire(code, description)),
            reply => Ok(reply),
        }
    }
}

fn unexpected(reply: Message) -> RpcError {
    RpcError::UnexpectedReply(format!("{:?}", reply))
}

#[async_trait::async_trait]
impl<T: Transport> TttApi for Stub<T> {
    async fn current_board(&self) -> Result<String, RpcError> {
        match self.call(Message::GetBoard).await? {
            Message::Board(board) => Ok(board),
            other => Err(unexpected(other)),
        }
    }

    async fn play(&self, row: i32, column: i32, player: i32) -> Result<MoveResult, RpcError> {
        match self.call(Message::Play { row, column, player }).await? {
            Message::PlayResult(res) => Ok(res),
            other => Err(unexpected(other)),
        }
    }

    async fn check_winner(&self) -> Result<Outcome, RpcError> {
        match self.call(Message::CheckWinner).await? {
            Message::Winner(code) => outcome_from_wire(code),
            other => Err(unexpected(other)),
        }
    }

    async fn wait_for_winner(&self) -> Result<Outcome, RpcError> {
        match self.call(Message::WaitForWinner).await? {
            Message::Winner(code) => outcome_from_wire(code),
            other => Err(unexpected(other)),
        }
    }

    async fn reset(&self) -> Result<(), RpcError> {
        match self.call(Message::Reset).await? {
            Message::ResetAck => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}
