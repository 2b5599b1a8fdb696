//! Wire messages and the request/response API shared by the local service
//! adapter and the remote stub.

use serde::{Deserialize, Serialize};

use crate::common::{MoveResult, Outcome};

/// Current protocol version; both sides must agree during the handshake.
pub const PROTOCOL_VERSION: u8 = 1;

/// Description sent back when a move names a square outside the board.
pub const INVALID_POSITION: &str = "Input has to be a valid position";

/// Protocol-level error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The request carried a value the server refuses to act on.
    InvalidArgument,
    /// The request was not valid at this point of the conversation.
    FailedPrecondition,
}

/// Messages exchanged between a client stub and the server skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Opening message from the client.
    Hello { version: u8 },
    /// Server's reply to `Hello` when the versions match.
    HelloAck { version: u8 },
    /// Ask for the rendered board.
    GetBoard,
    /// Rendered board.
    Board(String),
    /// Place `player`'s mark at (row, column). Player codes are 0 and 1.
    Play { row: i32, column: i32, player: i32 },
    /// Result of a `Play` that did not fail at the boundary.
    PlayResult(MoveResult),
    /// Ask for the current outcome without blocking.
    CheckWinner,
    /// Block until the match is decided.
    WaitForWinner,
    /// Outcome code: -1 undecided, 0/1 winning player, 2 draw.
    Winner(i32),
    /// Clear the board for a new match.
    Reset,
    ResetAck,
    /// Request rejected at the protocol boundary.
    Error { code: ErrorCode, description: String },
}

/// Errors surfaced by [`TttApi`] calls.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Rejected by the server as an invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Rejected by the server for any other protocol reason.
    #[error("request rejected: {0}")]
    Rejected(String),
    /// Player code outside {0, 1}.
    #[error("invalid player code {0}")]
    InvalidPlayer(i32),
    #[error("protocol version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u8, got: u8 },
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl RpcError {
    /// Convert a wire error into the matching variant.
    pub fn from_wire(code: ErrorCode, description: String) -> Self {
        match code {
            ErrorCode::InvalidArgument => RpcError::InvalidArgument(description),
            ErrorCode::FailedPrecondition => RpcError::Rejected(description),
        }
    }
}

/// The five operations a match exposes to remote players.
#[async_trait::async_trait]
pub trait TttApi: Send + Sync {
    /// Rendered board.
    async fn current_board(&self) -> Result<String, RpcError>;
    /// Submit a move. A square outside the board fails with
    /// [`RpcError::InvalidArgument`]; every other rule rejection is an
    /// ordinary [`MoveResult`].
    async fn play(&self, row: i32, column: i32, player: i32) -> Result<MoveResult, RpcError>;
    /// Outcome right now.
    async fn check_winner(&self) -> Result<Outcome, RpcError>;
    /// Outcome once the match is decided.
    async fn wait_for_winner(&self) -> Result<Outcome, RpcError>;
    async fn reset(&self) -> Result<(), RpcError>;
}

/// Decode an outcome code received from the wire.
pub fn outcome_from_wire(code: i32) -> Result<Outcome, RpcError> {
    Outcome::from_code(code)
        .ok_or_else(|| RpcError::UnexpectedReply(format!("unknown outcome code {}", code)))
}
