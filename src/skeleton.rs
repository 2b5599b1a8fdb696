use anyhow::anyhow;
use log::{debug, warn};

use crate::{
    protocol::{ErrorCode, Message, RpcError, TttApi, PROTOCOL_VERSION},
    transport::{is_disconnect, Transport},
};

/// Server side of one connection: reads requests, dispatches them to an
/// [`TttApi`] implementation and writes the replies back.
pub struct Skeleton<E: TttApi, T: Transport> {
    api: E,
    transport: T,
}

/// Translate a failed call into the wire error sent to the client, or
/// `None` if the failure is not the client's fault.
fn wire_error(err: &RpcError) -> Option<Message> {
    let (code, description) = match err {
        RpcError::InvalidArgument(d) => (ErrorCode::InvalidArgument, d.clone()),
        RpcError::InvalidPlayer(_) => (ErrorCode::InvalidArgument, err.to_string()),
        RpcError::Rejected(d) => (ErrorCode::FailedPrecondition, d.clone()),
        _ => return None,
    };
    Some(Message::Error { code, description })
}

impl<E: TttApi, T: Transport> Skeleton<E, T> {
    pub fn new(api: E, transport: T) -> Self {
        Self { api, transport }
    }

    async fn handshake(&mut self) -> anyhow::Result<()> {
        match self.transport.recv().await? {
            Message::Hello { version } if version == PROTOCOL_VERSION => {
                self.transport
                    .send(Message::HelloAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await
            }
            Message::Hello { version } => {
                warn!(
                    "protocol version mismatch: expected {}, client sent {}",
                    PROTOCOL_VERSION, version
                );
                self.transport
                    .send(Message::Error {
                        code: ErrorCode::FailedPrecondition,
                        description: format!(
                            "protocol version mismatch: expected {}, got {}",
                            PROTOCOL_VERSION, version
                        ),
                    })
                    .await?;
                Err(anyhow!("Protocol version mismatch: got {}", version))
            }
            other => {
                warn!("expected handshake, got {:?}", other);
                Err(anyhow!("Expected handshake"))
            }
        }
    }

    async fn dispatch(&self, msg: Message) -> Result<Message, RpcError> {
        let reply = match msg {
            Message::GetBoard => Message::Board(self.api.current_board().await?),
            Message::Play {
                row,
                column,
                player,
            } => Message::PlayResult(self.api.play(row, column, player).await?),
            Message::CheckWinner => Message::Winner(self.api.check_winner().await?.code()),
            Message::WaitForWinner => Message::Winner(self.api.wait_for_winner().await?.code()),
            Message::Reset => {
                self.api.reset().await?;
                Message::ResetAck
            }
            other => {
                return Err(RpcError::Rejected(format!(
                    "not a request: {:?}",
                    other
                )))
            }
        };
        Ok(reply)
    }

    /// Wait for the outcome while watching the connection. Returns `None`
    /// if the peer hangs up first, which abandons the wait.
    async fn wait_or_hangup(&mut self) -> anyhow::Result<Option<Result<Message, RpcError>>> {
        let Self { api, transport } = self;
        tokio::select! {
            outcome = api.wait_for_winner() => {
                Ok(Some(outcome.map(|o| Message::Winner(o.code()))))
            }
            next = transport.recv() => match next {
                Err(e) if is_disconnect(&e) => Ok(None),
                Err(e) => Err(e),
                Ok(msg) => {
                    warn!("request while waiting for the winner: {:?}", msg);
                    Err(anyhow!("Request sent while waiting for the winner"))
                }
            },
        }
    }

    /// Serve requests until the peer disconnects. A frame that cannot be
    /// decoded ends the session with an error.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.handshake().await?;

        loop {
            let msg = match self.transport.recv().await {
                Ok(msg) => msg,
                Err(e) if is_disconnect(&e) => return Ok(()),
                Err(e) => {
                    warn!("dropping connection: {}", e);
                    return Err(e);
                }
            };
            debug!("request: {:?}", msg);
            let result = match msg {
                Message::WaitForWinner => match self.wait_or_hangup().await? {
                    Some(result) => result,
                    None => return Ok(()),
                },
                other => self.dispatch(other).await,
            };
            let reply = match result {
                Ok(reply) => reply,
                Err(err) => match wire_error(&err) {
                    Some(reply) => reply,
                    None => return Err(anyhow!(err)),
                },
            };
            self.transport.send(reply).await?;
        }
    }
}
