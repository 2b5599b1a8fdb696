use crate::protocol::Message;

/// Bidirectional, ordered message channel.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

/// The peer went away. Any other transport error means the stream is broken.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Disconnected(pub &'static str);

/// `true` if `err` is an orderly or abrupt hang-up rather than bad data.
pub fn is_disconnect(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Disconnected>().is_some()
}

pub mod in_memory;
pub mod tcp;
