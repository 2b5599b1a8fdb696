//! Commonly used types and utilities for ease of import.

pub use crate::{Board, Cell, GameEngine, MoveResult, Outcome, Player};

#[cfg(feature = "net")]
pub use crate::{run_client, Mode, Server, Stub, TttApi, TttService};

#[cfg(feature = "net")]
pub use crate::transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
