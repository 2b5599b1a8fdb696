mod board;
mod common;
mod config;
mod game;
mod logging;

#[cfg(feature = "net")]
pub mod client;
#[cfg(feature = "net")]
pub mod protocol;
#[cfg(feature = "net")]
pub mod server;
#[cfg(feature = "net")]
pub mod service;
#[cfg(feature = "net")]
pub mod skeleton;
#[cfg(feature = "net")]
pub mod stub;
#[cfg(feature = "net")]
pub mod transport;

pub mod prelude;

pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use logging::{init_logging, parse_level};

#[cfg(feature = "net")]
pub use client::{run_client, Mode};
#[cfg(feature = "net")]
pub use protocol::*;
#[cfg(feature = "net")]
pub use server::Server;
#[cfg(feature = "net")]
pub use service::TttService;
#[cfg(feature = "net")]
pub use skeleton::Skeleton;
#[cfg(feature = "net")]
pub use stub::Stub;
#[cfg(feature = "net")]
pub use transport::{in_memory::InMemoryTransport, is_disconnect, tcp::TcpTransport, Disconnected, Transport};
