use std::sync::Arc;

use log::{info, warn};
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::{game::GameEngine, service::TttService, skeleton::Skeleton, transport::tcp::TcpTransport};

/// TCP front end for a single shared match.
pub struct Server {
    listener: TcpListener,
    engine: Arc<GameEngine>,
}

impl Server {
    pub async fn bind<A: ToSocketAddrs>(addr: A, engine: Arc<GameEngine>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, engine })
    }

    pub fn local_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, serving each on its own task.
    pub async fn run(self) -> anyhow::Result<()> {
        info!("listening on {}", self.listener.local_addr()?);
        loop {
            let (stream, addr) = self.listener.accept().await?;
            if let Err(e) = stream.set_nodelay(true) {
                warn!("could not set TCP_NODELAY for {}: {}", addr, e);
            }
            info!("client connected from {}", addr);
            let service = TttService::new(Arc::clone(&self.engine));
            tokio::spawn(async move {
                let mut skeleton = Skeleton::new(service, TcpTransport::new(stream));
                match skeleton.run().await {
                    Ok(()) => info!("client {} disconnected", addr),
                    Err(e) => warn!("session with {} ended: {}", addr, e),
                }
            });
        }
    }
}
