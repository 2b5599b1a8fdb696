use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::Message;
use crate::transport::{Disconnected, Transport};

/// Default timeout for writing a frame (30 seconds).
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum frame size (64 KiB). Every message here is tiny.
pub const MAX_MESSAGE_SIZE: u32 = 64 * 1024;

/// Length-prefixed bincode frames over a TCP stream.
///
/// Reads have no timeout: a `WaitForWinner` reply may take as long as the
/// match does, and a player may sit at the prompt indefinitely.
pub struct TcpTransport {
    stream: TcpStream,
    write_timeout: Duration,
    max_message_size: u32,
}

fn map_io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Disconnected("Connection closed by peer").into(),
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            Disconnected("Connection reset by peer").into()
        }
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let data = bincode::serialize(&msg)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        if data.len() as u64 > self.max_message_size as u64 {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_message_size
            ));
        }
        let len = (data.len() as u32).to_be_bytes();
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(&len).await.map_err(map_io_error)?;
            stream.write_all(&data).await.map_err(map_io_error)?;
            stream.flush().await.map_err(map_io_error)?;
            anyhow::Ok(())
        };
        timeout(self.write_timeout, write)
            .await
            .map_err(|_| anyhow::anyhow!("Timed out after {:?}", self.write_timeout))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(map_io_error)?;
        let len = u32::from_be_bytes(len_buf);
        if len > self.max_message_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_message_size
            ));
        }
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }
        let mut buf = vec![0u8; len as usize];
        self.stream.read_exact(&mut buf).await.map_err(map_io_error)?;
        bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}
