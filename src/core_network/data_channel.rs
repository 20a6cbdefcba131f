use crate::core_network::error::DataChannelError;
use log::{debug, info};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// The data endpoint negotiated by the last PORT or PASV.
///
/// Holding the socket inside the enum means a session never has more than
/// one endpoint: replacing the value drops, and so closes, the previous one.
#[derive(Debug, Default)]
pub enum DataChannel {
    #[default]
    None,
    /// PORT: already connected to the client, used by the next transfer.
    Active(TcpStream),
    /// PASV: listening; every transfer accepts one connection.
    Passive(TcpListener),
}

impl DataChannel {
    pub fn is_established(&self) -> bool {
        !matches!(self, DataChannel::None)
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            DataChannel::None => "none",
            DataChannel::Active(_) => "active",
            DataChannel::Passive(_) => "passive",
        }
    }

    /// Drops whatever endpoint is currently held.
    pub fn close(&mut self) {
        if self.is_established() {
            debug!("Closing {} data channel", self.mode_name());
        }
        *self = DataChannel::None;
    }

    /// Produces the connection for a single transfer.
    ///
    /// An active stream is handed over and the channel returns to `None`. A
    /// passive listener accepts one connection within `accept_timeout` and
    /// stays in place for the next transfer; if the accept fails the
    /// listener is dropped.
    pub async fn open_transfer(
        &mut self,
        accept_timeout: Duration,
    ) -> Result<TcpStream, DataChannelError> {
        match std::mem::take(self) {
            DataChannel::None => Err(DataChannelError::NotEstablished),
            DataChannel::Active(stream) => Ok(stream),
            DataChannel::Passive(listener) => {
                match timeout(accept_timeout, listener.accept()).await {
                    Ok(Ok((stream, peer))) => {
                        info!("Accepted passive data connection from {}", peer);
                        *self = DataChannel::Passive(listener);
                        Ok(stream)
                    }
                    Ok(Err(e)) => Err(DataChannelError::Accept(e)),
                    Err(_) => Err(DataChannelError::Timeout),
                }
            }
        }
    }
}
