use crate::core_ftpcommand::utils::send_syntax_error;
use crate::core_network::data_channel::DataChannel;
use crate::core_network::error::DataChannelError;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Parses the `h1,h2,h3,h4,p1,p2` argument of PORT.
///
/// Exactly six comma separated decimal numbers in `0..=255` are accepted;
/// the port is `p1 * 256 + p2`.
pub fn parse_port_argument(arg: &str) -> Result<SocketAddrV4, DataChannelError> {
    let invalid = || DataChannelError::InvalidPortArgument(arg.to_string());

    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 6 {
        return Err(invalid());
    }

    let mut numbers = [0u8; 6];
    for (number, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *number = part.parse::<u8>().map_err(|_| invalid())?;
    }

    let [h1, h2, h3, h4, p1, p2] = numbers;
    let port = u16::from(p1) * 256 + u16::from(p2);
    Ok(SocketAddrV4::new(Ipv4Addr::new(h1, h2, h3, h4), port))
}

/// Connects to the address the client advertised with PORT.
pub async fn setup_port_connection(
    addr: SocketAddrV4,
    connect_timeout: Duration,
) -> Result<TcpStream, DataChannelError> {
    match timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(DataChannelError::Connect(e)),
        Err(_) => Err(DataChannelError::Timeout),
    }
}

/// Handles the PORT (Active Mode) FTP command.
///
/// A malformed argument is answered with 501 and leaves the session alone.
/// Otherwise the previous data endpoint is dropped and the server connects
/// out straight away.
pub async fn handle_port_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(arg) = args.first() else {
        return send_syntax_error(writer).await;
    };

    let addr = match parse_port_argument(arg) {
        Ok(addr) => addr,
        Err(e) => {
            warn!("{}", e);
            return send_reply(writer, &e.to_ftp_response()).await;
        }
    };

    session.data_channel.close();
    info!("Received PORT command with address: {}", addr);

    match setup_port_connection(addr, context.config.server.data_timeout()).await {
        Ok(data_stream) => {
            info!("Connection established with {}", addr);
            session.data_channel = DataChannel::Active(data_stream);
            send_reply(writer, "200 PORT command successful.").await
        }
        Err(e) => {
            error!("Failed to connect to client {}: {}", addr, e);
            send_reply(writer, &e.to_ftp_response()).await
        }
    }
}
