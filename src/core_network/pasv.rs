use crate::core_network::data_channel::DataChannel;
use crate::core_network::error::DataChannelError;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, info};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::io::AsyncWrite;
use tokio::net::{TcpListener, TcpSocket};

/// Sets up a passive mode (PASV) listener on an OS assigned port.
/// Returns the listener and the port it is bound to.
pub fn setup_pasv_listener(bind_ip: Ipv4Addr) -> Result<(TcpListener, u16), DataChannelError> {
    let socket = TcpSocket::new_v4().map_err(DataChannelError::Listen)?;
    socket
        .bind(SocketAddr::from((bind_ip, 0)))
        .map_err(DataChannelError::Listen)?;
    let listener = socket.listen(1).map_err(DataChannelError::Listen)?;
    let port = listener
        .local_addr()
        .map_err(DataChannelError::Listen)?
        .port();
    debug!("PASV listener set up on IP: {}, Port: {}", bind_ip, port);
    Ok((listener, port))
}

pub fn format_pasv_response(ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).",
        a,
        b,
        c,
        d,
        port / 256,
        port % 256
    )
}

/// Handles the PASV FTP command.
///
/// Drops any previous data endpoint, opens a fresh listener and announces
/// it. The announced address is the configured `pasv_address`, or the
/// address the client used to reach the control port.
pub async fn handle_pasv_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    session.data_channel.close();

    let (listener, port) = match setup_pasv_listener(context.pasv_bind_ip) {
        Ok(bound) => bound,
        Err(e) => {
            error!("{}", e);
            return send_reply(writer, &e.to_ftp_response()).await;
        }
    };

    let advertised_ip = context.pasv_ip.unwrap_or_else(|| session.local_ipv4());
    session.data_channel = DataChannel::Passive(listener);
    info!(
        "Passive mode for {}: listening on port {}, announced as {}",
        session.peer_addr, port, advertised_ip
    );

    send_reply(writer, &format_pasv_response(advertised_ip, port)).await
}
