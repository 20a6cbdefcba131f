use crate::core_network::error::DataChannelError;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::warn;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

/// Splits a control line into its verb and arguments.
///
/// A trailing CRLF (or bare LF) is stripped and the rest is split on single
/// spaces, so consecutive spaces yield empty tokens. A blank line yields no
/// tokens at all.
pub fn split_command(line: &str) -> Vec<String> {
    let line = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);

    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split(' ').map(str::to_string).collect()
}

pub async fn send_syntax_error<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    send_reply(writer, "501 Syntax error in parameters or arguments.").await
}

/// Replies 425 unless a PORT or PASV endpoint is in place.
pub async fn require_data_channel<W>(
    writer: &mut W,
    session: &Session,
) -> Result<bool, std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    if session.data_channel.is_established() {
        return Ok(true);
    }
    warn!("Transfer requested without a data channel");
    send_reply(writer, &DataChannelError::NotEstablished.to_ftp_response()).await?;
    Ok(false)
}

/// Obtains the data connection for one transfer, replying 425 on failure.
pub async fn open_data_connection<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
) -> Result<Option<TcpStream>, std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let data_timeout = context.config.server.data_timeout();
    match session.data_channel.open_transfer(data_timeout).await {
        Ok(stream) => Ok(Some(stream)),
        Err(e) => {
            warn!("Data connection unavailable: {}", e);
            send_reply(writer, &e.to_ftp_response()).await?;
            Ok(None)
        }
    }
}
