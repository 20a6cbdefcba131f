use crate::core_ftpcommand::utils::{open_data_connection, require_data_channel, send_syntax_error};
use crate::core_transfer::receive_file;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

/// Handles the STOR (Store File) FTP command.
///
/// Reads the data connection until the client closes it and writes the
/// bytes into the storage root, creating the root first when missing. In
/// ASCII mode CRLF pairs are stored as LF.
///
/// # Arguments
///
/// * `writer` - The control connection.
/// * `context` - The shared server state holding storage and configuration.
/// * `session` - The session providing the data channel and transfer type.
/// * `args` - The command arguments; the first one is the file name.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating whether the control connection is still usable.
pub async fn handle_stor_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    if !require_data_channel(writer, session).await? {
        return Ok(());
    }
    let Some(filename) = args.first() else {
        warn!("STOR command received with no arguments");
        return send_syntax_error(writer).await;
    };
    let Some(data_stream) = open_data_connection(writer, context, session).await? else {
        return Ok(());
    };

    store_file(writer, context, session, filename, data_stream).await
}

async fn store_file<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &Session,
    filename: &str,
    mut data_stream: TcpStream,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mut file = match context.storage.create_write(filename).await {
        Ok(file) => file,
        Err(e) => {
            error!("STOR {} refused: {}", filename, e);
            return send_reply(writer, &e.to_ftp_response()).await;
        }
    };

    send_reply(writer, "150 Opening data connection.").await?;
    info!("Receiving file: {} ({:?})", filename, session.transfer_type);

    let result = receive_file(
        &mut data_stream,
        &mut file,
        session.transfer_type,
        context.config.server.upload_buffer_size,
        context.config.server.data_timeout(),
    )
    .await;
    drop(data_stream);
    drop(file);

    match result {
        Ok(bytes) => {
            info!("File stored successfully: {} ({} bytes)", filename, bytes);
            send_reply(writer, "226 Transfer complete.").await
        }
        Err(e) => {
            error!("Error receiving {} from client: {}", filename, e);
            send_reply(writer, &e.to_ftp_response()).await
        }
    }
}
