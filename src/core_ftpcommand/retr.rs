use crate::core_ftpcommand::utils::{open_data_connection, require_data_channel, send_syntax_error};
use crate::core_transfer::send_file;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

/// Handles the RETR (Retrieve) FTP command.
///
/// Sends a stored file to the client over the data connection, translating
/// line endings in ASCII mode. The data connection is owned by this call and
/// closed whichever way it returns.
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
pub async fn handle_retr_command<W>(
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
        warn!("RETR command received with no arguments");
        return send_syntax_error(writer).await;
    };
    let Some(data_stream) = open_data_connection(writer, context, session).await? else {
        return Ok(());
    };

    retrieve_file(writer, context, session, filename, data_stream).await
}

async fn retrieve_file<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &Session,
    filename: &str,
    mut data_stream: TcpStream,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mut file = match context.storage.open_read(filename).await {
        Ok(file) => file,
        Err(e) => {
            error!("RETR {} refused: {}", filename, e);
            return send_reply(writer, &e.to_ftp_response()).await;
        }
    };

    send_reply(writer, "150 Opening data connection.").await?;
    info!("Sending file: {} ({:?})", filename, session.transfer_type);

    let result = send_file(
        &mut file,
        &mut data_stream,
        session.transfer_type,
        context.config.server.download_buffer_size,
        context.config.server.data_timeout(),
    )
    .await;
    drop(data_stream);

    match result {
        Ok(bytes) => {
            info!("File transfer completed: {} ({} bytes)", filename, bytes);
            send_reply(writer, "226 Transfer complete.").await
        }
        Err(e) => {
            error!("Error sending {} to client: {}", filename, e);
            send_reply(writer, &e.to_ftp_response()).await
        }
    }
}
