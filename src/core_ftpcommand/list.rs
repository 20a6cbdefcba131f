use crate::core_ftpcommand::utils::open_data_connection;
use crate::core_transfer::send_listing;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info};
use tokio::io::AsyncWrite;

/// Handles the LIST FTP command.
///
/// Sends the names in the storage root, one per CRLF terminated line, over
/// the data connection. Arguments are ignored since there is only one
/// directory to list.
pub async fn handle_list_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(mut data_stream) = open_data_connection(writer, context, session).await? else {
        return Ok(());
    };

    let names = match context.storage.list().await {
        Ok(names) => names,
        Err(e) => {
            error!("LIST failed: {}", e);
            return send_reply(writer, &e.to_ftp_response()).await;
        }
    };

    send_reply(writer, "150 Opening data connection for directory listing.").await?;

    let data_timeout = context.config.server.data_timeout();
    let result = send_listing(&names, &mut data_stream, data_timeout).await;
    drop(data_stream);

    match result {
        Ok(bytes) => {
            info!("Directory listing sent ({} entries, {} bytes)", names.len(), bytes);
            send_reply(writer, "226 Directory send OK.").await
        }
        Err(e) => {
            error!("Error sending directory listing: {}", e);
            send_reply(writer, &e.to_ftp_response()).await
        }
    }
}
