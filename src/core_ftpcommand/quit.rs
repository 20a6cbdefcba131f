use crate::helpers::send_reply;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the QUIT FTP command. The caller closes the connection afterwards.
pub async fn handle_quit_command<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("Received QUIT command. Closing connection.");
    send_reply(writer, "221 Goodbye.").await
}
