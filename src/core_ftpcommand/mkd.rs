use crate::core_ftpcommand::utils::send_syntax_error;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the MKD (Make Directory) FTP command.
///
/// No directory tree exists below the storage root: naming the root reports
/// success, any other path is refused.
pub async fn handle_mkd_command<W>(
    writer: &mut W,
    context: &ServerContext,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(directory) = args.first() else {
        warn!("MKD command received with no arguments");
        return send_syntax_error(writer).await;
    };

    let root_path = &context.config.server.root_path;
    if directory == root_path {
        info!("MKD on storage root {}", root_path);
        send_reply(writer, &format!("257 \"{}\" directory created.", root_path)).await
    } else {
        warn!("MKD refused for {}", directory);
        send_reply(writer, "550 Failed to create directory.").await
    }
}
