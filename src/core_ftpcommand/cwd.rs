use crate::core_ftpcommand::utils::send_syntax_error;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use log::warn;
use tokio::io::AsyncWrite;

/// Handles the CWD FTP command. The storage is flat, so the root itself is
/// the only directory a client can change into.
pub async fn handle_cwd_command<W>(
    writer: &mut W,
    context: &ServerContext,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(directory) = args.first() else {
        return send_syntax_error(writer).await;
    };

    if *directory == context.config.server.root_path {
        send_reply(writer, "250 Directory successfully changed.").await
    } else {
        warn!("CWD to unknown directory: {}", directory);
        send_reply(writer, "550 Failed to change directory.").await
    }
}
