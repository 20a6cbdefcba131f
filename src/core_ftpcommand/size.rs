// core_ftpcommand/size.rs

use crate::core_ftpcommand::utils::send_syntax_error;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use log::{error, info};
use tokio::io::AsyncWrite;

/// Handles the SIZE (File Size) FTP command.
///
/// Replies `213 <bytes>` with the stored size of the file. Names that could
/// leave the storage root, missing files and directories get 550.
///
/// # Arguments
///
/// * `writer` - The control connection.
/// * `context` - The shared server state holding the storage.
/// * `args` - The command arguments; the first one is the file name.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating whether the reply could be sent.
pub async fn handle_size_command<W>(
    writer: &mut W,
    context: &ServerContext,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(filename) = args.first() else {
        return send_syntax_error(writer).await;
    };

    match context.storage.stat(filename).await {
        Ok(stat) => {
            info!("File size for {} is {}", filename, stat.size);
            send_reply(writer, &format!("213 {}", stat.size)).await
        }
        Err(e) => {
            error!("SIZE failed: {}", e);
            send_reply(writer, &e.to_ftp_response()).await
        }
    }
}
