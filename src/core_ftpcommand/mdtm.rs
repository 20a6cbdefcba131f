use crate::core_ftpcommand::utils::send_syntax_error;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use log::{error, info, warn};
use tokio::io::AsyncWrite;

/// Handles the MDTM FTP command: `213 YYYYMMDDHHMMSS` in UTC.
pub async fn handle_mdtm_command<W>(
    writer: &mut W,
    context: &ServerContext,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(filename) = args.first() else {
        warn!("MDTM command received with no arguments");
        return send_syntax_error(writer).await;
    };

    match context.storage.stat(filename).await {
        Ok(stat) => {
            let timestamp = stat.mdtm();
            info!("Modification time for {} is {}", filename, timestamp);
            send_reply(writer, &format!("213 {}", timestamp)).await
        }
        Err(e) => {
            error!("MDTM failed: {}", e);
            send_reply(writer, &e.to_ftp_response()).await
        }
    }
}
