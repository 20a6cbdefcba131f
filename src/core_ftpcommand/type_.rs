use crate::core_ftpcommand::utils::send_syntax_error;
use crate::core_transfer::TransferType;
use crate::helpers::send_reply;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the TYPE FTP command.
///
/// Only `A` (ASCII) and `I` (image/binary) are supported; anything else is
/// answered with 504 and leaves the current type unchanged.
///
/// # Arguments
///
/// * `writer` - The control connection.
/// * `session` - The session whose representation type is set.
/// * `args` - The command arguments; the first one is the type code.
pub async fn handle_type_command<W>(
    writer: &mut W,
    session: &mut Session,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(code) = args.first() else {
        return send_syntax_error(writer).await;
    };

    match TransferType::from_code(code) {
        Some(transfer_type) => {
            session.transfer_type = transfer_type;
            info!("Transfer type set to {:?}", transfer_type);
            send_reply(writer, &format!("200 Type set to {}.", transfer_type.code())).await
        }
        None => {
            warn!("Unsupported TYPE parameter: {}", code);
            send_reply(writer, "504 Command not implemented for that parameter.").await
        }
    }
}
