use crate::core_ftpcommand::utils::send_syntax_error;
use crate::helpers::send_reply;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the USER FTP command.
///
/// Stores the username for the following PASS. Sending USER again replaces
/// the stored name but leaves an existing login in place.
///
/// # Arguments
///
/// * `writer` - The control connection.
/// * `session` - The session whose username is set.
/// * `args` - The command arguments; the first one is the username.
pub async fn handle_user_command<W>(
    writer: &mut W,
    session: &mut Session,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(username) = args.first() else {
        warn!("USER command received with no arguments");
        return send_syntax_error(writer).await;
    };

    info!("Received USER command with username: {}", username);
    session.username = Some(username.clone());

    send_reply(writer, "331 User name okay, need password.").await
}
