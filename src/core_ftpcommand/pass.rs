use crate::core_ftpcommand::utils::send_syntax_error;
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::AsyncWrite;

/// Handles the PASS FTP command.
///
/// Checks the password against the credential store for the username given
/// by USER. Hash verification is CPU bound, so it runs on the blocking pool.
pub async fn handle_pass_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    args: &[String],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(password) = args.first() else {
        warn!("PASS command received with no arguments");
        return send_syntax_error(writer).await;
    };

    let Some(username) = session.login_name().map(str::to_owned) else {
        warn!("PASS received without a prior USER command");
        return send_reply(writer, "503 Bad sequence of commands.").await;
    };

    let authenticator = Arc::clone(&context.authenticator);
    let password = password.clone();
    let candidate = username.clone();
    let accepted = tokio::task::spawn_blocking(move || authenticator.verify(&candidate, &password))
        .await
        .unwrap_or_else(|e| {
            error!("Credential check for {} failed to run: {}", username, e);
            false
        });

    if accepted {
        session.is_authenticated = true;
        info!("User {} logged in from {}", username, session.peer_addr);
        send_reply(writer, "230 User logged in, proceed.").await
    } else {
        warn!("Failed login for {} from {}", username, session.peer_addr);
        send_reply(writer, "530 Invalid username or password.").await
    }
}
