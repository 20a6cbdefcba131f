// src/core_ftpcommand/pwd.rs
use crate::helpers::send_reply;
use crate::server::ServerContext;
use tokio::io::AsyncWrite;

pub async fn handle_pwd_command<W>(
    writer: &mut W,
    context: &ServerContext,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let response = format!(
        "257 \"{}\" is the current directory.",
        context.config.server.root_path
    );
    send_reply(writer, &response).await
}
