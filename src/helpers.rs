use log::{debug, trace};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sends raw reply bytes to the client and flushes them.
pub async fn send_response<W>(writer: &mut W, message: &[u8]) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(message).await?;
    writer.flush().await?;
    trace!("Sent: {:?}", String::from_utf8_lossy(message));
    Ok(())
}

/// Sends a single reply line, appending the CRLF terminator.
pub async fn send_reply<W>(writer: &mut W, line: &str) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    debug!("Reply: {}", line);
    send_response(writer, format!("{}\r\n", line).as_bytes()).await
}

/// Masks arguments that must not end up in the logs.
pub fn loggable_command(line: &str) -> String {
    match line.split_once(' ') {
        Some((verb, _)) if verb.eq_ignore_ascii_case("PASS") => format!("{} ****", verb),
        _ => line.to_string(),
    }
}
