use crate::constants::MAX_COMMAND_LENGTH;
use crate::core_ftpcommand::handlers::{dispatch, CommandOutcome};
use crate::core_ftpcommand::utils::split_command;
use crate::helpers::{loggable_command, send_reply};
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio::time::timeout;

/// Accepts control connections forever, one task per session.
///
/// Sessions beyond `max_sessions` are told to come back later and closed.
pub async fn start_server(listener: TcpListener, context: Arc<ServerContext>) -> Result<()> {
    let sessions = Arc::new(Semaphore::new(context.config.server.max_sessions));

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let permit = match Arc::clone(&sessions).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Session limit reached, refusing {}", addr);
                tokio::spawn(refuse_connection(socket));
                continue;
            }
        };

        info!("New connection from {}", addr);
        let context = Arc::clone(&context);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = handle_connection(socket, context).await {
                warn!("Connection error for {}: {}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

async fn refuse_connection(mut socket: TcpStream) {
    if let Err(e) = send_reply(&mut socket, "421 Too many connections, try again later.").await {
        debug!("Could not send 421: {}", e);
    }
}

/// Drives one control connection until QUIT, EOF, idle timeout or an I/O
/// error. The session, and with it any data socket, is dropped on return.
pub async fn handle_connection(socket: TcpStream, context: Arc<ServerContext>) -> std::io::Result<()> {
    let peer_addr = socket.peer_addr()?;
    let local_addr = socket.local_addr()?;
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut session = Session::new(peer_addr, local_addr);

    send_reply(&mut writer, &format!("220 {}", context.config.server.banner)).await?;

    let idle_timeout = context.config.server.idle_timeout();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = match timeout(idle_timeout, read_command_line(&mut reader, &mut line)).await {
            Ok(read) => read?,
            Err(_) => {
                info!("Idle timeout for {}", peer_addr);
                send_reply(&mut writer, "421 Idle timeout, closing control connection.")
                    .await
                    .ok();
                break;
            }
        };

        match read {
            LineRead::Eof => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            LineRead::TooLong => {
                warn!("Discarded over-long command line from {}", peer_addr);
                send_reply(&mut writer, "500 Line too long.").await?;
                continue;
            }
            LineRead::Line => {}
        }

        let text = String::from_utf8_lossy(&line);
        let tokens = split_command(&text);
        if tokens.is_empty() {
            continue;
        }
        debug!("Received command: {}", loggable_command(text.trim_end()));

        match dispatch(&mut writer, &context, &mut session, &tokens).await? {
            CommandOutcome::Continue => {}
            CommandOutcome::Quit => break,
        }
    }

    session.data_channel.close();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Line,
    TooLong,
    Eof,
}

/// Reads one LF terminated line into `line`, bounded by `MAX_COMMAND_LENGTH`.
///
/// The remainder of an over-long line is consumed and dropped.
async fn read_command_line<R>(reader: &mut R, line: &mut Vec<u8>) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_COMMAND_LENGTH as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', line).await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if line.last() == Some(&b'\n') || line.len() < MAX_COMMAND_LENGTH {
        return Ok(LineRead::Line);
    }

    let mut discard = Vec::new();
    loop {
        discard.clear();
        let n = (&mut *reader).take(limit).read_until(b'\n', &mut discard).await?;
        if n == 0 || discard.last() == Some(&b'\n') {
            return Ok(LineRead::TooLong);
        }
    }
}
