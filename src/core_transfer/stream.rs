use crate::core_transfer::ascii::{self, AsciiDecoder};
use crate::core_transfer::error::TransferError;
use crate::core_transfer::modes::TransferType;
use log::debug;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

/// Reads from the data connection, failing if nothing arrives within `io_timeout`.
async fn read_data<R>(
    data: &mut R,
    buffer: &mut [u8],
    io_timeout: Duration,
) -> Result<usize, TransferError>
where
    R: AsyncRead + Unpin,
{
    match timeout(io_timeout, data.read(buffer)).await {
        Ok(result) => result.map_err(TransferError::Read),
        Err(_) => Err(TransferError::Timeout),
    }
}

/// Writes to the data connection, failing if the peer stops draining it.
async fn write_data<W>(
    data: &mut W,
    chunk: &[u8],
    io_timeout: Duration,
) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    match timeout(io_timeout, data.write_all(chunk)).await {
        Ok(result) => result.map_err(TransferError::Write),
        Err(_) => Err(TransferError::Timeout),
    }
}

async fn close_data<W>(data: &mut W, io_timeout: Duration) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    let close = async {
        data.flush().await?;
        data.shutdown().await
    };
    match timeout(io_timeout, close).await {
        Ok(result) => result.map_err(TransferError::Write),
        Err(_) => Err(TransferError::Timeout),
    }
}

/// Streams `source` to the data connection, then half-closes it.
///
/// Every write on the data connection must complete within `io_timeout`.
/// Returns the number of bytes put on the wire.
pub async fn send_file<R, W>(
    source: &mut R,
    data: &mut W,
    transfer_type: TransferType,
    buffer_size: usize,
    io_timeout: Duration,
) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size];
    let mut encoded = Vec::new();
    let mut sent: u64 = 0;

    loop {
        let bytes_read = match source.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return Err(TransferError::Read(e)),
        };

        let chunk = match transfer_type {
            TransferType::Binary => &buffer[..bytes_read],
            TransferType::Ascii => {
                encoded.clear();
                ascii::encode(&buffer[..bytes_read], &mut encoded);
                &encoded[..]
            }
        };

        write_data(data, chunk, io_timeout).await?;
        sent += chunk.len() as u64;
    }

    close_data(data, io_timeout).await?;
    debug!("Sent {} bytes on data connection", sent);
    Ok(sent)
}

/// Reads the data connection until EOF and writes it into `dest`.
///
/// A client that sends nothing for `io_timeout` aborts the transfer.
/// Returns the number of bytes persisted.
pub async fn receive_file<R, W>(
    data: &mut R,
    dest: &mut W,
    transfer_type: TransferType,
    buffer_size: usize,
    io_timeout: Duration,
) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size];
    let mut decoder = AsciiDecoder::new();
    let mut decoded = Vec::new();
    let mut stored: u64 = 0;

    loop {
        let bytes_read = match read_data(data, &mut buffer, io_timeout).await? {
            0 => break,
            n => n,
        };

        let chunk = match transfer_type {
            TransferType::Binary => &buffer[..bytes_read],
            TransferType::Ascii => {
                decoded.clear();
                decoder.decode(&buffer[..bytes_read], &mut decoded);
                &decoded[..]
            }
        };

        dest.write_all(chunk).await.map_err(TransferError::Write)?;
        stored += chunk.len() as u64;
    }

    if transfer_type == TransferType::Ascii {
        decoded.clear();
        decoder.finish(&mut decoded);
        dest.write_all(&decoded).await.map_err(TransferError::Write)?;
        stored += decoded.len() as u64;
    }

    dest.flush().await.map_err(TransferError::Write)?;
    debug!("Stored {} bytes from data connection", stored);
    Ok(stored)
}

/// Sends one `name\r\n` line per entry, then half-closes the connection so
/// the client sees the end of the listing.
pub async fn send_listing<W>(
    names: &[String],
    data: &mut W,
    io_timeout: Duration,
) -> Result<usize, TransferError>
where
    W: AsyncWrite + Unpin,
{
    let payload: String = names.iter().map(|name| format!("{}\r\n", name)).collect();

    write_data(data, payload.as_bytes(), io_timeout).await?;
    close_data(data, io_timeout).await?;
    Ok(payload.len())
}
