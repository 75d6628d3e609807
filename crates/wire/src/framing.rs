// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire framing: 4-byte big-endian length prefix + JSON payload.

use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest frame we'll read before assuming the peer is misbehaving.
/// Generously sized — no message in this protocol carries anything larger
/// than a handful of short strings.
const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("operation timed out")]
    Timeout,

    #[error("frame exceeds maximum length ({0} bytes)")]
    FrameTooLarge(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads one framed, JSON-decoded message within `timeout`.
///
/// A clean EOF while reading the length prefix is reported as
/// [`ProtocolError::ConnectionClosed`] rather than an I/O error, so callers
/// can distinguish "peer hung up" from "peer misbehaved."
pub async fn read_message<T, R>(reader: &mut R, timeout: Duration) -> Result<T, ProtocolError>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(timeout, read_message_inner(reader))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

async fn read_message_inner<T, R>(reader: &mut R) -> Result<T, ProtocolError>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(serde_json::from_slice(&payload)?)
}

/// Writes one framed, JSON-encoded message within `timeout`.
pub async fn write_message<T, W>(
    writer: &mut W,
    message: &T,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    tokio::time::timeout(timeout, write_message_inner(writer, message))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

async fn write_message_inner<T, W>(writer: &mut W, message: &T) -> Result<(), ProtocolError>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_vec(message)?;
    let len: u32 =
        payload.len().try_into().map_err(|_| ProtocolError::FrameTooLarge(u32::MAX))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
