use {
    crate::{ComError, Packet},
    tokio::io::{AsyncReadExt, AsyncWriteExt},
};

pub const MAX_MESSAGE_SIZE: u32 = 64 * 1024 * 1024; // 64 MB

/// Write a length-prefixed message to an async writer.
///
/// Writes a 4-byte little-endian length prefix, then the payload.
pub async fn write_message<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), ComError> {
    let len = u32::try_from(payload.len()).map_err(|_| ComError::MessageTooLarge(u32::MAX))?;

    if len > MAX_MESSAGE_SIZE {
        return Err(ComError::MessageTooLarge(len));
    }

    // one write keeps small packets in a single segment
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(payload);
    writer.write_all(&buf).await?;

    Ok(())
}

/// Read a length-prefixed message from an async reader.
///
/// Returns `ComError::ConnectionClosed` if EOF is encountered.
/// Returns `ComError::MessageTooLarge` if length exceeds `MAX_MESSAGE_SIZE`.
pub async fn read_message<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Vec<u8>, ComError> {
    // Read 4-byte length prefix
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ComError::ConnectionClosed);
        }
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf);

    if len > MAX_MESSAGE_SIZE {
        return Err(ComError::MessageTooLarge(len));
    }

    let mut payload = vec![0u8; len as usize];
    match reader.read_exact(&mut payload).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ComError::ConnectionClosed);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(payload)
}

pub async fn write_packet<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    packet: &Packet,
) -> Result<(), ComError> {
    write_message(writer, &packet.to_bytes()).await
}

pub async fn read_packet<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Packet, ComError> {
    let bytes = read_message(reader).await?;
    Ok(Packet::from_bytes(&bytes)?)
}
