use bytes::{Buf, BytesMut};

use crate::error::ProtocolError;
use crate::node::Node;

/// Maximum framed node size: 64 KiB.
pub const MAX_MSG_SIZE: u32 = 65_536;

/// Encode a `Node` into a length-prefixed byte buffer for the transport writer.
pub fn encode_node(node: &Node) -> Result<Vec<u8>, ProtocolError> {
    let payload = postcard::to_allocvec(node)?;
    if payload.len() > MAX_MSG_SIZE as usize {
        return Err(ProtocolError::MessageTooLarge(payload.len()));
    }
    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a `Node` from a postcard-encoded payload (without length prefix).
pub fn decode_node(payload: &[u8]) -> Result<Node, ProtocolError> {
    Ok(postcard::from_bytes(payload)?)
}

/// Attempt to extract one complete length-prefixed frame from a byte buffer.
///
/// Returns `Ok(Some(payload))` if a complete frame is available,
/// `Ok(None)` if more data is needed, or `Err` if the frame is too large.
///
/// Advances the buffer past the consumed frame.
pub fn try_decode_frame(buf: &mut BytesMut) -> Result<Option<Vec<u8>>, ProtocolError> {
    if buf.len() < 4 {
        return Ok(None);
    }

    let length = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;

    if length > MAX_MSG_SIZE as usize {
        return Err(ProtocolError::MessageTooLarge(length));
    }

    if buf.len() < 4 + length {
        return Ok(None);
    }

    buf.advance(4);
    let payload = buf.split_to(length).to_vec();
    Ok(Some(payload))
}
