// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::DecodeError;

const HEADER_LEN: usize = 1 + 1 + 4;

/// The outer envelope's type tag. `Unknown` is not a wire tag: it is
/// what the codec produces when it sees a tag it doesn't recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    Query = 0,
    Execute = 1,
    ExecuteQuery = 2,
    Load = 3,
    LoadChunk = 4,
    Noop = 5,
}

impl RecordKind {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Query),
            1 => Some(Self::Execute),
            2 => Some(Self::ExecuteQuery),
            3 => Some(Self::Load),
            4 => Some(Self::LoadChunk),
            5 => Some(Self::Noop),
            _ => None,
        }
    }
}

/// The decoded outer envelope: a type tag plus the (decompressed)
/// sub-command bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub tag: u8,
    pub kind: Option<RecordKind>,
    pub sub_command: Vec<u8>,
}

/// Parses `tag(1) | compressed(1) | len(4, BE) | sub_command(len)`.
///
/// Trailing bytes beyond the declared length are an error rather than
/// silently ignored: a length that doesn't match what follows means the
/// two replicas building this envelope disagreed, which is exactly the
/// integrity violation this codec exists to catch.
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated { need: HEADER_LEN, have: bytes.len() });
    }
    let tag = bytes[0];
    let compressed = bytes[1] != 0;
    let declared_len =
        u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]) as usize;
    let body = &bytes[HEADER_LEN..];
    if body.len() != declared_len {
        return Err(DecodeError::LengthMismatch { declared: declared_len, actual: body.len() });
    }

    let sub_command = if compressed {
        zstd::stream::decode_all(body).map_err(DecodeError::Decompress)?
    } else {
        body.to_vec()
    };

    Ok(Envelope { tag, kind: RecordKind::from_tag(tag), sub_command })
}

/// Encodes a tag plus raw (already-serialized, uncompressed) sub-command
/// bytes into the outer envelope. Used by [`crate::encode`] and by the
/// fast-path `Load`/`LoadChunk` encoders.
pub fn encode_envelope(tag: u8, sub_command: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + sub_command.len());
    out.push(tag);
    out.push(0); // compressed = false; the core never compresses on encode.
    out.extend_from_slice(&(sub_command.len() as u32).to_be_bytes());
    out.extend_from_slice(sub_command);
    out
}
