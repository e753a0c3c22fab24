// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format for replicated log entries.
//!
//! Wire format: 1-byte type tag + 1-byte compressed flag + 4-byte
//! big-endian sub-command length + sub-command bytes. `Load` and
//! `LoadChunk` sub-commands use a hand-rolled layout instead of the
//! generic bincode framing so the raw file payload is never copied
//! through an intermediate deserializer.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod envelope;
mod error;
mod load;

pub use codec::{decode, encode};
pub use envelope::{Envelope, RecordKind};
pub use error::DecodeError;
pub use load::{decode_load, decode_load_chunk, encode_load, encode_load_chunk};
