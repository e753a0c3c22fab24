// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rlog-core: shared domain types for the replicated-log apply core.
//!
//! This crate has no I/O of its own. It defines the command record
//! tagged union, the engine request/result shapes, and a `Clock`
//! abstraction used by the reassembly TTL sweeper for deterministic
//! tests. Decoding, engine access, chunk reassembly and dispatch all
//! live in their own crates and depend on these types.

pub mod clock;
pub mod record;
pub mod result;

pub use clock::{Clock, FakeClock, SystemClock};
pub use record::{CommandRecord, ExecuteRequest, LoadChunkPayload, LoadPayload, QueryRequest};
pub use result::{
    is_mixed_mutated, ApplyResult, ExecuteResult, MixedResultItem, Rows, QUERY_UNHANDLED_ERROR,
};
