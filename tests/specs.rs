//! Behavioral specifications for the replicated command-application core.
//!
//! These exercise the public API of `rlog-core`/`rlog-wire`/`rlog-engine`/
//! `rlog-chunk`/`rlog-apply` directly — there's no subprocess boundary for
//! a state machine that's never run as its own binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/record_codec.rs"]
mod record_codec;
#[path = "specs/engine_handle.rs"]
mod engine_handle;
#[path = "specs/chunk_reassembly.rs"]
mod chunk_reassembly;
#[path = "specs/apply_dispatch.rs"]
mod apply_dispatch;
