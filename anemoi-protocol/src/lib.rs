//! MultiWii Serial Protocol (MSP) framing
//!
//! This crate defines the wire layer used between the Anemoi flight
//! controller and ground-side tools (configurator, companion computer).
//! The protocol is designed for robustness over a raw byte stream with
//! no guaranteed framing: the parser resynchronizes on the next start
//! marker after any malformed or corrupted frame.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌─────┬─────┬─────┬────────┬─────┬─────────┬──────────┐
//! │ '$' │ 'M' │ DIR │ LENGTH │ CMD │ PAYLOAD │ CHECKSUM │
//! │ 1B  │ 1B  │ 1B  │ 1B     │ 1B  │ 0–128B  │ 1B       │
//! └─────┴─────┴─────┴────────┴─────┴─────────┴──────────┘
//! ```
//!
//! DIR is `'<'` for requests to the flight controller, `'>'` for
//! successful replies, and `'!'` for error replies. The checksum is the
//! XOR of LENGTH, CMD, and all PAYLOAD bytes; the three marker bytes are
//! not checksummed. Multi-byte payload fields are little-endian.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod commands;
pub mod frame;
pub mod writer;

pub use frame::{
    Frame, FrameError, FrameEvent, FrameParser, PayloadCursor, DIR_REQUEST, FRAME_START,
    MAX_PAYLOAD_SIZE, PROTOCOL_M, STATUS_ERROR, STATUS_OK,
};
pub use writer::{ReplyWriter, SerialTx};
