// src/record/mod.rs
//! Fixed-size packet records
//!
//! Each record is 8 bytes:
//!
//! ```text
//! 0..4  time (low 32 bits, little-endian)
//! 4     event type
//! 5     data byte / status bits
//! 6     control line bitmask
//! 7     time (bits 32..40)
//! ```
//!
//! The two timestamp parts are not adjacent; [`decode_record`] combines them
//! into a single 40-bit tick count.

mod codec;
mod packet;

pub use codec::{decode_record, encode_record, RawRecord, MAX_TICKS, RECORD_SIZE};
pub use packet::DataPacket;
