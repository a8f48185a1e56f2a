// src/lib.rs
//! # ezview-rs
//!
//! Random-access reader for EZ-View capture files (`EZView2` format), as
//! recorded by EZ-Tap serial protocol analyzers.
//!
//! A capture is a fixed header followed by 8-byte packet records, one per
//! bus event: a data byte sent by the DTE or DCE, a handshaking line change,
//! or an error/break condition. Each record carries a 40-bit tick
//! timestamp and the state of the RS-232 control lines.
//!
//! ## Features
//!
//! - 📦 **Memory Efficient**: packets are decoded on demand, nothing is preloaded
//! - 🎯 **Random Access**: O(1) indexed, negative-indexed and sliced reads
//! - ⏱️ **Timeline**: relative and wall-clock packet times, matching the analyzer UI
//! - ✍️ **Writer**: produce valid captures for fixtures and tooling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ezview_rs::*;
//!
//! fn main() -> Result<()> {
//!     let mut capture = CaptureSequence::open("EZ-ViewDemo.dat")?;
//!     println!("{} packets, device type {}", capture.len(), capture.header().device_type);
//!
//!     for packet in capture.slice(Some(-10), None, None)? {
//!         let packet = packet?;
//!         if let Some(byte) = packet.data_byte() {
//!             println!("{:?} sent 0x{:02x}", packet.event_type, byte);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Writing Captures
//!
//! ```rust
//! use ezview_rs::*;
//! use std::io::Cursor;
//!
//! let mut writer = CaptureWriter::new(Cursor::new(Vec::new()), CaptureInfo::default()).unwrap();
//! writer.write_packet(&DataPacket {
//!     time_ticks: 10,
//!     event_type: EventType::DteTx,
//!     data_or_status: b'A',
//!     ..DataPacket::default()
//! }).unwrap();
//! let bytes = writer.finish().unwrap().into_inner();
//!
//! let mut capture = CaptureSequence::from_reader(Cursor::new(bytes)).unwrap();
//! assert_eq!(capture.get(0).unwrap().data_byte(), Some(b'A'));
//! ```

// Modules
pub mod error;
pub mod types;
pub mod header;
pub mod record;
pub mod reader;
pub mod writer;

mod utils;

// Re-export commonly used types at the crate root for convenience
pub use error::{EzViewError, Result};

pub use types::{
    ControlSignals,
    DceHandshake,
    DteHandshake,
    ErrorStatus,
    EventType,
    FileTime,
    PacketStatus,
    TickResolution,
};

pub use header::{CaptureHeader, HeaderPolicy};

pub use record::{DataPacket, RawRecord, RECORD_SIZE};

pub use reader::{CaptureSequence, Packets, ReadOptions, SliceIndices};

pub use writer::{CaptureInfo, CaptureWriter};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use ezview_rs::prelude::*;
    //! ```

    pub use crate::error::{EzViewError, Result};
    pub use crate::record::DataPacket;
    pub use crate::reader::{CaptureSequence, ReadOptions};
    pub use crate::types::{ControlSignals, EventType};
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
