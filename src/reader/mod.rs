// src/reader/mod.rs
mod options;
mod packets;
mod sequence;

pub use options::ReadOptions;
pub use packets::{Packets, SliceIndices};
pub use sequence::{CaptureSequence, ReadSeek};
