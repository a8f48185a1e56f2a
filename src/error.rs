// src/error.rs
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EzViewError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid EZView2 magic: found {found:?}")]
    InvalidMagic { found: Vec<u8> },

    #[error("Truncated header: stream ended while reading {field}")]
    TruncatedHeader { field: &'static str },

    #[error("Header size mismatch: declared {declared} bytes, expected {expected}")]
    HeaderSizeMismatch { declared: u32, expected: u32 },

    #[error("Record size mismatch: declared {declared} bytes, expected {expected}")]
    RecordSizeMismatch { declared: u32, expected: u32 },

    #[error("Truncated record {index} at offset {offset}: expected {expected} bytes, found {found}")]
    TruncatedRecord {
        index: u64,
        offset: u64,
        expected: u64,
        found: u64,
    },

    #[error("Index {index} out of range for capture of {len} records")]
    IndexOutOfRange { index: i64, len: u64 },

    #[error("Slice step cannot be zero")]
    ZeroSliceStep,

    #[error("Timestamp {0} ticks does not fit in 40 bits")]
    TimestampOverflow(u64),

    #[error("Writer closed")]
    WriterClosed,

    #[error("Too many records: a capture holds at most {max}")]
    TooManyRecords { max: u32 },
}

impl EzViewError {
    /// True for errors that mean the stream is not a readable EZView2 capture.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            EzViewError::InvalidMagic { .. }
                | EzViewError::TruncatedHeader { .. }
                | EzViewError::HeaderSizeMismatch { .. }
                | EzViewError::RecordSizeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EzViewError>;
