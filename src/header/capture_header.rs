// src/header/capture_header.rs
use crate::error::{EzViewError, Result};
use crate::record::RECORD_SIZE;
use crate::types::{FileTime, TickResolution};
use crate::utils::read_up_to;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// How strictly the declared header and record sizes are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Sizes must match the known layout exactly
    #[default]
    Strict,
    /// Larger sizes are accepted; extra header bytes and record padding are skipped
    Lenient,
}

/// Parsed EZView2 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHeader {
    pub header_size: u32,
    pub version: u32,
    pub device_type: u32,
    pub record_count: u32,
    pub record_size: u32,
    pub capture_start: FileTime,
    pub first_record_time: FileTime,
}

impl CaptureHeader {
    pub const MAGIC: &'static [u8; 32] =
        b"EZView2\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0";
    pub const MAGIC_SIZE: u64 = 32;
    /// Bytes of the structure that follows the magic
    pub const STRUCT_SIZE: u32 = 36;
    pub const VERSION: u32 = 1;
    /// Byte offset of the record count field, patched by the writer
    pub const RECORD_COUNT_OFFSET: u64 = 44;

    /// Header for an empty capture with the standard layout
    pub fn new(device_type: u32, capture_start: FileTime, first_record_time: FileTime) -> Self {
        CaptureHeader {
            header_size: Self::STRUCT_SIZE,
            version: Self::VERSION,
            device_type,
            record_count: 0,
            record_size: RECORD_SIZE as u32,
            capture_start,
            first_record_time,
        }
    }

    /// Parse the header from the start of `reader`
    pub fn read_from<R: Read + Seek>(reader: &mut R, policy: HeaderPolicy) -> Result<Self> {
        read_header(reader, policy)
    }

    /// Absolute offset of the first record
    pub fn data_offset(&self) -> u64 {
        Self::MAGIC_SIZE + self.header_size as u64
    }

    pub fn tick_resolution(&self) -> TickResolution {
        TickResolution::from_device_type(self.device_type)
    }

    /// Stream length needed to hold every declared record
    pub fn expected_stream_len(&self) -> u64 {
        self.data_offset() + self.record_count as u64 * self.record_size as u64
    }

    /// Serialize the magic and the standard 36-byte structure.
    ///
    /// Extended headers (`header_size > 36`) are written zero-padded.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(Self::MAGIC)?;
        writer.write_u32::<LittleEndian>(self.header_size)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u32::<LittleEndian>(self.device_type)?;
        writer.write_u32::<LittleEndian>(self.record_count)?;
        writer.write_u32::<LittleEndian>(self.record_size)?;
        writer.write_u64::<LittleEndian>(self.capture_start.raw())?;
        writer.write_u64::<LittleEndian>(self.first_record_time.raw())?;

        let padding = self.header_size.saturating_sub(Self::STRUCT_SIZE) as usize;
        if padding > 0 {
            writer.write_all(&vec![0u8; padding])?;
        }
        Ok(())
    }
}

/// Read and validate the header, leaving `reader` positioned at the first record.
pub fn read_header<R: Read + Seek>(reader: &mut R, policy: HeaderPolicy) -> Result<CaptureHeader> {
    reader.seek(SeekFrom::Start(0))?;

    let mut magic = [0u8; 32];
    let found = read_up_to(reader, &mut magic)?;
    if found < magic.len() || &magic != CaptureHeader::MAGIC {
        return Err(EzViewError::InvalidMagic {
            found: magic[..found].to_vec(),
        });
    }

    let header_size = read_u32_field(reader, "header_size")?;
    let version = read_u32_field(reader, "version")?;
    let device_type = read_u32_field(reader, "device_type")?;
    let record_count = read_u32_field(reader, "record_count")?;
    let record_size = read_u32_field(reader, "record_size")?;
    let capture_start = FileTime(read_u64_field(reader, "capture_start")?);
    let first_record_time = FileTime(read_u64_field(reader, "first_record_time")?);

    check_size(header_size, CaptureHeader::STRUCT_SIZE, policy).map_err(|expected| {
        EzViewError::HeaderSizeMismatch {
            declared: header_size,
            expected,
        }
    })?;
    check_size(record_size, RECORD_SIZE as u32, policy).map_err(|expected| {
        EzViewError::RecordSizeMismatch {
            declared: record_size,
            expected,
        }
    })?;

    let header = CaptureHeader {
        header_size,
        version,
        device_type,
        record_count,
        record_size,
        capture_start,
        first_record_time,
    };

    if header_size != CaptureHeader::STRUCT_SIZE || record_size != RECORD_SIZE as u32 {
        tracing::warn!(
            header_size,
            record_size,
            "accepted non-standard EZView2 layout"
        );
    }

    reader.seek(SeekFrom::Start(header.data_offset()))?;
    Ok(header)
}

fn check_size(declared: u32, expected: u32, policy: HeaderPolicy) -> std::result::Result<(), u32> {
    let ok = match policy {
        HeaderPolicy::Strict => declared == expected,
        HeaderPolicy::Lenient => declared >= expected,
    };
    if ok {
        Ok(())
    } else {
        Err(expected)
    }
}

fn read_u32_field<R: Read>(reader: &mut R, field: &'static str) -> Result<u32> {
    reader
        .read_u32::<LittleEndian>()
        .map_err(|e| truncated_or_io(e, field))
}

fn read_u64_field<R: Read>(reader: &mut R, field: &'static str) -> Result<u64> {
    reader
        .read_u64::<LittleEndian>()
        .map_err(|e| truncated_or_io(e, field))
}

fn truncated_or_io(err: std::io::Error, field: &'static str) -> EzViewError {
    if err.kind() == ErrorKind::UnexpectedEof {
        EzViewError::TruncatedHeader { field }
    } else {
        EzViewError::Io(err)
    }
}
