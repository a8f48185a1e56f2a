// src/writer/capture_writer.rs
use crate::error::{EzViewError, Result};
use crate::header::CaptureHeader;
use crate::record::{encode_record, DataPacket};
use crate::types::FileTime;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Capture-level values written into the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureInfo {
    pub version: u32,
    pub device_type: u32,
    pub capture_start: FileTime,
    pub first_record_time: FileTime,
}

impl Default for CaptureInfo {
    fn default() -> Self {
        CaptureInfo {
            version: CaptureHeader::VERSION,
            device_type: 0,
            capture_start: FileTime::default(),
            first_record_time: FileTime::default(),
        }
    }
}

/// Writes EZView2 captures with the standard layout.
///
/// The header is written up front with a record count of zero and patched
/// by [`finish`](CaptureWriter::finish). Dropping an unfinished writer
/// finishes it on a best-effort basis.
pub struct CaptureWriter<W: Write + Seek> {
    // Only None after finish() has taken the writer
    writer: Option<W>,
    records_written: u32,
}

impl CaptureWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>, info: CaptureInfo) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), info)
    }
}

impl<W: Write + Seek> CaptureWriter<W> {
    pub fn new(mut writer: W, info: CaptureInfo) -> Result<Self> {
        let mut header = CaptureHeader::new(info.device_type, info.capture_start, info.first_record_time);
        header.version = info.version;
        header.write_to(&mut writer)?;

        Ok(CaptureWriter {
            writer: Some(writer),
            records_written: 0,
        })
    }

    /// Append one record; the packet's `index` is ignored
    pub fn write_packet(&mut self, packet: &DataPacket) -> Result<()> {
        if self.records_written == u32::MAX {
            return Err(EzViewError::TooManyRecords { max: u32::MAX });
        }
        let raw = encode_record(packet)?;
        self.inner_mut()?.write_all(raw.as_bytes())?;
        self.records_written += 1;
        Ok(())
    }

    pub fn write_packets<'p>(&mut self, packets: impl IntoIterator<Item = &'p DataPacket>) -> Result<()> {
        for packet in packets {
            self.write_packet(packet)?;
        }
        Ok(())
    }

    pub fn records_written(&self) -> u32 {
        self.records_written
    }

    /// Patch the record count, flush and return the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.finalize()?;
        self.writer.take().ok_or(EzViewError::WriterClosed)
    }

    fn finalize(&mut self) -> Result<()> {
        let count = self.records_written;
        let writer = self.inner_mut()?;
        let end = writer.stream_position()?;
        writer.seek(SeekFrom::Start(CaptureHeader::RECORD_COUNT_OFFSET))?;
        writer.write_u32::<LittleEndian>(count)?;
        writer.seek(SeekFrom::Start(end))?;
        writer.flush()?;
        Ok(())
    }

    fn inner_mut(&mut self) -> Result<&mut W> {
        self.writer.as_mut().ok_or(EzViewError::WriterClosed)
    }
}

impl<W: Write + Seek> Drop for CaptureWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_some() {
            let _ = self.finalize();
        }
    }
}
