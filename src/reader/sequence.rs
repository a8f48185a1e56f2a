// src/reader/sequence.rs
use crate::error::{EzViewError, Result};
use crate::header::{read_header, CaptureHeader};
use crate::reader::options::ReadOptions;
use crate::reader::packets::{normalize_index, Packets, SliceIndices};
use crate::record::{decode_record, DataPacket, RECORD_SIZE};
use crate::types::TickResolution;
use crate::utils::read_up_to;
use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, TimeDelta, Utc};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;
#[cfg(feature = "mmap")]
use std::io::Cursor;

/// Trait alias for Read + Seek
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Random-access view of the packets in an EZView2 capture.
///
/// The header is parsed once on construction; packets are decoded on
/// demand with one seek and one record-sized read each, so the cost of an
/// access does not depend on the file size or the position accessed.
///
/// The sequence owns its stream and moves its cursor on every access. Use a
/// separately opened handle per thread for concurrent reads.
///
/// # Example
///
/// ```no_run
/// use ezview_rs::CaptureSequence;
///
/// let mut capture = CaptureSequence::open("EZ-ViewDemo.dat").unwrap();
/// println!("{} packets", capture.len());
///
/// let last = capture.get(-1).unwrap();
/// println!("last: {}", last);
///
/// for packet in capture.slice(Some(0), Some(12), Some(3)).unwrap() {
///     println!("{}", packet.unwrap());
/// }
/// ```
pub struct CaptureSequence<R: ReadSeek> {
    source: R,
    header: CaptureHeader,
    stream_len: u64,
    time_correction: u32,
    // Known cursor position, None after an error or short read
    position: Option<u64>,
    // Declared stride; bytes past the first RECORD_SIZE are padding
    record_size: u64,
}

/// Constructors for standard file I/O
impl CaptureSequence<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &ReadOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader_with_options(
            BufReader::with_capacity(options.buffer_capacity, file),
            options,
        )
    }
}

/// Constructor for memory-mapped file I/O (requires "mmap" feature)
#[cfg(feature = "mmap")]
impl CaptureSequence<Cursor<Mmap>> {
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_mmap_with_options(path, &ReadOptions::default())
    }

    pub fn open_mmap_with_options(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_reader_with_options(Cursor::new(mmap), options)
    }
}

impl<R: ReadSeek> CaptureSequence<R> {
    pub fn from_reader(source: R) -> Result<Self> {
        Self::from_reader_with_options(source, &ReadOptions::default())
    }

    pub fn from_reader_with_options(mut source: R, options: &ReadOptions) -> Result<Self> {
        let header = read_header(&mut source, options.header_policy)?;
        let stream_len = source.seek(SeekFrom::End(0))?;

        // Low time field of the first record, used to align relative times
        // with what the analyzer displays. Missing bytes read as zero.
        let data_offset = header.data_offset();
        source.seek(SeekFrom::Start(data_offset))?;
        let mut time_low = [0u8; 4];
        let found = read_up_to(&mut source, &mut time_low)?;
        let time_correction = if found == time_low.len() {
            LittleEndian::read_u32(&time_low)
        } else {
            0
        };

        tracing::debug!(
            version = header.version,
            device_type = header.device_type,
            record_count = header.record_count,
            record_size = header.record_size,
            stream_len,
            "opened EZView2 capture"
        );

        let expected_len = header.expected_stream_len();
        if stream_len < expected_len {
            tracing::warn!(
                declared_records = header.record_count,
                expected_len,
                stream_len,
                "capture is shorter than its declared record count"
            );
        }

        Ok(CaptureSequence {
            source,
            stream_len,
            time_correction,
            position: Some(data_offset + found as u64),
            record_size: header.record_size as u64,
            header,
        })
    }

    pub fn header(&self) -> &CaptureHeader {
        &self.header
    }

    /// Number of packets declared by the header
    pub fn len(&self) -> u64 {
        self.header.record_count as u64
    }

    pub fn is_empty(&self) -> bool {
        self.header.record_count == 0
    }

    /// Absolute offset of the first record
    pub fn data_offset(&self) -> u64 {
        self.header.data_offset()
    }

    pub fn tick_resolution(&self) -> TickResolution {
        self.header.tick_resolution()
    }

    /// Length of the underlying stream, measured on open
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Number of complete records physically present in the stream
    pub fn available_records(&self) -> u64 {
        let present = self.stream_len.saturating_sub(self.data_offset()) / self.record_size;
        present.min(self.len())
    }

    /// Decode the packet at `index`; negative indices count from the end
    pub fn get(&mut self, index: i64) -> Result<DataPacket> {
        let position = normalize_index(index, self.len())?;
        self.read_record(position)
    }

    /// Packets selected by `start:stop:step` slice semantics
    pub fn slice(
        &mut self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Packets<'_, R>> {
        let indices = SliceIndices::resolve(self.len(), start, stop, step)?;
        Ok(Packets::new(self, indices))
    }

    /// All packets in index order
    pub fn iter(&mut self) -> Packets<'_, R> {
        let indices = SliceIndices::full(self.len());
        Packets::new(self, indices)
    }

    pub(crate) fn read_record(&mut self, index: u64) -> Result<DataPacket> {
        let offset = self.data_offset() + index * self.record_size;

        let known = self.position.take();
        if known != Some(offset) {
            self.source.seek(SeekFrom::Start(offset))?;
        }

        let mut record = [0u8; RECORD_SIZE];
        let found = read_up_to(&mut self.source, &mut record)?;
        // Padding is checked against the stream length, never read
        let present = self.stream_len.saturating_sub(offset).min(self.record_size);
        if found < RECORD_SIZE || present < self.record_size {
            return Err(EzViewError::TruncatedRecord {
                index,
                offset,
                expected: self.record_size,
                found: if found < RECORD_SIZE { found as u64 } else { present },
            });
        }
        self.position = Some(offset + RECORD_SIZE as u64);

        tracing::trace!(index, offset, "read record");
        Ok(decode_record(index, &record))
    }

    /// Low time field of the first record, in ticks
    pub fn time_correction(&self) -> u32 {
        self.time_correction
    }

    /// Offset added to each packet's elapsed time to get the time the
    /// analyzer shows in relative mode
    pub fn time_offset(&self) -> TimeDelta {
        self.header.first_record_time.delta_since(self.header.capture_start)
            - self.tick_resolution().ticks_to_delta(self.time_correction as u64)
    }

    /// Time of `packet` relative to the capture start
    pub fn relative_time(&self, packet: &DataPacket) -> TimeDelta {
        self.tick_resolution().ticks_to_delta(packet.time_ticks) + self.time_offset()
    }

    /// Wall-clock time of `packet`, if the capture start was recorded
    pub fn absolute_time(&self, packet: &DataPacket) -> Option<DateTime<Utc>> {
        let start = self.header.capture_start.to_date_time()?;
        start.checked_add_signed(self.relative_time(packet))
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Release the underlying stream
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<'a, R: ReadSeek> IntoIterator for &'a mut CaptureSequence<R> {
    type Item = Result<DataPacket>;
    type IntoIter = Packets<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<R: ReadSeek> std::fmt::Debug for CaptureSequence<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSequence")
            .field("header", &self.header)
            .field("stream_len", &self.stream_len)
            .field("time_correction", &self.time_correction)
            .finish()
    }
}
