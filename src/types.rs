// src/types.rs
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::time::Duration;

/// Classification of a captured bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Undefined,
    /// Data byte transmitted by the DTE side
    DteTx,
    /// Data byte transmitted by the DCE side
    DceTx,
    /// Data error or break condition on either side
    ErrorOrBreak,
    DteHandshakeChange,
    DceHandshakeChange,
    /// Type byte outside the documented range, kept verbatim
    Unknown(u8),
}

impl EventType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => EventType::Undefined,
            1 => EventType::DteTx,
            2 => EventType::DceTx,
            3 => EventType::ErrorOrBreak,
            4 => EventType::DteHandshakeChange,
            5 => EventType::DceHandshakeChange,
            other => EventType::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            EventType::Undefined => 0,
            EventType::DteTx => 1,
            EventType::DceTx => 2,
            EventType::ErrorOrBreak => 3,
            EventType::DteHandshakeChange => 4,
            EventType::DceHandshakeChange => 5,
            EventType::Unknown(value) => value,
        }
    }

    /// Check if this event carries a transmitted data byte
    pub fn is_data(&self) -> bool {
        matches!(self, EventType::DteTx | EventType::DceTx)
    }

    /// Check if this event reports a handshaking line change
    pub fn is_handshake(&self) -> bool {
        matches!(self, EventType::DteHandshakeChange | EventType::DceHandshakeChange)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventType::Undefined => "undefined",
            EventType::DteTx => "dte_tx",
            EventType::DceTx => "dce_tx",
            EventType::ErrorOrBreak => "error_break",
            EventType::DteHandshakeChange => "dte_handshake",
            EventType::DceHandshakeChange => "dce_handshake",
            EventType::Unknown(_) => "unknown",
        }
    }
}

/// Live handshaking/control line states sampled with each record (1 = active)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ControlSignals(u8);

impl ControlSignals {
    pub const RTS: u8 = 1 << 0;
    pub const DTR: u8 = 1 << 1;
    pub const CTS: u8 = 1 << 2;
    pub const DSR: u8 = 1 << 3;
    pub const DCD: u8 = 1 << 4;
    pub const RI: u8 = 1 << 5;

    const NAMES: [(u8, &'static str); 6] = [
        (Self::RTS, "RTS"),
        (Self::DTR, "DTR"),
        (Self::CTS, "CTS"),
        (Self::DSR, "DSR"),
        (Self::DCD, "DCD"),
        (Self::RI, "RI"),
    ];

    pub fn new(bits: u8) -> Self {
        ControlSignals(bits)
    }

    pub fn empty() -> Self {
        ControlSignals(0)
    }

    /// Request To Send
    pub fn rts(&self) -> bool {
        self.0 & Self::RTS != 0
    }

    /// Data Terminal Ready
    pub fn dtr(&self) -> bool {
        self.0 & Self::DTR != 0
    }

    /// Clear To Send
    pub fn cts(&self) -> bool {
        self.0 & Self::CTS != 0
    }

    /// Data Set Ready
    pub fn dsr(&self) -> bool {
        self.0 & Self::DSR != 0
    }

    /// Data Carrier Detect
    pub fn dcd(&self) -> bool {
        self.0 & Self::DCD != 0
    }

    /// Ring Indicator
    pub fn ri(&self) -> bool {
        self.0 & Self::RI != 0
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn set(&mut self, flag: u8, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    /// Raw bitmask, including any undocumented high bits
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ControlSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.0 & flag != 0 {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("-")?;
        }
        Ok(())
    }
}

/// Status byte of an `ErrorOrBreak` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorStatus(u8);

impl ErrorStatus {
    pub fn new(bits: u8) -> Self {
        ErrorStatus(bits)
    }

    pub fn dte_break(&self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn dte_parity_error(&self) -> bool {
        self.0 & 0x02 != 0
    }

    pub fn dte_framing_error(&self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn dce_break(&self) -> bool {
        self.0 & 0x08 != 0
    }

    pub fn dce_parity_error(&self) -> bool {
        self.0 & 0x10 != 0
    }

    pub fn dce_framing_error(&self) -> bool {
        self.0 & 0x20 != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// Status byte of a `DteHandshakeChange` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DteHandshake(u8);

impl DteHandshake {
    pub fn new(bits: u8) -> Self {
        DteHandshake(bits)
    }

    pub fn rts(&self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn dtr(&self) -> bool {
        self.0 & 0x02 != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// Status byte of a `DceHandshakeChange` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DceHandshake(u8);

impl DceHandshake {
    pub fn new(bits: u8) -> Self {
        DceHandshake(bits)
    }

    pub fn cts(&self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn dsr(&self) -> bool {
        self.0 & 0x02 != 0
    }

    pub fn cd(&self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn ri(&self) -> bool {
        self.0 & 0x08 != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// `data_or_status` interpreted according to the event type.
///
/// The error and handshake bit assignments come from vendor notes that
/// were never verified against captures containing those events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketStatus {
    Data(u8),
    Error(ErrorStatus),
    DteHandshake(DteHandshake),
    DceHandshake(DceHandshake),
    /// Undefined or unknown event types
    Raw(u8),
}

/// Duration of one timestamp tick, selected by the header's device type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickResolution {
    /// 100 µs per tick (EZ-Tap, device type 0)
    HundredMicros,
    /// 1 µs per tick (EZ-Tap+ and EZ-Tap Pro)
    Micros,
}

impl TickResolution {
    pub fn from_device_type(device_type: u32) -> Self {
        if device_type == 0 {
            TickResolution::HundredMicros
        } else {
            TickResolution::Micros
        }
    }

    pub fn micros_per_tick(&self) -> u64 {
        match self {
            TickResolution::HundredMicros => 100,
            TickResolution::Micros => 1,
        }
    }

    pub fn ticks_to_duration(&self, ticks: u64) -> Duration {
        Duration::from_micros(ticks * self.micros_per_tick())
    }

    pub fn ticks_to_delta(&self, ticks: u64) -> TimeDelta {
        // 40-bit ticks * 100 stays far below i64::MAX
        TimeDelta::microseconds((ticks * self.micros_per_tick()) as i64)
    }
}

/// Win32 FILETIME: 100 ns intervals since 1601-01-01 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FileTime(pub u64);

impl FileTime {
    /// FILETIME value of 1970-01-01 00:00:00 UTC
    pub const UNIX_EPOCH: u64 = 116_444_736_000_000_000;
    pub const TICKS_PER_SECOND: u64 = 10_000_000;

    pub fn new(raw: u64) -> Self {
        FileTime(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The analyzer writes zero when a time was never recorded
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }

    pub fn to_date_time(&self) -> Option<DateTime<Utc>> {
        if self.is_unset() {
            return None;
        }
        let since_epoch = self.0 as i128 - Self::UNIX_EPOCH as i128;
        let ticks_per_second = Self::TICKS_PER_SECOND as i128;
        let seconds = since_epoch.div_euclid(ticks_per_second) as i64;
        let nanos = (since_epoch.rem_euclid(ticks_per_second) * 100) as u32;
        DateTime::from_timestamp(seconds, nanos)
    }

    /// Encode a UTC time, saturating at the FILETIME range limits
    pub fn from_date_time(time: &DateTime<Utc>) -> Self {
        let ticks = time.timestamp() as i128 * Self::TICKS_PER_SECOND as i128
            + (time.timestamp_subsec_nanos() / 100) as i128
            + Self::UNIX_EPOCH as i128;
        FileTime(ticks.clamp(0, u64::MAX as i128) as u64)
    }

    /// Signed distance from `earlier`, truncated to whole microseconds
    pub fn delta_since(&self, earlier: FileTime) -> TimeDelta {
        let micros = (self.0 / 10) as i64 - (earlier.0 / 10) as i64;
        TimeDelta::microseconds(micros)
    }
}
