// src/record/packet.rs
use crate::types::{
    ControlSignals, DceHandshake, DteHandshake, ErrorStatus, EventType, PacketStatus,
    TickResolution,
};
use std::fmt;
use std::time::Duration;

/// One decoded capture event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPacket {
    /// Zero-based position in the capture (the analyzer shows `index + 1`)
    pub index: u64,
    /// Elapsed ticks since capture start, 40 bits wide
    pub time_ticks: u64,
    pub event_type: EventType,
    /// Data byte for Tx events, status bits otherwise
    pub data_or_status: u8,
    pub control_signals: ControlSignals,
}

impl Default for DataPacket {
    fn default() -> Self {
        DataPacket {
            index: 0,
            time_ticks: 0,
            event_type: EventType::Undefined,
            data_or_status: 0,
            control_signals: ControlSignals::empty(),
        }
    }
}

impl DataPacket {
    /// Transmitted byte, for `DteTx` and `DceTx` events only
    pub fn data_byte(&self) -> Option<u8> {
        self.event_type.is_data().then_some(self.data_or_status)
    }

    /// Interpret `data_or_status` according to the event type
    pub fn status(&self) -> PacketStatus {
        let bits = self.data_or_status;
        match self.event_type {
            EventType::DteTx | EventType::DceTx => PacketStatus::Data(bits),
            EventType::ErrorOrBreak => PacketStatus::Error(ErrorStatus::new(bits)),
            EventType::DteHandshakeChange => PacketStatus::DteHandshake(DteHandshake::new(bits)),
            EventType::DceHandshakeChange => PacketStatus::DceHandshake(DceHandshake::new(bits)),
            EventType::Undefined | EventType::Unknown(_) => PacketStatus::Raw(bits),
        }
    }

    /// Elapsed time since capture start; wraps with the 40-bit tick field
    pub fn elapsed(&self, resolution: TickResolution) -> Duration {
        resolution.ticks_to_duration(self.time_ticks)
    }
}

impl fmt::Display for DataPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} t={} {} data=0x{:02x} ctl={}",
            self.index,
            self.time_ticks,
            self.event_type.name(),
            self.data_or_status,
            self.control_signals
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_by_event_type() {
        let mut packet = DataPacket {
            data_or_status: 0x05,
            ..DataPacket::default()
        };
        assert_eq!(packet.status(), PacketStatus::Raw(0x05));
        assert_eq!(packet.data_byte(), None);

        packet.event_type = EventType::DceTx;
        assert_eq!(packet.status(), PacketStatus::Data(0x05));
        assert_eq!(packet.data_byte(), Some(0x05));

        packet.event_type = EventType::ErrorOrBreak;
        match packet.status() {
            PacketStatus::Error(status) => {
                assert!(status.dte_break());
                assert!(status.dte_framing_error());
            }
            other => panic!("Expected Error status, got {:?}", other),
        }

        packet.event_type = EventType::DceHandshakeChange;
        match packet.status() {
            PacketStatus::DceHandshake(status) => assert!(status.cts() && status.cd()),
            other => panic!("Expected DceHandshake status, got {:?}", other),
        }
    }

    #[test]
    fn test_elapsed() {
        let packet = DataPacket {
            time_ticks: 345,
            ..DataPacket::default()
        };
        assert_eq!(packet.elapsed(TickResolution::HundredMicros), Duration::from_micros(34_500));
        assert_eq!(packet.elapsed(TickResolution::Micros), Duration::from_micros(345));
    }

    #[test]
    fn test_display() {
        let packet = DataPacket {
            index: 0,
            time_ticks: 12,
            event_type: EventType::DteTx,
            data_or_status: 0xAA,
            control_signals: ControlSignals::new(ControlSignals::RTS | ControlSignals::DTR),
        };
        assert_eq!(packet.to_string(), "#0 t=12 dte_tx data=0xaa ctl=RTS|DTR");
    }
}
