// src/record/codec.rs
use crate::error::{EzViewError, Result};
use crate::record::DataPacket;
use crate::types::{ControlSignals, EventType};
use bytemuck::{Pod, Zeroable};
use byteorder::{ByteOrder, LittleEndian};

/// Encoded size of one record
pub const RECORD_SIZE: usize = 8;

/// Largest tick count representable in the split 40-bit field
pub const MAX_TICKS: u64 = (1 << 40) - 1;

/// On-disk record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct RawRecord {
    pub time_low: [u8; 4],
    pub event_type: u8,
    pub data: u8,
    pub control_signals: u8,
    pub time_msb: u8,
}

impl RawRecord {
    /// Reassemble the 40-bit tick count from its two parts
    pub fn time_ticks(&self) -> u64 {
        LittleEndian::read_u32(&self.time_low) as u64 | (self.time_msb as u64) << 32
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_SIZE] {
        bytemuck::cast_ref(self)
    }
}

/// Decode one record as the packet at `index`
pub fn decode_record(index: u64, bytes: &[u8; RECORD_SIZE]) -> DataPacket {
    let raw: RawRecord = bytemuck::pod_read_unaligned(bytes);
    DataPacket {
        index,
        time_ticks: raw.time_ticks(),
        event_type: EventType::from_u8(raw.event_type),
        data_or_status: raw.data,
        control_signals: ControlSignals::new(raw.control_signals),
    }
}

/// Encode `packet` into its on-disk form
pub fn encode_record(packet: &DataPacket) -> Result<RawRecord> {
    if packet.time_ticks > MAX_TICKS {
        return Err(EzViewError::TimestampOverflow(packet.time_ticks));
    }

    let mut time_low = [0u8; 4];
    LittleEndian::write_u32(&mut time_low, packet.time_ticks as u32);
    Ok(RawRecord {
        time_low,
        event_type: packet.event_type.to_u8(),
        data: packet.data_or_status,
        control_signals: packet.control_signals.bits(),
        time_msb: (packet.time_ticks >> 32) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_layout() {
        assert_eq!(std::mem::size_of::<RawRecord>(), RECORD_SIZE);
        assert_eq!(std::mem::align_of::<RawRecord>(), 1);
    }

    #[test]
    fn test_split_timestamp_reconstruction() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 1, 0x41, 0x03, 0x01];
        let packet = decode_record(0, &bytes);
        assert_eq!(packet.time_ticks, 0x1_FFFF_FFFF);
        assert_eq!(packet.time_ticks, 8_589_934_591);
        assert_eq!(packet.event_type, EventType::DteTx);
        assert_eq!(packet.data_or_status, 0x41);
        assert_eq!(packet.control_signals.bits(), 0x03);
    }

    #[test]
    fn test_msb_is_not_adjacent_to_low_bits() {
        // Only the low field set: the middle bytes must not leak into the time
        let bytes = [0x78, 0x56, 0x34, 0x12, 0xAA, 0xBB, 0xCC, 0x00];
        assert_eq!(decode_record(0, &bytes).time_ticks, 0x1234_5678);

        let bytes = [0, 0, 0, 0, 0xAA, 0xBB, 0xCC, 0xFF];
        assert_eq!(decode_record(0, &bytes).time_ticks, 0xFF_0000_0000);
    }

    #[test]
    fn test_padded_record_decodes_prefix() {
        let bytes = [1, 0, 0, 0, 2, 0x7E, 0, 0, 0xEE, 0xEE, 0xEE, 0xEE];
        let prefix: &[u8; RECORD_SIZE] = bytes[..RECORD_SIZE].try_into().unwrap();
        let packet = decode_record(5, prefix);
        assert_eq!(packet.index, 5);
        assert_eq!(packet.time_ticks, 1);
        assert_eq!(packet.event_type, EventType::DceTx);
        assert_eq!(packet.data_or_status, 0x7E);
    }

    #[test]
    fn test_short_input_is_rejected_before_decoding() {
        let short: &[u8] = &[1, 2, 3];
        let record: std::result::Result<&[u8; RECORD_SIZE], _> = short.try_into();
        assert!(record.is_err());
    }

    #[test]
    fn test_encode_record() {
        let packet = DataPacket {
            index: 0,
            time_ticks: 0xAB_0102_0304,
            event_type: EventType::Unknown(9),
            data_or_status: 0x10,
            control_signals: ControlSignals::new(0x3F),
        };
        let raw = encode_record(&packet).unwrap();
        assert_eq!(raw.as_bytes(), &[0x04, 0x03, 0x02, 0x01, 9, 0x10, 0x3F, 0xAB]);
        assert_eq!(decode_record(0, raw.as_bytes()), packet);
    }

    #[test]
    fn test_encode_rejects_overflow() {
        let packet = DataPacket {
            time_ticks: MAX_TICKS + 1,
            ..DataPacket::default()
        };
        assert!(matches!(
            encode_record(&packet),
            Err(EzViewError::TimestampOverflow(t)) if t == MAX_TICKS + 1
        ));
    }
}
