use crate::sel::{DecodeError, EventRecord, RecordId, Severity, Timestamp};

/// Size of a legacy fixed-size record.
///
/// Layout, in native byte order: record id (2), time (4), reserved (4), then severity,
/// sensor type, sensor number, event dir/type and the three event data bytes.
pub const LEGACY_RECORD_SIZE: usize = 17;

impl EventRecord {
    pub fn encode_legacy(&self) -> [u8; LEGACY_RECORD_SIZE] {
        let mut data = [0u8; LEGACY_RECORD_SIZE];

        data[0..2].copy_from_slice(&self.record_id().value().to_ne_bytes());
        data[2..6].copy_from_slice(&self.timestamp().value().to_ne_bytes());
        data[10] = self.severity().code();
        data[11] = self.sensor_type();
        data[12] = self.sensor_number();
        data[13] = self.event_dir_type();
        data[14..17].copy_from_slice(&self.event_data());

        data
    }

    pub fn decode_legacy(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < LEGACY_RECORD_SIZE {
            return Err(DecodeError::NotEnoughData {
                expected: LEGACY_RECORD_SIZE,
                actual: data.len(),
            });
        } else if data.len() > LEGACY_RECORD_SIZE {
            return Err(DecodeError::TrailingData {
                expected: LEGACY_RECORD_SIZE,
                actual: data.len(),
            });
        }

        let record_id = RecordId::new_raw(u16::from_ne_bytes([data[0], data[1]]));
        let timestamp = u32::from_ne_bytes([data[2], data[3], data[4], data[5]]);
        let severity = Severity::try_from(data[10])?;

        let record = EventRecord::new(
            severity, data[11], data[12], data[13], data[14], data[15], data[16],
        )
        .with_record_id(record_id)
        .with_timestamp(Timestamp::from(timestamp));

        Ok(record)
    }
}
