//! Binary record formats.
//!
//! Two generations exist: the fixed 17-byte legacy record, and the variable-length
//! structured record guarded by a magic number and version. Both use native byte order,
//! so records can only be exchanged between hosts that agree on endianness.

mod legacy;
pub use legacy::LEGACY_RECORD_SIZE;

mod structured;
pub use structured::{
    StructuredRecord, StructuredRecordBuilder, STRUCTURED_HEADER_SIZE, STRUCTURED_MAGIC,
    STRUCTURED_VERSION,
};

use super::{DecodeError, EventRecord, RecordId, Timestamp};

/// A record of either generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Legacy(EventRecord),
    Structured(StructuredRecord),
}

impl Record {
    pub fn record_id(&self) -> RecordId {
        match self {
            Record::Legacy(record) => record.record_id(),
            Record::Structured(record) => record.record_id(),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Record::Legacy(record) => record.timestamp(),
            Record::Structured(record) => record.timestamp(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Record::Legacy(record) => record.encode_legacy().to_vec(),
            Record::Structured(record) => record.encode(),
        }
    }
}

/// Decode a record of either generation.
///
/// Exactly [`LEGACY_RECORD_SIZE`] bytes are read as a legacy record. Anything else must
/// start with [`STRUCTURED_MAGIC`].
pub fn decode(data: &[u8]) -> Result<Record, DecodeError> {
    if data.len() == LEGACY_RECORD_SIZE {
        return EventRecord::decode_legacy(data).map(Record::Legacy);
    }

    match data.get(..4) {
        Some(magic) if magic == STRUCTURED_MAGIC.to_ne_bytes() => {
            StructuredRecord::decode(data).map(Record::Structured)
        }
        _ => Err(DecodeError::Unrecognized { len: data.len() }),
    }
}
