use super::RecordId;

/// A field value outside of its declared range, rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} {value} out of range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("invalid severity {0}")]
    InvalidSeverity(i64),
    #[error("invalid severity name '{0}'")]
    InvalidSeverityName(String),
}

impl ValidationError {
    pub(crate) fn check(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, Self> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(Self::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }
}

/// Failure to name or describe an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("reserved event type 0x{0:02X}")]
    ReservedEventType(u8),
    #[error("invalid event type 0x{0:02X}")]
    InvalidEventType(u8),
    #[error("reserved sensor type 0x{0:02X}")]
    ReservedSensorType(u8),
    #[error("no name for OEM sensor type 0x{0:02X}")]
    UnknownOemSensorType(u8),
    #[error("no event names populated for event type 0x{event_type:02X}, sensor type 0x{sensor_type:02X}")]
    UnpopulatedTable { event_type: u8, sensor_type: u8 },
    #[error("invalid event offset {offset} (event type 0x{event_type:02X}, sensor type 0x{sensor_type:02X})")]
    InvalidOffset {
        event_type: u8,
        sensor_type: u8,
        offset: u8,
    },
    #[error("reserved event offset {offset} (event type 0x{event_type:02X}, sensor type 0x{sensor_type:02X})")]
    ReservedOffset {
        event_type: u8,
        sensor_type: u8,
        offset: u8,
    },
    #[error("reserved event data {data} usage 0b{usage:02b} (event type 0x{event_type:02X})")]
    ReservedUsage { data: u8, usage: u8, event_type: u8 },
    #[error("message is {0} characters long, the limit is 255")]
    MessageTooLong(usize),
}

/// A [`FormatError`] together with the record it was raised for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sensor 0x{sensor_number:02X} (record {}): {error}", .record_id.value())]
pub struct RenderError {
    pub record_id: RecordId,
    pub sensor_number: u8,
    #[source]
    pub error: FormatError,
}

/// Errors produced while decoding a binary record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not a recognized record ({len} bytes)")]
    Unrecognized { len: usize },
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u16),
    #[error("not enough data: expected {expected} bytes, got {actual}")]
    NotEnoughData { expected: usize, actual: usize },
    #[error("trailing data: expected {expected} bytes, got {actual}")]
    TrailingData { expected: usize, actual: usize },
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Errors produced while constructing a structured record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{0} contains an interior NUL byte")]
    InteriorNul(&'static str),
    #[error("{field} is {len} bytes long, the limit is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
