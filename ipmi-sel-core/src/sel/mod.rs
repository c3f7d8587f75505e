//! System Event Log records and their rendering.

use core::fmt;
use core::str::FromStr;

mod bit_field;
pub use bit_field::{event_data_2_usage, event_data_3_usage, event_dir, event_offset, event_type};

mod codec;
pub use codec::{
    decode, Record, StructuredRecord, StructuredRecordBuilder, LEGACY_RECORD_SIZE,
    STRUCTURED_HEADER_SIZE, STRUCTURED_MAGIC, STRUCTURED_VERSION,
};

mod error;
pub use error::{DecodeError, FormatError, RecordError, RenderError, ValidationError};

mod event_data;
pub use event_data::format_event_data;

mod event_names;
pub use event_names::{lookup_event_name, EventTypeClass};

mod message;
pub use message::{
    assemble_message, fit_message, LegacyLine, OverlengthPolicy, SummaryLine, MAX_MESSAGE_LEN,
};

mod sensor_specific;

mod sensor_type;
pub use sensor_type::lookup_sensor_type_name;

/// Identifier assigned to a record by the log store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u16);

impl RecordId {
    /// The identifier of a record that has not been stored yet.
    pub const UNASSIGNED: Self = Self(0);

    pub fn new(id: u16) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self(id))
        }
    }

    pub(crate) fn new_raw(id: u16) -> Self {
        RecordId(id)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self != &Self::UNASSIGNED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(u32);

impl Timestamp {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "Unknown")
        } else {
            #[cfg(feature = "time")]
            {
                let formatted = time::OffsetDateTime::from_unix_timestamp(self.0 as i64)
                    .ok()
                    .and_then(|ts| {
                        ts.format(&time::format_description::well_known::Rfc3339)
                            .ok()
                    });

                match formatted {
                    Some(time) => write!(f, "{}", time),
                    None => write!(f, "{}", self.0),
                }
            }

            #[cfg(not(feature = "time"))]
            write!(f, "{}", self.0)
        }
    }
}

impl From<u32> for Timestamp {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Critical,
    Ok,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Info, Self::Warning, Self::Critical, Self::Ok];

    /// The byte stored in legacy fixed-size records.
    pub fn code(&self) -> u8 {
        match self {
            Severity::Info => 6,
            Severity::Warning => 4,
            Severity::Critical => 2,
            Severity::Ok => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
            Severity::Ok => "OK",
        }
    }

    /// Upper-case name used by the legacy numeric line rendering.
    pub fn legacy_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Ok => "OK",
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() as i64 == code)
            .ok_or(ValidationError::InvalidSeverity(code))
    }
}

impl TryFrom<u8> for Severity {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value as i64)
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::InvalidSeverityName(s.to_string()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDirection {
    Assertion,
    Deassertion,
}

impl fmt::Display for EventDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDirection::Assertion => write!(f, "asserted"),
            EventDirection::Deassertion => write!(f, "deasserted"),
        }
    }
}

/// A single SEL event.
///
/// The direction, event type, offset and data usage codes are not stored: they are
/// derived from `event_dir_type` and `event_data_1` on every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    record_id: RecordId,
    timestamp: Timestamp,
    severity: Severity,
    sensor_type: u8,
    sensor_number: u8,
    event_dir_type: u8,
    event_data: [u8; 3],
}

impl EventRecord {
    pub fn new(
        severity: Severity,
        sensor_type: u8,
        sensor_number: u8,
        event_dir_type: u8,
        event_data_1: u8,
        event_data_2: u8,
        event_data_3: u8,
    ) -> Self {
        Self {
            record_id: RecordId::UNASSIGNED,
            timestamp: Timestamp(0),
            severity,
            sensor_type,
            sensor_number,
            event_dir_type,
            event_data: [event_data_1, event_data_2, event_data_3],
        }
    }

    pub fn builder() -> EventRecordBuilder {
        EventRecordBuilder::default()
    }

    pub fn with_record_id(self, record_id: RecordId) -> Self {
        Self { record_id, ..self }
    }

    pub fn with_timestamp(self, timestamp: Timestamp) -> Self {
        Self { timestamp, ..self }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn sensor_type(&self) -> u8 {
        self.sensor_type
    }

    pub fn sensor_number(&self) -> u8 {
        self.sensor_number
    }

    pub fn event_dir_type(&self) -> u8 {
        self.event_dir_type
    }

    pub fn event_data(&self) -> [u8; 3] {
        self.event_data
    }

    pub fn event_dir(&self) -> EventDirection {
        event_dir(self.event_dir_type)
    }

    pub fn event_type(&self) -> u8 {
        event_type(self.event_dir_type)
    }

    pub fn event_offset(&self) -> u8 {
        event_offset(self.event_data[0])
    }

    pub fn event_data_2_usage(&self) -> u8 {
        event_data_2_usage(self.event_data[0])
    }

    pub fn event_data_3_usage(&self) -> u8 {
        event_data_3_usage(self.event_data[0])
    }
}

/// Builds an [`EventRecord`] from unchecked integers.
///
/// Nothing is validated until [`EventRecordBuilder::build`], which checks every field
/// before producing a record.
#[derive(Debug, Clone)]
pub struct EventRecordBuilder {
    record_id: i64,
    timestamp: i64,
    severity: i64,
    sensor_type: i64,
    sensor_number: i64,
    event_dir_type: i64,
    event_data: [i64; 3],
}

impl Default for EventRecordBuilder {
    fn default() -> Self {
        Self {
            record_id: 0,
            timestamp: 0,
            severity: Severity::Info.code() as i64,
            sensor_type: 0,
            sensor_number: 0,
            event_dir_type: 0,
            event_data: [0; 3],
        }
    }
}

impl EventRecordBuilder {
    pub fn record_id(mut self, value: i64) -> Self {
        self.record_id = value;
        self
    }

    pub fn timestamp(mut self, value: i64) -> Self {
        self.timestamp = value;
        self
    }

    pub fn severity(mut self, value: Severity) -> Self {
        self.severity = value.code() as i64;
        self
    }

    /// Set the severity from its legacy byte code.
    pub fn severity_code(mut self, value: i64) -> Self {
        self.severity = value;
        self
    }

    pub fn sensor_type(mut self, value: i64) -> Self {
        self.sensor_type = value;
        self
    }

    pub fn sensor_number(mut self, value: i64) -> Self {
        self.sensor_number = value;
        self
    }

    pub fn event_dir_type(mut self, value: i64) -> Self {
        self.event_dir_type = value;
        self
    }

    pub fn event_data_1(mut self, value: i64) -> Self {
        self.event_data[0] = value;
        self
    }

    pub fn event_data_2(mut self, value: i64) -> Self {
        self.event_data[1] = value;
        self
    }

    pub fn event_data_3(mut self, value: i64) -> Self {
        self.event_data[2] = value;
        self
    }

    pub fn build(self) -> Result<EventRecord, ValidationError> {
        let byte = |field: &'static str, value: i64| {
            ValidationError::check(field, value, 0, 0xFF).map(|v| v as u8)
        };

        let record_id = ValidationError::check("record id", self.record_id, 0, 0xFFFF)?;
        let timestamp = ValidationError::check("timestamp", self.timestamp, 0, u32::MAX as i64)?;
        let severity = Severity::from_code(self.severity)?;

        Ok(EventRecord {
            record_id: RecordId(record_id as u16),
            timestamp: Timestamp(timestamp as u32),
            severity,
            sensor_type: byte("sensor type", self.sensor_type)?,
            sensor_number: byte("sensor number", self.sensor_number)?,
            event_dir_type: byte("event dir type", self.event_dir_type)?,
            event_data: [
                byte("event data 1", self.event_data[0])?,
                byte("event data 2", self.event_data[1])?,
                byte("event data 3", self.event_data[2])?,
            ],
        })
    }
}
