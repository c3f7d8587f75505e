use crate::sel::{
    assemble_message, DecodeError, EventRecord, OverlengthPolicy, RecordError, RecordId,
    RenderError, Severity, Timestamp, MAX_MESSAGE_LEN,
};
use crate::Platform;

/// Marks a structured record. Written in native byte order like every other header field.
pub const STRUCTURED_MAGIC: u32 = u32::from_be_bytes(*b"SELR");
pub const STRUCTURED_VERSION: u16 = 1;

/// Magic (4), version (2), record id (2), time (4), reserved (4) and six 2-byte field
/// lengths.
pub const STRUCTURED_HEADER_SIZE: usize = 28;

const FIELD_COUNT: usize = 6;

/// A decoded log entry of the variable-length format.
///
/// Optional fields encode with zero length. All strings are NUL-terminated on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredRecord {
    record_id: RecordId,
    timestamp: Timestamp,
    message: String,
    severity: Option<Severity>,
    sensor_type: Option<u8>,
    sensor_number: Option<u8>,
    association: String,
    debug_data: Vec<u8>,
}

impl StructuredRecord {
    pub fn builder() -> StructuredRecordBuilder {
        StructuredRecordBuilder::default()
    }

    /// Create a structured record carrying the rendered message of `event`.
    ///
    /// The seven legacy event bytes are kept as debug data.
    pub fn from_event<P>(
        platform: &P,
        event: &EventRecord,
        policy: OverlengthPolicy,
    ) -> Result<Self, RenderError>
    where
        P: Platform + ?Sized,
    {
        let message = assemble_message(platform, event, policy)?;

        Ok(Self {
            record_id: event.record_id(),
            timestamp: event.timestamp(),
            message,
            severity: Some(event.severity()),
            sensor_type: Some(event.sensor_type()),
            sensor_number: Some(event.sensor_number()),
            association: String::new(),
            debug_data: event.encode_legacy()[10..].to_vec(),
        })
    }

    pub fn with_record_id(self, record_id: RecordId) -> Self {
        Self { record_id, ..self }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub fn sensor_type(&self) -> Option<u8> {
        self.sensor_type
    }

    pub fn sensor_number(&self) -> Option<u8> {
        self.sensor_number
    }

    pub fn association(&self) -> &str {
        &self.association
    }

    pub fn debug_data(&self) -> &[u8] {
        &self.debug_data
    }

    fn fields(&self) -> [Vec<u8>; FIELD_COUNT] {
        let hex = |v: Option<u8>| v.map(|v| format!("0x{v:02X}")).unwrap_or_default();

        [
            encode_str(&self.message),
            encode_str(self.severity.map(|s| s.as_str()).unwrap_or_default()),
            encode_str(&hex(self.sensor_type)),
            encode_str(&hex(self.sensor_number)),
            encode_str(&self.association),
            self.debug_data.clone(),
        ]
    }

    pub fn encode(&self) -> Vec<u8> {
        let fields = self.fields();
        let body_len: usize = fields.iter().map(Vec::len).sum();

        let mut data = Vec::with_capacity(STRUCTURED_HEADER_SIZE + body_len);
        data.extend_from_slice(&STRUCTURED_MAGIC.to_ne_bytes());
        data.extend_from_slice(&STRUCTURED_VERSION.to_ne_bytes());
        data.extend_from_slice(&self.record_id.value().to_ne_bytes());
        data.extend_from_slice(&self.timestamp.value().to_ne_bytes());
        data.extend_from_slice(&0u32.to_ne_bytes());

        // Field sizes are bounded by the builder.
        for field in &fields {
            data.extend_from_slice(&(field.len() as u16).to_ne_bytes());
        }

        for field in &fields {
            data.extend_from_slice(field);
        }

        data
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < STRUCTURED_HEADER_SIZE {
            return Err(DecodeError::NotEnoughData {
                expected: STRUCTURED_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let u16_at = |at: usize| u16::from_ne_bytes([data[at], data[at + 1]]);
        let u32_at =
            |at: usize| u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

        if u32_at(0) != STRUCTURED_MAGIC {
            return Err(DecodeError::Unrecognized { len: data.len() });
        }

        let version = u16_at(4);
        if version != STRUCTURED_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let mut lengths = [0usize; FIELD_COUNT];
        for (i, len) in lengths.iter_mut().enumerate() {
            *len = u16_at(16 + 2 * i) as usize;
        }

        let expected = STRUCTURED_HEADER_SIZE + lengths.iter().sum::<usize>();
        if data.len() < expected {
            return Err(DecodeError::NotEnoughData {
                expected,
                actual: data.len(),
            });
        } else if data.len() > expected {
            return Err(DecodeError::TrailingData {
                expected,
                actual: data.len(),
            });
        }

        let mut rest = &data[STRUCTURED_HEADER_SIZE..];
        let mut fields: [&[u8]; FIELD_COUNT] = [&[]; FIELD_COUNT];
        for (field, len) in fields.iter_mut().zip(lengths) {
            let (value, remaining) = rest.split_at(len);
            *field = value;
            rest = remaining;
        }

        let [message, severity, sensor_type, sensor_number, association, debug_data] = fields;

        let mut builder = StructuredRecord::builder()
            .record_id(RecordId::new_raw(u16_at(6)))
            .timestamp(Timestamp::from(u32_at(8)))
            .message(decode_str("message", message)?)
            .association(decode_str("association", association)?)
            .debug_data(debug_data);

        match decode_str("severity", severity)? {
            "" => {}
            name => builder = builder.severity(name.parse::<Severity>()?),
        }

        if let Some(value) = decode_hex("sensor type", sensor_type)? {
            builder = builder.sensor_type(value);
        }

        if let Some(value) = decode_hex("sensor number", sensor_number)? {
            builder = builder.sensor_number(value);
        }

        Ok(builder.build()?)
    }
}

fn encode_str(value: &str) -> Vec<u8> {
    if value.is_empty() {
        return Vec::new();
    }

    let mut data = Vec::with_capacity(value.len() + 1);
    data.extend_from_slice(value.as_bytes());
    data.push(0);
    data
}

fn decode_str<'a>(field: &'static str, data: &'a [u8]) -> Result<&'a str, DecodeError> {
    if data.is_empty() {
        return Ok("");
    }

    let end = data
        .iter()
        .position(|b| *b == 0)
        .ok_or(DecodeError::InvalidField {
            field,
            reason: "missing NUL terminator",
        })?;

    core::str::from_utf8(&data[..end]).map_err(|_| DecodeError::InvalidField {
        field,
        reason: "not valid UTF-8",
    })
}

fn decode_hex(field: &'static str, data: &[u8]) -> Result<Option<u8>, DecodeError> {
    let value = decode_str(field, data)?;

    if value.is_empty() {
        return Ok(None);
    }

    value
        .strip_prefix("0x")
        .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        .map(Some)
        .ok_or(DecodeError::InvalidField {
            field,
            reason: "not a hexadecimal byte",
        })
}

/// Builds a [`StructuredRecord`], checking that every field fits the wire format.
#[derive(Debug, Clone, Default)]
pub struct StructuredRecordBuilder {
    record_id: Option<RecordId>,
    timestamp: Option<Timestamp>,
    message: String,
    severity: Option<Severity>,
    sensor_type: Option<u8>,
    sensor_number: Option<u8>,
    association: String,
    debug_data: Vec<u8>,
}

impl StructuredRecordBuilder {
    pub fn record_id(mut self, value: RecordId) -> Self {
        self.record_id = Some(value);
        self
    }

    pub fn timestamp(mut self, value: Timestamp) -> Self {
        self.timestamp = Some(value);
        self
    }

    pub fn message<T: Into<String>>(mut self, value: T) -> Self {
        self.message = value.into();
        self
    }

    pub fn severity(mut self, value: Severity) -> Self {
        self.severity = Some(value);
        self
    }

    pub fn sensor_type(mut self, value: u8) -> Self {
        self.sensor_type = Some(value);
        self
    }

    pub fn sensor_number(mut self, value: u8) -> Self {
        self.sensor_number = Some(value);
        self
    }

    pub fn association<T: Into<String>>(mut self, value: T) -> Self {
        self.association = value.into();
        self
    }

    pub fn debug_data<T: Into<Vec<u8>>>(mut self, value: T) -> Self {
        self.debug_data = value.into();
        self
    }

    pub fn build(self) -> Result<StructuredRecord, RecordError> {
        let max_str = u16::MAX as usize - 1;

        for (field, value) in [("message", &self.message), ("association", &self.association)] {
            if value.contains('\0') {
                return Err(RecordError::InteriorNul(field));
            }
        }

        let message_len = self.message.chars().count();
        if message_len > MAX_MESSAGE_LEN {
            return Err(RecordError::TooLong {
                field: "message",
                len: message_len,
                max: MAX_MESSAGE_LEN,
            });
        }

        if self.association.len() > max_str {
            return Err(RecordError::TooLong {
                field: "association",
                len: self.association.len(),
                max: max_str,
            });
        }

        if self.debug_data.len() > u16::MAX as usize {
            return Err(RecordError::TooLong {
                field: "debug data",
                len: self.debug_data.len(),
                max: u16::MAX as usize,
            });
        }

        Ok(StructuredRecord {
            record_id: self.record_id.unwrap_or(RecordId::UNASSIGNED),
            timestamp: self.timestamp.unwrap_or(Timestamp::from(0)),
            message: self.message,
            severity: self.severity,
            sensor_type: self.sensor_type,
            sensor_number: self.sensor_number,
            association: self.association,
            debug_data: self.debug_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultPlatform;
    use proptest::prelude::*;

    fn sample() -> StructuredRecord {
        StructuredRecord::builder()
            .record_id(RecordId::new(9).unwrap())
            .timestamp(Timestamp::from(1_700_000_000))
            .message("Fan sensor 0x40 asserted Lower Critical Going Low")
            .severity(Severity::Critical)
            .sensor_type(0x04)
            .sensor_number(0x40)
            .association("/xyz/openbmc_project/sensors/fan_tach/fan0")
            .debug_data(vec![0xDE, 0xAD, 0x00, 0xEF])
            .build()
            .unwrap()
    }

    #[test]
    fn test_header() {
        let record = sample();
        let data = record.encode();

        assert_eq!(&data[0..4], &STRUCTURED_MAGIC.to_ne_bytes());
        assert_eq!(&data[4..6], &1u16.to_ne_bytes());
        assert_eq!(&data[6..8], &9u16.to_ne_bytes());
        assert_eq!(&data[12..16], &[0, 0, 0, 0]);

        // "Critical" plus NUL, "0x04" plus NUL
        assert_eq!(&data[18..20], &9u16.to_ne_bytes());
        assert_eq!(&data[20..22], &5u16.to_ne_bytes());
        assert_eq!(&data[26..28], &4u16.to_ne_bytes());
        assert_eq!(&data[data.len() - 4..], &[0xDE, 0xAD, 0x00, 0xEF]);
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_magic_value() {
        assert_eq!(STRUCTURED_MAGIC.to_ne_bytes(), *b"RLES");
    }

    #[test]
    fn test_empty_fields() {
        let record = StructuredRecord::builder().build().unwrap();
        let data = record.encode();

        assert_eq!(data.len(), STRUCTURED_HEADER_SIZE);
        assert_eq!(StructuredRecord::decode(&data), Ok(record));
    }

    #[test]
    fn test_round_trip() {
        let record = sample();
        assert_eq!(StructuredRecord::decode(&record.encode()), Ok(record));
    }

    #[test]
    fn test_decode_errors() {
        let data = sample().encode();

        assert_eq!(
            StructuredRecord::decode(&data[..20]),
            Err(DecodeError::NotEnoughData {
                expected: STRUCTURED_HEADER_SIZE,
                actual: 20
            })
        );

        assert_eq!(
            StructuredRecord::decode(&data[..data.len() - 1]),
            Err(DecodeError::NotEnoughData {
                expected: data.len(),
                actual: data.len() - 1
            })
        );

        let mut trailing = data.clone();
        trailing.push(0);
        assert_eq!(
            StructuredRecord::decode(&trailing),
            Err(DecodeError::TrailingData {
                expected: data.len(),
                actual: data.len() + 1
            })
        );

        let mut version = data.clone();
        version[4..6].copy_from_slice(&2u16.to_ne_bytes());
        assert_eq!(
            StructuredRecord::decode(&version),
            Err(DecodeError::UnsupportedVersion(2))
        );

        let mut magic = data.clone();
        magic[0] = b'X';
        assert_eq!(
            StructuredRecord::decode(&magic),
            Err(DecodeError::Unrecognized { len: data.len() })
        );

        let mut unterminated = data;
        let message_end = STRUCTURED_HEADER_SIZE + sample().message().len();
        unterminated[message_end] = b'!';
        assert_eq!(
            StructuredRecord::decode(&unterminated),
            Err(DecodeError::InvalidField {
                field: "message",
                reason: "missing NUL terminator"
            })
        );
    }

    #[test]
    fn test_builder_limits() {
        assert_eq!(
            StructuredRecord::builder().message("a\0b").build(),
            Err(RecordError::InteriorNul("message"))
        );
        assert_eq!(
            StructuredRecord::builder()
                .message("x".repeat(MAX_MESSAGE_LEN + 1))
                .build(),
            Err(RecordError::TooLong {
                field: "message",
                len: MAX_MESSAGE_LEN + 1,
                max: MAX_MESSAGE_LEN
            })
        );
        assert!(StructuredRecord::builder()
            .debug_data(vec![0u8; u16::MAX as usize + 1])
            .build()
            .is_err());
    }

    /// A record with the given fields, in wire order, behind a valid header.
    fn raw_record(fields: [&[u8]; FIELD_COUNT]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&STRUCTURED_MAGIC.to_ne_bytes());
        data.extend_from_slice(&STRUCTURED_VERSION.to_ne_bytes());
        data.extend_from_slice(&3u16.to_ne_bytes());
        data.extend_from_slice(&0u32.to_ne_bytes());
        data.extend_from_slice(&0u32.to_ne_bytes());

        for field in &fields {
            data.extend_from_slice(&(field.len() as u16).to_ne_bytes());
        }

        for field in &fields {
            data.extend_from_slice(field);
        }

        data
    }

    fn nul_terminated(value: &str) -> Vec<u8> {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        data
    }

    #[test]
    fn test_decode_message_limit() {
        let longest = nul_terminated(&"x".repeat(MAX_MESSAGE_LEN));
        let decoded = StructuredRecord::decode(&raw_record([&longest, &[], &[], &[], &[], &[]]));
        assert_eq!(decoded.unwrap().message().len(), MAX_MESSAGE_LEN);

        let overlong = nul_terminated(&"x".repeat(MAX_MESSAGE_LEN + 1));
        assert_eq!(
            StructuredRecord::decode(&raw_record([&overlong, &[], &[], &[], &[], &[]])),
            Err(DecodeError::Record(RecordError::TooLong {
                field: "message",
                len: MAX_MESSAGE_LEN + 1,
                max: MAX_MESSAGE_LEN
            }))
        );

        // The limit counts characters, not bytes.
        let wide = nul_terminated(&"é".repeat(MAX_MESSAGE_LEN));
        let decoded = StructuredRecord::decode(&raw_record([&wide, &[], &[], &[], &[], &[]]));
        assert_eq!(decoded.unwrap().message().chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_decode_association_limit() {
        let max = u16::MAX as usize - 1;

        let longest = nul_terminated(&"a".repeat(max));
        let record = StructuredRecord::decode(&raw_record([&[], &[], &[], &[], &longest, &[]]))
            .unwrap();
        assert_eq!(record.association().len(), max);
        assert_eq!(StructuredRecord::decode(&record.encode()), Ok(record));

        assert_eq!(
            StructuredRecord::builder()
                .association("a".repeat(max + 1))
                .build(),
            Err(RecordError::TooLong {
                field: "association",
                len: max + 1,
                max
            })
        );
    }

    #[test]
    fn test_decode_debug_data_limit() {
        let longest = vec![0xA5; u16::MAX as usize];
        let record = StructuredRecord::decode(&raw_record([&[], &[], &[], &[], &[], &longest]))
            .unwrap();
        assert_eq!(record.debug_data().len(), u16::MAX as usize);
    }

    #[test]
    fn test_decode_hex_fields() {
        let decode_sensor_type = |value: &str| {
            let field = nul_terminated(value);
            StructuredRecord::decode(&raw_record([&[], &[], &field, &[], &[], &[]]))
                .map(|r| r.sensor_type())
        };

        assert_eq!(decode_sensor_type("0x04"), Ok(Some(0x04)));
        assert_eq!(decode_sensor_type("0xff"), Ok(Some(0xFF)));
        assert_eq!(decode_sensor_type("0x4"), Ok(Some(0x04)));

        for invalid in ["0x100", "0x+4", "0x-1", "0x", "04", "0x 4", "0xG0"] {
            assert_eq!(
                decode_sensor_type(invalid),
                Err(DecodeError::InvalidField {
                    field: "sensor type",
                    reason: "not a hexadecimal byte"
                }),
                "{invalid}"
            );
        }

        let field = nul_terminated("0x+1");
        assert_eq!(
            StructuredRecord::decode(&raw_record([&[], &[], &[], &field, &[], &[]])),
            Err(DecodeError::InvalidField {
                field: "sensor number",
                reason: "not a hexadecimal byte"
            })
        );
    }

    #[test]
    fn test_decode_severity_field() {
        let severity = nul_terminated("Catastrophic");
        assert!(matches!(
            StructuredRecord::decode(&raw_record([&[], &severity, &[], &[], &[], &[]])),
            Err(DecodeError::Validation(_))
        ));
    }

    #[test]
    fn test_from_event() {
        let event = EventRecord::new(Severity::Critical, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00);
        let record =
            StructuredRecord::from_event(&DefaultPlatform, &event, OverlengthPolicy::Reject)
                .unwrap();

        assert_eq!(
            record.message(),
            "Voltage sensor 0x30 asserted Upper Critical Going High, trigger reading 0xC8"
        );
        assert_eq!(record.sensor_type(), Some(0x02));
        assert_eq!(record.debug_data(), &[2, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00]);
        assert_eq!(StructuredRecord::decode(&record.encode()), Ok(record));
    }

    proptest! {
        #[test]
        fn structured_round_trip(
            record_id in any::<u16>(),
            timestamp in any::<u32>(),
            message in "[a-zA-Z0-9 ,.%/()-]{0,120}",
            severity in prop::option::of(prop::sample::select(Severity::ALL.to_vec())),
            sensor_type in any::<Option<u8>>(),
            sensor_number in any::<Option<u8>>(),
            association in "[a-z0-9/_]{0,64}",
            debug_data in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut builder = StructuredRecord::builder()
                .record_id(RecordId::new_raw(record_id))
                .timestamp(Timestamp::from(timestamp))
                .message(message)
                .association(association)
                .debug_data(debug_data);

            if let Some(severity) = severity {
                builder = builder.severity(severity);
            }
            if let Some(sensor_type) = sensor_type {
                builder = builder.sensor_type(sensor_type);
            }
            if let Some(sensor_number) = sensor_number {
                builder = builder.sensor_number(sensor_number);
            }

            let record = builder.build().unwrap();
            prop_assert_eq!(StructuredRecord::decode(&record.encode()), Ok(record));
        }
    }
}
