//! The flat-file record format.
//!
//! Every record is written as eleven lines, one field per line, in the order of
//! [`FIELDS`]. Ids and the creation time are decimal, byte fields are `0xNN`, and the
//! raw data is lower-case hexadecimal.

use std::io::{BufRead, Lines, Write};

use ipmi_sel_core::sel::{RecordId, Severity, Timestamp};

use crate::store::{FlatRecord, LogEntry};

pub const FIELDS: [&str; 11] = [
    "log id",
    "name",
    "record id",
    "severity",
    "created",
    "entry type",
    "entry code",
    "sensor type",
    "sensor number",
    "message",
    "raw data",
];

#[derive(Debug, thiserror::Error)]
pub enum FlatFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: missing field '{field}'")]
    MissingField { field: &'static str, line: usize },
    #[error("line {line}: invalid {field}: {reason}")]
    Parse {
        field: &'static str,
        line: usize,
        reason: String,
    },
    #[error("{field} contains a line break")]
    EmbeddedNewline { field: &'static str },
}

fn check_line(field: &'static str, value: &str) -> Result<(), FlatFileError> {
    if value.contains(['\n', '\r']) {
        Err(FlatFileError::EmbeddedNewline { field })
    } else {
        Ok(())
    }
}

pub fn write_record<W: Write>(writer: &mut W, record: &FlatRecord) -> Result<(), FlatFileError> {
    let FlatRecord {
        log_id,
        record_id,
        created,
        entry,
    } = record;

    check_line("name", &entry.name)?;
    check_line("message", &entry.message)?;

    writeln!(writer, "{}", log_id.value())?;
    writeln!(writer, "{}", entry.name)?;
    writeln!(writer, "{}", record_id.value())?;
    writeln!(writer, "{}", entry.severity)?;
    writeln!(writer, "{}", created.value())?;
    writeln!(writer, "0x{:02X}", entry.entry_type)?;
    writeln!(writer, "0x{:02X}", entry.entry_code)?;
    writeln!(writer, "0x{:02X}", entry.sensor_type)?;
    writeln!(writer, "0x{:02X}", entry.sensor_number)?;
    writeln!(writer, "{}", entry.message)?;
    writeln!(writer, "{}", hex::encode(&entry.raw_data))?;

    Ok(())
}

/// Reads [`FlatRecord`]s, one per eleven lines. Iteration stops after the first error.
pub struct FlatFileReader<R> {
    lines: Lines<R>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> FlatFileReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<Result<String, FlatFileError>> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.map_err(Into::into))
    }

    fn field(&mut self, idx: usize) -> Result<(usize, String), FlatFileError> {
        let field = FIELDS[idx];

        match self.next_line() {
            Some(Ok(value)) => Ok((self.line, value)),
            Some(Err(e)) => Err(e),
            None => Err(FlatFileError::MissingField {
                field,
                line: self.line + 1,
            }),
        }
    }

    /// Consume blank lines after the last record. A record following them is an error.
    fn trailing_blank_lines(&mut self) -> Option<Result<FlatRecord, FlatFileError>> {
        let blank = self.line;

        loop {
            match self.next_line()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(_) => {
                    return Some(Err(parse_error(FIELDS[0], blank, "unexpected blank line")))
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn read_record(&mut self, log_id: (usize, String)) -> Result<FlatRecord, FlatFileError> {
        let log_id = parse_id(FIELDS[0], log_id)?
            .ok_or_else(|| parse_error(FIELDS[0], self.line, "log id 0 is not assigned"))?;

        let (_, name) = self.field(1)?;

        let record_id = parse_id(FIELDS[2], self.field(2)?)?.unwrap_or(RecordId::UNASSIGNED);

        let (line, severity) = self.field(3)?;
        let severity: Severity = severity
            .parse()
            .map_err(|e| parse_error(FIELDS[3], line, e))?;

        let (line, created) = self.field(4)?;
        let created: u32 = created
            .parse()
            .map_err(|e| parse_error(FIELDS[4], line, e))?;

        let entry_type = parse_byte(FIELDS[5], self.field(5)?)?;
        let entry_code = parse_byte(FIELDS[6], self.field(6)?)?;
        let sensor_type = parse_byte(FIELDS[7], self.field(7)?)?;
        let sensor_number = parse_byte(FIELDS[8], self.field(8)?)?;

        let (_, message) = self.field(9)?;

        let (line, raw_data) = self.field(10)?;
        let raw_data = hex::decode(raw_data).map_err(|e| parse_error(FIELDS[10], line, e))?;

        Ok(FlatRecord {
            log_id,
            record_id,
            created: Timestamp::from(created),
            entry: LogEntry {
                name,
                severity,
                entry_type,
                entry_code,
                sensor_type,
                sensor_number,
                message,
                raw_data,
            },
        })
    }
}

impl<R: BufRead> Iterator for FlatFileReader<R> {
    type Item = Result<FlatRecord, FlatFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let record = match self.next_line()? {
            Ok(log_id) if log_id.trim().is_empty() => self.trailing_blank_lines()?,
            Ok(log_id) => self.read_record((self.line, log_id)),
            Err(e) => Err(e),
        };

        self.failed = record.is_err();
        Some(record)
    }
}

fn parse_error(field: &'static str, line: usize, reason: impl ToString) -> FlatFileError {
    FlatFileError::Parse {
        field,
        line,
        reason: reason.to_string(),
    }
}

fn parse_id(
    field: &'static str,
    (line, value): (usize, String),
) -> Result<Option<RecordId>, FlatFileError> {
    value
        .parse::<u16>()
        .map(RecordId::new)
        .map_err(|e| parse_error(field, line, e))
}

fn parse_byte(field: &'static str, (line, value): (usize, String)) -> Result<u8, FlatFileError> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        .ok_or_else(|| parse_error(field, line, format!("'{value}' is not a hexadecimal byte")))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use proptest::prelude::*;

    fn sample() -> FlatRecord {
        let id = RecordId::new(12).unwrap();

        FlatRecord {
            log_id: id,
            record_id: id,
            created: Timestamp::from(1_700_000_000),
            entry: LogEntry {
                name: "P12V".into(),
                severity: Severity::Critical,
                entry_type: 0x01,
                entry_code: 0x09,
                sensor_type: 0x02,
                sensor_number: 0x30,
                message: "Voltage sensor 0x30 asserted Upper Critical Going High, trigger reading 0xC8"
                    .into(),
                raw_data: vec![0x02, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00],
            },
        }
    }

    fn write(records: &[FlatRecord]) -> String {
        let mut out = Vec::new();
        for record in records {
            write_record(&mut out, record).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_layout() {
        let text = write(&[sample()]);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "12",
                "P12V",
                "12",
                "Critical",
                "1700000000",
                "0x01",
                "0x09",
                "0x02",
                "0x30",
                "Voltage sensor 0x30 asserted Upper Critical Going High, trigger reading 0xC8",
                "0202300149c800",
            ]
        );
    }

    #[test]
    fn test_load() {
        let mut second = sample();
        second.log_id = RecordId::new(13).unwrap();
        second.entry.name = String::new();

        let text = write(&[sample(), second.clone()]);
        let records: Vec<_> = FlatFileReader::new(Cursor::new(text))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records, vec![sample(), second]);
    }

    #[test]
    fn test_missing_field() {
        let text = write(&[sample()]);
        let truncated: String = text.lines().take(7).map(|l| format!("{l}\n")).collect();

        let mut reader = FlatFileReader::new(Cursor::new(truncated));
        let error = reader.next().unwrap().unwrap_err();

        assert!(matches!(
            error,
            FlatFileError::MissingField {
                field: "sensor type",
                line: 8
            }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_parse_errors() {
        let text = write(&[sample()]).replace("Critical", "Severe");
        let error = FlatFileReader::new(Cursor::new(text)).next().unwrap().unwrap_err();
        assert!(matches!(
            error,
            FlatFileError::Parse {
                field: "severity",
                line: 4,
                ..
            }
        ));

        let text = write(&[sample()]).replace("0x30\n", "48\n");
        let error = FlatFileReader::new(Cursor::new(text)).next().unwrap().unwrap_err();
        assert_eq!(
            error.to_string(),
            "line 9: invalid sensor number: '48' is not a hexadecimal byte"
        );

        let text = write(&[sample()]).replacen("12", "0", 1);
        let error = FlatFileReader::new(Cursor::new(text)).next().unwrap().unwrap_err();
        assert!(matches!(error, FlatFileError::Parse { field: "log id", line: 1, .. }));
    }

    #[test]
    fn test_embedded_newline() {
        let mut record = sample();
        record.entry.message = "two\nlines".into();

        let error = write_record(&mut Vec::new(), &record).unwrap_err();
        assert!(matches!(
            error,
            FlatFileError::EmbeddedNewline { field: "message" }
        ));
    }

    #[test]
    fn test_empty() {
        assert!(FlatFileReader::new(Cursor::new("")).next().is_none());
        assert!(FlatFileReader::new(Cursor::new("\n\n")).next().is_none());
    }

    #[test]
    fn test_trailing_blank_lines() {
        let text = write(&[sample()]) + "\n \n\n";
        let records: Vec<_> = FlatFileReader::new(Cursor::new(text))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records, vec![sample()]);
    }

    #[test]
    fn test_blank_line_between_records() {
        let text = write(&[sample()]) + "\n" + &write(&[sample()]);
        let mut reader = FlatFileReader::new(Cursor::new(text));

        assert_eq!(reader.next().unwrap().unwrap(), sample());
        assert!(matches!(
            reader.next().unwrap().unwrap_err(),
            FlatFileError::Parse {
                field: "log id",
                line: 12,
                ..
            }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_signed_byte() {
        let text = write(&[sample()]).replace("0x30\n", "0x+3\n");
        let error = FlatFileReader::new(Cursor::new(text)).next().unwrap().unwrap_err();
        assert!(matches!(
            error,
            FlatFileError::Parse {
                field: "sensor number",
                line: 9,
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn round_trip(
            log_id in 1u16..,
            record_id in 0u16..,
            created: u32,
            name in "[a-zA-Z0-9 ]{0,16}",
            message in "[ -~]{0,64}",
            bytes: [u8; 4],
            raw_data in proptest::collection::vec(any::<u8>(), 0..16),
        ) {
            let record = FlatRecord {
                log_id: RecordId::new(log_id).unwrap(),
                record_id: RecordId::new(record_id).unwrap_or(RecordId::UNASSIGNED),
                created: Timestamp::from(created),
                entry: LogEntry {
                    name,
                    severity: Severity::Warning,
                    entry_type: bytes[0],
                    entry_code: bytes[1],
                    sensor_type: bytes[2],
                    sensor_number: bytes[3],
                    message,
                    raw_data,
                },
            };

            let text = write(&[record.clone()]);
            let loaded: Vec<_> = FlatFileReader::new(Cursor::new(text))
                .collect::<Result<_, _>>()
                .unwrap();

            prop_assert_eq!(loaded, vec![record]);
        }
    }
}
