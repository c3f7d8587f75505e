use crate::{log_vec, LogItem, Loggable};

use ipmi_sel_core::{
    sdr::{ReadingFormat, SdrCatalog, SensorDataRecord},
    sel::{
        assemble_message, lookup_sensor_type_name, EventRecord, OverlengthPolicy, Record,
        StructuredRecord,
    },
    Platform,
};

fn hex_or_unspecified(value: Option<u8>) -> String {
    value
        .map(|v| format!("0x{v:02X}"))
        .unwrap_or_else(|| "Unspecified".into())
}

impl Loggable for EventRecord {
    fn as_log(&self) -> Vec<LogItem> {
        log_vec![
            (0, "SEL event record"),
            (1, "Record ID", format!("0x{:04X}", self.record_id().value())),
            (1, "Time", self.timestamp()),
            (1, "Severity", self.severity()),
            (1, "Sensor type", format!("0x{:02X}", self.sensor_type())),
            (1, "Sensor number", format!("0x{:02X}", self.sensor_number())),
            (1, "Assertion state", self.event_dir()),
            (1, "Event type", format!("0x{:02X}", self.event_type())),
            (1, "Event offset", format!("0x{:02X}", self.event_offset())),
            (1, "Data", format!("{:02X?}", self.event_data())),
        ]
    }
}

impl Loggable for StructuredRecord {
    fn as_log(&self) -> Vec<LogItem> {
        let severity = self
            .severity()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Unspecified".into());

        let mut log = log_vec![
            (0, "Structured SEL record"),
            (1, "Record ID", format!("0x{:04X}", self.record_id().value())),
            (1, "Time", self.timestamp()),
            (1, "Message", self.message()),
            (1, "Severity", severity),
            (1, "Sensor type", hex_or_unspecified(self.sensor_type())),
            (1, "Sensor number", hex_or_unspecified(self.sensor_number())),
        ];

        if !self.association().is_empty() {
            log.push((1, "Association", self.association()).into());
        }

        if !self.debug_data().is_empty() {
            log.push((1, "Debug data", format!("{:02X?}", self.debug_data())).into());
        }

        log
    }
}

impl Loggable for Record {
    fn as_log(&self) -> Vec<LogItem> {
        match self {
            Record::Legacy(record) => record.as_log(),
            Record::Structured(record) => record.as_log(),
        }
    }
}

impl Loggable for SensorDataRecord {
    fn as_log(&self) -> Vec<LogItem> {
        let unit_name = self.unit_name().filter(|n| !n.is_empty()).unwrap_or("None");

        let reading_format = match self.reading_format() {
            Some(ReadingFormat::Unsigned) => "Unsigned",
            Some(ReadingFormat::TwosComplement) => "Two's complement",
            Some(ReadingFormat::OnesComplement) => "One's complement",
            Some(ReadingFormat::Percentage) => "Percentage",
            None => "Not analog",
        };

        let conversion = self.conversion();
        let (m, b) = (conversion.m(), conversion.b());
        let (b_exp, r_exp) = (conversion.b_exp(), conversion.r_exp());

        let mut log = log_vec![
            (0, "SDR Record"),
            (1, "Sensor number", format!("0x{:02X}", self.sensor_number())),
            (1, "Sensor ID", self.sensor_name()),
            (1, "Sensor type", format!("0x{:02X}", self.sensor_type())),
            (1, "Event type", format!("0x{:02X}", self.event_type())),
            (1, "Units", unit_name),
            (1, "Reading format", reading_format),
            (1, "Conversion", format!("m={m} b={b} b_exp={b_exp} r_exp={r_exp}")),
            (1, "Assertion mask", format!("0x{:04X}", self.assertion_mask().bits())),
            (1, "Deassertion mask", format!("0x{:04X}", self.deassertion_mask().bits())),
        ];

        for (threshold, physical) in self.thresholds() {
            let unit = self.threshold(threshold).unwrap_or_default();
            let title = format!("{} threshold", threshold.abbreviation());
            log.push((1, title, format!("{physical:.2} (0x{:02X})", unit as u8)).into());
        }

        log
    }
}

impl Loggable for SdrCatalog {
    fn as_log(&self) -> Vec<LogItem> {
        let mut log = log_vec![(0, "SDR catalog"), (1, "Sensors", self.len())];

        for record in self {
            let mut record_log: Vec<_> = record.as_log().into_iter().map(|i| i.indent(1)).collect();
            log.append(&mut record_log);
        }

        log
    }
}

/// An event record together with the platform that names its events.
pub struct DescribedEvent<'a, P: ?Sized> {
    pub record: &'a EventRecord,
    pub platform: &'a P,
}

impl<'a, P> DescribedEvent<'a, P>
where
    P: Platform + ?Sized,
{
    pub fn new(record: &'a EventRecord, platform: &'a P) -> Self {
        Self { record, platform }
    }
}

impl<P> Loggable for DescribedEvent<'_, P>
where
    P: Platform + ?Sized,
{
    fn as_log(&self) -> Vec<LogItem> {
        let record = self.record;

        let sensor_type = lookup_sensor_type_name(self.platform, record.sensor_type())
            .map(|name| format!("{name} (0x{:02X})", record.sensor_type()))
            .unwrap_or_else(|_| format!("0x{:02X}", record.sensor_type()));

        let mut log = log_vec![
            (0, "SEL event"),
            (1, "Record ID", format!("0x{:04X}", record.record_id().value())),
            (1, "Time", record.timestamp()),
            (1, "Severity", record.severity()),
            (1, "Sensor type", sensor_type),
            (1, "Sensor number", format!("0x{:02X}", record.sensor_number())),
        ];

        match assemble_message(self.platform, record, OverlengthPolicy::Truncate) {
            Ok(message) => log.push((1, "Message", message).into()),
            Err(e) => log.push((1, "Error", e.error).into()),
        }

        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Logger;
    use ipmi_sel_core::{
        sdr::{SensorUnits, Threshold, Unit},
        sel::{RecordId, Severity},
        DefaultPlatform,
    };

    fn voltage_event() -> EventRecord {
        EventRecord::new(Severity::Critical, 0x02, 0x30, 0x01, 0x49, 0xC8, 0x00)
            .with_record_id(RecordId::new(3).unwrap())
    }

    #[test]
    fn test_event_record() {
        let lines = Logger::render(&Record::Legacy(voltage_event()));

        assert_eq!(lines[0], "SEL event record");
        assert!(lines.contains(&"  Record ID:       0x0003".to_string()));
        assert!(lines.contains(&"  Time:            Unknown".to_string()));
        assert!(lines.contains(&"  Assertion state: asserted".to_string()));
        assert!(lines.contains(&"  Data:            [49, C8, 00]".to_string()));
    }

    #[test]
    fn test_structured_record() {
        let record = StructuredRecord::builder()
            .message("hello")
            .sensor_number(0x30)
            .build()
            .unwrap();

        let lines = Logger::render(&record);
        assert_eq!(lines[0], "Structured SEL record");
        assert!(lines.contains(&"  Severity:      Unspecified".to_string()));
        assert!(lines.contains(&"  Sensor number: 0x30".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Association")));
    }

    #[test]
    fn test_described_event() {
        let record = voltage_event();
        let lines = Logger::render(&DescribedEvent::new(&record, &DefaultPlatform));

        assert_eq!(lines[0], "SEL event");
        assert!(lines.contains(&"  Sensor type:   Voltage (0x02)".to_string()));
        assert!(lines.contains(
            &"  Message:       Voltage sensor 0x30 asserted Upper Critical Going High, trigger reading 0xC8"
                .to_string()
        ));

        let reserved = EventRecord::new(Severity::Info, 0x02, 0x30, 0x20, 0x01, 0x00, 0x00);
        let lines = Logger::render(&DescribedEvent::new(&reserved, &DefaultPlatform));
        assert!(lines.contains(&"  Error:         reserved event type 0x20".to_string()));
    }

    #[test]
    fn test_catalog() {
        let temp = SensorDataRecord::builder(0x05, "FIO Inlet Temp 1")
            .sensor_type(0x01)
            .event_type(0x01)
            .units(SensorUnits::new(
                SensorUnits::TWOS_COMPLEMENT,
                Unit::DegreesCelsius,
                Unit::Unspecified,
            ))
            .threshold(Threshold::UpperCritical, 37.0)
            .build()
            .unwrap();

        let catalog = SdrCatalog::builder().record(temp).build().unwrap();
        let lines = Logger::render(&catalog);

        assert_eq!(lines[0], "SDR catalog");
        assert!(lines.contains(&"    Units:            degrees C".to_string()));
        assert!(lines.contains(&"    UC threshold:     37.00 (0x25)".to_string()));
    }
}
